use crate::error::{GaraponError, Result};

/// Largest value any drum can hold; the counting sort domain is `0..=MAX_BALL`.
pub const MAX_BALL: u32 = 100;

/// Sort main numbers ascending with a stable counting sort.
///
/// Every value must lie in `0..=MAX_BALL`; anything else is rejected rather
/// than clamped so a corrupted draw never reaches the screen.
pub fn sort_main(values: &[u32]) -> Result<Vec<u32>> {
    let mut count = [0usize; MAX_BALL as usize + 1];

    for &value in values {
        if value > MAX_BALL {
            return Err(GaraponError::OutOfDomain {
                value,
                max: MAX_BALL,
            });
        }
        count[value as usize] += 1;
    }

    for i in 1..count.len() {
        count[i] += count[i - 1];
    }

    let mut sorted = vec![0; values.len()];
    for &value in values.iter().rev() {
        let slot = &mut count[value as usize];
        *slot -= 1;
        sorted[*slot] = value;
    }

    Ok(sorted)
}

/// Bonus numbers as presented: a pair is shown low then high, anything else
/// in the order it was drawn.
pub fn order_bonus(values: &[u32]) -> Vec<u32> {
    match values {
        [a, b] => vec![*a.min(b), *a.max(b)],
        _ => values.to_vec(),
    }
}

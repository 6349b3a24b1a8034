use crate::error::{GaraponError, Result};
use crate::palette::Color;
use crate::sort::MAX_BALL;

/// Pool value marking a slot with no ball in it.
pub const EMPTY: u32 = 0;

/// One drum of numbered balls.
///
/// The pool is `size` slots wide. After a reset the first `draw_count` slots
/// hold balls `1..=draw_count` and the rest are [`EMPTY`] padding, which keeps
/// the on-screen grid a fixed width. Only the shuffler and the timed picker
/// move or remove balls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    pool: Vec<u32>,
    draw_count: usize,
    sample_size: usize,
    bonus_count: usize,
    color: Option<Color>,
}

impl Machine {
    pub fn new(
        size: usize,
        draw_count: usize,
        sample_size: usize,
        bonus_count: usize,
        color: Option<Color>,
    ) -> Result<Self> {
        if size < draw_count || draw_count < sample_size || sample_size < bonus_count {
            return Err(GaraponError::config(format!(
                "Machine needs size >= balls >= sample >= bonus, got {} / {} / {} / {}",
                size, draw_count, sample_size, bonus_count
            )));
        }

        if draw_count > MAX_BALL as usize {
            return Err(GaraponError::config(format!(
                "Machine cannot hold more than {} balls, got {}",
                MAX_BALL, draw_count
            )));
        }

        let mut machine = Self {
            pool: vec![EMPTY; size],
            draw_count,
            sample_size,
            bonus_count,
            color,
        };
        machine.reset();
        Ok(machine)
    }

    /// Put every ball back, in ascending slot order.
    pub fn reset(&mut self) {
        for (slot, value) in self.pool.iter_mut().enumerate() {
            *value = if slot < self.draw_count {
                slot as u32 + 1
            } else {
                EMPTY
            };
        }
    }

    pub fn size(&self) -> usize {
        self.pool.len()
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Draws this drum supplies over one playthrough.
    pub fn draws_required(&self) -> usize {
        self.sample_size + self.bonus_count
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn pool(&self) -> &[u32] {
        &self.pool
    }

    /// Balls still in the drum.
    pub fn remaining(&self) -> usize {
        self.pool.iter().filter(|&&v| v != EMPTY).count()
    }

    pub(crate) fn pool_mut(&mut self) -> &mut [u32] {
        &mut self.pool
    }

    /// Remove the ball at `slot`, leaving the slot empty.
    pub(crate) fn take(&mut self, slot: usize) -> Option<u32> {
        match self.pool.get_mut(slot) {
            Some(value) if *value != EMPTY => Some(std::mem::replace(value, EMPTY)),
            _ => None,
        }
    }
}

use crate::machine::Machine;
use rand::Rng;

/// Fisher-Yates shuffler over a machine's whole pool, padding included.
#[derive(Debug)]
pub struct Shuffler<R> {
    rng: R,
}

impl<R: Rng> Shuffler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn shuffle(&mut self, machine: &mut Machine) {
        permute(&mut self.rng, machine.pool_mut());
    }
}

/// Swap index is `floor((i + 1) * u)` for a uniform `u` in `[0, 1)`.
fn permute<R: Rng + ?Sized>(rng: &mut R, pool: &mut [u32]) {
    for i in (1..pool.len()).rev() {
        let u: f64 = rng.gen();
        let j = (((i + 1) as f64 * u) as usize).min(i);
        pool.swap(i, j);
    }
}

use rand::RngCore;

/// Source of uniform draws in `[0, 1)` consumed by the scheduler.
///
/// Every `rand` generator qualifies; [`ReplaySource`] feeds a fixed sequence
/// so trajectories can be pinned down exactly.
pub trait UniformSource {
    fn uniform(&mut self) -> f64;

    /// Draws from the open interval `(0, 1)`, rejecting exact zeros so that
    /// `-ln(u)` stays finite.
    fn open_unit(&mut self) -> f64 {
        loop {
            let u = self.uniform();
            if u != 0.0 {
                return u;
            }
        }
    }
}

impl<R: RngCore> UniformSource for R {
    #[inline]
    fn uniform(&mut self) -> f64 {
        rand::Rng::r#gen::<f64>(self)
    }
}

/// Replays `values` in order, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct ReplaySource {
    values: Vec<f64>,
    cursor: usize,
}

impl ReplaySource {
    /// # Panics
    ///
    /// Panics if a value falls outside `[0, 1)`, or if `values` holds no
    /// non-zero draw (which would stall [`UniformSource::open_unit`]).
    pub fn new(values: Vec<f64>) -> Self {
        assert!(
            values.iter().all(|u| (0.0..1.0).contains(u)),
            "replay values must lie in [0, 1)"
        );
        assert!(
            values.iter().any(|&u| u != 0.0),
            "replay source needs at least one non-zero value"
        );
        Self { values, cursor: 0 }
    }

    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for ReplaySource {
    fn uniform(&mut self) -> f64 {
        let u = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        u
    }
}

/// Per-run seed derived from the ensemble seed with a SplitMix64 step, so
/// run `i` sees the same stream regardless of how runs are scheduled.
pub fn derive_seed(seed: Option<u64>, run: u64) -> u64 {
    const GOLDEN_GAMMA: u64 = 0x9E3779B97F4A7C15;
    let base = seed.unwrap_or(0xDEADBEEFCAFEBABE);
    let mut z = base ^ (run.wrapping_mul(GOLDEN_GAMMA));
    z = z.wrapping_add(GOLDEN_GAMMA);
    let mut result = z;
    result = (result ^ (result >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    result = (result ^ (result >> 27)).wrapping_mul(0x94D049BB133111EB);
    result ^ (result >> 31)
}

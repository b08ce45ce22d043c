//! Streaming mean / RMS accumulator (Welford).
//!
//! Replaces reading the mean and RMS off a filled histogram: only the
//! population moments matter, binning does not.

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStats {
    n: usize,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn count(&self) -> usize {
        self.n
    }

    /// Sample mean, `None` when nothing was pushed.
    pub fn mean(&self) -> Option<f64> {
        (self.n > 0).then_some(self.mean)
    }

    /// Population standard deviation (divides by `n`).
    pub fn rms(&self) -> Option<f64> {
        (self.n > 0).then(|| (self.m2 / self.n as f64).max(0.0).sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_moments() {
        let s = RunningStats::new();
        assert_eq!(s.count(), 0);
        assert!(s.mean().is_none());
        assert!(s.rms().is_none());
    }

    #[test]
    fn matches_two_pass_moments() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut s = RunningStats::new();
        for &x in &xs {
            s.push(x);
        }
        assert_eq!(s.count(), 8);
        assert!((s.mean().unwrap() - 5.0).abs() < 1e-12);
        assert!((s.rms().unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_zero_spread() {
        let mut s = RunningStats::new();
        s.push(123.5);
        assert_eq!(s.mean(), Some(123.5));
        assert_eq!(s.rms(), Some(0.0));
    }
}

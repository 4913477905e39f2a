use serde::{Deserialize, Serialize};

/// Running accumulation of the contributions accepted by an adaptive
/// integration, in MKS coefficients.
///
/// Every accepted subinterval adds its area and an error term (the local
/// estimate of its error times its width). The standard deviation of those
/// terms is the statistical error estimate of the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegralStats {
    count: usize,
    area: f64,
    sum_sq: f64,
}

impl IntegralStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, area: f64, error: f64) {
        self.count += 1;
        self.area += area;
        self.sum_sq += error * error;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Total signed area accepted so far.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// `sqrt(sum_sq / count)`, undefined before the first contribution.
    pub fn stdev(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some((self.sum_sq / self.count as f64).sqrt())
        }
    }

    /// Larger of the statistical estimate and the round-off floor `|area|·ε`.
    pub fn error_estimate(&self) -> f64 {
        let roundoff = self.area.abs() * f64::EPSILON;
        self.stdev().map_or(roundoff, |s| s.max(roundoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdev_is_undefined_when_empty() {
        let stats = IntegralStats::new();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.stdev(), None);
        assert_eq!(stats.error_estimate(), 0.0);
    }

    #[test]
    fn accumulates_area_and_rms_error() {
        let mut stats = IntegralStats::new();
        stats.add(1.0, 3.0);
        stats.add(-0.25, 4.0);
        assert_eq!(stats.count(), 2);
        assert_eq!(stats.area(), 0.75);
        let expected = (25.0_f64 / 2.0).sqrt();
        assert!((stats.stdev().unwrap() - expected).abs() < 1e-15);
    }

    #[test]
    fn error_estimate_never_below_roundoff() {
        let mut stats = IntegralStats::new();
        stats.add(1e10, 0.0);
        assert_eq!(stats.error_estimate(), 1e10 * f64::EPSILON);
    }
}

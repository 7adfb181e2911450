//! Construction parameters for `ElasticHashMap`

use crate::error::ConfigError;

/// Construction parameters for an `ElasticHashMap`.
///
/// `capacity` is the total number of slots across all levels. `delta` is the slack
/// fraction kept permanently free: the table stops accepting new keys once it holds
/// `capacity - floor(delta * capacity)` entries. `probe_constant` scales how many probe
/// attempts a level admits for a given load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElasticConfig {
    /// Total number of slots
    pub capacity: usize,
    /// Fraction of slots reserved as headroom, in (0, 1)
    pub delta: f64,
    /// Multiplier applied to the per-level probe limit
    pub probe_constant: f64,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self::new(64, 0.1)
    }
}

impl ElasticConfig {
    /// Probe constant used unless overridden
    pub const DEFAULT_PROBE_CONSTANT: f64 = 4.0;

    /// Creates a config with the given capacity and slack fraction
    #[must_use]
    pub fn new(capacity: usize, delta: f64) -> Self {
        Self { capacity, delta, probe_constant: Self::DEFAULT_PROBE_CONSTANT }
    }

    /// Replaces the probe constant
    #[must_use]
    pub fn with_probe_constant(mut self, probe_constant: f64) -> Self {
        self.probe_constant = probe_constant;
        self
    }

    /// Checks that every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        // NaN fails both comparisons
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(ConfigError::InvalidDelta(self.delta));
        }
        if !(self.probe_constant.is_finite() && self.probe_constant > 0.0) {
            return Err(ConfigError::InvalidProbeConstant(self.probe_constant));
        }
        Ok(())
    }

    /// Maximum number of entries the table will accept
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn max_len(&self) -> usize {
        let reserved = (self.delta * self.capacity as f64).floor() as usize;
        self.capacity.saturating_sub(reserved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ElasticConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert!((config.probe_constant - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert_eq!(ElasticConfig::new(0, 0.1).validate(), Err(ConfigError::ZeroCapacity));
        assert_eq!(ElasticConfig::new(8, 0.0).validate(), Err(ConfigError::InvalidDelta(0.0)));
        assert_eq!(ElasticConfig::new(8, 1.0).validate(), Err(ConfigError::InvalidDelta(1.0)));
        assert!(matches!(
            ElasticConfig::new(8, f64::NAN).validate(),
            Err(ConfigError::InvalidDelta(_))
        ));
        assert_eq!(
            ElasticConfig::new(8, 0.5).with_probe_constant(-1.0).validate(),
            Err(ConfigError::InvalidProbeConstant(-1.0))
        );
        assert!(matches!(
            ElasticConfig::new(8, 0.5).with_probe_constant(f64::INFINITY).validate(),
            Err(ConfigError::InvalidProbeConstant(_))
        ));
    }

    #[test]
    fn test_max_len() {
        assert_eq!(ElasticConfig::new(10, 0.1).max_len(), 9);
        assert_eq!(ElasticConfig::new(3, 0.1).max_len(), 3);
        assert_eq!(ElasticConfig::new(100, 0.25).max_len(), 75);
        assert_eq!(ElasticConfig::new(1, 0.99).max_len(), 1);
    }
}

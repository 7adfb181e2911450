//! Quadratic probe sequence and the adaptive per-level probe limit

/// Number of probe attempts a level admits at its current occupancy.
///
/// `c * min(log2(1 / free_fraction), log2(1 / delta))`, floored, and never below one. The
/// limit only grows as the level fills, which keeps every placed key reachable.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub(crate) fn probe_limit(free_fraction: f64, delta: f64, probe_constant: f64) -> usize {
    // A full level gives log2(inf) = inf, so the delta bound takes over
    let by_load = (1.0 / free_fraction).log2();
    let by_delta = (1.0 / delta).log2();
    let limit = (probe_constant * by_load.min(by_delta)).floor();
    (limit as usize).max(1)
}

/// Slot indices visited for one key within one level.
///
/// Attempt `j` maps to `((hash mod 2^32) + j^2) mod size`. Slots may repeat before the level
/// is exhausted.
#[derive(Debug, Clone)]
pub(crate) struct ProbeSequence {
    /// Lower 32 bits of the key's hash
    base: u64,
    /// Number of slots in the level
    size: u64,
    /// Next attempt number
    attempt: u64,
    /// Attempts allowed in total
    limit: u64,
}

impl ProbeSequence {
    /// Sequence of `limit` probes into a level of `size` slots. An empty level yields nothing.
    pub(crate) fn new(hash: u64, size: usize, limit: usize) -> Self {
        let size = size as u64;
        let limit = if size == 0 { 0 } else { limit as u64 };
        Self { base: hash & 0xFFFF_FFFF, size, attempt: 0, limit }
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    #[allow(clippy::cast_possible_truncation)]
    fn next(&mut self) -> Option<usize> {
        if self.attempt >= self.limit {
            return None;
        }
        let offset = self.attempt.saturating_mul(self.attempt);
        let index = self.base.saturating_add(offset).checked_rem(self.size)?;
        self.attempt = self.attempt.saturating_add(1);
        // index < size, which came from a usize
        Some(index as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining =
            usize::try_from(self.limit.saturating_sub(self.attempt)).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_limit_grows_with_load() {
        let delta = 0.1;
        // Empty level: log2(1) = 0, clamped to one attempt
        assert_eq!(probe_limit(1.0, delta, 4.0), 1);
        // Half full: 4 * log2(2) = 4
        assert_eq!(probe_limit(0.5, delta, 4.0), 4);
        // Quarter free: 4 * log2(4) = 8
        assert_eq!(probe_limit(0.25, delta, 4.0), 8);
        // Full level is capped by delta: floor(4 * log2(10)) = 13
        assert_eq!(probe_limit(0.0, delta, 4.0), 13);
        assert_eq!(probe_limit(0.01, delta, 4.0), 13);
    }

    #[test]
    fn test_probe_limit_scales_with_constant() {
        assert_eq!(probe_limit(0.5, 0.1, 1.0), 1);
        assert_eq!(probe_limit(0.5, 0.1, 10.0), 10);
        // log2(1 / 0.5) caps at 1 for delta = 0.5
        assert_eq!(probe_limit(0.0, 0.5, 4.0), 4);
    }

    #[test]
    fn test_sequence_is_quadratic() {
        let probes: Vec<usize> = ProbeSequence::new(3, 100, 5).collect();
        assert_eq!(probes, vec![3, 4, 7, 12, 19]);
    }

    #[test]
    fn test_sequence_masks_high_bits() {
        let high = (1_u64 << 40) | 5;
        let probes: Vec<usize> = ProbeSequence::new(high, 7, 3).collect();
        assert_eq!(probes, vec![5, 6, 2]);
    }

    #[test]
    fn test_sequence_wraps_and_revisits() {
        // j^2 mod 2 alternates, so only two distinct slots appear
        let probes: Vec<usize> = ProbeSequence::new(0, 2, 4).collect();
        assert_eq!(probes, vec![0, 1, 0, 1]);
    }

    #[test]
    fn test_empty_level_yields_nothing() {
        assert_eq!(ProbeSequence::new(12345, 0, 10).count(), 0);
        assert_eq!(ProbeSequence::new(12345, 8, 0).count(), 0);
        assert_eq!(ProbeSequence::new(12345, 8, 6).size_hint(), (6, Some(6)));
    }
}

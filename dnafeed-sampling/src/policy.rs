use rand::Rng;

use crate::window::valid_offset_range;

///
/// Caps every archive's usable index range to the smallest archive, so each archive
/// carries the same selection weight regardless of its true size.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalancePolicy {
    enabled: bool,
}

impl BalancePolicy {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The index range drawn from for each archive.
    pub fn effective_lengths(&self, lengths: &[usize]) -> Vec<usize> {
        if !self.enabled {
            return lengths.to_vec();
        }
        let min = lengths.iter().copied().min().unwrap_or(0);
        vec![min; lengths.len()]
    }
}

///
/// Random window placement. Fractions are drawn when the index table is built, so a
/// materialized epoch always yields the same windows.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AugmentPolicy {
    enabled: bool,
}

impl AugmentPolicy {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Draw a fraction in `[0, 1)`, or nothing when augmentation is disabled.
    pub fn draw<R: Rng>(&self, rng: &mut R) -> Option<f64> {
        self.enabled.then(|| rng.random::<f64>())
    }

    ///
    /// Window offset for a sequence: `floor(fraction * (sequence_length - window_length + 1))`,
    /// always within `[0, sequence_length - window_length]`. Zero when disabled or when the
    /// sequence can't hold a window.
    ///
    pub fn offset(&self, fraction: f64, sequence_length: usize, window_length: usize) -> usize {
        if !self.enabled {
            return 0;
        }
        match valid_offset_range(sequence_length, window_length) {
            Some(range) => {
                let max = *range.end();
                let offset = (fraction * (max + 1) as f64) as usize;
                offset.min(max)
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    #[rstest]
    fn test_balance_clamps_to_smallest() {
        let policy = BalancePolicy::new(true);
        assert_eq!(policy.effective_lengths(&[10, 20, 30]), vec![10, 10, 10]);
    }

    #[rstest]
    fn test_balance_disabled_keeps_lengths() {
        let policy = BalancePolicy::new(false);
        assert_eq!(policy.effective_lengths(&[10, 20, 30]), vec![10, 20, 30]);
    }

    #[rstest]
    #[case(0.0, 10, 4, 0)]
    #[case(0.5, 10, 4, 3)]
    #[case(0.999_999, 10, 4, 6)]
    #[case(0.7, 4, 4, 0)]
    fn test_offset(
        #[case] fraction: f64,
        #[case] sequence_length: usize,
        #[case] window_length: usize,
        #[case] expected: usize,
    ) {
        let policy = AugmentPolicy::new(true);
        assert_eq!(policy.offset(fraction, sequence_length, window_length), expected);
    }

    #[rstest]
    fn test_offset_disabled_is_zero() {
        let policy = AugmentPolicy::new(false);
        assert_eq!(policy.offset(0.9, 100, 4), 0);
        assert_eq!(policy.draw(&mut StdRng::seed_from_u64(0)), None);
    }

    #[rstest]
    fn test_offsets_stay_in_bounds() {
        let policy = AugmentPolicy::new(true);
        let mut rng = StdRng::seed_from_u64(7);
        for sequence_length in 4..64 {
            let fraction = policy.draw(&mut rng).unwrap();
            let offset = policy.offset(fraction, sequence_length, 4);
            assert!(offset <= sequence_length - 4);
        }
    }
}

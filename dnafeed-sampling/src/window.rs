use std::ops::RangeInclusive;

///
/// Offsets at which a window of `window_length` fits inside a sequence of
/// `sequence_length`, or `None` if the sequence is too short.
///
pub fn valid_offset_range(
    sequence_length: usize,
    window_length: usize,
) -> Option<RangeInclusive<usize>> {
    sequence_length
        .checked_sub(window_length)
        .map(|max_offset| 0..=max_offset)
}

///
/// Clip `window_length` bytes starting at `offset`.
///
/// # Panics
/// If `offset + window_length` exceeds the sequence. Callers check lengths first; a
/// violation means the archive and the window length don't match.
///
pub fn clip(sequence: &[u8], offset: usize, window_length: usize) -> &[u8] {
    assert!(
        offset + window_length <= sequence.len(),
        "window [{offset}, {}) exceeds sequence of length {}",
        offset + window_length,
        sequence.len()
    );
    &sequence[offset..offset + window_length]
}

/// Fixed-length window clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowExtractor {
    window_length: usize,
}

impl WindowExtractor {
    pub fn new(window_length: usize) -> Self {
        Self { window_length }
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn fits(&self, sequence_length: usize) -> bool {
        sequence_length >= self.window_length
    }

    pub fn valid_offset_range(&self, sequence_length: usize) -> Option<RangeInclusive<usize>> {
        valid_offset_range(sequence_length, self.window_length)
    }

    pub fn clip<'a>(&self, sequence: &'a [u8], offset: usize) -> &'a [u8] {
        clip(sequence, offset, self.window_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(10, 4, Some(0..=6))]
    #[case(4, 4, Some(0..=0))]
    #[case(3, 4, None)]
    fn test_valid_offset_range(
        #[case] sequence_length: usize,
        #[case] window_length: usize,
        #[case] expected: Option<RangeInclusive<usize>>,
    ) {
        assert_eq!(valid_offset_range(sequence_length, window_length), expected);
    }

    #[rstest]
    fn test_clip() {
        let sequence = [0u8, 1, 2, 3, 4, 0, 1];
        let extractor = WindowExtractor::new(3);
        assert_eq!(extractor.clip(&sequence, 0), &[0, 1, 2]);
        assert_eq!(extractor.clip(&sequence, 4), &[4, 0, 1]);
        assert!(extractor.fits(sequence.len()));
        assert!(!extractor.fits(2));
    }

    #[rstest]
    #[should_panic]
    fn test_clip_past_end_panics() {
        clip(&[0, 1, 2], 1, 3);
    }
}

//! Overlapping k-mer codes.
//!
//! Each run of `k` consecutive base codes is folded into one integer in `[0, 5^k)` with
//! the **first base most significant**:
//!
//! ```text
//! code[i] = w[i] * 5^(k-1) + w[i+1] * 5^(k-2) + ... + w[i+k-1] * 5^0
//! ```
//!
//! This is the numbering produced by convolving a window with `[5^0, 5^1, ..., 5^(k-1)]`
//! (the kernel is flipped by the convolution), and it is the vocabulary numbering the
//! downstream embedding tables use. A window of length `L` yields `L - k + 1` codes.

use ndarray::{Array2, ArrayView1, ArrayView2};

use dnafeed_core::alphabet::{NUM_BASE_CODES, is_base_code};

use crate::errors::{Result, SamplingError};

pub const KMER_RADIX: u32 = NUM_BASE_CODES as u32;

/// Largest k whose vocabulary (`5^k`) fits in a `u32`.
pub const MAX_KMER: usize = 13;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerEncoder {
    k: usize,
    // weights[j] = 5^(k-1-j)
    weights: Vec<u32>,
}

impl KmerEncoder {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 || k > MAX_KMER {
            return Err(SamplingError::InvalidKmer(k));
        }
        let weights = (0..k)
            .map(|j| KMER_RADIX.pow((k - 1 - j) as u32))
            .collect();
        Ok(Self { k, weights })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn is_identity(&self) -> bool {
        self.k == 1
    }

    /// Number of distinct k-mer codes.
    pub fn vocab_size(&self) -> u32 {
        KMER_RADIX.pow(self.k as u32)
    }

    /// Number of codes produced for a window, zero if the window is shorter than k.
    pub fn output_len(&self, window_length: usize) -> usize {
        (window_length + 1).saturating_sub(self.k)
    }

    ///
    /// Overlapping k-mer codes of `window`.
    ///
    /// # Panics
    /// If `window` holds a byte that is not a base code (`>= 5`).
    ///
    pub fn encode(&self, window: &[u8]) -> Vec<u32> {
        let mut codes = vec![0; self.output_len(window.len())];
        self.encode_into(window, &mut codes);
        codes
    }

    ///
    /// Encode `window` into `out`, which must hold exactly `output_len(window.len())` codes.
    ///
    /// # Panics
    /// If `out` has the wrong length or `window` holds a byte that is not a base code.
    ///
    pub fn encode_into(&self, window: &[u8], out: &mut [u32]) {
        assert_eq!(
            out.len(),
            self.output_len(window.len()),
            "output buffer length doesn't match a window of length {}",
            window.len()
        );
        assert_base_codes(window.iter());
        for (code, kmer) in out.iter_mut().zip(window.windows(self.k)) {
            *code = self.fold(kmer.iter().copied());
        }
    }

    ///
    /// Encode every row independently. Output shape is `(rows, cols - k + 1)`.
    ///
    /// # Panics
    /// If any byte is not a base code.
    ///
    pub fn encode_rows(&self, windows: ArrayView2<u8>) -> Array2<u32> {
        assert_base_codes(windows.iter());
        let out_len = self.output_len(windows.ncols());
        Array2::from_shape_fn((windows.nrows(), out_len), |(row, col)| {
            self.code_at(windows.row(row), col)
        })
    }

    /// Base codes of a k-mer, first base first.
    pub fn decode(&self, code: u32) -> Vec<u8> {
        self.weights
            .iter()
            .map(|&weight| ((code / weight) % KMER_RADIX) as u8)
            .collect()
    }

    fn code_at(&self, row: ArrayView1<u8>, start: usize) -> u32 {
        self.fold((start..start + self.k).map(|i| row[i]))
    }

    fn fold<I: Iterator<Item = u8>>(&self, bases: I) -> u32 {
        bases
            .zip(self.weights.iter())
            .map(|(base, &weight)| base as u32 * weight)
            .sum()
    }
}

/// Panics on the first byte outside `[0, 5)`.
fn assert_base_codes<'a, I: Iterator<Item = &'a u8>>(mut bases: I) {
    if let Some(code) = bases.find(|&&code| !is_base_code(code)) {
        panic!("invalid base code {code} in k-mer window");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_identity() {
        let encoder = KmerEncoder::new(1).unwrap();
        assert!(encoder.is_identity());
        assert_eq!(encoder.encode(&[0, 4, 2, 3]), vec![0, 4, 2, 3]);
    }

    #[rstest]
    fn test_first_base_most_significant() {
        let encoder = KmerEncoder::new(2).unwrap();
        // AC -> 0*5 + 1, CG -> 1*5 + 2, GT -> 2*5 + 3
        assert_eq!(encoder.encode(&[0, 1, 2, 3]), vec![1, 7, 13]);

        let encoder = KmerEncoder::new(3).unwrap();
        assert_eq!(encoder.encode(&[1, 0, 0]), vec![25]);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(6)]
    fn test_all_zero_window(#[case] k: usize) {
        let encoder = KmerEncoder::new(k).unwrap();
        let codes = encoder.encode(&[0; 6]);
        assert_eq!(codes.len(), 6 - k + 1);
        assert!(codes.iter().all(|&code| code == 0));
    }

    #[rstest]
    fn test_codes_stay_in_vocab() {
        let encoder = KmerEncoder::new(MAX_KMER).unwrap();
        let codes = encoder.encode(&[4; 20]);
        assert_eq!(codes.len(), 8);
        assert!(codes.iter().all(|&code| code == encoder.vocab_size() - 1));
    }

    #[rstest]
    fn test_decode_inverts_encode() {
        let encoder = KmerEncoder::new(4).unwrap();
        let window = [3u8, 0, 4, 1, 2, 2];
        let codes = encoder.encode(&window);
        for (i, &code) in codes.iter().enumerate() {
            assert_eq!(encoder.decode(code), window[i..i + 4].to_vec());
        }
    }

    #[rstest]
    fn test_encode_rows_has_no_cross_row_leakage() {
        let encoder = KmerEncoder::new(2).unwrap();
        let windows = array![[0u8, 1, 2], [4, 4, 4]];
        let codes = encoder.encode_rows(windows.view());
        assert_eq!(codes, array![[1u32, 7], [24, 24]]);
    }

    #[rstest]
    fn test_short_window_is_empty() {
        let encoder = KmerEncoder::new(5).unwrap();
        assert!(encoder.encode(&[0, 1, 2]).is_empty());
    }

    #[rstest]
    #[should_panic(expected = "invalid base code 255")]
    fn test_non_base_code_panics() {
        KmerEncoder::new(MAX_KMER).unwrap().encode(&[255; MAX_KMER]);
    }

    #[rstest]
    #[should_panic(expected = "invalid base code 5")]
    fn test_encode_rows_non_base_code_panics() {
        let windows = array![[0u8, 1, 2], [3, 4, 5]];
        KmerEncoder::new(2).unwrap().encode_rows(windows.view());
    }

    #[rstest]
    #[should_panic(expected = "output buffer length")]
    fn test_encode_into_wrong_buffer_panics() {
        let mut out = vec![0; 2];
        KmerEncoder::new(2).unwrap().encode_into(&[0, 1, 2, 3], &mut out);
    }

    #[rstest]
    #[case(0)]
    #[case(MAX_KMER + 1)]
    fn test_invalid_k(#[case] k: usize) {
        assert!(matches!(
            KmerEncoder::new(k),
            Err(SamplingError::InvalidKmer(_))
        ));
    }
}

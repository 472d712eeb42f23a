//! Single-base codes stored inside archives.
//!
//! Sequences are kept as one byte per base, already mapped to a code in `[0, 5)`:
//!
//! | base | code |
//! |------|------|
//! | A    | 0    |
//! | C    | 1    |
//! | G    | 2    |
//! | T    | 3    |
//! | other (N, padding) | 4 |

pub const BASE_A: u8 = 0;
pub const BASE_C: u8 = 1;
pub const BASE_G: u8 = 2;
pub const BASE_T: u8 = 3;
pub const BASE_N: u8 = 4;

/// Number of distinct base codes, i.e. the radix of the k-mer encoding.
pub const NUM_BASE_CODES: u8 = 5;

const fn build_encoding_array() -> [u8; 256] {
    let mut array = [BASE_N; 256];
    array[b'A' as usize] = BASE_A;
    array[b'a' as usize] = BASE_A;
    array[b'C' as usize] = BASE_C;
    array[b'c' as usize] = BASE_C;
    array[b'G' as usize] = BASE_G;
    array[b'g' as usize] = BASE_G;
    array[b'T' as usize] = BASE_T;
    array[b't' as usize] = BASE_T;
    array
}

/// Maps an ASCII nucleotide to its base code.
pub static BASE_ENCODING: [u8; 256] = build_encoding_array();

/// Maps a base code back to its ASCII nucleotide.
pub static BASE_DECODING: [u8; NUM_BASE_CODES as usize] = *b"ACGTN";

#[inline]
pub fn is_base_code(code: u8) -> bool {
    code < NUM_BASE_CODES
}

/// Encode ASCII nucleotides into base codes. Anything outside `ACGT` becomes `N`.
pub fn encode_bases<T: AsRef<[u8]>>(sequence: T) -> Vec<u8> {
    sequence
        .as_ref()
        .iter()
        .map(|&byte| BASE_ENCODING[byte as usize])
        .collect()
}

/// Decode base codes into ASCII nucleotides. Invalid codes decode to `N`.
pub fn decode_bases(codes: &[u8]) -> Vec<u8> {
    codes
        .iter()
        .map(|&code| {
            BASE_DECODING
                .get(code as usize)
                .copied()
                .unwrap_or(b'N')
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(b"ACGT", vec![0, 1, 2, 3])]
    #[case(b"acgt", vec![0, 1, 2, 3])]
    #[case(b"NRY-", vec![4, 4, 4, 4])]
    fn test_encode_bases(#[case] input: &[u8], #[case] expected: Vec<u8>) {
        assert_eq!(encode_bases(input), expected);
    }

    #[rstest]
    fn test_decode_bases() {
        assert_eq!(decode_bases(&[0, 1, 2, 3, 4, 9]), b"ACGTNN".to_vec());
    }

    #[rstest]
    fn test_is_base_code() {
        assert!(is_base_code(BASE_N));
        assert!(!is_base_code(NUM_BASE_CODES));
    }
}

//! Nix base32 encoding.
//!
//! Nix renders store path hashes with a 32-character alphabet that drops
//! `e`, `o`, `u` and `t` to avoid accidental words. The bit traversal is
//! unusual: the input bytes are taken in reverse order, most significant
//! bit first within each byte, and consumed five bits at a time from the
//! front of that stream. When the total bit count is not a multiple of
//! five, the final short group is consumed as a right-aligned value.
//!
//! Store path hashes are always 20 bytes (160 bits), where this layout is
//! identical to the encoding in Nix's `libutil`. Other input lengths are
//! supported for testability.

/// The 32-character alphabet used by Nix's base32 encoding.
///
/// This must be reproduced character-for-character; it is not a naive
/// base32 alphabet.
pub const ALPHABET: &str = "0123456789abcdfghijklmnpqrsvwxyz";

/// The alphabet as a byte slice (convenience alias).
pub const ALPHABET_BYTES: &[u8; 32] = b"0123456789abcdfghijklmnpqrsvwxyz";

/// Encoded length in characters for `len` input bytes.
pub const fn encode_len(len: usize) -> usize {
    (len * 8).div_ceil(5)
}

/// Encode `input` as a Nix base32 string.
pub fn encode_string(input: &[u8]) -> String {
    let total_bits = input.len() * 8;
    let mut out = String::with_capacity(encode_len(input.len()));

    let mut pos = 0;
    while pos < total_bits {
        let group = (total_bits - pos).min(5);
        let mut value = 0u8;
        for p in pos..pos + group {
            // Bit `p` of the stream: reversed byte order, MSB first.
            let byte = input[input.len() - 1 - p / 8];
            value = (value << 1) | ((byte >> (7 - p % 8)) & 1);
        }
        out.push(ALPHABET_BYTES[value as usize] as char);
        pos += group;
    }
    out
}


#[cfg(test)]
mod proptests {
    use proptest::{prop_assert, prop_assert_eq, proptest};

    use super::*;

    proptest! {
        #[test]
        fn proptest_shape(data: Vec<u8>) {
            let encoded = encode_string(&data);
            prop_assert_eq!(encoded.chars().count(), encode_len(data.len()));
            prop_assert!(encoded.chars().all(|c| ALPHABET.contains(c)));
        }

        #[test]
        fn proptest_deterministic(data: Vec<u8>) {
            prop_assert_eq!(encode_string(&data), encode_string(&data));
        }
    }
}

use std::path::Path;

use thiserror::Error;

use fixout_utils_base_encoding::base32;
use fixout_utils_hash::{Algorithm, Hash, ParseHashError};

use crate::diag::{DiagnosticSink, NoopSink};
use crate::name::StoreName;
use crate::store_dir::{StoreDir, StorePath};

/// Store path hashes are fingerprint digests folded down to 20 bytes.
pub const STORE_PATH_HASH_SIZE: usize = 20;

/// Folds `hash` to `size` bytes by XORing byte `i` into slot `i % size`.
///
/// Lossy by construction; this reproduces the path-shortening convention
/// of the Nix store, not a cryptographic operation. A `size` larger than
/// the input leaves the trailing bytes zero.
///
/// # Panics
///
/// Panics if `size` is zero.
pub fn compress_hash(hash: &[u8], size: usize) -> Vec<u8> {
    assert!(size > 0, "hash compression size must be positive");
    let mut result = vec![0u8; size];
    for (idx, byte) in hash.iter().enumerate() {
        result[idx % size] ^= byte;
    }
    result
}

/// The checksum handed to [`StoreDir::store_path_for_file`] was not a
/// valid sha512 digest rendition.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("invalid file checksum: {0}")]
pub struct InvalidChecksum(#[from] ParseHashError);

impl StoreDir {
    /// Computes the store path of a fixed-output derivation.
    ///
    /// The addressing protocol, which must match Nix byte for byte:
    ///
    /// 1. fingerprint `fixed:out:<algo>:<lowercase hex digest>:`
    /// 2. sha256 the fingerprint
    /// 3. reference `output:out:sha256:<inner hex>:<store dir>:<name>`
    /// 4. sha256 the reference
    /// 5. fold to 20 bytes, encode as Nix base32
    /// 6. `<store dir>/<encoded>-<name>`
    pub fn fixed_output_path(&self, name: &StoreName, hash: &Hash) -> StorePath {
        self.fixed_output_path_with(name, hash, &NoopSink)
    }

    /// Like [`StoreDir::fixed_output_path`], recording each intermediate
    /// value in `sink`.
    pub fn fixed_output_path_with(
        &self,
        name: &StoreName,
        hash: &Hash,
        sink: &dyn DiagnosticSink,
    ) -> StorePath {
        let fingerprint = format!("fixed:out:{}:{}:", hash.algorithm(), hash.to_hex());
        sink.record("fingerprint", format_args!("{fingerprint}"));

        let inner = Algorithm::SHA256.digest(&fingerprint);
        let reference = format!("output:out:sha256:{}:{}:{}", inner.to_hex(), self, name);
        sink.record("reference", format_args!("{reference}"));

        let outer = Algorithm::SHA256.digest(&reference);
        let folded = compress_hash(outer.digest_bytes(), STORE_PATH_HASH_SIZE);
        let path = StorePath::new(self.join(&format!("{}-{}", base32::encode_string(&folded), name)));
        sink.record("store path", format_args!("{path}"));
        path
    }

    /// Computes where a flat-mode sha512 insertion of `file_path` with the
    /// given hexadecimal `checksum` must land.
    ///
    /// Only the base name component of `file_path` is used, sanitized via
    /// [`StoreName::sanitize`].
    pub fn store_path_for_file(
        &self,
        file_path: impl AsRef<Path>,
        checksum: &str,
    ) -> Result<StorePath, InvalidChecksum> {
        self.store_path_for_file_with(file_path, checksum, &NoopSink)
    }

    /// Like [`StoreDir::store_path_for_file`], recording intermediate
    /// values in `sink`.
    pub fn store_path_for_file_with(
        &self,
        file_path: impl AsRef<Path>,
        checksum: &str,
        sink: &dyn DiagnosticSink,
    ) -> Result<StorePath, InvalidChecksum> {
        let file_path = file_path.as_ref();
        let file_name = file_path
            .file_name()
            .map(|f| f.to_string_lossy())
            .unwrap_or_default();
        let name = StoreName::sanitize(&file_name);
        let hash = Hash::from_hex(Algorithm::SHA512, checksum)?;
        Ok(self.fixed_output_path_with(&name, &hash, sink))
    }
}

#[cfg(test)]
mod unittests {
    use hex_literal::hex;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::shorter(&[1, 2, 3, 4, 5, 6, 7, 8], 3, &hex!("020f05"))]
    #[case::larger_than_input(&hex!("deadbeef"), 8, &hex!("deadbeef00000000"))]
    #[case::exact(&hex!("deadbeef"), 4, &hex!("deadbeef"))]
    #[case::sha512_width(&[0xffu8; 64], 20, &hex!("00000000ffffffffffffffffffffffffffffffff"))]
    #[case::empty_input(&[], 2, &hex!("0000"))]
    fn compress(#[case] input: &[u8], #[case] size: usize, #[case] expected: &[u8]) {
        assert_eq!(compress_hash(input, size), expected);
    }

    #[test]
    #[should_panic = "hash compression size must be positive"]
    fn compress_zero_size() {
        compress_hash(&[1, 2, 3], 0);
    }

    #[test]
    fn checksum_must_be_hex() {
        let err = StoreDir::default()
            .store_path_for_file("hello.txt", "not-hex")
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid file checksum"));
    }

    #[test]
    fn checksum_must_be_sha512_sized() {
        // Valid hex, but a sha256-sized digest.
        let checksum = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert!(
            StoreDir::default()
                .store_path_for_file("hello.txt", checksum)
                .is_err()
        );
    }
}

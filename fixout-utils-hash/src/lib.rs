//! Hash algorithms and hash values.
//!
//! A [`Hash`] is a digest tagged with the [`Algorithm`] that produced it,
//! stored inline so values are `Copy` and comparable without allocation.

use std::fmt;

use data_encoding::{DecodeError, HEXLOWER, HEXLOWER_PERMISSIVE};
use thiserror::Error;

mod algo;

pub use algo::{Algorithm, UnknownAlgorithm};

const LARGEST_ALGORITHM: Algorithm = Algorithm::LARGEST;

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
#[error("hash has wrong length {length} != {} for hash type '{algorithm}'", algorithm.size())]
pub struct InvalidHashError {
    algorithm: Algorithm,
    length: usize,
}

/// Errors from parsing a hexadecimal hash rendition.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseHashError {
    #[error("hash '{hex}' is not valid hexadecimal: {source}")]
    Hex { hex: String, source: DecodeError },
    #[error(transparent)]
    Length(#[from] InvalidHashError),
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct Hash {
    algorithm: Algorithm,
    data: [u8; LARGEST_ALGORITHM.size()],
}

impl Hash {
    /// Constructs a hash from a digest slice.
    ///
    /// `digest` must hold at least `algorithm.size()` bytes; use
    /// [`Hash::from_slice`] for checked construction.
    pub const fn new(algorithm: Algorithm, digest: &[u8]) -> Hash {
        let mut data = [0u8; LARGEST_ALGORITHM.size()];
        let mut i = 0;
        while i < algorithm.size() {
            data[i] = digest[i];
            i += 1;
        }
        Hash { algorithm, data }
    }

    pub const fn from_slice(algorithm: Algorithm, digest: &[u8]) -> Result<Hash, InvalidHashError> {
        if digest.len() != algorithm.size() {
            return Err(InvalidHashError {
                algorithm,
                length: digest.len(),
            });
        }
        Ok(Hash::new(algorithm, digest))
    }

    /// Parses a lowercase or uppercase hexadecimal digest of `algorithm`.
    pub fn from_hex(algorithm: Algorithm, hex: &str) -> Result<Hash, ParseHashError> {
        let bytes = HEXLOWER_PERMISSIVE
            .decode(hex.as_bytes())
            .map_err(|source| ParseHashError::Hex {
                hex: hex.to_owned(),
                source,
            })?;
        Ok(Hash::from_slice(algorithm, &bytes)?)
    }

    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[inline]
    pub fn digest_bytes(&self) -> &[u8] {
        &self.data[0..(self.algorithm.size())]
    }

    /// Renders the digest as lowercase hexadecimal.
    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(self.digest_bytes())
    }
}

impl std::ops::Deref for Hash {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        self.digest_bytes()
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        self.digest_bytes()
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({self})")
    }
}

//! Base encoding utilities for fixout.
//!
//! Currently this is only the Nix base32 variant used in store path hashes.

pub mod base32;

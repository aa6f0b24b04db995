//! Pure fixed-output store semantics.
//!
//! This crate contains the value types and computation logic for
//! Nix-compatible fixed-output content addressing. It is intentionally
//! IO-free: every operation is a deterministic function of its inputs, so
//! recomputing a path from the same name, algorithm and digest always
//! yields the identical string.
//!
//! # Key pieces
//!
//! - [`StoreName`] - names allowed in store paths, plus sanitization
//! - [`StoreDir`] / [`StorePath`] - the store root and derived paths
//! - [`StoreDir::store_path_name`] - recovering the name from a path
//! - [`StoreDir::fixed_output_path`] - the two-stage hashing protocol
//! - [`compress_hash`] - XOR folding of a digest to the 20-byte path hash
//! - [`DiagnosticSink`] - injectable tracing of intermediate values
//!
//! The actual insertion of content into the store lives in
//! `fixout-store-add`; this crate only predicts where it must land.

mod diag;
mod fixed_output;
mod name;
mod store_dir;

pub use diag::{DiagnosticSink, LogSink, NoopSink};
pub use fixed_output::{InvalidChecksum, STORE_PATH_HASH_SIZE, compress_hash};
pub use name::{NAME_MAX_LEN, StoreName, StoreNameError};
pub use store_dir::{InvalidStorePath, StoreDir, StorePath};

use thiserror::Error;

use fixout_store_core::{InvalidChecksum, StorePath};

#[derive(Error, Debug)]
pub enum StoreAddError {
    /// The supplied checksum was not a valid sha512 hex digest.
    #[error(transparent)]
    Checksum(#[from] InvalidChecksum),

    /// The external tool could not be spawned or its output captured.
    #[error("failed to run the store insertion tool: {0}")]
    Io(#[from] std::io::Error),

    /// The external tool ran and reported failure.
    #[error(
        "store insertion tool failed ({}): {stderr}",
        code.map_or_else(|| "killed by signal".to_owned(), |c| format!("exit code {c}"))
    )]
    ExternalTool { code: Option<i32>, stderr: String },

    /// The tool inserted content at a different path than the one
    /// computed locally. Either the addressing logic here diverged from
    /// the tool, or the tool's version/configuration is unexpected.
    /// Accepting the mismatched path would break the content-addressing
    /// guarantee, so this is always fatal.
    #[error("store path mismatch: tool reported '{actual}', expected '{expected}'")]
    PathMismatch { actual: String, expected: StorePath },
}

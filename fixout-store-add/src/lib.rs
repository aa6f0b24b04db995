//! Validated insertion into the store via an external tool.
//!
//! The flow: compute the expected fixed-output store path locally
//! (`fixout-store-core`), delegate the actual insertion to the
//! [`StoreClient`] collaborator, then assert that the path the tool
//! reports equals the computed one. A mismatch means the local addressing
//! logic and the real store disagree and is always surfaced, never
//! papered over.

mod client;
mod error;

pub use client::{NixCommand, StoreClient, ToolOutput};
pub use error::StoreAddError;

use std::path::Path;

use fixout_store_core::{DiagnosticSink, NoopSink, StoreDir, StorePath};
use fixout_utils_hash::Algorithm;

/// Inserts `source` into the store under `target_name` and verifies the
/// reported path against the locally computed one.
///
/// `checksum` is the flat (raw file content) sha512 digest of `source` in
/// hexadecimal. Exactly one suspend point: awaiting the external process.
/// No retries, timeouts or cancellation here; callers wrap their own
/// deadline policy around the returned future if they need one.
pub async fn add_to_store<C: StoreClient>(
    client: &C,
    store_dir: &StoreDir,
    source: &Path,
    target_name: &str,
    checksum: &str,
    work_dir: &Path,
) -> Result<StorePath, StoreAddError> {
    add_to_store_with(
        client,
        store_dir,
        source,
        target_name,
        checksum,
        work_dir,
        &NoopSink,
    )
    .await
}

/// Like [`add_to_store`], recording intermediate values in `sink`.
pub async fn add_to_store_with<C: StoreClient>(
    client: &C,
    store_dir: &StoreDir,
    source: &Path,
    target_name: &str,
    checksum: &str,
    work_dir: &Path,
    sink: &dyn DiagnosticSink,
) -> Result<StorePath, StoreAddError> {
    let expected = store_dir.store_path_for_file_with(target_name, checksum, sink)?;

    // The raw target name goes to the tool; the expected path uses the
    // sanitized form. If the tool normalizes differently, the comparison
    // below reports it.
    let output = client
        .add_file(source, target_name, Algorithm::SHA512, work_dir)
        .await?;

    if !output.success() {
        return Err(StoreAddError::ExternalTool {
            code: output.code,
            stderr: output.stderr,
        });
    }

    let actual = output.reported_path();
    sink.record("inserted path", format_args!("{actual}"));
    if expected != actual {
        return Err(StoreAddError::PathMismatch {
            actual: actual.to_owned(),
            expected,
        });
    }
    Ok(expected)
}

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use fixout_utils_hash::Algorithm;

/// Captured result of one external store insertion attempt.
///
/// Created per call, inspected once, discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// First line of stdout: the path the tool reports having created.
    pub fn reported_path(&self) -> &str {
        self.stdout.lines().next().unwrap_or_default()
    }
}

/// External store-insertion collaborator.
///
/// The store itself is a black box behind this trait: implementations get
/// a source file, a desired name, the hash algorithm and a working
/// directory, and report back what they created. [`NixCommand`] shells
/// out to the real `nix` CLI; tests substitute their own.
pub trait StoreClient {
    async fn add_file(
        &self,
        source: &Path,
        name: &str,
        algorithm: Algorithm,
        work_dir: &Path,
    ) -> io::Result<ToolOutput>;
}

/// Runs `nix store add` in flat mode as a subprocess.
#[derive(Debug, Clone)]
pub struct NixCommand {
    program: PathBuf,
}

impl NixCommand {
    pub fn new() -> NixCommand {
        NixCommand {
            program: PathBuf::from("nix"),
        }
    }

    /// Overrides the `nix` binary, for tests and unusual installs.
    pub fn with_program(program: impl Into<PathBuf>) -> NixCommand {
        NixCommand {
            program: program.into(),
        }
    }
}

impl Default for NixCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreClient for NixCommand {
    async fn add_file(
        &self,
        source: &Path,
        name: &str,
        algorithm: Algorithm,
        work_dir: &Path,
    ) -> io::Result<ToolOutput> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.arg("store")
            .arg("add")
            .args(["--hash-algo", &algorithm.to_string()])
            .args(["--mode", "flat"])
            .arg(source)
            .arg("--name")
            .arg(name)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log::debug!("running {:?} in {}", cmd.as_std(), work_dir.display());
        let output = cmd.output().await?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

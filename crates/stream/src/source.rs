//! Stream input sources
//!
//! A stream is either read from a file, optionally deleting it once read, or
//! produced by running `btrfs send` between two snapshots into a file first.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from producing or reading a stream
#[derive(Debug, Error)]
pub enum SourceError {
    /// Reading the stream file failed
    #[error("Error reading stream {path}: {source}")]
    Io {
        /// Stream file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The send binary could not be started
    #[error("Error executing {binary}: {source}")]
    Spawn {
        /// Binary that failed to start
        binary: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The send binary exited unsuccessfully
    #[error("Error executing \"{command}\": {status}")]
    SendFailed {
        /// Rendered command line
        command: String,
        /// Exit status
        status: ExitStatus,
    },
}

/// Read a whole stream file into memory.
///
/// With `delete_after`, the file is removed once read. Removal is best
/// effort: a failure is logged and the bytes are still returned.
pub fn read_stream(path: &Path, delete_after: bool) -> Result<Vec<u8>, SourceError> {
    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), len = bytes.len(), "Read stream file");

    if delete_after {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Could not delete stream file");
        }
    }

    Ok(bytes)
}

/// One `btrfs send` run writing an incremental stream to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendInvocation {
    /// Parent snapshot (must exist and be read-only)
    pub parent: PathBuf,
    /// Child snapshot
    pub child: PathBuf,
    /// Stream file to write
    pub output: PathBuf,
    /// Send binary (default: `btrfs` from `PATH`)
    pub binary: PathBuf,
    /// Pass `--no-data` so write commands become extent updates (default: on)
    pub no_data: bool,
}

impl SendInvocation {
    /// Default send binary
    pub const DEFAULT_BINARY: &'static str = "btrfs";

    /// Create an invocation with default binary and `--no-data`.
    pub fn new(
        parent: impl Into<PathBuf>,
        child: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        SendInvocation {
            parent: parent.into(),
            child: child.into(),
            output: output.into(),
            binary: PathBuf::from(Self::DEFAULT_BINARY),
            no_data: true,
        }
    }

    /// Use a different send binary (builder pattern).
    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Include file data in the stream (builder pattern).
    pub fn with_data(mut self, include: bool) -> Self {
        self.no_data = !include;
        self
    }

    /// Arguments passed to the binary.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["send".into(), "-p".into(), self.parent.clone().into()];
        if self.no_data {
            args.push("--no-data".into());
        }
        args.push("-f".into());
        args.push(self.output.clone().into());
        args.push(self.child.clone().into());
        args
    }

    /// Command ready to spawn.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command.args(self.args());
        command
    }

    /// Command line as displayed in error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.binary.as_os_str().to_owned())
            .chain(self.args())
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the send binary and wait for it.
    pub fn run(&self) -> Result<(), SourceError> {
        debug!(command = %self.command_line(), "Running send");

        let status = self
            .command()
            .status()
            .map_err(|source| SourceError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !status.success() {
            return Err(SourceError::SendFailed {
                command: self.command_line(),
                status,
            });
        }
        Ok(())
    }
}

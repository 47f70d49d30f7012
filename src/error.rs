//! Error types shared by the runtime adapters, the DNS updater and the
//! watcher loop.

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// An external tool (`docker`, `nsupdate`) exited with a non-zero status.
    #[error("{program} exited with status {exit_code}: {stderr}")]
    Subprocess {
        program: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// An update was attempted for a container without a usable name.
    #[error("refusing to register an empty hostname")]
    EmptyHostname,

    /// The inspection document did not contain the expected fields.
    #[error("no usable data for container {container_id}: {reason}")]
    MissingContainerData {
        container_id: String,
        reason: String,
    },

    /// The event source failed or could not be opened.
    #[error("event stream error: {0}")]
    EventStream(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Docker API error: {0}")]
    Docker(#[from] bollard::errors::Error),
}

impl Error {
    pub(crate) fn subprocess(program: &str, output: &std::process::Output) -> Self {
        Self::Subprocess {
            program: program.to_string(),
            // Killed by a signal: no code available.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub(crate) fn missing_data(container_id: &str, reason: impl Into<String>) -> Self {
        Self::MissingContainerData {
            container_id: container_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Errors that indicate broken data rather than a transient failure of
    /// an external tool.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::EmptyHostname)
    }
}

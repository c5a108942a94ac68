use std::{io, path::PathBuf, process::ExitStatus, time::Duration};

use thiserror::Error;

/// Failures of the external or in-process image resize step.
#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("image tool '{program}' is not available: {source}")]
    ToolUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("image tool '{program}' exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("image tool '{program}' did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },

    #[error("failed to process image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse manifest {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("failed to write manifest {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("no .png, .jpg, .jpeg or .webp image found in {}", root.display())]
    NoCandidateFound { root: PathBuf },

    #[error("failed to produce the icon from {}: {source}", input.display())]
    ImageProcessing {
        input: PathBuf,
        #[source]
        source: ResizeError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

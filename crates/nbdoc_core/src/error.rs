use std::path::PathBuf;

/// Failures the session can surface to the user. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureKind {
    #[error("select at least one notebook before generating")]
    EmptySelection,
    #[error("no .ipynb files in the selection")]
    InvalidFileType,
    #[error("could not read {file}: {reason}")]
    BatchReadFailure { file: String, reason: String },
    #[error("{message}")]
    RemoteRequestFailure { message: String },
    #[error("could not render documentation: {message}")]
    RenderFailure { message: String },
    #[error("export failed: {reason}")]
    ExportFailed { reason: String },
}

/// Transient message that never changes the phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Failure(FailureKind),
    Exported(PathBuf),
    Copied,
    CopyFailed(String),
}

impl Notice {
    pub fn is_failure(&self) -> bool {
        matches!(self, Notice::Failure(_) | Notice::CopyFailed(_))
    }
}

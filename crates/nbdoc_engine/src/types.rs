use std::fmt;
use std::path::PathBuf;

use nbdoc_core::{
    AttemptId, FailureKind, FileContent, GenerationResponse, Msg, RenderedDocument,
};

use crate::{CopyError, ExportError, ReadError, RenderError};

#[derive(Debug)]
pub enum EngineEvent {
    FilesRead {
        attempt: AttemptId,
        result: Result<Vec<FileContent>, ReadError>,
    },
    GenerationFinished {
        attempt: AttemptId,
        result: Result<GenerationResponse, ServiceError>,
    },
    DocumentRendered {
        attempt: AttemptId,
        result: Result<RenderedDocument, RenderError>,
    },
    ExportFinished {
        attempt: AttemptId,
        result: Result<PathBuf, ExportError>,
    },
    CopyFinished(Result<(), CopyError>),
}

impl From<EngineEvent> for Msg {
    /// Engine errors become the user-facing failure taxonomy here.
    fn from(event: EngineEvent) -> Self {
        match event {
            EngineEvent::FilesRead { attempt, result } => Msg::FilesRead {
                attempt,
                result: result.map_err(FailureKind::from),
            },
            EngineEvent::GenerationFinished { attempt, result } => Msg::GenerationFinished {
                attempt,
                result: result.map_err(FailureKind::from),
            },
            EngineEvent::DocumentRendered { attempt, result } => Msg::DocumentRendered {
                attempt,
                result: result.map_err(FailureKind::from),
            },
            EngineEvent::ExportFinished { attempt, result } => Msg::ExportFinished {
                attempt,
                result: result.map_err(FailureKind::from),
            },
            EngineEvent::CopyFinished(result) => {
                Msg::CopyFinished(result.map_err(|err| err.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ServiceFailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: ServiceFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Transport-level failures are the only ones a retry policy may repeat.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            ServiceFailureKind::Timeout | ServiceFailureKind::Network
        )
    }
}

impl From<ServiceError> for FailureKind {
    fn from(err: ServiceError) -> Self {
        FailureKind::RemoteRequestFailure {
            message: err.message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceFailureKind {
    InvalidUrl,
    HttpStatus(u16),
    /// 2xx reply that carried an `error` field instead of documentation.
    RemoteError,
    MalformedResponse,
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for ServiceFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceFailureKind::InvalidUrl => write!(f, "invalid url"),
            ServiceFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            ServiceFailureKind::RemoteError => write!(f, "remote error"),
            ServiceFailureKind::MalformedResponse => write!(f, "malformed response"),
            ServiceFailureKind::Timeout => write!(f, "timeout"),
            ServiceFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            ServiceFailureKind::Network => write!(f, "network error"),
        }
    }
}

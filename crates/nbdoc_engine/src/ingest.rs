use std::io;

use engine_logging::engine_debug;
use futures_util::future::try_join_all;
use nbdoc_core::{FailureKind, FileContent, SelectedFile};

use crate::decode::{decode_notebook, DecodeError};

#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub max_file_bytes: u64,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            max_file_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("could not read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: io::Error,
    },
    #[error("could not read {file}: {source}")]
    Decode {
        file: String,
        #[source]
        source: DecodeError,
    },
    #[error("could not read {file}: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { file: String, size: u64, limit: u64 },
}

impl ReadError {
    pub fn file(&self) -> &str {
        match self {
            ReadError::Io { file, .. }
            | ReadError::Decode { file, .. }
            | ReadError::TooLarge { file, .. } => file,
        }
    }

    pub fn reason(&self) -> String {
        match self {
            ReadError::Io { source, .. } => source.to_string(),
            ReadError::Decode { source, .. } => source.to_string(),
            ReadError::TooLarge { size, limit, .. } => {
                format!("{size} bytes exceeds the {limit} byte limit")
            }
        }
    }
}

impl From<ReadError> for FailureKind {
    fn from(err: ReadError) -> Self {
        FailureKind::BatchReadFailure {
            file: err.file().to_string(),
            reason: err.reason(),
        }
    }
}

/// Reads every file concurrently. The result keeps the input order; if any
/// read fails the whole batch fails and the other contents are dropped.
pub async fn read_all(
    files: &[SelectedFile],
    settings: &IngestSettings,
) -> Result<Vec<FileContent>, ReadError> {
    let contents = try_join_all(files.iter().map(|file| read_one(file, settings))).await?;
    engine_debug!("read {} notebook(s)", contents.len());
    Ok(contents)
}

async fn read_one(file: &SelectedFile, settings: &IngestSettings) -> Result<FileContent, ReadError> {
    let path = file.handle.path();
    let io_err = |source| ReadError::Io {
        file: file.name.clone(),
        source,
    };

    let size = tokio::fs::metadata(path).await.map_err(io_err)?.len();
    if size > settings.max_file_bytes {
        return Err(ReadError::TooLarge {
            file: file.name.clone(),
            size,
            limit: settings.max_file_bytes,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(io_err)?;
    let text = decode_notebook(&bytes).map_err(|source| ReadError::Decode {
        file: file.name.clone(),
        source,
    })?;

    Ok(FileContent {
        name: file.name.clone(),
        text,
    })
}

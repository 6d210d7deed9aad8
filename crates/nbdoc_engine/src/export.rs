use std::path::{Path, PathBuf};

use engine_logging::{engine_info, engine_warn};
use nbdoc_core::FailureKind;

use crate::client::GenerationService;
use crate::persist::{AtomicFileWriter, PersistError};
use crate::ServiceError;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("{0}")]
    Service(#[from] ServiceError),
    #[error("could not save artifact: {0}")]
    Persist(#[from] PersistError),
}

impl From<ExportError> for FailureKind {
    fn from(err: ExportError) -> Self {
        FailureKind::ExportFailed {
            reason: err.to_string(),
        }
    }
}

/// Downloads the server-side artifact once and saves it as
/// `{output_dir}/{file_name}`, replacing any previous export.
pub async fn export_artifact(
    service: &dyn GenerationService,
    output_dir: &Path,
    file_name: &str,
) -> Result<PathBuf, ExportError> {
    let payload = service.download_artifact().await?;
    if payload.is_empty() {
        engine_warn!("export artifact is empty; saving it anyway");
    }

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let path = writer.write(file_name, &payload)?;
    engine_info!("saved {} byte artifact to {:?}", payload.len(), path);
    Ok(path)
}

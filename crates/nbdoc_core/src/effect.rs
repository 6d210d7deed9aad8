use crate::{AttemptId, GenerationRequest, SelectedFile};

/// File name of the saved export artifact.
pub const EXPORT_FILE_NAME: &str = "documentation.pdf";

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ReadFiles {
        attempt: AttemptId,
        files: Vec<SelectedFile>,
    },
    SubmitGeneration {
        attempt: AttemptId,
        request: GenerationRequest,
    },
    RenderDocument {
        attempt: AttemptId,
        text: String,
    },
    /// Tagged with the attempt whose result is being exported.
    ExportArtifact {
        attempt: AttemptId,
        file_name: String,
    },
    CopyRawText {
        text: String,
    },
}

use std::path::PathBuf;

use crate::{
    AttemptId, DocStyle, FailureKind, FileContent, GenerationResponse, Language,
    RenderedDocument, SelectedFile, Tone,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked or dropped files; the whole set replaces the selection.
    FilesSelected(Vec<SelectedFile>),
    /// User removed one entry from the selection list.
    FileRemoved { index: usize },
    LanguageChanged(Language),
    DocStyleChanged(DocStyle),
    ToneChanged(Tone),
    /// User clicked Generate.
    GenerateClicked,
    /// Engine finished reading the batch.
    FilesRead {
        attempt: AttemptId,
        result: Result<Vec<FileContent>, FailureKind>,
    },
    /// Engine got an answer (or a failure) from the generation service.
    GenerationFinished {
        attempt: AttemptId,
        result: Result<GenerationResponse, FailureKind>,
    },
    /// Engine finished turning the response text into a document.
    DocumentRendered {
        attempt: AttemptId,
        result: Result<RenderedDocument, FailureKind>,
    },
    /// User clicked Export.
    ExportClicked,
    /// Engine saved (or failed to save) the export artifact.
    ExportFinished {
        attempt: AttemptId,
        result: Result<PathBuf, FailureKind>,
    },
    /// User asked for the raw response text.
    CopyRawClicked,
    /// Engine finished the raw-text copy.
    CopyFinished(Result<(), String>),
    /// User dismissed the current notice.
    NoticeDismissed,
    /// Explicit return to idle.
    ResetClicked,
}

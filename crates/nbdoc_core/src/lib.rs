//! nbdoc core: pure state machine, style mapping and document model.
mod document;
mod effect;
mod error;
mod msg;
mod request;
mod selection;
mod state;
mod style;
mod update;
mod view_model;

pub use document::{plain_text, Block, CodeBlock, Inline, RenderedDocument};
pub use effect::{Effect, EXPORT_FILE_NAME};
pub use error::{FailureKind, Notice};
pub use msg::Msg;
pub use request::{GenerationRequest, GenerationResponse};
pub use selection::{
    filter_accepted, is_accepted_name, FileContent, FileHandle, SelectedFile, ACCEPTED_EXTENSION,
};
pub use state::{
    AppState, AttemptId, Phase, UploadState, PROGRESS_DONE, PROGRESS_READ, PROGRESS_RESPONSE,
};
pub use style::{
    map_style, map_style_labels, DocStyle, GenerationParameters, Language, ParseStyleError,
    StyleLabels, StyleOptions, Tone, FALLBACK_MAX_OUTPUT_TOKENS, FALLBACK_TEMPERATURE,
};
pub use update::update;
pub use view_model::{AppViewModel, SelectedFileView};

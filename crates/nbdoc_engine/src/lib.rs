//! nbdoc engine: IO pipeline and effect execution.
mod client;
mod copy;
mod decode;
mod engine;
mod export;
mod highlight;
mod html;
mod ingest;
mod persist;
mod render;
mod terminal;
mod types;

pub use client::{
    GenerationService, ReqwestGenerationService, RequestPolicy, ServiceSettings,
    DEFAULT_BASE_URL,
};
pub use copy::{copy_raw_text, CopyError, CopyTarget};
pub use decode::{decode_notebook, DecodeError};
pub use engine::{EngineConfig, EngineHandle, Executor, RecvTimeoutError};
pub use export::{export_artifact, ExportError};
pub use highlight::{HighlightedHtml, Highlighter, DEFAULT_THEME};
pub use html::{to_html, to_html_page};
pub use ingest::{read_all, IngestSettings, ReadError};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use render::{render_legacy, DocumentRenderer, RenderError, RenderMode};
pub use terminal::format_terminal;
pub use types::{EngineEvent, ServiceError, ServiceFailureKind};

use crate::{Notice, Phase, RenderedDocument, StyleOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFileView {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub progress_percent: u8,
    pub error_message: Option<String>,
    pub selected_files: Vec<SelectedFileView>,
    pub style: StyleOptions,
    pub notice: Option<Notice>,
    pub document: Option<RenderedDocument>,
    pub can_generate: bool,
    pub can_export: bool,
    pub export_in_flight: bool,
    pub dirty: bool,
}

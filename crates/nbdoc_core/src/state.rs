use crate::view_model::{AppViewModel, SelectedFileView};
use crate::{
    filter_accepted, FailureKind, GenerationParameters, GenerationResponse, Notice,
    RenderedDocument, SelectedFile, StyleLabels, StyleOptions,
};

pub type AttemptId = u64;

/// Progress checkpoint once every notebook has been read.
pub const PROGRESS_READ: u8 = 30;
/// Progress checkpoint once the service has answered.
pub const PROGRESS_RESPONSE: u8 = 70;
pub const PROGRESS_DONE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Reading,
    Submitting,
    Ready,
    Error,
}

impl Phase {
    pub fn is_in_flight(self) -> bool {
        matches!(self, Phase::Reading | Phase::Submitting)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadState {
    pub phase: Phase,
    pub progress_percent: u8,
    pub error_message: Option<String>,
}

impl UploadState {
    fn begin_attempt(&mut self) {
        self.phase = Phase::Reading;
        self.progress_percent = 0;
        self.error_message = None;
    }

    /// Progress never moves backwards within an attempt.
    fn advance(&mut self, phase: Phase, percent: u8) {
        self.phase = phase;
        self.progress_percent = self.progress_percent.max(percent.min(PROGRESS_DONE));
    }

    fn fail(&mut self, failure: &FailureKind) {
        self.phase = Phase::Error;
        self.error_message = Some(failure.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selection: Vec<SelectedFile>,
    style: StyleOptions,
    labels: StyleLabels,
    upload: UploadState,
    attempt: AttemptId,
    response: Option<GenerationResponse>,
    document: Option<RenderedDocument>,
    notice: Option<Notice>,
    export_in_flight: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: StyleOptions) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Holds labels that name no known tone or doc style; see [`StyleLabels`].
    pub fn with_labels(mut self, labels: StyleLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.upload.phase,
            progress_percent: self.upload.progress_percent,
            error_message: self.upload.error_message.clone(),
            selected_files: self
                .selection
                .iter()
                .enumerate()
                .map(|(index, file)| SelectedFileView {
                    index,
                    name: file.name.clone(),
                })
                .collect(),
            style: self.style,
            notice: self.notice.clone(),
            document: self.document.clone(),
            can_generate: !self.upload.phase.is_in_flight() && !self.selection.is_empty(),
            can_export: self.export_enabled(),
            export_in_flight: self.export_in_flight,
            dirty: self.dirty,
        }
    }

    pub fn upload(&self) -> &UploadState {
        &self.upload
    }

    pub fn phase(&self) -> Phase {
        self.upload.phase
    }

    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    pub fn style(&self) -> &StyleOptions {
        &self.style
    }

    pub fn labels(&self) -> &StyleLabels {
        &self.labels
    }

    /// Parameters a submission made now would carry.
    pub fn generation_parameters(&self) -> GenerationParameters {
        self.labels.parameters(&self.style)
    }

    pub fn selection(&self) -> &[SelectedFile] {
        &self.selection
    }

    pub fn response(&self) -> Option<&GenerationResponse> {
        self.response.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn export_enabled(&self) -> bool {
        self.upload.phase == Phase::Ready && !self.export_in_flight
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_current(&self, attempt: AttemptId, phase: Phase) -> bool {
        self.attempt == attempt && self.upload.phase == phase
    }

    /// Replaces the selection; returns false (and leaves it untouched) when
    /// no candidate is an accepted notebook.
    pub(crate) fn replace_selection(&mut self, candidates: Vec<SelectedFile>) -> bool {
        let accepted = filter_accepted(candidates);
        if accepted.is_empty() {
            self.set_notice(Notice::Failure(FailureKind::InvalidFileType));
            return false;
        }
        self.selection = accepted;
        self.notice = None;
        self.mark_dirty();
        true
    }

    pub(crate) fn remove_selected(&mut self, index: usize) -> bool {
        if index >= self.selection.len() {
            return false;
        }
        self.selection.remove(index);
        self.mark_dirty();
        true
    }

    pub(crate) fn style_mut(&mut self) -> &mut StyleOptions {
        self.mark_dirty();
        &mut self.style
    }

    pub(crate) fn labels_mut(&mut self) -> &mut StyleLabels {
        &mut self.labels
    }

    pub(crate) fn start_attempt(&mut self) -> AttemptId {
        self.attempt += 1;
        self.upload.begin_attempt();
        self.response = None;
        self.document = None;
        self.notice = None;
        self.export_in_flight = false;
        self.mark_dirty();
        self.attempt
    }

    pub(crate) fn advance(&mut self, phase: Phase, percent: u8) {
        self.upload.advance(phase, percent);
        self.mark_dirty();
    }

    pub(crate) fn store_response(&mut self, response: GenerationResponse) {
        self.response = Some(response);
    }

    pub(crate) fn finish_ready(&mut self, document: RenderedDocument) {
        self.document = Some(document);
        self.selection.clear();
        self.advance(Phase::Ready, PROGRESS_DONE);
    }

    /// Ends the attempt in error; the batch's files are discarded together.
    pub(crate) fn finish_error(&mut self, failure: FailureKind) {
        self.upload.fail(&failure);
        self.response = None;
        self.document = None;
        self.selection.clear();
        self.mark_dirty();
    }

    pub(crate) fn reset(&mut self) {
        self.upload = UploadState::default();
        self.response = None;
        self.document = None;
        self.notice = None;
        self.export_in_flight = false;
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.mark_dirty();
    }

    pub(crate) fn clear_notice(&mut self) -> bool {
        if self.notice.take().is_some() {
            self.mark_dirty();
            true
        } else {
            false
        }
    }

    pub fn export_in_flight(&self) -> bool {
        self.export_in_flight
    }

    pub(crate) fn set_export_in_flight(&mut self, in_flight: bool) {
        self.export_in_flight = in_flight;
        self.mark_dirty();
    }
}

use crate::effect::EXPORT_FILE_NAME;
use crate::state::{PROGRESS_READ, PROGRESS_RESPONSE};
use crate::{AppState, Effect, FailureKind, GenerationRequest, Msg, Notice, Phase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesSelected(candidates) => {
            // The in-flight attempt already owns a snapshot of the selection.
            if !state.phase().is_in_flight() {
                state.replace_selection(candidates);
            }
            Vec::new()
        }
        Msg::FileRemoved { index } => {
            if !state.phase().is_in_flight() {
                state.remove_selected(index);
            }
            Vec::new()
        }
        Msg::LanguageChanged(language) => {
            state.style_mut().language = language;
            Vec::new()
        }
        Msg::DocStyleChanged(doc_style) => {
            state.style_mut().doc_style = doc_style;
            state.labels_mut().doc_style = None;
            Vec::new()
        }
        Msg::ToneChanged(tone) => {
            state.style_mut().tone = tone;
            state.labels_mut().tone = None;
            Vec::new()
        }
        Msg::GenerateClicked => {
            if state.phase().is_in_flight() {
                return (state, Vec::new());
            }
            if state.selection().is_empty() {
                state.set_notice(Notice::Failure(FailureKind::EmptySelection));
                return (state, Vec::new());
            }
            let files = state.selection().to_vec();
            let attempt = state.start_attempt();
            vec![Effect::ReadFiles { attempt, files }]
        }
        Msg::FilesRead { attempt, result } => {
            if !state.is_current(attempt, Phase::Reading) {
                return (state, Vec::new());
            }
            match result {
                Ok(contents) => {
                    let request = GenerationRequest::build(
                        contents,
                        state.style().language,
                        state.generation_parameters(),
                    );
                    state.advance(Phase::Submitting, PROGRESS_READ);
                    vec![Effect::SubmitGeneration { attempt, request }]
                }
                Err(failure) => {
                    state.finish_error(failure);
                    Vec::new()
                }
            }
        }
        Msg::GenerationFinished { attempt, result } => {
            if !state.is_current(attempt, Phase::Submitting) {
                return (state, Vec::new());
            }
            match result {
                Ok(response) => {
                    let text = response.documentation_text.clone();
                    state.store_response(response);
                    state.advance(Phase::Submitting, PROGRESS_RESPONSE);
                    vec![Effect::RenderDocument { attempt, text }]
                }
                Err(failure) => {
                    state.finish_error(failure);
                    Vec::new()
                }
            }
        }
        Msg::DocumentRendered { attempt, result } => {
            if !state.is_current(attempt, Phase::Submitting) || state.response().is_none() {
                return (state, Vec::new());
            }
            match result {
                Ok(document) => state.finish_ready(document),
                Err(failure) => state.finish_error(failure),
            }
            Vec::new()
        }
        Msg::ExportClicked => {
            if state.export_enabled() {
                state.set_export_in_flight(true);
                vec![Effect::ExportArtifact {
                    attempt: state.attempt(),
                    file_name: EXPORT_FILE_NAME.to_string(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::ExportFinished { attempt, result } => {
            // Only the export started from the current result may report.
            if attempt != state.attempt() || !state.export_in_flight() {
                return (state, Vec::new());
            }
            state.set_export_in_flight(false);
            match result {
                Ok(path) => state.set_notice(Notice::Exported(path)),
                Err(failure) => state.set_notice(Notice::Failure(failure)),
            }
            Vec::new()
        }
        Msg::CopyRawClicked => match state.response() {
            Some(response) => vec![Effect::CopyRawText {
                text: response.documentation_text.clone(),
            }],
            None => Vec::new(),
        },
        Msg::CopyFinished(result) => {
            match result {
                Ok(()) => state.set_notice(Notice::Copied),
                Err(reason) => state.set_notice(Notice::CopyFailed(reason)),
            }
            Vec::new()
        }
        Msg::NoticeDismissed => {
            state.clear_notice();
            Vec::new()
        }
        Msg::ResetClicked => {
            if !state.phase().is_in_flight() {
                state.reset();
            }
            Vec::new()
        }
    };

    (state, effects)
}

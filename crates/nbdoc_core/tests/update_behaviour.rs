use std::sync::Once;

use nbdoc_core::{
    update, AppState, DocStyle, Effect, FailureKind, FileContent, Language, Msg, Notice, Phase,
    SelectedFile, StyleLabels, StyleOptions, Tone,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn files(names: &[&str]) -> Vec<SelectedFile> {
    names.iter().map(|name| SelectedFile::from_path(*name)).collect()
}

fn select(state: AppState, names: &[&str]) -> AppState {
    let (state, effects) = update(state, Msg::FilesSelected(files(names)));
    assert!(effects.is_empty());
    state
}

fn selected_names(state: &AppState) -> Vec<String> {
    state.view().selected_files.into_iter().map(|f| f.name).collect()
}

#[test]
fn selection_keeps_notebooks_in_input_order() {
    init_logging();
    let mut state = select(AppState::new(), &["b.ipynb", "readme.md", "a.ipynb"]);

    assert_eq!(selected_names(&state), vec!["b.ipynb", "a.ipynb"]);
    assert_eq!(state.phase(), Phase::Idle);
    assert!(state.view().can_generate);
    assert!(state.consume_dirty());
}

#[test]
fn invalid_selection_keeps_prior_files() {
    init_logging();
    let mut state = select(AppState::new(), &["keep.ipynb"]);
    assert!(state.consume_dirty());

    let state = select(state, &["notes.txt", "data.csv"]);

    assert_eq!(selected_names(&state), vec!["keep.ipynb"]);
    assert_eq!(
        state.notice(),
        Some(&Notice::Failure(FailureKind::InvalidFileType))
    );
    assert_eq!(state.phase(), Phase::Idle);
}

#[test]
fn new_selection_replaces_previous_one() {
    init_logging();
    let state = select(AppState::new(), &["one.ipynb", "two.ipynb"]);
    let state = select(state, &["three.ipynb"]);

    assert_eq!(selected_names(&state), vec!["three.ipynb"]);
}

#[test]
fn remove_is_index_addressed_and_bounds_checked() {
    init_logging();
    let state = select(AppState::new(), &["a.ipynb", "b.ipynb", "c.ipynb"]);

    let (state, _) = update(state, Msg::FileRemoved { index: 1 });
    assert_eq!(selected_names(&state), vec!["a.ipynb", "c.ipynb"]);

    let (mut state, effects) = update(state, Msg::FileRemoved { index: 7 });
    assert!(effects.is_empty());
    assert_eq!(selected_names(&state), vec!["a.ipynb", "c.ipynb"]);
    state.consume_dirty();
    let (mut state, _) = update(state, Msg::FileRemoved { index: 2 });
    assert!(!state.consume_dirty());
}

#[test]
fn generate_without_files_reports_empty_selection() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::GenerateClicked);

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);
    assert_eq!(state.attempt(), 0);
    assert_eq!(
        state.notice(),
        Some(&Notice::Failure(FailureKind::EmptySelection))
    );
}

#[test]
fn generate_starts_reading_with_selection_snapshot() {
    init_logging();
    let state = select(AppState::new(), &["a.ipynb", "b.ipynb"]);
    let (state, effects) = update(state, Msg::GenerateClicked);

    assert_eq!(state.phase(), Phase::Reading);
    assert_eq!(state.upload().progress_percent, 0);
    assert_eq!(
        effects,
        vec![Effect::ReadFiles {
            attempt: 1,
            files: files(&["a.ipynb", "b.ipynb"]),
        }]
    );
}

#[test]
fn generate_while_in_flight_has_no_effect() {
    init_logging();
    let state = select(AppState::new(), &["a.ipynb"]);
    let (reading, _) = update(state, Msg::GenerateClicked);

    let (next, effects) = update(reading.clone(), Msg::GenerateClicked);
    assert!(effects.is_empty());
    assert_eq!(next, reading);

    let (submitting, _) = update(
        reading,
        Msg::FilesRead {
            attempt: 1,
            result: Ok(vec![FileContent {
                name: "a.ipynb".into(),
                text: "{}".into(),
            }]),
        },
    );
    assert_eq!(submitting.phase(), Phase::Submitting);
    let (next, effects) = update(submitting.clone(), Msg::GenerateClicked);
    assert!(effects.is_empty());
    assert_eq!(next.upload(), submitting.upload());
    assert_eq!(next.attempt(), submitting.attempt());
}

#[test]
fn selection_changes_are_ignored_while_in_flight() {
    init_logging();
    let state = select(AppState::new(), &["a.ipynb"]);
    let (state, _) = update(state, Msg::GenerateClicked);

    let state = select(state, &["other.ipynb"]);
    let (state, _) = update(state, Msg::FileRemoved { index: 0 });

    assert_eq!(selected_names(&state), vec!["a.ipynb"]);
}

fn submit_read_batch(state: AppState) -> (f64, u32) {
    let (state, _) = update(state, Msg::GenerateClicked);
    let attempt = state.attempt();
    let (_, effects) = update(
        state,
        Msg::FilesRead {
            attempt,
            result: Ok(vec![FileContent {
                name: "a.ipynb".into(),
                text: "nb".into(),
            }]),
        },
    );
    match effects.as_slice() {
        [Effect::SubmitGeneration { request, .. }] => {
            (request.temperature, request.max_output_tokens)
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn unknown_labels_submit_fallback_parameters() {
    init_logging();
    let state = AppState::new().with_labels(StyleLabels::unrecognized("whimsical", "epic"));
    let state = select(state, &["a.ipynb"]);
    assert_eq!(submit_read_batch(state), (0.5, 2048));
}

#[test]
fn picking_a_tone_releases_only_the_tone_label() {
    init_logging();
    let state = AppState::new().with_labels(StyleLabels::unrecognized("whimsical", "epic"));
    let state = select(state, &["a.ipynb"]);
    let (state, _) = update(state, Msg::ToneChanged(Tone::Creative));
    assert_eq!(submit_read_batch(state), (0.8, 2048));
}

#[test]
fn request_uses_style_at_submission_time() {
    init_logging();
    let state = select(AppState::new(), &["a.ipynb"]);
    let (state, _) = update(state, Msg::ToneChanged(Tone::Creative));
    let (state, _) = update(state, Msg::DocStyleChanged(DocStyle::Concise));
    let (state, _) = update(state, Msg::LanguageChanged(Language::French));
    let (state, _) = update(state, Msg::GenerateClicked);

    let (state, effects) = update(
        state,
        Msg::FilesRead {
            attempt: 1,
            result: Ok(vec![FileContent {
                name: "a.ipynb".into(),
                text: "nb".into(),
            }]),
        },
    );

    assert_eq!(
        state.style(),
        &StyleOptions {
            language: Language::French,
            doc_style: DocStyle::Concise,
            tone: Tone::Creative,
        }
    );
    match effects.as_slice() {
        [Effect::SubmitGeneration { attempt, request }] => {
            assert_eq!(*attempt, 1);
            assert_eq!(request.notebooks, vec!["nb".to_string()]);
            assert_eq!(request.language, "French");
            assert_eq!(request.temperature, 0.8);
            assert_eq!(request.max_output_tokens, 1500);
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn dismissing_notice_clears_it() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::GenerateClicked);
    assert!(state.notice().is_some());

    let (mut state, _) = update(state, Msg::NoticeDismissed);
    assert!(state.notice().is_none());
    assert!(state.consume_dirty());
}

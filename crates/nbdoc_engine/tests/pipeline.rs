use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use nbdoc_core::{
    update, AppState, DocStyle, FailureKind, Msg, Notice, Phase, SelectedFile, StyleOptions, Tone,
    EXPORT_FILE_NAME,
};
use nbdoc_engine::{
    CopyTarget, EngineConfig, Executor, ReqwestGenerationService, ServiceSettings,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Session {
    executor: Executor,
    state: AppState,
    progress: Vec<u8>,
}

impl Session {
    fn new(server: &MockServer, output_dir: &Path, style: StyleOptions) -> Self {
        let mut config = EngineConfig::default_with_output(output_dir.to_path_buf());
        config.service = ServiceSettings {
            base_url: server.uri(),
            ..ServiceSettings::default()
        };
        config.copy_target = CopyTarget::File(output_dir.join("raw.md"));
        let service = ReqwestGenerationService::new(config.service.clone()).unwrap();
        Self {
            executor: Executor::new(config, Arc::new(service)),
            state: AppState::with_style(style),
            progress: Vec::new(),
        }
    }

    /// Applies `msg`, then runs every resulting effect to completion and
    /// feeds its outcome back in, until the state settles.
    async fn send(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            self.progress.push(self.state.upload().progress_percent);
            for effect in effects {
                let event = self.executor.execute(effect).await;
                queue.push_back(Msg::from(event));
            }
        }
    }
}

fn notebook(dir: &TempDir, name: &str, bytes: &[u8]) -> SelectedFile {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    SelectedFile::from_path(path)
}

fn explanatory_professional() -> StyleOptions {
    StyleOptions {
        doc_style: DocStyle::Explanatory,
        tone: Tone::Professional,
        ..StyleOptions::default()
    }
}

#[tokio::test]
async fn single_notebook_reaches_ready_with_rendered_heading() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .and(body_json(json!({
            "notebooks": ["{\"cells\": []}"],
            "language": "English",
            "temperature": 0.3,
            "max_tokens": 3000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documentation": "# Title\ntext"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = notebook(&dir, "demo.ipynb", b"{\"cells\": []}");
    let mut session = Session::new(&server, dir.path(), explanatory_professional());

    session.send(Msg::FilesSelected(vec![file])).await;
    session.send(Msg::GenerateClicked).await;

    assert_eq!(session.state.phase(), Phase::Ready);
    assert_eq!(session.progress, vec![0, 0, 30, 70, 100]);
    let view = session.state.view();
    let document = view.document.expect("document rendered");
    let headings: Vec<(u8, String)> = document.headings().collect();
    assert_eq!(headings, vec![(1, "Title".to_string())]);
    assert!(view.selected_files.is_empty());
    assert!(view.can_export);

    session.send(Msg::CopyRawClicked).await;
    assert_eq!(session.state.notice(), Some(&Notice::Copied));
    assert_eq!(
        fs::read_to_string(dir.path().join("raw.md")).unwrap(),
        "# Title\ntext"
    );
}

#[tokio::test]
async fn non_notebook_selection_is_rejected_while_idle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = notebook(&dir, "notes.txt", b"plain notes");
    let mut session = Session::new(&server, dir.path(), StyleOptions::default());

    session.send(Msg::FilesSelected(vec![file])).await;

    assert_eq!(session.state.phase(), Phase::Idle);
    assert_eq!(
        session.state.notice(),
        Some(&Notice::Failure(FailureKind::InvalidFileType))
    );

    session.send(Msg::GenerateClicked).await;
    assert_eq!(session.state.phase(), Phase::Idle);
    assert_eq!(
        session.state.notice(),
        Some(&Notice::Failure(FailureKind::EmptySelection))
    );
}

#[tokio::test]
async fn undecodable_second_file_fails_without_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documentation": "never"
        })))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let files = vec![
        notebook(&dir, "first.ipynb", b"{\"cells\": []}"),
        notebook(&dir, "second.ipynb", b"{\"cells\": [\"\xC3\x28\"]}"),
    ];
    let mut session = Session::new(&server, dir.path(), StyleOptions::default());

    session.send(Msg::FilesSelected(files)).await;
    session.send(Msg::GenerateClicked).await;

    assert_eq!(session.state.phase(), Phase::Error);
    let message = session.state.upload().error_message.clone().expect("message");
    assert!(message.contains("second.ipynb"), "{message}");
    assert!(session.state.response().is_none());
    assert!(session.state.selection().is_empty());
    assert!(!session.state.export_enabled());
}

#[tokio::test]
async fn failed_export_keeps_ready_and_can_be_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documentation": "# Report\n\n```python\nprint(1)\n```"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = notebook(&dir, "report.ipynb", b"{}");
    let mut session = Session::new(&server, dir.path(), StyleOptions::default());

    session.send(Msg::FilesSelected(vec![file])).await;
    session.send(Msg::GenerateClicked).await;
    assert_eq!(session.state.phase(), Phase::Ready);

    session.send(Msg::ExportClicked).await;
    assert_eq!(session.state.phase(), Phase::Ready);
    match session.state.notice() {
        Some(Notice::Failure(FailureKind::ExportFailed { reason })) => {
            assert_eq!(reason, "export service returned HTTP 500");
        }
        other => panic!("expected export failure, got {other:?}"),
    }
    assert!(session.state.export_enabled());
    assert!(!dir.path().join(EXPORT_FILE_NAME).exists());

    session.send(Msg::ExportClicked).await;
    let saved = dir.path().join(EXPORT_FILE_NAME);
    assert_eq!(session.state.notice(), Some(&Notice::Exported(saved.clone())));
    assert_eq!(fs::read(saved).unwrap(), b"%PDF-1.7");
    assert_eq!(session.state.phase(), Phase::Ready);
}

#[tokio::test]
async fn remote_error_message_reaches_the_error_phase() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "model unavailable"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = notebook(&dir, "demo.ipynb", b"{}");
    let mut session = Session::new(&server, dir.path(), StyleOptions::default());

    session.send(Msg::FilesSelected(vec![file.clone()])).await;
    session.send(Msg::GenerateClicked).await;

    assert_eq!(session.state.phase(), Phase::Error);
    assert_eq!(
        session.state.upload().error_message.as_deref(),
        Some("model unavailable")
    );

    // Retry means selecting again and generating again.
    session.send(Msg::GenerateClicked).await;
    assert_eq!(
        session.state.notice(),
        Some(&Notice::Failure(FailureKind::EmptySelection))
    );
    session.send(Msg::FilesSelected(vec![file])).await;
    session.send(Msg::GenerateClicked).await;
    assert_eq!(session.state.phase(), Phase::Error);
}

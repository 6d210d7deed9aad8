use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error};
use nbdoc_core::Effect;

use crate::client::{GenerationService, ReqwestGenerationService, ServiceSettings};
use crate::copy::{copy_raw_text, CopyTarget};
use crate::export::export_artifact;
use crate::ingest::{read_all, IngestSettings};
use crate::render::{DocumentRenderer, RenderMode};
use crate::{EngineEvent, ServiceError};

pub use std::sync::mpsc::RecvTimeoutError;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub service: ServiceSettings,
    pub ingest: IngestSettings,
    pub render_mode: RenderMode,
    pub output_dir: PathBuf,
    pub copy_target: CopyTarget,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            service: ServiceSettings::default(),
            ingest: IngestSettings::default(),
            render_mode: RenderMode::default(),
            output_dir,
            copy_target: CopyTarget::default(),
        }
    }
}

/// Performs one effect and reports how it ended.
pub struct Executor {
    config: EngineConfig,
    service: Arc<dyn GenerationService>,
    renderer: DocumentRenderer,
}

impl Executor {
    pub fn new(config: EngineConfig, service: Arc<dyn GenerationService>) -> Self {
        Self {
            renderer: DocumentRenderer::new(config.render_mode),
            config,
            service,
        }
    }

    pub async fn execute(&self, effect: Effect) -> EngineEvent {
        match effect {
            Effect::ReadFiles { attempt, files } => {
                engine_debug!("attempt {} reading {} file(s)", attempt, files.len());
                let result = read_all(&files, &self.config.ingest).await;
                EngineEvent::FilesRead { attempt, result }
            }
            Effect::SubmitGeneration { attempt, request } => {
                let result = self.service.generate(&request).await;
                EngineEvent::GenerationFinished { attempt, result }
            }
            Effect::RenderDocument { attempt, text } => {
                let result = self.renderer.render(&text);
                EngineEvent::DocumentRendered { attempt, result }
            }
            Effect::ExportArtifact { attempt, file_name } => {
                let result =
                    export_artifact(self.service.as_ref(), &self.config.output_dir, &file_name)
                        .await;
                EngineEvent::ExportFinished { attempt, result }
            }
            Effect::CopyRawText { text } => {
                EngineEvent::CopyFinished(copy_raw_text(&self.config.copy_target, &text))
            }
        }
    }
}

/// Runs effects on a background thread with its own tokio runtime and
/// reports completions as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<Effect>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, ServiceError> {
        let service = Arc::new(ReqwestGenerationService::new(config.service.clone())?);
        Ok(Self::with_service(config, service))
    }

    pub fn with_service(config: EngineConfig, service: Arc<dyn GenerationService>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Effect>();
        let (event_tx, event_rx) = mpsc::channel();
        let executor = Arc::new(Executor::new(config, service));

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("could not start engine runtime: {}", err);
                    return;
                }
            };
            while let Ok(effect) = cmd_rx.recv() {
                let executor = executor.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = executor.execute(effect).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn dispatch(&self, effect: Effect) {
        if self.cmd_tx.send(effect).is_err() {
            engine_error!("engine thread stopped; effect dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits for the next event. `Disconnected` means the engine thread is
    /// gone and no further events will arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<EngineEvent, RecvTimeoutError> {
        self.event_rx.recv_timeout(timeout)
    }
}

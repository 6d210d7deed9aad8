use std::time::Duration;

use anyhow::{bail, Result};
use engine_logging::{engine_debug, engine_info};
use nbdoc_core::{Effect, Msg};
use nbdoc_engine::{EngineHandle, RecvTimeoutError};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Forwards effects to the engine and turns its events back into messages.
/// Tracks how many effects are still outstanding so the caller knows when
/// the session has settled.
pub struct EffectRunner {
    engine: EngineHandle,
    outstanding: usize,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            outstanding: 0,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match &effect {
                Effect::ReadFiles { attempt, files } => {
                    engine_info!("attempt {} reading {} notebook(s)", attempt, files.len());
                }
                Effect::SubmitGeneration { attempt, request } => {
                    engine_info!(
                        "attempt {} submitting language={} temperature={} max_tokens={}",
                        attempt,
                        request.language,
                        request.temperature,
                        request.max_output_tokens
                    );
                }
                Effect::RenderDocument { attempt, text } => {
                    engine_debug!("attempt {} rendering {} bytes", attempt, text.len());
                }
                Effect::ExportArtifact { attempt, file_name } => {
                    engine_info!("attempt {} exporting {}", attempt, file_name);
                }
                Effect::CopyRawText { text } => {
                    engine_debug!("copying {} bytes of raw text", text.len());
                }
            }
            self.outstanding += 1;
            self.engine.dispatch(effect);
        }
    }

    pub fn is_idle(&self) -> bool {
        self.outstanding == 0
    }

    /// Blocks until the engine reports the next completed effect.
    pub fn next_msg(&mut self) -> Result<Msg> {
        loop {
            match self.engine.recv_timeout(POLL_INTERVAL) {
                Ok(event) => {
                    self.outstanding = self.outstanding.saturating_sub(1);
                    return Ok(Msg::from(event));
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    bail!("engine stopped with {} effect(s) pending", self.outstanding)
                }
            }
        }
    }
}

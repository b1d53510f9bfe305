use crate::config::RecorderConfig;
use crate::error::RecordingError;
use crate::recording::{AudioCapture, FrameSource, RecorderBackend};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tracing::{debug, info, warn};
use trellis_core::SessionId;

/// At most one recording session per client. Completely decoupled from the
/// room: a recording failure never affects call connectivity.
pub struct Recorder {
    backend: Arc<dyn RecorderBackend>,
    config: RecorderConfig,
    active: Option<ActiveSession>,
}

struct ActiveSession {
    session_id: SessionId,
    delivery: JoinHandle<()>,
}

impl Recorder {
    pub fn new(backend: Arc<dyn RecorderBackend>, config: RecorderConfig) -> Self {
        Self {
            backend,
            config,
            active: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.active.as_ref().map(|a| &a.session_id)
    }

    /// Begin periodic delivery of audio chunks (and optionally still frames)
    /// from a dedicated capture source. Fails when a session is already
    /// active, leaving that session untouched.
    pub fn start(
        &mut self,
        capture: Box<dyn AudioCapture>,
        frames: Option<Box<dyn FrameSource>>,
    ) -> Result<SessionId, RecordingError> {
        if self.active.is_some() {
            warn!("start requested while a recording session is active");
            return Err(RecordingError::AlreadyRecording);
        }

        let session_id = SessionId::generate();
        info!("recording session {} started", session_id);

        let delivery = tokio::spawn(deliver(
            self.backend.clone(),
            self.config.clone(),
            session_id.clone(),
            capture,
            frames,
        ));

        self.active = Some(ActiveSession {
            session_id: session_id.clone(),
            delivery,
        });
        Ok(session_id)
    }

    /// Halt delivery, release the capture source and finalize with the
    /// backend. Returns the transcript when the backend produced one. With no
    /// active session this is a logged no-op.
    pub async fn stop(&mut self) -> Option<String> {
        let Some(active) = self.active.take() else {
            warn!("stop requested with no active recording session");
            return None;
        };

        // Aborting the delivery task drops the capture, which releases the
        // dedicated audio source.
        active.delivery.abort();
        info!("recording session {} stopped", active.session_id);

        match self.backend.finish(&active.session_id).await {
            Ok(transcript) => Some(transcript),
            Err(e) => {
                warn!("finalize failed for {}: {}", active.session_id, e);
                None
            }
        }
    }
}

async fn deliver(
    backend: Arc<dyn RecorderBackend>,
    config: RecorderConfig,
    session_id: SessionId,
    mut capture: Box<dyn AudioCapture>,
    mut frames: Option<Box<dyn FrameSource>>,
) {
    let mut chunk_tick = interval_at(Instant::now() + config.chunk_interval, config.chunk_interval);
    let mut frame_tick = interval_at(Instant::now() + config.frame_interval, config.frame_interval);

    loop {
        tokio::select! {
            _ = chunk_tick.tick() => {
                match capture.read_chunk().await {
                    Some(chunk) if !chunk.is_empty() => {
                        if let Err(e) = backend.push_chunk(&session_id, chunk).await {
                            warn!("chunk delivery failed for {}: {}", session_id, e);
                        }
                    }
                    Some(_) => {}
                    None => {
                        info!("capture source for {} ended", session_id);
                        break;
                    }
                }
            }

            _ = frame_tick.tick(), if frames.is_some() => {
                let Some(source) = frames.as_mut() else { continue };
                let Some(frame) = source.snapshot() else { continue };
                if let Err(e) = backend.frame_check(&session_id, &frame).await {
                    debug!("frame check failed for {} (ignored): {}", session_id, e);
                }
            }
        }
    }
}

use anyhow::{Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::{Arc, Mutex};
use trellis_client::RecorderBackend;
use trellis_core::SessionId;

#[derive(Default)]
struct BackendState {
    chunks: Vec<(SessionId, Bytes)>,
    frames: Vec<(SessionId, String)>,
    finishes: Vec<SessionId>,
}

/// Mock transcription backend that stores everything delivered to it.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<BackendState>>,
    transcript: Arc<Mutex<Option<String>>>,
}

impl MockBackend {
    pub fn new(transcript: &str) -> Self {
        let backend = Self::default();
        *backend.transcript.lock().unwrap() = Some(transcript.to_owned());
        backend
    }

    /// A backend whose finalize call fails.
    pub fn failing() -> Self {
        Self::default()
    }

    pub fn chunk_count(&self) -> usize {
        self.state.lock().unwrap().chunks.len()
    }

    pub fn frame_count(&self) -> usize {
        self.state.lock().unwrap().frames.len()
    }

    pub fn finish_count(&self) -> usize {
        self.state.lock().unwrap().finishes.len()
    }

    pub fn chunk_sessions(&self) -> Vec<SessionId> {
        self.state
            .lock()
            .unwrap()
            .chunks
            .iter()
            .map(|(s, _)| s.clone())
            .collect()
    }
}

#[async_trait]
impl RecorderBackend for MockBackend {
    async fn push_chunk(&self, session: &SessionId, chunk: Bytes) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .chunks
            .push((session.clone(), chunk));
        Ok(())
    }

    async fn finish(&self, session: &SessionId) -> Result<String> {
        self.state.lock().unwrap().finishes.push(session.clone());
        match self.transcript.lock().unwrap().clone() {
            Some(t) => Ok(t),
            None => bail!("finalize unavailable"),
        }
    }

    async fn frame_check(&self, session: &SessionId, frame: &str) -> Result<()> {
        self.state
            .lock()
            .unwrap()
            .frames
            .push((session.clone(), frame.to_owned()));
        Ok(())
    }
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;
use trellis_core::SessionId;

/// The transcription backend, as the recorder sees it.
#[async_trait]
pub trait RecorderBackend: Send + Sync {
    /// Deliver one chunk of captured audio.
    async fn push_chunk(&self, session: &SessionId, chunk: Bytes) -> Result<()>;

    /// Finalize the session and fetch the transcript.
    async fn finish(&self, session: &SessionId) -> Result<String>;

    /// Best-effort still-frame delivery; callers ignore failures.
    async fn frame_check(&self, session: &SessionId, frame: &str) -> Result<()>;
}

#[derive(Deserialize)]
struct FinishResponse {
    transcript: String,
}

/// HTTP implementation of the chunk-upload protocol.
pub struct HttpRecorderBackend {
    client: reqwest::Client,
    base: String,
}

impl HttpRecorderBackend {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base.into(),
        }
    }
}

#[async_trait]
impl RecorderBackend for HttpRecorderBackend {
    async fn push_chunk(&self, session: &SessionId, chunk: Bytes) -> Result<()> {
        self.client
            .post(format!("{}/answer-chunk", self.base))
            .query(&[("sessionId", session.as_str())])
            .header("Content-Type", "application/octet-stream")
            .body(chunk)
            .send()
            .await
            .context("failed to deliver audio chunk")?
            .error_for_status()
            .context("chunk delivery rejected")?;
        Ok(())
    }

    async fn finish(&self, session: &SessionId) -> Result<String> {
        let response: FinishResponse = self
            .client
            .post(format!("{}/answer-finish", self.base))
            .query(&[("sessionId", session.as_str())])
            .send()
            .await
            .context("failed to finalize recording")?
            .error_for_status()
            .context("finalize rejected")?
            .json()
            .await
            .context("malformed finalize response")?;
        Ok(response.transcript)
    }

    async fn frame_check(&self, session: &SessionId, frame: &str) -> Result<()> {
        self.client
            .post(format!("{}/frame-check", self.base))
            .json(&json!({
                "sessionId": session.as_str(),
                "frame": frame,
            }))
            .send()
            .await
            .context("failed to deliver frame")?
            .error_for_status()
            .context("frame delivery rejected")?;
        Ok(())
    }
}

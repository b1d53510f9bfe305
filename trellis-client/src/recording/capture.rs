use async_trait::async_trait;
use bytes::Bytes;

/// Dedicated audio capture for the recording pipeline, independent of the
/// call's own media so recording can outlive the call. Dropping the capture
/// releases the source.
#[async_trait]
pub trait AudioCapture: Send {
    /// Roughly one chunk interval's worth of encoded audio, or `None` when
    /// the source is exhausted.
    async fn read_chunk(&mut self) -> Option<Bytes>;
}

/// Optional still-frame source for auxiliary analysis.
pub trait FrameSource: Send {
    /// A data-URL encoded snapshot of the local video, if one is available.
    fn snapshot(&mut self) -> Option<String>;
}

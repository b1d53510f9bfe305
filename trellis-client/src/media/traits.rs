use crate::media::MediaEvent;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use trellis_core::{IceCandidate, LocalTrack, PeerId, SessionDescription};

/// Opaque handle to the host platform's real-time media transport for one
/// peer. NAT traversal, SDP generation and encode/decode all live behind this
/// seam; the engine only sequences the calls.
#[async_trait]
pub trait MediaConnection: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn add_track(&self, track: &LocalTrack) -> Result<()>;

    /// Release the connection resource. Idempotent.
    async fn close(&self);
}

/// Factory for per-peer media connections. `events` is the session loop's
/// channel; every callback the connection subscribes to forwards into it,
/// tagged with `peer_id`, and the subscriptions die with the connection.
#[async_trait]
pub trait MediaConnector: Send + Sync {
    async fn open(
        &self,
        peer_id: PeerId,
        events: mpsc::Sender<MediaEvent>,
    ) -> Result<Arc<dyn MediaConnection>>;
}

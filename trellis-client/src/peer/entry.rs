use crate::media::MediaConnection;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};
use trellis_core::{IceCandidate, LocalTrack, PeerId, RemoteStream, SessionDescription};

/// Which side initiates negotiation for this pairing. Fixed at entry
/// creation: the receiver of an offer is always the callee, which is what
/// keeps a pair from calling each other simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerRole {
    Caller,
    Callee,
}

/// Per-peer offer/answer progress. `Closed` is terminal; no state regresses
/// from `Stable` except through `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    New,
    OfferSent,
    OfferReceived,
    AnswerSent,
    Stable,
    Closed,
}

/// One remote peer's connection-establishment state machine.
pub struct PeerEntry {
    pub peer_id: PeerId,
    pub role: PeerRole,
    pub state: NegotiationState,
    pub remote_stream: Option<RemoteStream>,
    pending_remote_candidates: Vec<IceCandidate>,
    local_tracks_attached: bool,
    remote_description_set: bool,
    connection: Arc<dyn MediaConnection>,
}

impl PeerEntry {
    pub fn new(peer_id: PeerId, role: PeerRole, connection: Arc<dyn MediaConnection>) -> Self {
        Self {
            peer_id,
            role,
            state: NegotiationState::New,
            remote_stream: None,
            pending_remote_candidates: Vec::new(),
            local_tracks_attached: false,
            remote_description_set: false,
            connection,
        }
    }

    pub fn connection(&self) -> &Arc<dyn MediaConnection> {
        &self.connection
    }

    pub fn local_tracks_attached(&self) -> bool {
        self.local_tracks_attached
    }

    pub fn pending_candidates(&self) -> &[IceCandidate] {
        &self.pending_remote_candidates
    }

    /// Add every local track to the connection once. Safe to call again;
    /// subsequent calls are skipped.
    pub async fn attach_local_tracks(&mut self, tracks: &[LocalTrack]) -> Result<()> {
        if self.local_tracks_attached {
            return Ok(());
        }
        for track in tracks {
            self.connection.add_track(track).await?;
        }
        self.local_tracks_attached = true;
        Ok(())
    }

    /// Apply the remote description, then replay candidates that raced ahead
    /// of it, in arrival order. The buffer is drained exactly once.
    pub async fn accept_remote_description(&mut self, desc: SessionDescription) -> Result<()> {
        self.connection.set_remote_description(desc).await?;
        self.remote_description_set = true;

        for candidate in self.pending_remote_candidates.drain(..) {
            if let Err(e) = self.connection.add_ice_candidate(candidate).await {
                warn!("failed to apply buffered candidate for {}: {}", self.peer_id, e);
            }
        }
        Ok(())
    }

    /// Apply a remote candidate now, or buffer it until a remote description
    /// exists for this peer.
    pub async fn accept_candidate(&mut self, candidate: IceCandidate) {
        if !self.remote_description_set {
            debug!("buffering candidate for {} (no remote description yet)", self.peer_id);
            self.pending_remote_candidates.push(candidate);
            return;
        }
        if let Err(e) = self.connection.add_ice_candidate(candidate).await {
            warn!("failed to apply candidate for {}: {}", self.peer_id, e);
        }
    }

    /// Release the connection resource. Idempotent: a second close is a no-op.
    pub async fn close(&mut self) {
        if self.state == NegotiationState::Closed {
            return;
        }
        self.state = NegotiationState::Closed;
        self.connection.close().await;
    }
}

use crate::error::SessionError;
use crate::media::{MediaConnector, MediaEvent};
use crate::peer::{NegotiationState, PeerEntry, PeerRole};
use crate::transport::SignalSink;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use trellis_core::{
    IceCandidate, LocalTrack, PeerId, RemoteStream, SessionDescription, SignalMessage,
};

/// Owns every per-peer state machine for one room membership. Created,
/// advanced and destroyed entries all pass through here; the session loop
/// feeds it channel and media events one at a time, so no entry is ever
/// mutated concurrently.
pub struct PeerRegistry {
    entries: HashMap<PeerId, PeerEntry>,
    connector: Arc<dyn MediaConnector>,
    sink: Arc<dyn SignalSink>,
    media_tx: mpsc::Sender<MediaEvent>,
    streams: Arc<DashMap<PeerId, RemoteStream>>,
}

impl PeerRegistry {
    pub fn new(
        connector: Arc<dyn MediaConnector>,
        sink: Arc<dyn SignalSink>,
        media_tx: mpsc::Sender<MediaEvent>,
    ) -> Self {
        Self {
            entries: HashMap::new(),
            connector,
            sink,
            media_tx,
            streams: Arc::new(DashMap::new()),
        }
    }

    /// Remote streams keyed by peer, shared read-only with the presentation
    /// layer.
    pub fn streams(&self) -> Arc<DashMap<PeerId, RemoteStream>> {
        self.streams.clone()
    }

    pub fn get(&self, peer_id: &PeerId) -> Option<&PeerEntry> {
        self.entries.get(peer_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Initiate a connection to `peer_id` as the caller: attach local tracks,
    /// generate and send an offer. A creation request for an already-known
    /// peer is a no-op, which makes duplicate roster notifications harmless.
    pub async fn call_peer(
        &mut self,
        peer_id: PeerId,
        self_id: &PeerId,
        tracks: &[LocalTrack],
    ) -> Result<(), SessionError> {
        if self.entries.contains_key(&peer_id) {
            debug!("already have an entry for {}; ignoring duplicate notification", peer_id);
            return Ok(());
        }

        let entry = self
            .create_entry(peer_id.clone(), PeerRole::Caller, tracks)
            .await?;
        self.entries.insert(peer_id.clone(), entry);

        if let Err(e) = self.send_offer(&peer_id, self_id).await {
            self.destroy(&peer_id).await;
            return Err(e);
        }
        Ok(())
    }

    async fn send_offer(&mut self, peer_id: &PeerId, self_id: &PeerId) -> Result<(), SessionError> {
        let Some(entry) = self.entries.get_mut(peer_id) else {
            return Ok(());
        };
        let conn = entry.connection().clone();

        let offer = conn
            .create_offer()
            .await
            .map_err(|e| negotiation(peer_id, e))?;
        conn.set_local_description(offer.clone())
            .await
            .map_err(|e| negotiation(peer_id, e))?;
        entry.state = NegotiationState::OfferSent;

        self.sink.send(SignalMessage::Offer {
            offer,
            to: peer_id.clone(),
            from: self_id.clone(),
        });
        Ok(())
    }

    /// An offer arrived from `from`. An unknown sender gets a fresh entry
    /// with role=callee; the receiver of an offer never treats itself as a
    /// simultaneous caller, which is what rules glare out.
    pub async fn handle_offer(
        &mut self,
        from: PeerId,
        offer: SessionDescription,
        self_id: &PeerId,
        tracks: &[LocalTrack],
    ) -> Result<(), SessionError> {
        if !self.entries.contains_key(&from) {
            let entry = self
                .create_entry(from.clone(), PeerRole::Callee, tracks)
                .await?;
            self.entries.insert(from.clone(), entry);
        }

        if let Err(e) = self.send_answer(&from, offer, self_id).await {
            self.destroy(&from).await;
            return Err(e);
        }
        Ok(())
    }

    async fn send_answer(
        &mut self,
        from: &PeerId,
        offer: SessionDescription,
        self_id: &PeerId,
    ) -> Result<(), SessionError> {
        let Some(entry) = self.entries.get_mut(from) else {
            return Ok(());
        };
        entry.state = NegotiationState::OfferReceived;
        entry
            .accept_remote_description(offer)
            .await
            .map_err(|e| negotiation(from, e))?;

        let conn = entry.connection().clone();
        let answer = conn
            .create_answer()
            .await
            .map_err(|e| negotiation(from, e))?;
        conn.set_local_description(answer.clone())
            .await
            .map_err(|e| negotiation(from, e))?;
        entry.state = NegotiationState::AnswerSent;

        self.sink.send(SignalMessage::Answer {
            answer,
            to: from.clone(),
            from: self_id.clone(),
        });
        Ok(())
    }

    /// An answer is only meaningful for an entry with an offer in flight.
    /// Anything else is stale signaling: logged, never surfaced.
    pub async fn handle_answer(&mut self, from: PeerId, answer: SessionDescription) {
        let Some(entry) = self.entries.get_mut(&from) else {
            warn!("answer from unknown peer {}; ignoring", from);
            return;
        };
        if entry.state != NegotiationState::OfferSent {
            warn!(
                "answer from {} in state {:?}; ignoring stale signal",
                from, entry.state
            );
            return;
        }

        if let Err(e) = entry.accept_remote_description(answer).await {
            warn!("failed to apply answer from {}: {}", from, e);
            return;
        }
        entry.state = NegotiationState::Stable;
        info!("negotiation with {} is stable", from);
    }

    /// Candidates for a known peer are applied or buffered; candidates for a
    /// peer we have never heard of are dropped. The sender will still become
    /// reachable through its own offer or the roster.
    pub async fn handle_candidate(&mut self, from: PeerId, candidate: IceCandidate) {
        let Some(entry) = self.entries.get_mut(&from) else {
            debug!("candidate from unknown peer {}; dropping", from);
            return;
        };
        entry.accept_candidate(candidate).await;
    }

    /// A locally discovered candidate for `peer_id` goes to the relay
    /// immediately; negotiation state never delays trickle ICE. Discarded if
    /// the entry is already gone by the time the capability reports it.
    pub fn forward_local_candidate(
        &self,
        peer_id: PeerId,
        candidate: IceCandidate,
        self_id: &PeerId,
    ) {
        if !self.entries.contains_key(&peer_id) {
            debug!("dropping local candidate for departed peer {}", peer_id);
            return;
        }
        self.sink.send(SignalMessage::Candidate {
            candidate,
            to: peer_id,
            from: self_id.clone(),
        });
    }

    /// Record an arriving remote stream on the entry and publish it for the
    /// presentation layer. A later stream for the same peer replaces the
    /// earlier one. Returns the stream when it should be announced; a stream
    /// for a departed peer is discarded.
    pub fn handle_track(&mut self, peer_id: PeerId, stream: RemoteStream) -> Option<RemoteStream> {
        let entry = self.entries.get_mut(&peer_id)?;
        entry.remote_stream = Some(stream.clone());
        self.streams.insert(peer_id, stream.clone());
        Some(stream)
    }

    /// Tear down one peer: close its connection exactly once, drop the entry
    /// and unpublish its stream. Destroying an unknown peer is a no-op, and
    /// other entries are never touched.
    pub async fn destroy(&mut self, peer_id: &PeerId) -> Option<PeerEntry> {
        let mut entry = self.entries.remove(peer_id)?;
        entry.close().await;
        self.streams.remove(peer_id);
        info!("destroyed entry for {}", peer_id);
        Some(entry)
    }

    /// Session-fatal teardown: every entry is destroyed.
    pub async fn teardown(&mut self) {
        let peers: Vec<PeerId> = self.entries.keys().cloned().collect();
        for peer_id in peers {
            self.destroy(&peer_id).await;
        }
    }

    async fn create_entry(
        &self,
        peer_id: PeerId,
        role: PeerRole,
        tracks: &[LocalTrack],
    ) -> Result<PeerEntry, SessionError> {
        let connection = self
            .connector
            .open(peer_id.clone(), self.media_tx.clone())
            .await
            .map_err(|e| negotiation(&peer_id, e))?;

        let mut entry = PeerEntry::new(peer_id.clone(), role, connection);
        if let Err(e) = entry.attach_local_tracks(tracks).await {
            entry.close().await;
            return Err(negotiation(&peer_id, e));
        }
        Ok(entry)
    }
}

fn negotiation(peer: &PeerId, source: anyhow::Error) -> SessionError {
    SessionError::Negotiation {
        peer: peer.clone(),
        source,
    }
}

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use trellis_client::{MediaConnection, MediaConnector, MediaEvent};
use trellis_core::{IceCandidate, LocalTrack, PeerId, RemoteStream, SessionDescription};

/// Mock media capability. Records every call made against each per-peer
/// connection and lets tests inject media events as the platform would.
#[derive(Clone, Default)]
pub struct MockConnector {
    connections: Arc<Mutex<HashMap<PeerId, Arc<MockConnection>>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self, peer_id: &PeerId) -> Option<Arc<MockConnection>> {
        self.connections.lock().unwrap().get(peer_id).cloned()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaConnector for MockConnector {
    async fn open(
        &self,
        peer_id: PeerId,
        events: mpsc::Sender<MediaEvent>,
    ) -> Result<Arc<dyn MediaConnection>> {
        let conn = Arc::new(MockConnection::new(peer_id.clone(), events));
        self.connections.lock().unwrap().insert(peer_id, conn.clone());
        Ok(conn)
    }
}

#[derive(Default)]
struct ConnectionState {
    local_description: Option<SessionDescription>,
    remote_description: Option<SessionDescription>,
    applied_candidates: Vec<IceCandidate>,
    tracks: Vec<LocalTrack>,
    close_count: usize,
}

pub struct MockConnection {
    pub peer_id: PeerId,
    events: mpsc::Sender<MediaEvent>,
    state: Mutex<ConnectionState>,
}

impl MockConnection {
    fn new(peer_id: PeerId, events: mpsc::Sender<MediaEvent>) -> Self {
        Self {
            peer_id,
            events,
            state: Mutex::new(ConnectionState::default()),
        }
    }

    pub fn remote_description(&self) -> Option<SessionDescription> {
        self.state.lock().unwrap().remote_description.clone()
    }

    pub fn applied_candidates(&self) -> Vec<IceCandidate> {
        self.state.lock().unwrap().applied_candidates.clone()
    }

    pub fn track_count(&self) -> usize {
        self.state.lock().unwrap().tracks.len()
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().unwrap().close_count
    }

    /// Inject a remote stream, as the platform's track callback would.
    pub async fn emit_track(&self, stream: RemoteStream) {
        let _ = self
            .events
            .send(MediaEvent::TrackReceived(self.peer_id.clone(), stream))
            .await;
    }

    /// Inject a locally discovered candidate.
    pub async fn emit_candidate(&self, candidate: IceCandidate) {
        let _ = self
            .events
            .send(MediaEvent::CandidateDiscovered(
                self.peer_id.clone(),
                candidate,
            ))
            .await;
    }

    /// Inject a fatal connection-state transition.
    pub async fn emit_lost(&self) {
        let _ = self
            .events
            .send(MediaEvent::ConnectionLost(self.peer_id.clone()))
            .await;
    }
}

#[async_trait]
impl MediaConnection for MockConnection {
    async fn create_offer(&self) -> Result<SessionDescription> {
        Ok(SessionDescription::offer(format!("offer-for-{}", self.peer_id)))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        Ok(SessionDescription::answer(format!("answer-for-{}", self.peer_id)))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<()> {
        self.state.lock().unwrap().local_description = Some(desc);
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<()> {
        self.state.lock().unwrap().remote_description = Some(desc);
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.state.lock().unwrap().applied_candidates.push(candidate);
        Ok(())
    }

    async fn add_track(&self, track: &LocalTrack) -> Result<()> {
        self.state.lock().unwrap().tracks.push(track.clone());
        Ok(())
    }

    async fn close(&self) {
        self.state.lock().unwrap().close_count += 1;
    }
}

/// Shorthand for candidate fixtures.
pub fn candidate(text: &str) -> IceCandidate {
    IceCandidate {
        candidate: text.to_owned(),
        sdp_mid: Some("0".to_owned()),
        sdp_m_line_index: Some(0),
    }
}

use crate::error::SessionError;
use crate::media::{MediaConnector, MediaEvent};
use crate::peer::PeerRegistry;
use crate::room::{LocalMedia, Membership, RoomEvent, SessionCommand};
use crate::transport::{ChannelEvent, SignalSink};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use trellis_core::{PeerId, RemoteStream, RoomId, SignalMessage};

/// This client's membership in one room: identity, join lifecycle and the
/// event loop that drives every per-peer state machine. All transitions run
/// on this loop, one event at a time, in arrival order.
pub struct RoomSession {
    room: Option<RoomId>,
    membership: Membership,
    self_id: Option<PeerId>,
    channel_open: bool,
    local_media: LocalMedia,
    registry: PeerRegistry,
    sink: Arc<dyn SignalSink>,
    command_rx: mpsc::Receiver<SessionCommand>,
    channel_rx: mpsc::Receiver<ChannelEvent>,
    media_rx: mpsc::Receiver<MediaEvent>,
    events_tx: mpsc::UnboundedSender<RoomEvent>,
}

impl RoomSession {
    pub fn new(
        sink: Arc<dyn SignalSink>,
        connector: Arc<dyn MediaConnector>,
        local_media: LocalMedia,
        channel_rx: mpsc::Receiver<ChannelEvent>,
        command_rx: mpsc::Receiver<SessionCommand>,
    ) -> (Self, mpsc::UnboundedReceiver<RoomEvent>) {
        let (media_tx, media_rx) = mpsc::channel(256);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let registry = PeerRegistry::new(connector, sink.clone(), media_tx);

        let session = Self {
            room: None,
            membership: Membership::Unjoined,
            self_id: None,
            channel_open: false,
            local_media,
            registry,
            sink,
            command_rx,
            channel_rx,
            media_rx,
            events_tx,
        };
        (session, events_rx)
    }

    /// Remote streams keyed by peer, for the presentation layer.
    pub fn streams(&self) -> Arc<DashMap<PeerId, RemoteStream>> {
        self.registry.streams()
    }

    pub async fn run(mut self) {
        info!("room session loop started");

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Join(room)) => self.handle_join(room),
                        Some(SessionCommand::Leave) | None => {
                            info!("leaving room");
                            break;
                        }
                    }
                }

                evt = self.channel_rx.recv() => {
                    match evt {
                        Some(ChannelEvent::Open) => self.channel_open = true,
                        Some(ChannelEvent::Signal(msg)) => self.handle_signal(msg).await,
                        Some(ChannelEvent::Closed) | None => {
                            warn!("signal channel closed; ending session");
                            break;
                        }
                    }
                }

                evt = self.media_rx.recv() => {
                    if let Some(e) = evt {
                        self.handle_media_event(e).await;
                    }
                }
            }
        }

        self.teardown().await;
    }

    fn handle_join(&mut self, room: RoomId) {
        if !self.channel_open {
            warn!("join rejected: signal channel is not open");
            self.emit(RoomEvent::Error(SessionError::Precondition(
                "signal channel is not open",
            )));
            return;
        }
        let trimmed = room.as_str().trim();
        if trimmed.is_empty() {
            warn!("join rejected: empty room id");
            self.emit(RoomEvent::Error(SessionError::Precondition(
                "room id is empty",
            )));
            return;
        }

        let room = RoomId::from(trimmed);
        info!("joining room {}", room);
        self.sink.send(SignalMessage::Join {
            room_id: room.clone(),
        });
        self.membership = Membership::Joining;
        self.room = Some(room.clone());
        self.emit(RoomEvent::MembershipChanged {
            room,
            membership: Membership::Joining,
        });
    }

    async fn handle_signal(&mut self, msg: SignalMessage) {
        match msg {
            SignalMessage::Id { id } => {
                // Identity is immutable for the lifetime of the connection.
                if let Some(existing) = &self.self_id {
                    warn!("duplicate id envelope ({}); keeping {}", id, existing);
                    return;
                }
                info!("assigned peer id {}", id);
                self.self_id = Some(id.clone());
                self.emit(RoomEvent::IdentityAssigned(id));
            }

            SignalMessage::Joined => self.mark_joined(),

            SignalMessage::Peers { peers } => {
                // Roster of peers already present: this client calls each of
                // them. Receiving the roster also confirms the join for
                // relays that never send an explicit ack.
                self.mark_joined();
                for peer_id in peers {
                    self.call_peer(peer_id).await;
                }
            }

            SignalMessage::NewPeer { peer_id } => {
                // The newcomer cannot know who is present yet, so the
                // already-present side initiates.
                self.call_peer(peer_id).await;
            }

            SignalMessage::Offer { offer, from, .. } => {
                let Some(self_id) = self.self_id.clone() else {
                    warn!("offer from {} before identity was assigned; ignoring", from);
                    return;
                };
                if let Err(e) = self
                    .registry
                    .handle_offer(from, offer, &self_id, self.local_media.tracks())
                    .await
                {
                    error!("{}", e);
                    self.emit(RoomEvent::Error(e));
                }
            }

            SignalMessage::Answer { answer, from, .. } => {
                self.registry.handle_answer(from, answer).await;
            }

            SignalMessage::Candidate { candidate, from, .. } => {
                self.registry.handle_candidate(from, candidate).await;
            }

            SignalMessage::Leave { from } => {
                info!("peer {} left", from);
                self.destroy_peer(&from).await;
            }

            SignalMessage::Join { .. } => {
                debug!("ignoring outbound-only envelope echoed by relay");
            }
        }
    }

    async fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::CandidateDiscovered(peer_id, candidate) => {
                let Some(self_id) = self.self_id.clone() else {
                    warn!("local candidate before identity was assigned; dropping");
                    return;
                };
                self.registry
                    .forward_local_candidate(peer_id, candidate, &self_id);
            }

            MediaEvent::TrackReceived(peer_id, stream) => {
                if let Some(stream) = self.registry.handle_track(peer_id.clone(), stream) {
                    self.emit(RoomEvent::StreamAdded {
                        peer: peer_id,
                        stream,
                    });
                }
            }

            MediaEvent::ConnectionLost(peer_id) => {
                warn!("connection lost for {}", peer_id);
                self.destroy_peer(&peer_id).await;
            }
        }
    }

    /// Per-peer failure is isolated: a rejected offer abandons that entry and
    /// nothing else.
    async fn call_peer(&mut self, peer_id: PeerId) {
        let Some(self_id) = self.self_id.clone() else {
            error!("cannot call {} before identity is assigned", peer_id);
            return;
        };
        if peer_id == self_id {
            return;
        }
        if let Err(e) = self
            .registry
            .call_peer(peer_id, &self_id, self.local_media.tracks())
            .await
        {
            error!("{}", e);
            self.emit(RoomEvent::Error(e));
        }
    }

    async fn destroy_peer(&mut self, peer_id: &PeerId) {
        if let Some(entry) = self.registry.destroy(peer_id).await {
            if entry.remote_stream.is_some() {
                self.emit(RoomEvent::StreamRemoved {
                    peer: peer_id.clone(),
                });
            }
        }
    }

    fn mark_joined(&mut self) {
        if self.membership != Membership::Joining {
            return;
        }
        self.membership = Membership::Joined;
        if let Some(room) = self.room.clone() {
            info!("joined room {}", room);
            self.emit(RoomEvent::MembershipChanged {
                room,
                membership: Membership::Joined,
            });
        }
    }

    async fn teardown(&mut self) {
        self.registry.teardown().await;
        self.local_media.release();
        self.membership = Membership::Unjoined;
        self.emit(RoomEvent::SessionEnded);
        info!("room session loop finished");
    }

    fn emit(&self, event: RoomEvent) {
        let _ = self.events_tx.send(event);
    }
}

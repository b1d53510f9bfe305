use crate::model::media::{IceCandidate, SessionDescription};
use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    /// Credential-less server entry (STUN).
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// JSON envelope exchanged with the signaling relay. One socket carries the
/// traffic of every peer in the room; `to`/`from` route the negotiation
/// messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignalMessage {
    #[serde(rename_all = "camelCase")]
    Join { room_id: RoomId },
    Joined,
    Id { id: PeerId },
    Peers { peers: Vec<PeerId> },
    #[serde(rename_all = "camelCase")]
    NewPeer { peer_id: PeerId },
    Offer {
        offer: SessionDescription,
        to: PeerId,
        from: PeerId,
    },
    Answer {
        answer: SessionDescription,
        to: PeerId,
        from: PeerId,
    },
    Candidate {
        candidate: IceCandidate,
        to: PeerId,
        from: PeerId,
    },
    Leave { from: PeerId },
}

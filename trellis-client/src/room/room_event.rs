use crate::error::SessionError;
use trellis_core::{PeerId, RemoteStream, RoomId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Unjoined,
    Joining,
    Joined,
}

/// What the session reports to the presentation layer. Failures show up here
/// as events; nothing crashes the loop.
#[derive(Debug)]
pub enum RoomEvent {
    IdentityAssigned(PeerId),
    MembershipChanged { room: RoomId, membership: Membership },
    StreamAdded { peer: PeerId, stream: RemoteStream },
    StreamRemoved { peer: PeerId },
    Error(SessionError),
    SessionEnded,
}

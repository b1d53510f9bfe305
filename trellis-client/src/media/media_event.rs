use trellis_core::{IceCandidate, PeerId, RemoteStream};

/// Events emitted by the media capability into the room session's event loop,
/// tagged with the peer they belong to.
#[derive(Debug)]
pub enum MediaEvent {
    /// A local ICE candidate was discovered for this peer; sent to the relay
    /// immediately, regardless of negotiation state.
    CandidateDiscovered(PeerId, IceCandidate),

    /// A remote media stream arrived for this peer.
    TrackReceived(PeerId, RemoteStream),

    /// The underlying connection reached failed/disconnected/closed.
    ConnectionLost(PeerId),
}

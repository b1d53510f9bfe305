mod media;
mod peer;
mod room;
mod session;
mod signaling;

pub use media::{IceCandidate, LocalTrack, RemoteStream, SdpType, SessionDescription, TrackKind};
pub use peer::PeerId;
pub use room::RoomId;
pub use session::SessionId;
pub use signaling::{IceServerConfig, SignalMessage};

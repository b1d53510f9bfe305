pub mod model;

pub use model::{
    IceCandidate, IceServerConfig, LocalTrack, PeerId, RemoteStream, RoomId, SdpType,
    SessionDescription, SessionId, SignalMessage, TrackKind,
};

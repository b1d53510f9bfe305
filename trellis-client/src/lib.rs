pub mod config;
pub mod error;
pub mod media;
pub mod peer;
pub mod recording;
pub mod room;
pub mod transport;

pub use config::{ClientConfig, RecorderConfig};
pub use error::{RecordingError, SessionError};
pub use media::{MediaConnection, MediaConnector, MediaEvent, RtcConnector};
pub use recording::{AudioCapture, FrameSource, HttpRecorderBackend, Recorder, RecorderBackend};
pub use room::{LocalMedia, Membership, RoomEvent, RoomLocator, RoomSession, SessionCommand};
pub use transport::{ChannelEvent, SignalChannel, SignalSink};

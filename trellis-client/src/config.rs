use std::time::Duration;
use trellis_core::IceServerConfig;

/// Engine configuration: where the relay lives and which STUN/TURN servers
/// the media capability should use.
#[derive(Clone)]
pub struct ClientConfig {
    pub signal_url: String,
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            signal_url: "ws://localhost:8080/signal".to_owned(),
            ice_servers: vec![IceServerConfig::stun("stun:stun.l.google.com:19302")],
        }
    }
}

/// Recording pipeline configuration. Chunk cadence mirrors the backend's
/// expectation of roughly one second of audio per upload.
#[derive(Clone)]
pub struct RecorderConfig {
    pub api_base: String,
    pub chunk_interval: Duration,
    pub frame_interval: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080/api/interview".to_owned(),
            chunk_interval: Duration::from_secs(1),
            frame_interval: Duration::from_secs(5),
        }
    }
}

use thiserror::Error;
use trellis_core::PeerId;

/// Failures surfaced by the room session. Per-peer negotiation trouble is
/// logged and isolated instead of surfacing here; only channel-level and
/// caller-precondition failures reach the API.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The signaling channel could not be opened. Fatal to the session.
    #[error("signaling channel unavailable: {0}")]
    Connection(String),

    /// Join attempted against a closed channel or with an empty room id.
    /// Recoverable: the caller may retry once the precondition holds.
    #[error("precondition failed: {0}")]
    Precondition(&'static str),

    /// The media capability rejected offer/answer generation for one peer.
    /// That entry is abandoned; other peers are unaffected.
    #[error("negotiation with {peer} failed: {source}")]
    Negotiation {
        peer: PeerId,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("a recording session is already active")]
    AlreadyRecording,

    #[error("recording backend request failed: {0}")]
    Backend(#[from] anyhow::Error),
}

use trellis_core::SignalMessage;

/// Outbound half of the signaling channel, as seen by the room session and
/// peer registry. The production implementation is [`super::SignalChannel`];
/// tests substitute a capturing mock.
pub trait SignalSink: Send + Sync {
    /// Queue one envelope for delivery. Never blocks and never fails: if the
    /// channel is no longer open the message is dropped and logged.
    fn send(&self, msg: SignalMessage);
}

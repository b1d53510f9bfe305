use trellis_core::SignalMessage;

/// Events surfaced by the signal channel to the room session, delivered in
/// arrival order.
#[derive(Debug)]
pub enum ChannelEvent {
    Open,
    Signal(SignalMessage),
    Closed,
}

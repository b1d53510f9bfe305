mod channel_event;
mod signal_channel;
mod sink;

pub use channel_event::ChannelEvent;
pub use signal_channel::SignalChannel;
pub use sink::SignalSink;

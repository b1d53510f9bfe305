mod entry;
mod registry;

pub use entry::{NegotiationState, PeerEntry, PeerRole};
pub use registry::PeerRegistry;

use trellis_core::RoomId;

/// Commands from the embedding application into the session loop.
#[derive(Debug)]
pub enum SessionCommand {
    /// Join a room. Rejected (logged, reported as an event) when the channel
    /// is not open or the identifier is empty after trimming.
    Join(RoomId),

    /// Leave the room and end the session.
    Leave,
}

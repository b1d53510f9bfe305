mod local_media;
mod locator;
mod room_event;
mod session;
mod session_command;

pub use local_media::LocalMedia;
pub use locator::RoomLocator;
pub use room_event::{Membership, RoomEvent};
pub use session::RoomSession;
pub use session_command::SessionCommand;

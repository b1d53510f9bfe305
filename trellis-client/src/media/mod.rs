mod media_event;
mod rtc;
mod traits;

pub use media_event::MediaEvent;
pub use rtc::{RtcConnection, RtcConnector};
pub use traits::{MediaConnection, MediaConnector};

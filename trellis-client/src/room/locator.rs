use trellis_core::RoomId;
use url::Url;

/// Room locator convention: the page location carries the room identifier in
/// a `room` query parameter, both for auto-join on load and for invite links.
pub struct RoomLocator;

impl RoomLocator {
    /// Read a room identifier out of a location string. Pure lookup; meant to
    /// be called once at startup.
    pub fn from_location(location: &str) -> Option<RoomId> {
        let url = Url::parse(location).ok()?;
        url.query_pairs().find_map(|(key, value)| {
            let value = value.trim();
            if key == "room" && !value.is_empty() {
                Some(RoomId::from(value))
            } else {
                None
            }
        })
    }

    /// Shareable invite link for `room`.
    pub fn share_link(base: &str, room: &RoomId) -> String {
        format!("{}?room={}", base, room)
    }
}

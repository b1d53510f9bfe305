pub mod mock_backend;
pub mod mock_media;

pub use harness::*;
pub use mock_backend::*;
pub use mock_capture::*;
pub use mock_media::*;
pub use mock_signaling::*;

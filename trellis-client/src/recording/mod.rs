mod backend;
mod capture;
mod recorder;

pub use backend::{HttpRecorderBackend, RecorderBackend};
pub use capture::{AudioCapture, FrameSource};
pub use recorder::Recorder;

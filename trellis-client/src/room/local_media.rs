use tracing::info;
use trellis_core::LocalTrack;

/// The one local capture handle for the call. Every peer entry attaches the
/// same tracks; the session owns the handle and releases it exactly once at
/// teardown, however many entries referenced it.
pub struct LocalMedia {
    tracks: Vec<LocalTrack>,
    on_release: Option<Box<dyn FnOnce() + Send>>,
    released: bool,
}

impl LocalMedia {
    pub fn new(tracks: Vec<LocalTrack>) -> Self {
        Self {
            tracks,
            on_release: None,
            released: false,
        }
    }

    /// Hook invoked when the capture handle is released, so the host platform
    /// can stop the actual devices.
    pub fn with_release(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_release = Some(Box::new(f));
        self
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    /// Idempotent: only the first call releases the capture.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.tracks.clear();
        if let Some(f) = self.on_release.take() {
            f();
        }
        info!("local media released");
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

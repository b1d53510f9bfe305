use crate::init_tracing;
use crate::utils::{FixedFrames, MockBackend, SteadyCapture, wait_until};
use std::sync::Arc;
use std::time::Duration;
use trellis_client::{Recorder, RecorderConfig, RecordingError};

fn fast_config() -> RecorderConfig {
    RecorderConfig {
        api_base: "http://unused".to_owned(),
        chunk_interval: Duration::from_millis(10),
        frame_interval: Duration::from_millis(25),
    }
}

/// A second start without an intervening stop is rejected and the first
/// session keeps its identifier.
#[tokio::test]
async fn double_start_is_rejected() {
    init_tracing();
    let backend = MockBackend::new("hello");
    let mut recorder = Recorder::new(Arc::new(backend), fast_config());

    let first = recorder
        .start(Box::new(SteadyCapture::new(b"pcm")), None)
        .expect("first start failed");

    let second = recorder.start(Box::new(SteadyCapture::new(b"pcm")), None);
    assert!(matches!(second, Err(RecordingError::AlreadyRecording)));
    assert_eq!(recorder.session_id(), Some(&first));
    assert!(recorder.is_recording());

    recorder.stop().await;
}

/// Chunks are delivered at the configured cadence, tagged with the session,
/// and stop finalizes exactly once and surfaces the transcript.
#[tokio::test]
async fn chunks_flow_and_stop_returns_transcript() {
    init_tracing();
    let backend = MockBackend::new("the transcript");
    let mut recorder = Recorder::new(Arc::new(backend.clone()), fast_config());

    let session = recorder
        .start(
            Box::new(SteadyCapture::new(b"pcm")),
            Some(Box::new(FixedFrames)),
        )
        .expect("start failed");

    wait_until(1000, || (backend.chunk_count() >= 3).then_some(()))
        .await
        .expect("chunks never arrived");
    wait_until(1000, || (backend.frame_count() >= 1).then_some(()))
        .await
        .expect("frames never arrived");
    assert!(backend.chunk_sessions().iter().all(|s| s == &session));

    let transcript = recorder.stop().await;
    assert_eq!(transcript.as_deref(), Some("the transcript"));
    assert_eq!(backend.finish_count(), 1);
    assert!(!recorder.is_recording());

    // Delivery halts after stop.
    let settled = backend.chunk_count();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.chunk_count(), settled);
}

/// Stop with no active session is a logged no-op.
#[tokio::test]
async fn stop_without_start_is_noop() {
    init_tracing();
    let backend = MockBackend::new("unused");
    let mut recorder = Recorder::new(Arc::new(backend.clone()), fast_config());

    assert!(recorder.stop().await.is_none());
    assert_eq!(backend.finish_count(), 0);
}

/// A failing finalize is swallowed: no transcript, recorder idle again, and
/// a new session can start.
#[tokio::test]
async fn finalize_failure_is_not_fatal() {
    init_tracing();
    let backend = MockBackend::failing();
    let mut recorder = Recorder::new(Arc::new(backend.clone()), fast_config());

    recorder
        .start(Box::new(SteadyCapture::new(b"pcm")), None)
        .expect("start failed");
    assert!(recorder.stop().await.is_none());
    assert!(!recorder.is_recording());

    recorder
        .start(Box::new(SteadyCapture::new(b"pcm")), None)
        .expect("restart after failed finalize");
    recorder.stop().await;
}

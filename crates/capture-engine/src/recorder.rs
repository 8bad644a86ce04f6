//! Video capture session management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use codereel_common::{CodereelError, CodereelResult, SessionClock};
use codereel_media_model::{EncodedChunk, MediaArtifact, MediaType};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::element::SceneElement;
use crate::encoder::{EncoderEvent, StreamEncoder, StreamFormat};
use crate::environment::HostEnvironment;
use crate::ffmpeg::FfmpegVp9Encoder;
use crate::frame_clock::{ClockStats, FrameClock};
use crate::sampler::{SamplerOptions, SnapshotSampler};
use crate::surface::CaptureSurface;

/// Configuration for video capture sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Presentation rate the frame clock targets.
    pub frame_rate: u32,

    /// Encoder bitrate target in bits per second.
    pub bitrate_bps: u32,

    /// How often the encoder flushes buffered output as chunks.
    pub flush_interval_ms: u64,

    /// Pause between the last-chunk confirmation and finalizing the
    /// artifact. An empirical grace period for late deliveries, not a
    /// correctness requirement.
    pub settle_delay: Duration,

    /// Pause between surface acquisition and opening the encoder, giving
    /// the surface a first paint before the stream starts.
    pub surface_init_delay: Duration,

    /// How elements are asked to rasterize.
    pub sampler: SamplerOptions,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            bitrate_bps: 5_000_000,
            flush_interval_ms: 100,
            settle_delay: Duration::from_millis(500),
            surface_init_delay: Duration::from_millis(100),
            sampler: SamplerOptions::default(),
        }
    }
}

/// State of a video capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No session active.
    Idle,
    /// Frames are being sampled and encoded.
    Capturing,
    /// Stop requested; encoder output draining.
    Draining,
    /// Last session finalized its artifact.
    Finished,
    /// Last session failed; the recorder may start again.
    Failed,
}

/// Everything one recording owns while it is live.
///
/// Created on start, exclusively held by the recorder, torn down on
/// stop or failure. The element is shared with the host, never owned.
struct CaptureSession {
    surface: Arc<Mutex<CaptureSurface>>,
    encoder: Arc<Mutex<Box<dyn StreamEncoder>>>,
    clock_flag: Arc<AtomicBool>,
    clock_task: JoinHandle<ClockStats>,
    pump_task: JoinHandle<PumpOutcome>,
    clock: SessionClock,
}

/// What the event pump hands back when it finishes.
struct PumpOutcome {
    chunks: Vec<EncodedChunk>,
    stopped_seen: bool,
    error: Option<String>,
    events: mpsc::UnboundedReceiver<EncoderEvent>,
}

/// Builds a fresh encoder for each session.
pub type EncoderFactory = Box<dyn Fn() -> Box<dyn StreamEncoder> + Send + Sync>;

/// Records a live scene element into a WebM artifact.
///
/// Lifecycle per session: Idle, Capturing, Draining, then Finished, with
/// Failed reachable from an unrecoverable error at start or mid-capture.
/// One session at a time; a finished or failed recorder can start again.
pub struct ScreenRecorder {
    config: RecorderConfig,
    make_encoder: EncoderFactory,
    state: RecorderState,
    session: Option<CaptureSession>,
}

impl ScreenRecorder {
    /// A recorder using the ffmpeg VP9 encoder.
    pub fn new(config: RecorderConfig) -> Self {
        Self::with_encoder_factory(config, Box::new(|| Box::new(FfmpegVp9Encoder::new())))
    }

    /// A recorder with an injected encoder constructor.
    pub fn with_encoder_factory(config: RecorderConfig, make_encoder: EncoderFactory) -> Self {
        Self {
            config,
            make_encoder,
            state: RecorderState::Idle,
            session: None,
        }
    }

    /// Current session state.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Whether a session is actively capturing.
    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Capturing
    }

    /// Start recording the given element.
    ///
    /// The environment gate runs before anything is allocated: mobile and
    /// narrow-viewport hosts are rejected outright. After the gate, the
    /// surface is acquired at the element's layout size times the device
    /// scale, the encoder session opens, and the frame clock starts.
    pub async fn start(
        &mut self,
        element: Arc<dyn SceneElement>,
        environment: &HostEnvironment,
    ) -> CodereelResult<()> {
        if self.session.is_some() {
            return Err(CodereelError::capture("capture session already active"));
        }

        if let Some(reason) = environment.mobile_reason() {
            tracing::info!(reason = %reason, "Recording refused by environment gate");
            return Err(CodereelError::unsupported_environment(reason));
        }

        let rect = element.bounding_rect();
        tracing::info!(
            width = rect.width,
            height = rect.height,
            scale = environment.device_pixel_ratio,
            frame_rate = self.config.frame_rate,
            "Starting capture session"
        );

        let surface = match CaptureSurface::acquire(rect, environment.device_pixel_ratio) {
            Ok(surface) => surface,
            Err(e) => {
                self.state = RecorderState::Failed;
                return Err(e);
            }
        };
        let (width, height) = surface.physical_size();

        tokio::time::sleep(self.config.surface_init_delay).await;

        let format = StreamFormat {
            width,
            height,
            frame_rate: self.config.frame_rate,
            bitrate_bps: self.config.bitrate_bps,
            flush_interval_ms: self.config.flush_interval_ms,
        };
        let mut encoder = (self.make_encoder)();
        let events = match encoder.start(&format) {
            Ok(events) => events,
            Err(e) => {
                self.state = RecorderState::Failed;
                return Err(e);
            }
        };

        let clock = SessionClock::start();
        tracing::info!(epoch_wall = %clock.epoch_wall(), "Session clock started");

        let surface = Arc::new(Mutex::new(surface));
        let encoder = Arc::new(Mutex::new(encoder));
        let frame_clock = FrameClock::new(
            self.config.frame_rate,
            element,
            SnapshotSampler::new(self.config.sampler.clone()),
            surface.clone(),
            encoder.clone(),
            clock.clone(),
        );
        let clock_flag = frame_clock.active_flag();
        let clock_task = tokio::spawn(frame_clock.run());
        let pump_task = tokio::spawn(pump_events(events, clock_flag.clone()));

        self.session = Some(CaptureSession {
            surface,
            encoder,
            clock_flag,
            clock_task,
            pump_task,
            clock,
        });
        self.state = RecorderState::Capturing;

        tracing::info!("Capture session started");
        Ok(())
    }

    /// Stop recording and produce the artifact.
    ///
    /// With no active session this resolves immediately with an empty,
    /// correctly typed artifact. Otherwise the clock stops, the encoder
    /// is asked to flush and finalize, and the call waits for the
    /// last-chunk confirmation before concatenating chunks in arrival
    /// order. The wait has no timeout; an encoder channel that closes
    /// without confirming counts as "no more bytes ever". A clock task
    /// that died instead of draining fails the session.
    pub async fn stop(&mut self) -> CodereelResult<MediaArtifact> {
        let Some(session) = self.session.take() else {
            tracing::debug!(state = ?self.state, "Stop requested with no active session");
            return Ok(MediaArtifact::empty(MediaType::WebmVp9));
        };

        self.state = RecorderState::Draining;
        tracing::info!("Stopping capture session");

        session.clock_flag.store(false, Ordering::SeqCst);
        match session.clock_task.await {
            Ok(stats) => tracing::info!(
                frames_sampled = stats.frames_sampled,
                frames_failed = stats.frames_failed,
                "Frame clock drained"
            ),
            Err(e) => {
                tracing::error!(error = %e, "Frame clock task died");
                {
                    let mut encoder = session.encoder.lock().await;
                    if let Err(stop_err) = encoder.stop() {
                        tracing::warn!(error = %stop_err, "Encoder stop failed");
                    }
                }
                let _ = session.pump_task.await;
                session.surface.lock().await.detach();
                self.state = RecorderState::Failed;
                return Err(CodereelError::capture(format!(
                    "frame clock task died: {e}"
                )));
            }
        }

        {
            let mut encoder = session.encoder.lock().await;
            if let Err(e) = encoder.request_data() {
                tracing::warn!(error = %e, "Encoder flush request failed");
            }
            if let Err(e) = encoder.stop() {
                tracing::warn!(error = %e, "Encoder stop failed");
            }
        }

        let outcome = match session.pump_task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                session.surface.lock().await.detach();
                self.state = RecorderState::Failed;
                return Err(CodereelError::capture(format!("event pump join failed: {e}")));
            }
        };
        let PumpOutcome {
            mut chunks,
            stopped_seen,
            error,
            mut events,
        } = outcome;

        if let Some(message) = error {
            session.surface.lock().await.detach();
            self.state = RecorderState::Failed;
            tracing::warn!(error = %message, "Capture session failed");
            return Err(CodereelError::encoder(message));
        }

        if !stopped_seen {
            tracing::warn!("Encoder channel closed without a stop confirmation");
        }

        tokio::time::sleep(self.config.settle_delay).await;

        // Anything that trickled in during the settle window still
        // belongs to this artifact.
        while let Ok(event) = events.try_recv() {
            match event {
                EncoderEvent::Data(chunk) => {
                    if !chunk.is_empty() {
                        chunks.push(chunk);
                    }
                }
                EncoderEvent::Stopped => {}
                EncoderEvent::Error(message) => {
                    session.surface.lock().await.detach();
                    self.state = RecorderState::Failed;
                    return Err(CodereelError::encoder(message));
                }
            }
        }

        let artifact = MediaArtifact::from_chunks(MediaType::WebmVp9, chunks);
        session.surface.lock().await.detach();
        self.state = RecorderState::Finished;

        tracing::info!(
            bytes = artifact.len(),
            duration_secs = session.clock.elapsed_secs(),
            "Recording stopped"
        );
        Ok(artifact)
    }
}

/// Collects encoder events while a session runs.
///
/// Data chunks accumulate in arrival order; zero-byte deliveries are
/// ignored. On an encoder error the clock flag is cleared so sampling
/// halts, and the error is carried back for the next `stop` call. After
/// the loop ends, one defensive sweep picks up events that were already
/// queued behind the stop confirmation.
async fn pump_events(
    mut events: mpsc::UnboundedReceiver<EncoderEvent>,
    clock_flag: Arc<AtomicBool>,
) -> PumpOutcome {
    let mut chunks = Vec::new();
    let mut stopped_seen = false;
    let mut error = None;

    loop {
        match events.recv().await {
            Some(EncoderEvent::Data(chunk)) => {
                if !chunk.is_empty() {
                    chunks.push(chunk);
                }
            }
            Some(EncoderEvent::Stopped) => {
                stopped_seen = true;
                break;
            }
            Some(EncoderEvent::Error(message)) => {
                clock_flag.store(false, Ordering::SeqCst);
                error = Some(message);
                break;
            }
            None => break,
        }
    }

    while let Ok(event) = events.try_recv() {
        match event {
            EncoderEvent::Data(chunk) => {
                if !chunk.is_empty() {
                    chunks.push(chunk);
                }
            }
            EncoderEvent::Stopped => stopped_seen = true,
            EncoderEvent::Error(message) => {
                if error.is_none() {
                    error = Some(message);
                }
            }
        }
    }

    PumpOutcome {
        chunks,
        stopped_seen,
        error,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_stream_profile() {
        let config = RecorderConfig::default();
        assert_eq!(config.frame_rate, 60);
        assert_eq!(config.bitrate_bps, 5_000_000);
        assert_eq!(config.flush_interval_ms, 100);
        assert_eq!(config.settle_delay, Duration::from_millis(500));
        assert_eq!(config.surface_init_delay, Duration::from_millis(100));
    }
}

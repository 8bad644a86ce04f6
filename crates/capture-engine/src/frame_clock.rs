//! Fixed-rate sampling loop for an active capture session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use codereel_common::{RateController, SessionClock};
use codereel_media_model::Frame;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::element::SceneElement;
use crate::encoder::StreamEncoder;
use crate::sampler::SnapshotSampler;
use crate::surface::CaptureSurface;

/// Counters reported when a clock loop exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockStats {
    /// Frames sampled, drawn, and handed to the encoder.
    pub frames_sampled: u64,

    /// Ticks where sampling or frame submission failed.
    pub frames_failed: u64,
}

impl ClockStats {
    /// Failed ticks as a percentage of all ticks that did work.
    pub fn failure_rate(&self) -> f64 {
        let total = self.frames_sampled + self.frames_failed;
        if total == 0 {
            return 0.0;
        }
        self.frames_failed as f64 / total as f64 * 100.0
    }
}

/// Drives sampling at the presentation cadence while a session records.
///
/// The loop holds at most one sample in flight: each tick awaits its
/// rasterization before the next is considered, and ticks missed while
/// a slow sample runs are dropped rather than queued. A failed sample is
/// logged and skipped; the next tick tries again.
pub struct FrameClock {
    rate_hz: u32,
    element: Arc<dyn SceneElement>,
    sampler: SnapshotSampler,
    surface: Arc<Mutex<CaptureSurface>>,
    encoder: Arc<Mutex<Box<dyn StreamEncoder>>>,
    clock: SessionClock,
    active: Arc<AtomicBool>,
}

impl FrameClock {
    pub fn new(
        rate_hz: u32,
        element: Arc<dyn SceneElement>,
        sampler: SnapshotSampler,
        surface: Arc<Mutex<CaptureSurface>>,
        encoder: Arc<Mutex<Box<dyn StreamEncoder>>>,
        clock: SessionClock,
    ) -> Self {
        Self {
            rate_hz,
            element,
            sampler,
            surface,
            encoder,
            clock,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Flag the session clears to stop the loop.
    pub fn active_flag(&self) -> Arc<AtomicBool> {
        self.active.clone()
    }

    /// Run until the active flag clears. Returns the tick counters.
    pub async fn run(self) -> ClockStats {
        // Controller periods are nanosecond-precision and never zero.
        let mut interval = tokio::time::interval(RateController::new(self.rate_hz).interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut stats = ClockStats::default();
        let mut sequence: u64 = 0;

        tracing::debug!(rate_hz = self.rate_hz, "Frame clock started");
        loop {
            interval.tick().await;
            if !self.active.load(Ordering::SeqCst) {
                break;
            }

            let snapshot = match self.sampler.sample(self.element.as_ref()).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    stats.frames_failed += 1;
                    tracing::warn!(error = %e, sequence, "Frame sample failed; skipping tick");
                    continue;
                }
            };

            let frame = {
                let mut surface = self.surface.lock().await;
                surface.draw(&snapshot);
                Frame::new(sequence, self.clock.elapsed_ms(), surface.contents().clone())
            };
            sequence += 1;

            let mut encoder = self.encoder.lock().await;
            match encoder.push_frame(&frame) {
                Ok(()) => stats.frames_sampled += 1,
                Err(e) => {
                    stats.frames_failed += 1;
                    tracing::warn!(error = %e, sequence, "Encoder rejected frame");
                }
            }
        }

        tracing::debug!(
            frames_sampled = stats.frames_sampled,
            frames_failed = stats.frames_failed,
            "Frame clock stopped"
        );
        stats
    }
}

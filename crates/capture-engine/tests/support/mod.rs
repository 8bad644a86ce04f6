//! Test doubles for driving capture sessions without real codecs.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use codereel_capture_engine::{
    AnimationEncoder, EncoderEvent, EncoderFactory, RasterRequest, SceneElement, StreamEncoder,
    StreamFormat,
};
use codereel_common::{CodereelError, CodereelResult};
use codereel_media_model::{Bitmap, EncodedChunk, Frame, MediaArtifact, MediaType, Rect};
use tokio::sync::mpsc;

/// What every fake encoder instance reports back to the test.
#[derive(Default)]
pub struct EncoderLog {
    pub started: AtomicUsize,
    pub frames: AtomicUsize,
    pub data_requests: AtomicUsize,
    pub stops: AtomicUsize,
    pub formats: Mutex<Vec<StreamFormat>>,
}

/// Scripted behavior for [`FakeEncoder`].
#[derive(Clone, Default)]
pub struct FakeScript {
    /// Deliver one extra Data event after the stop confirmation, as a
    /// straggler the session must still incorporate.
    pub straggler_after_stop: Option<Vec<u8>>,

    /// Emit an Error event once this many frames have been pushed.
    pub fail_after_frames: Option<usize>,
}

/// A [`StreamEncoder`] that emits one single-byte chunk per pushed
/// frame, carrying the frame's sequence number so tests can check
/// arrival order end to end.
pub struct FakeEncoder {
    log: Arc<EncoderLog>,
    script: FakeScript,
    event_tx: Option<mpsc::UnboundedSender<EncoderEvent>>,
    failed: bool,
}

impl StreamEncoder for FakeEncoder {
    fn start(
        &mut self,
        format: &StreamFormat,
    ) -> CodereelResult<mpsc::UnboundedReceiver<EncoderEvent>> {
        self.log.started.fetch_add(1, Ordering::SeqCst);
        self.log.formats.lock().unwrap().push(*format);
        let (tx, rx) = mpsc::unbounded_channel();
        self.event_tx = Some(tx);
        Ok(rx)
    }

    fn push_frame(&mut self, frame: &Frame) -> CodereelResult<()> {
        let Some(tx) = &self.event_tx else {
            return Err(CodereelError::encoder("fake encoder not started"));
        };
        if self.failed {
            return Ok(());
        }

        let pushed = self.log.frames.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(limit) = self.script.fail_after_frames {
            if pushed > limit {
                self.failed = true;
                let _ = tx.send(EncoderEvent::Error("synthetic encoder failure".to_string()));
                return Ok(());
            }
        }

        let _ = tx.send(EncoderEvent::Data(EncodedChunk::new(vec![
            frame.sequence as u8,
        ])));
        Ok(())
    }

    fn request_data(&mut self) -> CodereelResult<()> {
        self.log.data_requests.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> CodereelResult<()> {
        self.log.stops.fetch_add(1, Ordering::SeqCst);
        if let Some(tx) = self.event_tx.take() {
            if !self.failed {
                let _ = tx.send(EncoderEvent::Stopped);
                if let Some(bytes) = self.script.straggler_after_stop.clone() {
                    let _ = tx.send(EncoderEvent::Data(EncodedChunk::new(bytes)));
                }
            }
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.event_tx.is_some()
    }
}

/// Build an encoder factory whose instances all report into one log.
pub fn fake_encoder_factory(script: FakeScript) -> (EncoderFactory, Arc<EncoderLog>) {
    let log = Arc::new(EncoderLog::default());
    let factory_log = log.clone();
    let factory: EncoderFactory = Box::new(move || {
        Box::new(FakeEncoder {
            log: factory_log.clone(),
            script: script.clone(),
            event_tx: None,
            failed: false,
        })
    });
    (factory, log)
}

/// A mounted element that rasterizes to a solid color.
pub struct StaticScene {
    pub rect: Rect,
    pub mounted: AtomicBool,
    pub rasters: AtomicUsize,
    color: [u8; 4],
}

impl StaticScene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            rect: Rect::sized(width, height),
            mounted: AtomicBool::new(true),
            rasters: AtomicUsize::new(0),
            color: [40, 42, 54, 255],
        }
    }
}

#[async_trait::async_trait]
impl SceneElement for StaticScene {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    async fn rasterize(&self, request: &RasterRequest) -> CodereelResult<Bitmap> {
        self.rasters.fetch_add(1, Ordering::SeqCst);
        let mut bitmap = Bitmap::new(request.width, request.height);
        bitmap.fill(self.color);
        Ok(bitmap)
    }
}

/// A scene whose raster backend dies outright, taking the sampling task
/// down with it.
pub struct PanickingScene {
    rect: Rect,
}

impl PanickingScene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            rect: Rect::sized(width, height),
        }
    }
}

#[async_trait::async_trait]
impl SceneElement for PanickingScene {
    fn is_mounted(&self) -> bool {
        true
    }

    fn bounding_rect(&self) -> Rect {
        self.rect
    }

    async fn rasterize(&self, _request: &RasterRequest) -> CodereelResult<Bitmap> {
        panic!("raster backend lost");
    }
}

/// A scene whose first rasterizations fail before it recovers.
pub struct FlakyScene {
    pub inner: StaticScene,
    failures_left: AtomicUsize,
}

impl FlakyScene {
    pub fn new(width: f64, height: f64, failures: usize) -> Self {
        Self {
            inner: StaticScene::new(width, height),
            failures_left: AtomicUsize::new(failures),
        }
    }

    pub fn failures_remaining(&self) -> usize {
        self.failures_left.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SceneElement for FlakyScene {
    fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    fn bounding_rect(&self) -> Rect {
        self.inner.bounding_rect()
    }

    async fn rasterize(&self, request: &RasterRequest) -> CodereelResult<Bitmap> {
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(CodereelError::sample("synthetic raster failure"));
        }
        self.inner.rasterize(request).await
    }
}

/// Records everything a caller submits through the animation seam.
#[derive(Default)]
pub struct AnimationLog {
    pub delays: Mutex<Vec<u32>>,
    pub renders: AtomicUsize,
}

pub struct FakeAnimationEncoder {
    pub log: Arc<AnimationLog>,
}

#[async_trait::async_trait]
impl AnimationEncoder for FakeAnimationEncoder {
    fn submit_frame(&mut self, _bitmap: Bitmap, delay_ms: u32) -> CodereelResult<()> {
        self.log.delays.lock().unwrap().push(delay_ms);
        Ok(())
    }

    async fn render(&mut self) -> CodereelResult<MediaArtifact> {
        self.log.renders.fetch_add(1, Ordering::SeqCst);
        let frames = self.log.delays.lock().unwrap().len();
        Ok(MediaArtifact::from_bytes(
            MediaType::Gif,
            vec![0x47; frames],
        ))
    }
}

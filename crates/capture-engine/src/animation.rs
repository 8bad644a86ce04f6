//! Still-frame capture into animated images.

use codereel_common::CodereelResult;
use codereel_media_model::{Bitmap, MediaArtifact};

/// The still-frame encoder seam.
///
/// Frames are submitted with explicit display durations, then `render`
/// encodes the whole sequence and resolves exactly once when the encoder
/// signals completion. There is no progressive output.
#[async_trait::async_trait]
pub trait AnimationEncoder: Send {
    /// Queue one frame with the duration it should stay on screen.
    fn submit_frame(&mut self, bitmap: Bitmap, delay_ms: u32) -> CodereelResult<()>;

    /// Encode everything queued into a finished artifact.
    async fn render(&mut self) -> CodereelResult<MediaArtifact>;
}

/// Accumulates frames and produces an animated GIF on demand.
///
/// The recorder does not pace frames; callers decide when to add one and
/// what delay it carries, with no upper bound on either. `generate`
/// must not be called while a previous `generate` is still resolving;
/// exclusive access enforces that here.
pub struct GifRecorder {
    encoder: Box<dyn AnimationEncoder>,
    frames_added: u64,
}

impl GifRecorder {
    pub fn new(encoder: Box<dyn AnimationEncoder>) -> Self {
        Self {
            encoder,
            frames_added: 0,
        }
    }

    /// Frames queued since the last render.
    pub fn frame_count(&self) -> u64 {
        self.frames_added
    }

    /// Append a frame that displays for `delay_ms`.
    pub fn add_frame(&mut self, bitmap: Bitmap, delay_ms: u32) -> CodereelResult<()> {
        self.encoder.submit_frame(bitmap, delay_ms)?;
        self.frames_added += 1;
        Ok(())
    }

    /// Render the queued frames into the finished artifact.
    ///
    /// A completed render drains the queue, so the frame counter starts
    /// over for the next sequence.
    pub async fn generate(&mut self) -> CodereelResult<MediaArtifact> {
        tracing::info!(frames = self.frames_added, "Rendering still-frame capture");
        let artifact = self.encoder.render().await?;
        self.frames_added = 0;
        tracing::info!(bytes = artifact.len(), "Still-frame capture rendered");
        Ok(artifact)
    }
}

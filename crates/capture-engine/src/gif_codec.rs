//! Animated GIF encoding on the `gif` codec crate.

use codereel_common::{CodereelError, CodereelResult};
use codereel_media_model::{Bitmap, MediaArtifact, MediaType};
use serde::{Deserialize, Serialize};

use crate::animation::AnimationEncoder;

/// Fixed parameters of the GIF codec deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GifEncoderConfig {
    /// Quantization worker threads used during render.
    pub workers: usize,

    /// Quantization speed/quality trade-off, 1 (best) to 30 (fastest).
    pub quality: u16,
}

impl Default for GifEncoderConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            quality: 10,
        }
    }
}

struct QueuedFrame {
    bitmap: Bitmap,
    delay_ms: u32,
}

/// [`AnimationEncoder`] adapter over the `gif` crate.
///
/// Frames are queued as RGBA bitmaps; `render` quantizes them on worker
/// threads (every frame gets its own local palette) and writes the file
/// sequentially, off the async runtime. All frames must share the
/// dimensions of the first.
pub struct GifCodecEncoder {
    config: GifEncoderConfig,
    frames: Vec<QueuedFrame>,
    dimensions: Option<(u16, u16)>,
}

impl GifCodecEncoder {
    pub fn new(config: GifEncoderConfig) -> Self {
        Self {
            config,
            frames: Vec::new(),
            dimensions: None,
        }
    }
}

impl Default for GifCodecEncoder {
    fn default() -> Self {
        Self::new(GifEncoderConfig::default())
    }
}

#[async_trait::async_trait]
impl AnimationEncoder for GifCodecEncoder {
    fn submit_frame(&mut self, bitmap: Bitmap, delay_ms: u32) -> CodereelResult<()> {
        let width = u16::try_from(bitmap.width())
            .map_err(|_| CodereelError::encoder(format!("frame width {} exceeds the GIF limit", bitmap.width())))?;
        let height = u16::try_from(bitmap.height())
            .map_err(|_| CodereelError::encoder(format!("frame height {} exceeds the GIF limit", bitmap.height())))?;

        match self.dimensions {
            None => self.dimensions = Some((width, height)),
            Some(expected) if expected != (width, height) => {
                return Err(CodereelError::encoder(format!(
                    "frame is {width}x{height}, animation is {}x{}",
                    expected.0, expected.1
                )));
            }
            Some(_) => {}
        }

        self.frames.push(QueuedFrame { bitmap, delay_ms });
        Ok(())
    }

    /// Encode and drain the queued frames.
    async fn render(&mut self) -> CodereelResult<MediaArtifact> {
        let frames = std::mem::take(&mut self.frames);
        let Some((width, height)) = self.dimensions.take() else {
            return Ok(MediaArtifact::empty(MediaType::Gif));
        };
        if frames.is_empty() {
            return Ok(MediaArtifact::empty(MediaType::Gif));
        }

        let workers = self.config.workers;
        let speed = i32::from(self.config.quality.clamp(1, 30));

        // The codec runs to completion on blocking threads and signals
        // back through a oneshot when the file is finished.
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        tokio::task::spawn_blocking(move || {
            let result = encode_frames(frames, width, height, workers, speed);
            let _ = done_tx.send(result);
        });

        let bytes = done_rx
            .await
            .map_err(|_| CodereelError::encoder("gif worker exited before signalling completion"))??;
        Ok(MediaArtifact::from_bytes(MediaType::Gif, bytes))
    }
}

fn encode_frames(
    frames: Vec<QueuedFrame>,
    width: u16,
    height: u16,
    workers: usize,
    speed: i32,
) -> CodereelResult<Vec<u8>> {
    let worker_count = workers.max(1).min(frames.len().max(1));

    let mut quantized: Vec<Option<gif::Frame<'static>>> = Vec::new();
    quantized.resize_with(frames.len(), || None);

    std::thread::scope(|scope| -> CodereelResult<()> {
        let frames = &frames;
        let mut handles = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            handles.push(scope.spawn(move || {
                let mut out = Vec::new();
                for (idx, frame) in frames
                    .iter()
                    .enumerate()
                    .filter(|(idx, _)| idx % worker_count == worker)
                {
                    let mut rgba = frame.bitmap.as_rgba().to_vec();
                    let mut encoded = gif::Frame::from_rgba_speed(width, height, &mut rgba, speed);
                    encoded.delay = (frame.delay_ms / 10).min(u32::from(u16::MAX)) as u16;
                    out.push((idx, encoded));
                }
                out
            }));
        }
        for handle in handles {
            let batch = handle
                .join()
                .map_err(|_| CodereelError::encoder("gif quantization worker panicked"))?;
            for (idx, frame) in batch {
                quantized[idx] = Some(frame);
            }
        }
        Ok(())
    })?;

    let mut bytes = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut bytes, width, height, &[])
            .map_err(|e| CodereelError::encoder(format!("gif header write failed: {e}")))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| CodereelError::encoder(format!("gif repeat block write failed: {e}")))?;
        for frame in quantized.into_iter().flatten() {
            encoder
                .write_frame(&frame)
                .map_err(|e| CodereelError::encoder(format!("gif frame write failed: {e}")))?;
        }
        // Dropping the encoder writes the trailer.
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Bitmap {
        let mut bitmap = Bitmap::new(width, height);
        bitmap.fill(rgba);
        bitmap
    }

    #[test]
    fn test_submit_rejects_mismatched_dimensions() {
        let mut encoder = GifCodecEncoder::default();
        encoder.submit_frame(solid(4, 4, [255, 0, 0, 255]), 100).unwrap();
        let err = encoder
            .submit_frame(solid(8, 4, [0, 255, 0, 255]), 100)
            .unwrap_err();
        assert!(err.to_string().contains("8x4"));
    }

    #[test]
    fn test_encode_frames_writes_a_gif_file() {
        let frames = vec![
            QueuedFrame {
                bitmap: solid(4, 4, [255, 0, 0, 255]),
                delay_ms: 100,
            },
            QueuedFrame {
                bitmap: solid(4, 4, [0, 0, 255, 255]),
                delay_ms: 150,
            },
            QueuedFrame {
                bitmap: solid(4, 4, [0, 255, 0, 255]),
                delay_ms: 200,
            },
        ];
        let bytes = encode_frames(frames, 4, 4, 2, 10).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(bytes.last(), Some(&0x3B));
    }

    #[tokio::test]
    async fn test_render_with_no_frames_yields_empty_typed_artifact() {
        let mut encoder = GifCodecEncoder::default();
        let artifact = encoder.render().await.unwrap();
        assert!(artifact.is_empty());
        assert_eq!(artifact.media_type(), MediaType::Gif);
    }

    #[tokio::test]
    async fn test_render_produces_playable_artifact() {
        let mut encoder = GifCodecEncoder::default();
        for delay in [100, 150, 200] {
            encoder
                .submit_frame(solid(6, 4, [10, 20, 30, 255]), delay)
                .unwrap();
        }
        let artifact = encoder.render().await.unwrap();
        assert_eq!(artifact.media_type(), MediaType::Gif);
        assert!(artifact.bytes().starts_with(b"GIF89a"));
    }
}

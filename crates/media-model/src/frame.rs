//! Timestamped frames flowing from the sampler into encoders.

use crate::bitmap::Bitmap;

/// One captured frame: a bitmap plus where it sits on the session timeline.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Monotonic index assigned by the sampler, starting at zero.
    pub sequence: u64,
    /// Milliseconds since the capture session started.
    pub timestamp_ms: u64,
    pub bitmap: Bitmap,
}

impl Frame {
    pub fn new(sequence: u64, timestamp_ms: u64, bitmap: Bitmap) -> Self {
        Self {
            sequence,
            timestamp_ms,
            bitmap,
        }
    }

    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

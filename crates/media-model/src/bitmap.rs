//! RGBA bitmaps sampled from scene elements.

/// Bytes per pixel for the RGBA8 layout all bitmaps use.
pub const BYTES_PER_PIXEL: usize = 4;

/// Raised when raw pixel data does not match the declared dimensions.
#[derive(Debug, thiserror::Error)]
#[error("bitmap data length {actual} does not match {width}x{height} RGBA ({expected} bytes)")]
pub struct BitmapSizeMismatch {
    pub width: u32,
    pub height: u32,
    pub expected: usize,
    pub actual: usize,
}

/// An RGBA8 raster, row-major, tightly packed.
///
/// Immutable once handed to a pipeline; mutation happens only on the
/// capture surface that owns its own bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Allocate a transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    /// Wrap existing RGBA8 pixel data.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, BitmapSizeMismatch> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(BitmapSizeMismatch {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the bitmap has no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_rgba(&self) -> &[u8] {
        &self.data
    }

    /// Consume into raw RGBA8 bytes.
    pub fn into_rgba(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at (x, y). Caller guarantees in-bounds coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Flood the whole bitmap with one color.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Fill an axis-aligned rectangle, clamped to the bitmap bounds.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, rgba: [u8; 4]) {
        if self.is_empty() || w == 0 || h == 0 {
            return;
        }
        let x0 = x.clamp(0, self.width as i64) as usize;
        let y0 = y.clamp(0, self.height as i64) as usize;
        let x1 = (x.saturating_add(w as i64)).clamp(0, self.width as i64) as usize;
        let y1 = (y.saturating_add(h as i64)).clamp(0, self.height as i64) as usize;
        for row in y0..y1 {
            let start = (row * self.width as usize + x0) * BYTES_PER_PIXEL;
            let end = (row * self.width as usize + x1) * BYTES_PER_PIXEL;
            for px in self.data[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Draw `src` over the full extent of this bitmap, scaling with
    /// nearest-neighbor sampling. Equal dimensions take a straight copy.
    ///
    /// This is how a logical-sized snapshot lands on a physical-sized
    /// surface: the source keeps its own dimensions and only the
    /// destination stretches.
    pub fn blit_scaled(&mut self, src: &Bitmap) {
        if self.is_empty() || src.is_empty() {
            return;
        }
        if self.width == src.width && self.height == src.height {
            self.data.copy_from_slice(&src.data);
            return;
        }

        let dw = self.width as usize;
        let dh = self.height as usize;
        let sw = src.width as usize;
        let sh = src.height as usize;
        for dy in 0..dh {
            let sy = dy * sh / dh;
            let src_row = sy * sw;
            let dst_row = dy * dw;
            for dx in 0..dw {
                let sx = dx * sw / dw;
                let s = (src_row + sx) * BYTES_PER_PIXEL;
                let d = (dst_row + dx) * BYTES_PER_PIXEL;
                self.data[d..d + BYTES_PER_PIXEL].copy_from_slice(&src.data[s..s + BYTES_PER_PIXEL]);
            }
        }
    }
}

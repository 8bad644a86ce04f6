//! The off-screen surface a session draws sampled frames onto.

use codereel_common::{CodereelError, CodereelResult};
use codereel_media_model::{Bitmap, Rect};

/// Largest physical edge a surface may have.
pub const MAX_SURFACE_DIM: u32 = 16_384;

/// An off-screen raster target sized for one capture session.
///
/// The surface is allocated at physical resolution (logical rect times
/// device scale) while callers keep drawing logical-sized snapshots;
/// the scale is applied on every draw. One surface per session, never
/// shared.
#[derive(Debug)]
pub struct CaptureSurface {
    rect: Rect,
    scale: f64,
    bitmap: Bitmap,
    attached: bool,
}

impl CaptureSurface {
    /// Allocate a surface for the given logical rect and device scale.
    pub fn acquire(rect: Rect, scale: f64) -> CodereelResult<Self> {
        if rect.is_empty() {
            return Err(CodereelError::surface(format!(
                "element layout has no drawable area ({}x{})",
                rect.width, rect.height
            )));
        }
        let (width, height) = rect.physical_size(scale);
        if width == 0 || height == 0 {
            return Err(CodereelError::surface(format!(
                "surface collapsed to {width}x{height} at scale {scale}"
            )));
        }
        if width > MAX_SURFACE_DIM || height > MAX_SURFACE_DIM {
            return Err(CodereelError::surface(format!(
                "surface {width}x{height} exceeds the {MAX_SURFACE_DIM} pixel limit"
            )));
        }

        tracing::debug!(width, height, scale, "Capture surface acquired");
        Ok(Self {
            rect,
            scale,
            bitmap: Bitmap::new(width, height),
            attached: true,
        })
    }

    /// Logical dimensions snapshots are expected to arrive in.
    pub fn logical_size(&self) -> (u32, u32) {
        self.rect.logical_size()
    }

    /// Physical pixel dimensions of the backing raster.
    pub fn physical_size(&self) -> (u32, u32) {
        (self.bitmap.width(), self.bitmap.height())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Draw a logical-sized snapshot over the full surface.
    ///
    /// The snapshot keeps its own dimensions; only the surface raster is
    /// at physical scale. Ignored once detached.
    pub fn draw(&mut self, snapshot: &Bitmap) {
        if !self.attached {
            return;
        }
        self.bitmap.blit_scaled(snapshot);
    }

    /// Reset the surface to transparent.
    pub fn clear(&mut self) {
        self.bitmap.clear();
    }

    /// Current surface contents at physical resolution.
    pub fn contents(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Release the surface. Safe to call repeatedly.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.bitmap.clear();
        tracing::debug!("Capture surface detached");
    }
}

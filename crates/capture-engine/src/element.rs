//! The element seam between the capture engine and its host.
//!
//! The engine never knows what it is recording. Hosts hand it something
//! that can report layout and rasterize itself; everything downstream
//! (clock, surface, encoders) works on the bitmaps that come back.

use codereel_common::CodereelResult;
use codereel_media_model::{Bitmap, Rect};

/// Options for one rasterization pass over a scene element.
#[derive(Debug, Clone)]
pub struct RasterRequest {
    /// Target width in logical units. Always the element's own layout
    /// width; device scaling happens at the surface, not here.
    pub width: u32,

    /// Target height in logical units.
    pub height: u32,

    /// Fill behind the element. `None` leaves the backdrop transparent.
    pub background: Option<[u8; 4]>,

    /// Permit subresources served from foreign origins.
    pub allow_cross_origin: bool,

    /// Permit content that would mark the raster as tainted.
    pub allow_tainted: bool,
}

impl RasterRequest {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: None,
            allow_cross_origin: false,
            allow_tainted: false,
        }
    }
}

/// A live visual element a host exposes for capture.
///
/// Implementations must be cheap to query: `is_mounted` and
/// `bounding_rect` run on every clock tick. `rasterize` is the slow path
/// and is awaited by the sampler, one call in flight at a time.
#[async_trait::async_trait]
pub trait SceneElement: Send + Sync {
    /// Whether the element is still attached to a live scene.
    fn is_mounted(&self) -> bool;

    /// Current layout rectangle in logical units.
    fn bounding_rect(&self) -> Rect;

    /// Produce a bitmap of the element at this instant.
    ///
    /// Must not mutate the scene; the animation advancing the element
    /// runs independently of capture. The returned bitmap must match the
    /// requested dimensions exactly.
    async fn rasterize(&self, request: &RasterRequest) -> CodereelResult<Bitmap>;
}

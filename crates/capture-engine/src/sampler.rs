//! Snapshot sampling of live scene elements.

use codereel_common::{CodereelError, CodereelResult};
use codereel_media_model::Bitmap;
use serde::{Deserialize, Serialize};

use crate::element::{RasterRequest, SceneElement};

/// How the sampler asks elements to rasterize themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerOptions {
    /// Backdrop fill. `None` keeps the raster transparent.
    pub background: Option<[u8; 4]>,

    pub allow_cross_origin: bool,

    pub allow_tainted: bool,
}

impl Default for SamplerOptions {
    /// Recording posture: transparent backdrop, foreign subresources
    /// permitted so embedded assets do not abort a session.
    fn default() -> Self {
        Self {
            background: None,
            allow_cross_origin: true,
            allow_tainted: true,
        }
    }
}

/// Rasterizes one frame of a scene element.
///
/// Sampling is a pure read of the scene. Every snapshot is taken at the
/// element's own logical dimensions; a fixed-rate clock calling this
/// repeatedly therefore produces frames of identical size no matter what
/// the device scale is. Scaling to physical pixels is the surface's job.
#[derive(Debug, Default)]
pub struct SnapshotSampler {
    options: SamplerOptions,
}

impl SnapshotSampler {
    pub fn new(options: SamplerOptions) -> Self {
        Self { options }
    }

    /// Capture the element as it looks right now.
    pub async fn sample(&self, element: &dyn SceneElement) -> CodereelResult<Bitmap> {
        if !element.is_mounted() {
            return Err(CodereelError::sample("element is no longer mounted"));
        }

        let rect = element.bounding_rect();
        if rect.is_empty() {
            return Err(CodereelError::sample(format!(
                "element layout has no area ({}x{})",
                rect.width, rect.height
            )));
        }

        let (width, height) = rect.logical_size();
        if width == 0 || height == 0 {
            return Err(CodereelError::sample(format!(
                "element layout rounds to {width}x{height} pixels"
            )));
        }

        let request = RasterRequest {
            width,
            height,
            background: self.options.background,
            allow_cross_origin: self.options.allow_cross_origin,
            allow_tainted: self.options.allow_tainted,
        };

        let bitmap = element.rasterize(&request).await?;

        if bitmap.width() != width || bitmap.height() != height {
            return Err(CodereelError::sample(format!(
                "element produced {}x{} for a {width}x{height} request",
                bitmap.width(),
                bitmap.height()
            )));
        }

        Ok(bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codereel_media_model::Rect;

    struct SolidElement {
        mounted: bool,
        rect: Rect,
        observe_width: Option<u32>,
    }

    #[async_trait::async_trait]
    impl SceneElement for SolidElement {
        fn is_mounted(&self) -> bool {
            self.mounted
        }

        fn bounding_rect(&self) -> Rect {
            self.rect
        }

        async fn rasterize(&self, request: &RasterRequest) -> CodereelResult<Bitmap> {
            let width = self.observe_width.unwrap_or(request.width);
            let mut bitmap = Bitmap::new(width, request.height);
            bitmap.fill([200, 100, 50, 255]);
            Ok(bitmap)
        }
    }

    #[tokio::test]
    async fn test_sample_captures_at_logical_dimensions() {
        let element = SolidElement {
            mounted: true,
            rect: Rect::sized(320.0, 180.0),
            observe_width: None,
        };
        let sampler = SnapshotSampler::default();
        let bitmap = sampler.sample(&element).await.unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (320, 180));
        assert_eq!(bitmap.pixel(0, 0), [200, 100, 50, 255]);
    }

    #[tokio::test]
    async fn test_sample_rejects_unmounted_element() {
        let element = SolidElement {
            mounted: false,
            rect: Rect::sized(320.0, 180.0),
            observe_width: None,
        };
        let err = SnapshotSampler::default().sample(&element).await.unwrap_err();
        assert!(err.is_frame_skippable());
        assert!(err.to_string().contains("mounted"));
    }

    #[tokio::test]
    async fn test_sample_rejects_zero_area_layout() {
        let element = SolidElement {
            mounted: true,
            rect: Rect::sized(320.0, 0.0),
            observe_width: None,
        };
        let err = SnapshotSampler::default().sample(&element).await.unwrap_err();
        assert!(err.is_frame_skippable());
    }

    #[tokio::test]
    async fn test_sample_rejects_dimension_mismatch() {
        let element = SolidElement {
            mounted: true,
            rect: Rect::sized(320.0, 180.0),
            observe_width: Some(100),
        };
        let err = SnapshotSampler::default().sample(&element).await.unwrap_err();
        assert!(err.to_string().contains("100x180"));
    }
}

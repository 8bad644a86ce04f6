//! Data model for captured media.
//!
//! Everything a capture pipeline passes between its stages lives here:
//! logical rectangles and their physical sizes, RGBA bitmaps, timestamped
//! frames, and the encoded chunks that become a finalized artifact. The
//! types carry no I/O so every downstream crate can depend on them without
//! pulling in an encoder or a runtime.

pub mod artifact;
pub mod bitmap;
pub mod frame;
pub mod geometry;

pub use artifact::{EncodedChunk, MediaArtifact, MediaType, GIF_MIME, WEBM_VP9_MIME};
pub use bitmap::Bitmap;
pub use frame::Frame;
pub use geometry::Rect;

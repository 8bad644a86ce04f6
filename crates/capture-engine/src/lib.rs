//! Codereel Capture Engine
//!
//! Samples a live scene element at a fixed presentation cadence and
//! encodes the frames into a WebM video or an animated GIF. The engine
//! owns the clock, the capture surface, and the encoder sessions; what
//! gets recorded is whatever element the host hands over.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                ScreenRecorder                    │
//! │  ┌───────────┐  ┌──────────┐  ┌──────────────┐  │
//! │  │ FrameClock│─▶│ Snapshot │─▶│  Capture     │  │
//! │  │  (60 Hz)  │  │ Sampler  │  │  Surface     │  │
//! │  └───────────┘  └──────────┘  └──────┬───────┘  │
//! │                                      │ frames    │
//! │                                      ▼           │
//! │  ┌────────────────────────────────────────────┐  │
//! │  │ StreamEncoder (ffmpeg / VP9-WebM)          │  │
//! │  │   Data, Data, ..., Stopped  ──▶ artifact   │  │
//! │  └────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────┘
//!
//!        GifRecorder ──▶ AnimationEncoder (gif codec)
//! ```

pub mod animation;
pub mod element;
pub mod encoder;
pub mod environment;
pub mod ffmpeg;
pub mod frame_clock;
pub mod gif_codec;
pub mod recorder;
pub mod sampler;
pub mod surface;

pub use animation::{AnimationEncoder, GifRecorder};
pub use element::{RasterRequest, SceneElement};
pub use encoder::{EncoderEvent, StreamEncoder, StreamFormat};
pub use environment::HostEnvironment;
pub use ffmpeg::{ffmpeg_available, FfmpegVp9Encoder};
pub use gif_codec::{GifCodecEncoder, GifEncoderConfig};
pub use recorder::{EncoderFactory, RecorderConfig, RecorderState, ScreenRecorder};
pub use sampler::{SamplerOptions, SnapshotSampler};
pub use surface::CaptureSurface;

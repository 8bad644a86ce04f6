//! The streaming encoder seam.
//!
//! A video session drives an encoder through this trait. Real encoders
//! are out-of-process or otherwise asynchronous, so all output comes
//! back on an event channel rather than from method returns.

use codereel_common::CodereelResult;
use codereel_media_model::{EncodedChunk, Frame};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Parameters for one streaming encode session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StreamFormat {
    /// Frame width in physical pixels.
    pub width: u32,

    /// Frame height in physical pixels.
    pub height: u32,

    /// Presentation rate frames are pushed at.
    pub frame_rate: u32,

    /// Target bitrate in bits per second.
    pub bitrate_bps: u32,

    /// How often buffered output is flushed as `Data` events.
    pub flush_interval_ms: u64,
}

/// Events an encoder session delivers while running and shutting down.
///
/// Delivery order between kinds is not guaranteed: a final `Data` event
/// may be observed around, even after, `Stopped`. Consumers must keep
/// draining until the channel itself closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    /// A run of encoded bytes became available.
    Data(EncodedChunk),

    /// The encoder finalized its container. The channel closing without
    /// this event also means no more bytes will ever arrive.
    Stopped,

    /// The encoder failed and cannot continue.
    Error(String),
}

/// A streaming encoder session.
///
/// Lifecycle: `start` opens the session and hands back the event
/// receiver; frames flow in through `push_frame`; `request_data` asks
/// for an early flush; `stop` finalizes, after which the encoder emits
/// its remaining `Data` events and a `Stopped`.
pub trait StreamEncoder: Send {
    /// Open the session. Returns the channel output events arrive on.
    fn start(&mut self, format: &StreamFormat)
        -> CodereelResult<mpsc::UnboundedReceiver<EncoderEvent>>;

    /// Submit one frame. Encoders under backpressure may drop frames;
    /// they must never block the caller.
    fn push_frame(&mut self, frame: &Frame) -> CodereelResult<()>;

    /// Request that buffered output be flushed as `Data` events.
    fn request_data(&mut self) -> CodereelResult<()>;

    /// Finalize the session.
    fn stop(&mut self) -> CodereelResult<()>;

    /// Whether the session is currently accepting frames.
    fn is_running(&self) -> bool;
}

//! Streaming VP9/WebM encoder backed by an ffmpeg subprocess.
//!
//! Raw RGBA frames are piped into ffmpeg's stdin and the muxed WebM
//! stream is read back from its stdout, so encoding runs fully
//! out-of-process. A bounded feed queue between the session and the
//! writer thread drops frames under backpressure instead of stalling
//! the clock.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, SyncSender, TrySendError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use codereel_common::{CodereelError, CodereelResult};
use codereel_media_model::{EncodedChunk, Frame};
use tokio::sync::mpsc;

use crate::encoder::{EncoderEvent, StreamEncoder, StreamFormat};

/// Frames buffered between the clock and the writer thread before the
/// queue starts dropping.
const FRAME_QUEUE_DEPTH: usize = 8;

const STDOUT_READ_BUF: usize = 32 * 1024;

/// Whether the ffmpeg binary is reachable.
pub fn ffmpeg_available() -> bool {
    command_exists("ffmpeg")
}

/// A [`StreamEncoder`] that shells out to ffmpeg (`libvpx-vp9`, WebM).
pub struct FfmpegVp9Encoder {
    frame_tx: Option<SyncSender<Vec<u8>>>,
    running: Arc<AtomicBool>,
    flush_now: Arc<AtomicBool>,
    frame_len: usize,
}

impl FfmpegVp9Encoder {
    pub fn new() -> Self {
        Self {
            frame_tx: None,
            running: Arc::new(AtomicBool::new(false)),
            flush_now: Arc::new(AtomicBool::new(false)),
            frame_len: 0,
        }
    }
}

impl Default for FfmpegVp9Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamEncoder for FfmpegVp9Encoder {
    fn start(
        &mut self,
        format: &StreamFormat,
    ) -> CodereelResult<mpsc::UnboundedReceiver<EncoderEvent>> {
        if self.frame_tx.is_some() {
            return Err(CodereelError::encoder("encoder session already started"));
        }
        if !ffmpeg_available() {
            return Err(CodereelError::encoder(
                "ffmpeg not found in PATH (required for WebM encoding)",
            ));
        }

        let args = build_args(format);
        tracing::debug!(?args, "Starting ffmpeg encoder");

        let mut child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CodereelError::encoder(format!("failed to start ffmpeg: {e}")))?;

        tracing::info!(
            pid = child.id(),
            width = format.width,
            height = format.height,
            bitrate_bps = format.bitrate_bps,
            "ffmpeg encoder started"
        );

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CodereelError::encoder("failed to open ffmpeg stdin"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| CodereelError::encoder("failed to open ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| CodereelError::encoder("failed to open ffmpeg stderr"))?;

        // Drain stderr concurrently so ffmpeg never blocks on a full pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut output = String::new();
            let mut reader = std::io::BufReader::new(stderr);
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let (frame_tx, frame_rx) = sync_channel::<Vec<u8>>(FRAME_QUEUE_DEPTH);
        std::thread::spawn(move || {
            while let Ok(frame) = frame_rx.recv() {
                if let Err(e) = stdin.write_all(&frame) {
                    tracing::warn!(error = %e, "ffmpeg stdin write failed; discarding remaining frames");
                    break;
                }
            }
            // Dropping stdin closes the pipe; ffmpeg sees EOF and finalizes
            // the container.
        });

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let running = self.running.clone();
        let flush_now = self.flush_now.clone();
        let flush_interval = Duration::from_millis(format.flush_interval_ms.max(1));
        std::thread::spawn(move || {
            let mut buf = [0u8; STDOUT_READ_BUF];
            let mut pending: Vec<u8> = Vec::new();
            let mut last_flush = Instant::now();
            loop {
                match stdout.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        pending.extend_from_slice(&buf[..n]);
                        let due = last_flush.elapsed() >= flush_interval
                            || flush_now.swap(false, Ordering::SeqCst);
                        if due && !pending.is_empty() {
                            let chunk = EncodedChunk::new(std::mem::take(&mut pending));
                            let _ = event_tx.send(EncoderEvent::Data(chunk));
                            last_flush = Instant::now();
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "ffmpeg stdout read failed");
                        break;
                    }
                }
            }

            if !pending.is_empty() {
                let _ = event_tx.send(EncoderEvent::Data(EncodedChunk::new(pending)));
            }

            let status = child.wait();
            let stderr_output = stderr_task
                .join()
                .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());
            running.store(false, Ordering::SeqCst);

            match status {
                Ok(status) if status.success() => {
                    tracing::debug!("ffmpeg encoder finalized");
                    let _ = event_tx.send(EncoderEvent::Stopped);
                }
                Ok(status) => {
                    let _ = event_tx.send(EncoderEvent::Error(format!(
                        "ffmpeg exited with status {}: {}",
                        status,
                        stderr_output.trim()
                    )));
                }
                Err(e) => {
                    let _ = event_tx.send(EncoderEvent::Error(format!(
                        "failed to wait on ffmpeg: {e}"
                    )));
                }
            }
        });

        self.frame_len = format.width as usize * format.height as usize * 4;
        self.frame_tx = Some(frame_tx);
        self.running.store(true, Ordering::SeqCst);
        Ok(event_rx)
    }

    fn push_frame(&mut self, frame: &Frame) -> CodereelResult<()> {
        let Some(tx) = &self.frame_tx else {
            return Err(CodereelError::encoder("encoder session not running"));
        };

        let rgba = frame.bitmap.as_rgba();
        if rgba.len() != self.frame_len {
            return Err(CodereelError::encoder(format!(
                "frame is {} bytes, session expects {}",
                rgba.len(),
                self.frame_len
            )));
        }

        match tx.try_send(rgba.to_vec()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                // Leaky feed: drop the frame rather than stall the clock.
                tracing::warn!(sequence = frame.sequence, "Encoder feed full; dropping frame");
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => {
                Err(CodereelError::encoder("encoder input closed"))
            }
        }
    }

    fn request_data(&mut self) -> CodereelResult<()> {
        if self.frame_tx.is_none() {
            return Err(CodereelError::encoder("encoder session not running"));
        }
        self.flush_now.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) -> CodereelResult<()> {
        // Dropping the feed sender closes stdin downstream; remaining
        // output arrives as Data events followed by Stopped.
        self.frame_tx = None;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn build_args(format: &StreamFormat) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgba".to_string(),
        "-s".to_string(),
        format!("{}x{}", format.width, format.height),
        "-r".to_string(),
        format.frame_rate.max(1).to_string(),
        "-i".to_string(),
        "-".to_string(),
        "-c:v".to_string(),
        "libvpx-vp9".to_string(),
        "-b:v".to_string(),
        format.bitrate_bps.to_string(),
        // Real-time deadline keeps the encoder ahead of a live 60 Hz feed.
        "-deadline".to_string(),
        "realtime".to_string(),
        "-cpu-used".to_string(),
        "8".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-f".to_string(),
        "webm".to_string(),
        "pipe:1".to_string(),
    ]
}

fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_describe_the_raw_feed_and_vp9_target() {
        let format = StreamFormat {
            width: 1280,
            height: 720,
            frame_rate: 60,
            bitrate_bps: 5_000_000,
            flush_interval_ms: 100,
        };
        let args = build_args(&format);
        let joined = args.join(" ");
        assert!(joined.contains("-f rawvideo"));
        assert!(joined.contains("-pix_fmt rgba"));
        assert!(joined.contains("-s 1280x720"));
        assert!(joined.contains("-r 60"));
        assert!(joined.contains("-c:v libvpx-vp9"));
        assert!(joined.contains("-b:v 5000000"));
        assert!(joined.contains("-f webm pipe:1"));
    }

    #[test]
    fn test_push_frame_requires_a_session() {
        let mut encoder = FfmpegVp9Encoder::new();
        let frame = Frame::new(0, 0, codereel_media_model::Bitmap::new(2, 2));
        let err = encoder.push_frame(&frame).unwrap_err();
        assert!(err.to_string().contains("not running"));
    }
}

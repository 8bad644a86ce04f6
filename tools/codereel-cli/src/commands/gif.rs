//! Render a typing animation to an animated GIF.

use std::path::PathBuf;

use codereel_capture_engine::{
    GifCodecEncoder, GifEncoderConfig, GifRecorder, SamplerOptions, SnapshotSampler,
};
use codereel_common::{RateController, Settings};

use crate::scene::{SceneOptions, TypingScene};

pub async fn run(
    input: PathBuf,
    output: PathBuf,
    fps: u32,
    width: Option<u32>,
    height: Option<u32>,
    typing_speed_ms: Option<u64>,
) -> anyhow::Result<()> {
    // GIF delays are carried in whole milliseconds; the replay loop below
    // advances by one per-frame delay at a time, so it must be non-zero.
    anyhow::ensure!(
        (1..=1_000).contains(&fps),
        "fps must be between 1 and 1000, got {fps}"
    );

    let settings = Settings::load();
    let text = std::fs::read_to_string(&input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;

    let width = width.unwrap_or(settings.recording_width);
    let height = height.unwrap_or(settings.recording_height);
    let typing_speed_ms = typing_speed_ms.unwrap_or(settings.typing_speed_ms).max(1);
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "code.txt".to_string());

    let scene = TypingScene::new(
        width,
        height,
        &text,
        SceneOptions {
            window_title: settings.window_title.clone(),
            file_name,
            hide_file_name: settings.hide_file_name,
            hide_line_numbers: settings.hide_line_numbers,
            font_size: settings.font_size,
        },
    );

    let sampler = SnapshotSampler::new(SamplerOptions::default());
    let mut recorder = GifRecorder::new(Box::new(GifCodecEncoder::new(GifEncoderConfig::default())));

    let rate = RateController::new(fps);
    let frame_delay_ms = rate.interval_ms();
    let total_ms =
        settings.start_delay_ms + typing_speed_ms * scene.char_count() as u64 + settings.end_delay_ms;

    println!("Rendering typing animation: {}", input.display());
    println!("  Output: {}", output.display());
    println!("  Resolution: {width}x{height} @ {fps}fps");
    println!(
        "  Duration: {:.1}s ({} chars at {typing_speed_ms}ms/char)",
        total_ms as f64 / 1_000.0,
        scene.char_count()
    );
    println!();

    // Virtual-time replay: each frame advances the animation by one
    // interval, no wall-clock sleeps involved.
    let mut elapsed_ms: u64 = 0;
    while elapsed_ms <= total_ms {
        let typed = if elapsed_ms <= settings.start_delay_ms {
            0
        } else {
            (((elapsed_ms - settings.start_delay_ms) / typing_speed_ms) as usize)
                .min(scene.char_count())
        };
        scene.set_visible(typed);
        let bitmap = sampler.sample(&scene).await?;
        recorder.add_frame(bitmap, frame_delay_ms as u32)?;
        elapsed_ms += frame_delay_ms;
    }

    let frame_total = recorder.frame_count();
    let artifact = recorder.generate().await?;
    std::fs::write(&output, artifact.bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    println!(
        "GIF saved to: {} ({frame_total} frames, {} bytes)",
        output.display(),
        artifact.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frame_rates_outside_gif_range_are_rejected() {
        for fps in [0, 1_001] {
            let err = run(
                PathBuf::from("missing.txt"),
                PathBuf::from("out.gif"),
                fps,
                None,
                None,
                None,
            )
            .await
            .unwrap_err();
            assert!(err.to_string().contains("fps"));
        }
    }
}

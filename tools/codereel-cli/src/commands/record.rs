//! Record a typing animation to a WebM video.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use codereel_capture_engine::{ffmpeg_available, HostEnvironment, RecorderConfig, ScreenRecorder};
use codereel_common::Settings;

use crate::scene::{SceneOptions, TypingScene};

pub async fn run(
    input: PathBuf,
    output: PathBuf,
    fps: u32,
    width: Option<u32>,
    height: Option<u32>,
    typing_speed_ms: Option<u64>,
) -> anyhow::Result<()> {
    if !ffmpeg_available() {
        anyhow::bail!("ffmpeg not found in PATH; WebM recording needs it installed");
    }

    let settings = Settings::load();
    let text = std::fs::read_to_string(&input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;

    let width = width.unwrap_or(settings.recording_width);
    let height = height.unwrap_or(settings.recording_height);
    let typing_speed_ms = typing_speed_ms.unwrap_or(settings.typing_speed_ms);
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "code.txt".to_string());

    let scene = Arc::new(TypingScene::new(
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
    ));

    println!("Recording typing animation: {}", input.display());
    println!("  Output: {}", output.display());
    println!("  Resolution: {width}x{height} @ {fps}fps");
    println!(
        "  Typing speed: {typing_speed_ms}ms/char ({} chars)",
        scene.char_count()
    );
    println!();

    let config = RecorderConfig {
        frame_rate: fps,
        ..RecorderConfig::default()
    };
    let mut recorder = ScreenRecorder::new(config);
    recorder
        .start(scene.clone(), &HostEnvironment::default())
        .await?;

    tokio::time::sleep(Duration::from_millis(settings.start_delay_ms)).await;
    for shown in 1..=scene.char_count() {
        scene.set_visible(shown);
        tokio::time::sleep(Duration::from_millis(typing_speed_ms)).await;
    }
    tokio::time::sleep(Duration::from_millis(settings.end_delay_ms)).await;

    let artifact = recorder.stop().await?;
    std::fs::write(&output, artifact.bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", output.display()))?;

    println!(
        "Recording saved to: {} ({} bytes)",
        output.display(),
        artifact.len()
    );
    Ok(())
}

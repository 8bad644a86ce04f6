//! Check host capabilities.

use codereel_capture_engine::{ffmpeg_available, HostEnvironment};
use codereel_common::settings_file_path;

pub fn run() -> anyhow::Result<()> {
    println!("Codereel System Check");
    println!("{}", "=".repeat(50));

    let have_ffmpeg = ffmpeg_available();
    if have_ffmpeg {
        println!("[OK] ffmpeg: found in PATH (WebM recording available)");
    } else {
        println!("[WARN] ffmpeg: not found (WebM recording unavailable; GIF still works)");
    }

    let env = HostEnvironment::default();
    match env.mobile_reason() {
        None => println!(
            "[OK] Host environment: desktop, viewport {}px, scale {}x",
            env.viewport_width, env.device_pixel_ratio
        ),
        Some(reason) => println!("[WARN] Host environment: unsupported ({reason})"),
    }

    let path = settings_file_path();
    if path.exists() {
        println!("[OK] Settings: {}", path.display());
    } else {
        println!("[WARN] Settings: none saved yet (defaults in effect)");
        println!("       Run `codereel settings --init` to create them");
    }

    println!();
    if have_ffmpeg {
        println!("Codereel is ready.");
    } else {
        println!("Install ffmpeg to enable WebM recording.");
    }

    Ok(())
}

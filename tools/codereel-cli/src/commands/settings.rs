//! Show or initialize persisted settings.

use codereel_common::{settings_file_path, Settings};

pub fn run(init: bool) -> anyhow::Result<()> {
    let path = settings_file_path();

    if init {
        Settings::default().save_to(&path)?;
        println!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    println!("Settings file: {}", path.display());
    if !path.exists() {
        println!("  (not present; showing defaults)");
    }
    println!();

    let settings = Settings::load_from(&path);
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

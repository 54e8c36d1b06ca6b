use std::path::Path;
use tokio::fs;
use crate::pkg::config::AppSettings;
use anyhow::Result;

/// Writes settings out as YAML, overwriting any existing file.
pub async fn save_config<P: AsRef<Path>>(filename: P, settings: &AppSettings) -> Result<()> {
    let data = serde_yaml::to_string(settings)?;
    fs::write(filename, data).await?;
    Ok(())
}

/// Writes default settings when no config file exists yet. Returns whether it wrote one.
///
/// Always the built-in defaults, never the running settings, so environment
/// overrides stay out of the file.
pub async fn write_starter_config<P: AsRef<Path>>(filename: P) -> Result<bool> {
    if fs::try_exists(filename.as_ref()).await? {
        return Ok(false);
    }
    save_config(filename, &AppSettings::default()).await?;
    Ok(true)
}

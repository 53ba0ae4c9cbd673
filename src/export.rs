//! Writing exported drawings (and downloaded speech clips) to disk.

use crate::config::OutputConfig;
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where and how exported drawings are named.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory to save drawings to.
    pub directory: PathBuf,
    /// Filename template (supports chrono format specifiers).
    pub filename_template: String,
    /// Image format extension.
    pub format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: dirs::picture_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("Scribblepad"),
            filename_template: "drawing_%Y-%m-%d_%H%M%S".to_string(),
            format: "png".to_string(),
        }
    }
}

impl From<&OutputConfig> for ExportConfig {
    fn from(config: &OutputConfig) -> Self {
        Self {
            directory: expand_tilde(&config.directory),
            filename_template: config.filename_template.clone(),
            format: "png".to_string(),
        }
    }
}

/// Generate a filename based on the template and current time.
pub fn generate_filename(template: &str, format: &str) -> String {
    let now = Local::now();
    format!("{}.{}", now.format(template), format)
}

/// Ensure the directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> io::Result<PathBuf> {
    if !directory.exists() {
        log::info!("Creating output directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    Ok(directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf()))
}

/// Writes `data` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory_exists(parent)?;
    }
    fs::write(path, data)?;
    log::debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

/// Saves PNG bytes under a generated name in the configured directory.
///
/// # Returns
/// Path to the saved file
pub fn save_drawing(image_data: &[u8], config: &ExportConfig) -> io::Result<PathBuf> {
    let directory = ensure_directory_exists(&config.directory)?;
    let file_path = directory.join(generate_filename(
        &config.filename_template,
        &config.format,
    ));

    log::info!(
        "Saving drawing to: {} ({} bytes)",
        file_path.display(),
        image_data.len()
    );
    write_file(&file_path, image_data)?;
    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

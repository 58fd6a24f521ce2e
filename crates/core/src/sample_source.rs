//! Discovery of audio samples on disk.
//!
//! A sample is any regular file in the sample directory with the configured
//! extension. Its identifier is the file stem, so `rain_01.wav` becomes
//! `rain_01`.

use std::path::Path;

use crate::error::CoreError;

/// Extension (without the dot) of files treated as audio samples.
pub const SAMPLE_EXTENSION: &str = "wav";

/// A sample file found in the sample directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredSample {
    /// Catalog identifier (file stem).
    pub sample_id: String,
    /// File name relative to the sample directory.
    pub file_name: String,
}

/// List every sample file in `dir`, sorted by file name.
///
/// Fails with [`CoreError::Configuration`] when the directory does not exist
/// or holds no sample files.
pub async fn discover_samples(
    dir: &Path,
    extension: &str,
) -> Result<Vec<DiscoveredSample>, CoreError> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Err(CoreError::Configuration(format!(
            "Sounds directory not found. Please create {} folder and add .{extension} files.",
            dir.display()
        )));
    }

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to read sounds directory: {e}")))?;

    let mut samples = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CoreError::Internal(format!("Failed to read directory entry: {e}")))?
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            continue;
        }

        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        let (Some(stem), Some(file_name)) = (
            path.file_stem().and_then(|s| s.to_str()),
            path.file_name().and_then(|s| s.to_str()),
        ) else {
            // Non UTF-8 names cannot be served or stored as identifiers.
            continue;
        };

        if stem.is_empty() {
            continue;
        }

        samples.push(DiscoveredSample {
            sample_id: stem.to_string(),
            file_name: file_name.to_string(),
        });
    }

    if samples.is_empty() {
        return Err(CoreError::Configuration(format!(
            "No .{extension} files found in the sounds directory."
        )));
    }

    samples.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(samples)
}

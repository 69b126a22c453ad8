//! Serialization module for writing Postman collections to disk and reading them back.

use crate::collection_builder::PostmanCollection;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Serializes a collection to JSON with two-space indentation.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(collection: &PostmanCollection) -> Result<String> {
    debug!("Serializing Postman collection to JSON");
    serde_json::to_string_pretty(collection)
        .context("Failed to serialize Postman collection to JSON")
}

/// Writes string content to a file.
///
/// Creates parent directories when missing and overwrites an existing file. The write is
/// not atomic.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Loads a previously written collection file as raw JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn read_collection(path: &Path) -> Result<serde_json::Value> {
    debug!("Reading collection from file: {}", path.display());

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid collection JSON in {}", path.display()))
}

/// Timestamped output path: `<dir>/postman_collection_YYYY-MM-DD-HHMMSS.json`
pub fn timestamped_output_path<Tz: TimeZone>(output_dir: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    output_dir.join(format!("postman_collection_{}.json", now.format("%Y-%m-%d-%H%M%S")))
}

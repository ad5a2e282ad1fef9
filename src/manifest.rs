//! On-disk course manifest (`.tmc.json` in the course directory).

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use atomicwrites::{AllowOverwrite, AtomicFile};

use crate::models::CourseInfo;

/// File name of the manifest inside a course directory.
pub const MANIFEST_FILE: &str = ".tmc.json";

/// Load a manifest from disk.
pub fn load(path: &Path) -> Result<CourseInfo> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read course manifest {}", path.display()))?;

    let info = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse course manifest {}", path.display()))?;

    Ok(info)
}

/// Write a manifest to disk, replacing any previous one atomically.
pub fn save(info: &CourseInfo, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create course directory")?;
    }

    let content =
        serde_json::to_string_pretty(info).context("Failed to serialize course manifest")?;

    AtomicFile::new(path, AllowOverwrite)
        .write(|f| f.write_all(content.as_bytes()))
        .with_context(|| format!("Failed to write course manifest {}", path.display()))?;

    tracing::debug!("Saved course manifest {}", path.display());
    Ok(())
}

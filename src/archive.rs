//! Gzipped tarball reading and extraction.
//!
//! Package archives are compressed tarballs whose entries all live under a
//! single top-level directory (npm convention: `package/`). Both operations
//! here strip that directory, so the manifest is addressed as
//! `package.json` and extraction lands files directly in the target slot.

use std::io::Read;
use std::path::{Component, Path};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tar::Archive;

use crate::constants::MANIFEST_FILENAME;
use crate::core::error::TinypmError;
use crate::manifest::Manifest;

/// Read the embedded `package.json` out of package archive bytes.
pub fn read_manifest(bytes: &[u8]) -> Result<Manifest> {
    let mut archive = Archive::new(GzDecoder::new(bytes));
    for entry in archive.entries().context("failed to read package archive")? {
        let mut entry = entry.context("corrupt entry in package archive")?;
        let path = entry.path().context("non-utf8 path in package archive")?;
        if strip_root(&path) == Path::new(MANIFEST_FILENAME) {
            let mut raw = Vec::new();
            entry.read_to_end(&mut raw)?;
            return Manifest::from_slice(&raw, MANIFEST_FILENAME);
        }
    }
    Err(TinypmError::ManifestNotFound {
        file: MANIFEST_FILENAME.to_string(),
        dir: "package archive".to_string(),
    }
    .into())
}

/// Extract package archive bytes into `dest`, stripping the top-level
/// directory from every entry path.
pub fn extract_to(bytes: &[u8], dest: &Path) -> Result<()> {
    crate::utils::fs::ensure_dir(dest)?;

    let mut archive = Archive::new(GzDecoder::new(bytes));
    for entry in archive.entries().context("failed to read package archive")? {
        let mut entry = entry.context("corrupt entry in package archive")?;
        let stripped = strip_root(&entry.path()?).to_path_buf();
        if stripped.as_os_str().is_empty() || !is_safe_relative(&stripped) {
            continue;
        }

        let target = dest.join(&stripped);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry
            .unpack(&target)
            .with_context(|| format!("failed to extract {}", stripped.display()))?;
    }
    Ok(())
}

/// Drop the first path component (the archive's single top-level directory).
fn strip_root(path: &Path) -> &Path {
    let mut components = path.components();
    components.next();
    components.as_path()
}

/// Entries must stay inside the extraction target once the root is stripped.
fn is_safe_relative(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

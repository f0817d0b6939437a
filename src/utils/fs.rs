//! File system utilities.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

/// Create a directory and all parents if it doesn't already exist.
///
/// Errors if the path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        anyhow::bail!("path exists but is not a directory: {}", path.display());
    }
    Ok(())
}

/// Compute `path` relative to `base`, walking up with `..` as needed.
///
/// Both arguments must be absolute or share the same root. Used to make bin
/// links relative so an installed tree stays relocatable.
pub fn relative_from(path: &Path, base: &Path) -> PathBuf {
    let path_components: Vec<Component> = path.components().collect();
    let base_components: Vec<Component> = base.components().collect();

    let mut shared = 0;
    while shared < path_components.len()
        && shared < base_components.len()
        && path_components[shared] == base_components[shared]
    {
        shared += 1;
    }

    let mut relative = PathBuf::new();
    for _ in shared..base_components.len() {
        relative.push("..");
    }
    for component in &path_components[shared..] {
        relative.push(component);
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

/// Create a symbolic link at `link` pointing at `original`.
///
/// `original` may be relative to the link's parent directory. On Windows,
/// where unprivileged symlink creation is often denied, falls back to
/// copying the resolved target file so the linked name still runs.
#[cfg(unix)]
pub fn symlink_file(original: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
pub fn symlink_file(original: &Path, link: &Path) -> std::io::Result<()> {
    match std::os::windows::fs::symlink_file(original, link) {
        Ok(()) => Ok(()),
        Err(_) => {
            let resolved = match link.parent() {
                Some(parent) => parent.join(original),
                None => original.to_path_buf(),
            };
            std::fs::copy(&resolved, link).map(|_| ())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // idempotent
        ensure_dir(&nested).unwrap();
    }

    #[test]
    fn test_ensure_dir_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, b"x").unwrap();
        assert!(ensure_dir(&file).is_err());
    }

    #[test]
    fn test_relative_from_sibling_directories() {
        let base = Path::new("/root/node_modules/.bin");
        let target = Path::new("/root/node_modules/demo/cli.js");
        assert_eq!(relative_from(target, base), PathBuf::from("../demo/cli.js"));
    }

    #[test]
    fn test_relative_from_same_directory() {
        let base = Path::new("/root/x");
        let target = Path::new("/root/x/file");
        assert_eq!(relative_from(target, base), PathBuf::from("file"));
    }

    #[test]
    fn test_relative_from_identical_paths() {
        let p = Path::new("/root/x");
        assert_eq!(relative_from(p, p), PathBuf::from("."));
    }
}

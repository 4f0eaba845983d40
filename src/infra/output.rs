//! Writing generated documents into the output directory.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::Builder as TempFileBuilder;
use tracing::debug;

use super::error::InfraError;

/// Mode of every written file: readable by the web server, writable by the owner.
#[cfg(unix)]
const SITE_FILE_MODE: u32 = 0o644;

/// Writes site files below a single root directory. Every file is written to a
/// temporary sibling first and renamed into place, so readers never observe a
/// partially written document.
#[derive(Debug, Clone)]
pub struct SiteWriter {
    root: PathBuf,
}

impl SiteWriter {
    pub async fn create(root: impl Into<PathBuf>) -> Result<Self, InfraError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|err| InfraError::path_io(&root, err))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `contents` to `relative` below the root, creating parent directories.
    pub async fn write(
        &self,
        relative: &str,
        contents: impl Into<Vec<u8>>,
    ) -> Result<PathBuf, InfraError> {
        let target = self.root.join(relative);
        let contents = contents.into();
        let bytes = contents.len();

        let written = tokio::task::spawn_blocking(move || write_atomically(&target, &contents))
            .await
            .map_err(|err| InfraError::Io(io::Error::other(err)))??;

        debug!(
            target = "lessonbook::output",
            op = "output::write",
            path = %written.display(),
            bytes,
            "Wrote site file"
        );

        Ok(written)
    }

    /// Delete files directly below the root whose names match `is_stale`.
    /// Returns the removed names in sorted order.
    pub async fn prune<F>(&self, is_stale: F) -> Result<Vec<String>, InfraError>
    where
        F: Fn(&str) -> bool + Send + 'static,
    {
        let root = self.root.clone();
        let removed = tokio::task::spawn_blocking(move || prune_root(&root, is_stale))
            .await
            .map_err(|err| InfraError::Io(io::Error::other(err)))??;

        for name in &removed {
            debug!(
                target = "lessonbook::output",
                op = "output::prune",
                path = %self.root.join(name).display(),
                "Removed stale site file"
            );
        }

        Ok(removed)
    }
}

fn prune_root<F>(root: &Path, is_stale: F) -> Result<Vec<String>, InfraError>
where
    F: Fn(&str) -> bool,
{
    let entries = fs::read_dir(root).map_err(|err| InfraError::path_io(root, err))?;

    let mut removed = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| InfraError::path_io(root, err))?;
        let is_file = entry
            .file_type()
            .map_err(|err| InfraError::path_io(&entry.path(), err))?
            .is_file();
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !is_file || !is_stale(&name) {
            continue;
        }

        let path = entry.path();
        fs::remove_file(&path).map_err(|err| InfraError::path_io(&path, err))?;
        removed.push(name);
    }

    removed.sort();
    Ok(removed)
}

fn write_atomically(target: &Path, contents: &[u8]) -> Result<PathBuf, InfraError> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|err| InfraError::path_io(parent, err))?;

    let mut file = TempFileBuilder::new()
        .prefix(".lessonbook-")
        .tempfile_in(parent)
        .map_err(|err| InfraError::path_io(parent, err))?;
    file.write_all(contents)
        .map_err(|err| InfraError::path_io(file.path(), err))?;
    file.flush()
        .map_err(|err| InfraError::path_io(file.path(), err))?;

    // Temporary files are created owner-only.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(fs::Permissions::from_mode(SITE_FILE_MODE))
            .map_err(|err| InfraError::path_io(file.path(), err))?;
    }

    file.persist(target)
        .map_err(|err| InfraError::path_io(target, err.error))?;

    Ok(target.to_path_buf())
}

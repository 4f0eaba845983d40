//! Access to the static content that describes all items.
//!
//! Content lives either on disk (a manifest plus the files it references) or
//! inside the binary, embedded from the crate's `content/` directory at build
//! time. Referenced files are always resolved relative to the manifest and may
//! not escape its directory.

use std::{
    fmt, fs,
    io::{self, ErrorKind},
    path::{Component, Path, PathBuf},
};

use include_dir::{Dir, include_dir};
use thiserror::Error;

static EMBEDDED_CONTENT: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/content");

/// Manifest file name looked up when a content source is a directory.
pub const MANIFEST_FILE: &str = "items.toml";

#[derive(Debug, Error)]
pub enum ContentReadError {
    #[error("content file `{path}` not found")]
    NotFound { path: String },
    #[error("content path `{path}` must be relative and stay inside the content directory")]
    Escapes { path: String },
    #[error("content file `{path}` is not valid UTF-8")]
    NotUtf8 { path: String },
    #[error("failed to read content file `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Where item content is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// A manifest on disk; referenced files resolve against its parent directory.
    Filesystem { manifest: PathBuf },
    /// Content compiled into the binary.
    Embedded,
}

impl ContentSource {
    /// Build a source from a user-supplied path: either the manifest itself or a
    /// directory containing [`MANIFEST_FILE`].
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let manifest = if path.is_dir() {
            path.join(MANIFEST_FILE)
        } else {
            path
        };
        Self::Filesystem { manifest }
    }

    pub fn read_manifest(&self) -> Result<String, ContentReadError> {
        match self {
            Self::Filesystem { manifest } => read_disk_file(manifest),
            Self::Embedded => read_embedded_file(Path::new(MANIFEST_FILE)),
        }
    }

    /// Read a file referenced from the manifest.
    pub fn read_relative(&self, relative: &str) -> Result<String, ContentReadError> {
        let relative_path =
            contained_path(Path::new(relative)).ok_or_else(|| ContentReadError::Escapes {
                path: relative.to_string(),
            })?;

        match self {
            Self::Filesystem { manifest } => {
                let base = manifest.parent().unwrap_or_else(|| Path::new("."));
                read_disk_file(&base.join(relative_path))
            }
            Self::Embedded => read_embedded_file(&relative_path),
        }
    }
}

impl fmt::Display for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filesystem { manifest } => write!(f, "{}", manifest.display()),
            Self::Embedded => f.write_str("<embedded>"),
        }
    }
}

/// `path` reduced to its normal components, or `None` when it is empty or
/// could leave the content directory. The embedded tree only matches paths
/// without `.` segments.
fn contained_path(path: &Path) -> Option<PathBuf> {
    let mut contained = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => contained.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!contained.as_os_str().is_empty()).then_some(contained)
}

fn read_disk_file(path: &Path) -> Result<String, ContentReadError> {
    fs::read_to_string(path).map_err(|err| {
        let display = path.display().to_string();
        match err.kind() {
            ErrorKind::NotFound => ContentReadError::NotFound { path: display },
            ErrorKind::InvalidData => ContentReadError::NotUtf8 { path: display },
            _ => ContentReadError::Io {
                path: display,
                source: err,
            },
        }
    })
}

fn read_embedded_file(path: &Path) -> Result<String, ContentReadError> {
    let display = path.display().to_string();
    let file = EMBEDDED_CONTENT
        .get_file(path)
        .ok_or_else(|| ContentReadError::NotFound {
            path: display.clone(),
        })?;
    file.contents_utf8()
        .map(str::to_owned)
        .ok_or(ContentReadError::NotUtf8 { path: display })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn directory_source_resolves_manifest() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join(MANIFEST_FILE), "items = []").expect("write manifest");

        let source = ContentSource::from_path(dir.path());
        assert_eq!(
            source,
            ContentSource::Filesystem {
                manifest: dir.path().join(MANIFEST_FILE)
            }
        );
        assert_eq!(source.read_manifest().expect("manifest"), "items = []");
    }

    #[test]
    fn relative_reads_are_confined_to_the_content_directory() {
        let dir = TempDir::new().expect("temp dir");
        let source = ContentSource::from_path(dir.path().join(MANIFEST_FILE));

        for escaping in ["../secret.md", "/etc/passwd", "items/../../x.md", "", "./"] {
            let err = source.read_relative(escaping).expect_err("should be rejected");
            assert!(
                matches!(err, ContentReadError::Escapes { .. }),
                "unexpected error for `{escaping}`: {err:?}"
            );
        }
    }

    #[test]
    fn missing_file_reports_not_found() {
        let dir = TempDir::new().expect("temp dir");
        let source = ContentSource::from_path(dir.path().join(MANIFEST_FILE));
        let err = source.read_relative("items/missing.md").expect_err("missing");
        assert!(matches!(err, ContentReadError::NotFound { .. }), "{err:?}");
    }

    #[test]
    fn current_dir_segments_resolve_on_disk_and_embedded() {
        let dir = TempDir::new().expect("temp dir");
        fs::create_dir(dir.path().join("items")).expect("items dir");
        fs::write(dir.path().join("items/lesson.md"), "body").expect("write lesson");
        let source = ContentSource::from_path(dir.path());

        assert_eq!(
            source.read_relative("./items/./lesson.md").expect("disk read"),
            "body"
        );

        let plain = ContentSource::Embedded
            .read_relative("samples/Pizza.java")
            .expect("embedded read");
        let dotted = ContentSource::Embedded
            .read_relative("./samples/Pizza.java")
            .expect("embedded read with leading ./");
        assert_eq!(plain, dotted);
    }

    #[test]
    fn embedded_manifest_is_available() {
        let manifest = ContentSource::Embedded.read_manifest().expect("embedded manifest");
        assert!(manifest.contains("[[items]]"));
    }
}

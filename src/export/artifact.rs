//! Artifacts and the sinks that save them.
//!
//! An [`Artifact`] is the finished file in memory. An [`ArtifactSink`] is the
//! host's way of committing it: [`DirectorySink`] writes files to disk,
//! [`MemorySink`] keeps them for embedding hosts and tests.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use log::debug;
use tempfile::NamedTempFile;

use crate::config::FILENAME_TIMESTAMP_FORMAT;

use super::types::ExportFormat;

/// Base name used when the options leave `filename` empty.
const DEFAULT_BASE_NAME: &str = "report";

/// A finished export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// `{base}-{yyyy-MM-dd-HH-mm}.{ext}`
    pub file_name: String,
    /// Format of the bytes
    pub format: ExportFormat,
    /// File contents
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// MIME type of the artifact.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Builds the artifact file name: `{base}-{yyyy-MM-dd-HH-mm}.{ext}`.
///
/// Path separators in `base` are replaced so the name always stays a single
/// path component.
pub fn artifact_file_name(base: &str, format: ExportFormat, at: DateTime<Local>) -> String {
    let base = base.trim();
    let base = if base.is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        base.replace(['/', '\\'], "_")
    };
    format!(
        "{}-{}.{}",
        base,
        at.format(FILENAME_TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// Host-side destination for finished artifacts.
pub trait ArtifactSink {
    /// Commits the artifact. Returns where it was saved, if it has a location.
    ///
    /// Implementations must not leave a partial file visible when they fail.
    fn save(&self, artifact: &Artifact) -> io::Result<Option<PathBuf>>;
}

impl<S: ArtifactSink + ?Sized> ArtifactSink for &S {
    fn save(&self, artifact: &Artifact) -> io::Result<Option<PathBuf>> {
        (**self).save(artifact)
    }
}

/// Saves artifacts as files in a directory.
///
/// Bytes go to a temporary file in the same directory first, which is then
/// renamed into place. A failed save leaves nothing behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`. The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory artifacts are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&self, artifact: &Artifact) -> io::Result<Option<PathBuf>> {
        let target = self.dir.join(&artifact.file_name);
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(&artifact.bytes)?;
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| e.error)?;
        debug!(
            "Wrote {} bytes to {}",
            artifact.bytes.len(),
            target.display()
        );
        Ok(Some(target))
    }
}

/// Keeps saved artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<Artifact>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts saved so far, oldest first.
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.saved
            .lock()
            .map(|saved| saved.clone())
            .unwrap_or_default()
    }

    /// Number of artifacts saved so far.
    pub fn len(&self) -> usize {
        self.saved.lock().map(|saved| saved.len()).unwrap_or(0)
    }

    /// Whether nothing has been saved yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactSink for MemorySink {
    fn save(&self, artifact: &Artifact) -> io::Result<Option<PathBuf>> {
        self.saved
            .lock()
            .map_err(|_| io::Error::other("memory sink lock poisoned"))?
            .push(artifact.clone());
        Ok(None)
    }
}

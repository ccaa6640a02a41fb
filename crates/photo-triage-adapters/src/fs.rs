//! Filesystem adapter for delivering uploads.

use std::path::{Path, PathBuf};

use anyhow::Context;
use photo_triage_core::{SourceRef, UnreadableUpload, Upload, UploadSource};
use tracing::{debug, warn};

/// Extensions the image decoder is built with.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];

/// Reads a shoot from files and directories on disk.
///
/// Each directory argument is listed in path order, so a shoot gets the same
/// identities on every run. Explicit file arguments keep their command-line
/// position.
pub struct FsUploadSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsUploadSource {
    /// `recursive` controls whether subdirectories of directory arguments
    /// are descended into.
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    fn image_files(&self) -> Vec<PathBuf> {
        self.paths
            .iter()
            .flat_map(|path| {
                if path.is_dir() {
                    let mut listed = self.walk(path);
                    listed.sort();
                    listed
                } else if !path.exists() {
                    warn!("Path does not exist: {}", path.display());
                    Vec::new()
                } else if is_supported_image(path) {
                    vec![path.clone()]
                } else {
                    warn!("Unsupported file type: {}", path.display());
                    Vec::new()
                }
            })
            .collect()
    }

    fn walk(&self, root: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let entries = match std::fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Failed to read directory {}: {e}", dir.display());
                    continue;
                }
            };
            for path in entries.filter_map(|entry| entry.ok().map(|e| e.path())) {
                if path.is_dir() {
                    if self.recursive {
                        pending.push(path);
                    }
                } else if is_supported_image(&path) {
                    found.push(path);
                }
            }
        }

        found
    }
}

impl UploadSource for FsUploadSource {
    fn uploads(&self) -> Box<dyn Iterator<Item = Result<Upload, UnreadableUpload>> + Send + '_> {
        let files = self.image_files();
        debug!("Found {} image files", files.len());
        Box::new(files.into_iter().map(|path| read_upload(&path)))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.image_files().len())
    }
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Reads a file into an upload. Content is not validated here.
fn read_upload(path: &Path) -> Result<Upload, UnreadableUpload> {
    let location = SourceRef::new(path.to_string_lossy());
    let bytes = match std::fs::read(path).context("Failed to read file") {
        Ok(bytes) => bytes,
        Err(e) => return Err(UnreadableUpload::new(location, e)),
    };
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    Ok(Upload::new(location, name, bytes))
}

//! Per-request temporary files
//!
//! Every uploaded file is written into its own directory under the staging
//! directory and owned by a [`StagedFile`]. The guard deletes that directory,
//! and anything an engine left beside the file, when it goes out of scope. The
//! request's files are removed on every exit path: success, error, panic
//! unwind, or the request future being dropped when a client disconnects.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use uuid::Uuid;

/// Leaves room for engine side files such as `<name>_exiftool_tmp` within the
/// usual 255-byte name limit.
const MAX_FILENAME_LENGTH: usize = 200;
const MAX_EXTENSION_LENGTH: usize = 16;

/// Sanitize a client-supplied filename so it is safe to embed in a staging path.
///
/// Directory components are dropped, `..` is neutralised and anything outside
/// `[A-Za-z0-9._-]` becomes `_`. Empty or very short results fall back to `file`.
/// Long names are shortened with their extension kept.
pub fn sanitize_filename(filename: &str) -> String {
    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .replace("..", "_");

    let sanitized: String = filename_only
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = sanitized.trim_matches('.');
    if trimmed.is_empty() || (trimmed.len() < 3 && !trimmed.contains('.')) {
        return "file".to_string();
    }

    truncate_keeping_extension(trimmed)
}

/// `name` is ASCII here, so byte offsets are char boundaries.
fn truncate_keeping_extension(name: &str) -> String {
    if name.len() <= MAX_FILENAME_LENGTH {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() <= MAX_EXTENSION_LENGTH => {
            let keep = MAX_FILENAME_LENGTH - ext.len() - 1;
            format!("{}.{}", &stem[..keep.min(stem.len())], ext)
        }
        _ => name[..MAX_FILENAME_LENGTH].to_string(),
    }
}

/// Directory in which staged files are created
#[derive(Debug, Clone)]
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Collision-free request directory: `{unix_millis}_{uuid}`.
    fn unique_dir(&self) -> PathBuf {
        let millis = chrono::Utc::now().timestamp_millis();
        let nonce = Uuid::new_v4().simple();
        self.dir.join(format!("{}_{}", millis, nonce))
    }

    /// Create an empty staged file and return it together with a writable handle.
    pub async fn create(&self, filename: &str) -> io::Result<(StagedFile, File)> {
        let dir = self.unique_dir();
        tokio::fs::create_dir(&dir).await?;

        // The guard owns the directory before the file exists.
        let staged = StagedFile {
            path: dir.join(sanitize_filename(filename)),
            dir,
            original_name: filename.to_string(),
            armed: true,
        };
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&staged.path)
            .await?;
        tracing::debug!(path = %staged.path.display(), "Staged temporary file");
        Ok((staged, file))
    }

    /// Stage an in-memory payload.
    pub async fn stage_bytes(&self, filename: &str, data: &[u8]) -> io::Result<StagedFile> {
        use tokio::io::AsyncWriteExt;

        // The guard exists before the first write so a failed write still cleans up.
        let (staged, mut file) = self.create(filename).await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(staged)
    }
}

/// Temporary file owned by exactly one request, inside a directory of its own
#[derive(Debug)]
pub struct StagedFile {
    dir: PathBuf,
    path: PathBuf,
    original_name: String,
    armed: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename as supplied by the client (unsanitized)
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Delete the request directory now. A directory that is already gone counts as removed.
    pub async fn remove(mut self) -> io::Result<()> {
        self.armed = false;
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                tracing::debug!(path = %self.dir.display(), "Removed temporary directory");
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.dir.display(),
                    error = %e,
                    "Failed to remove temporary directory"
                );
            }
        }
    }
}

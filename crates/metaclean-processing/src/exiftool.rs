//! ExifTool engine - clears metadata by running the `exiftool` binary

use crate::engine::{EngineError, MetadataEngine};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, warn};

pub struct ExifToolEngine {
    binary: String,
}

impl ExifToolEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, mut cmd: Command) -> Result<Output, EngineError> {
        cmd.output().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => EngineError::Unavailable(format!(
                "{} not found; install exiftool or set EXIFTOOL_PATH",
                self.binary
            )),
            _ => EngineError::Unavailable(format!("Failed to run {}: {}", self.binary, e)),
        })
    }

    /// Build a client-safe message from exiftool's output, hiding the staging path.
    fn failure_message(output: &Output, path: &Path) -> String {
        let mut message = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if message.is_empty() {
            message = String::from_utf8_lossy(&output.stdout).trim().to_string();
        }
        if message.is_empty() {
            return format!("exiftool exited with {}", output.status);
        }

        let full = path.to_string_lossy();
        let short = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let message = message.replace(full.as_ref(), &short);
        message
            .strip_prefix("Error: ")
            .map(str::to_string)
            .unwrap_or(message)
    }
}

#[async_trait]
impl MetadataEngine for ExifToolEngine {
    fn name(&self) -> &'static str {
        "exiftool"
    }

    #[tracing::instrument(skip(self, path), fields(engine = "exiftool"))]
    async fn clear_metadata(&self, path: &Path) -> Result<(), EngineError> {
        let mut cmd = self.command();
        // -all= deletes every writable tag; -overwrite_original stops exiftool
        // from leaving a `<file>_original` backup next to the staged file.
        cmd.args(["-all=", "-overwrite_original", "-q", "-q"]).arg(path);

        let output = self.run(cmd).await?;

        if !output.status.success() {
            let message = Self::failure_message(&output, path);
            warn!(status = %output.status, error = %message, "exiftool failed");
            return Err(EngineError::Failed(message));
        }

        debug!("exiftool cleared metadata");
        Ok(())
    }

    async fn version(&self) -> Result<String, EngineError> {
        let mut cmd = self.command();
        cmd.arg("-ver");
        let output = self.run(cmd).await?;
        if !output.status.success() {
            return Err(EngineError::Unavailable(format!(
                "{} -ver exited with {}",
                self.binary, output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

//! Tesseract OCR backend.
//!
//! Runs the configured tesseract executable as a subprocess and reads the
//! recognized text from its stdout.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, trace};

use super::OcrEngine;
use crate::error::OcrError;
use crate::models::config::EngineConfig;

/// Tesseract OCR engine.
pub struct TesseractEngine {
    executable: PathBuf,
    language: String,
    timeout: Option<Duration>,
}

impl TesseractEngine {
    /// Create an engine for the tesseract binary at `executable`.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            language: "eng".to_string(),
            timeout: None,
        }
    }

    /// Create an engine from engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(&config.tesseract_path)
            .with_language(&config.language)
            .with_timeout(config.timeout())
    }

    /// Set the recognition language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Limit how long a single recognition may take.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    async fn recognize(&self, image_path: &Path) -> Result<String, OcrError> {
        let start = Instant::now();

        let mut command = Command::new(&self.executable);
        command
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.language])
            .kill_on_drop(true);

        trace!("Running {:?}", command);

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| OcrError::Timeout(limit.as_secs()))?,
            None => command.output().await,
        };

        let output = output.map_err(|source| OcrError::EngineUnavailable {
            path: self.executable.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(
            "OCR of {} produced {} chars in {}ms",
            image_path.display(),
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}

//! Configuration structures for the checking pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Default minimum fuzzy-match score (0 - 100).
pub const DEFAULT_MATCH_THRESHOLD: u8 = 80;

/// Phrases whose presence marks a document as a vaccination record.
pub const DEFAULT_MARKER_TERMS: [&str; 2] = ["COVID-19 Vaccination Record", "COVID-19 Vaccine"];

/// Main configuration for a cardcheck run.
///
/// The two engine paths are required; everything else has a default so a
/// minimal file only needs `poppler_path` and `tesseract_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardcheckConfig {
    /// External engine locations and tuning.
    #[serde(flatten)]
    pub engine: EngineConfig,

    /// Field extraction settings.
    #[serde(flatten)]
    pub extraction: ExtractionConfig,
}

/// Locations and tuning of the external OCR and rendering engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Directory holding the poppler utilities (`pdftoppm`).
    pub poppler_path: PathBuf,

    /// Path to the tesseract executable.
    #[serde(alias = "pytesseract_path")]
    pub tesseract_path: PathBuf,

    /// Tesseract language code.
    #[serde(default = "default_language")]
    pub language: String,

    /// DPI for rendering PDF pages to images.
    #[serde(default = "default_render_dpi")]
    pub render_dpi: u32,

    /// Per-document limit for a single engine invocation, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_timeout_secs: Option<u64>,
}

/// Fuzzy matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum score for a vocabulary match to count (0 - 100).
    #[serde(default = "default_match_threshold")]
    pub match_threshold: u8,

    /// Marker vocabulary gating whether a document is a vaccination record.
    #[serde(default = "default_marker_terms")]
    pub marker_terms: Vec<String>,
}

fn default_language() -> String {
    "eng".to_string()
}

fn default_render_dpi() -> u32 {
    300
}

fn default_match_threshold() -> u8 {
    DEFAULT_MATCH_THRESHOLD
}

fn default_marker_terms() -> Vec<String> {
    DEFAULT_MARKER_TERMS.iter().map(|s| s.to_string()).collect()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_match_threshold(),
            marker_terms: default_marker_terms(),
        }
    }
}

impl EngineConfig {
    /// Create an engine configuration with default tuning.
    pub fn new(poppler_path: impl Into<PathBuf>, tesseract_path: impl Into<PathBuf>) -> Self {
        Self {
            poppler_path: poppler_path.into(),
            tesseract_path: tesseract_path.into(),
            language: default_language(),
            render_dpi: default_render_dpi(),
            ocr_timeout_secs: None,
        }
    }

    /// Path of the `pdftoppm` executable inside the poppler directory.
    pub fn pdftoppm_path(&self) -> PathBuf {
        self.poppler_path
            .join(format!("pdftoppm{}", std::env::consts::EXE_SUFFIX))
    }

    /// Per-invocation timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.ocr_timeout_secs.map(Duration::from_secs)
    }
}

impl CardcheckConfig {
    /// Build a configuration from engine paths with default extraction settings.
    pub fn new(engine: EngineConfig) -> Self {
        Self {
            engine,
            extraction: ExtractionConfig::default(),
        }
    }

    /// A template with placeholder paths, used by `config init`.
    pub fn template() -> Self {
        Self::new(EngineConfig::new(
            "/usr/bin",
            "/usr/bin/tesseract",
        ))
    }

    /// Parse and validate configuration from a JSON string.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.poppler_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue("poppler_path"));
        }
        if self.engine.tesseract_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingValue("tesseract_path"));
        }
        if self.extraction.match_threshold > 100 {
            return Err(ConfigError::Invalid {
                key: "match_threshold",
                reason: format!("{} is above 100", self.extraction.match_threshold),
            });
        }
        if self.engine.render_dpi == 0 {
            return Err(ConfigError::Invalid {
                key: "render_dpi",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = CardcheckConfig::from_json(
            r#"{"poppler_path": "/opt/poppler/bin", "tesseract_path": "/usr/bin/tesseract"}"#,
        )
        .unwrap();

        assert_eq!(config.engine.poppler_path, PathBuf::from("/opt/poppler/bin"));
        assert_eq!(config.engine.language, "eng");
        assert_eq!(config.engine.render_dpi, 300);
        assert_eq!(config.engine.timeout(), None);
        assert_eq!(config.extraction.match_threshold, 80);
        assert_eq!(config.extraction.marker_terms.len(), 2);
    }

    #[test]
    fn test_example_config_parses() {
        let config =
            CardcheckConfig::from_json(include_str!("../../../../data/config.example.json")).unwrap();
        assert_eq!(config.engine.timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.engine.pdftoppm_path().parent(), Some(Path::new("/usr/bin")));
    }

    #[test]
    fn test_legacy_tesseract_key_is_accepted() {
        let config = CardcheckConfig::from_json(
            r#"{"poppler_path": "C:/poppler/bin", "pytesseract_path": "C:/Tesseract-OCR/tesseract.exe"}"#,
        )
        .unwrap();
        assert_eq!(config.engine.tesseract_path, PathBuf::from("C:/Tesseract-OCR/tesseract.exe"));

        let saved = serde_json::to_value(&config).unwrap();
        assert!(saved.get("tesseract_path").is_some());
        assert!(saved.get("pytesseract_path").is_none());
    }

    #[test]
    fn test_missing_tesseract_path_is_rejected() {
        let err = CardcheckConfig::from_json(r#"{"poppler_path": "/opt/poppler/bin"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_path_is_rejected() {
        let err = CardcheckConfig::from_json(r#"{"poppler_path": "", "tesseract_path": "t"}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingValue("poppler_path")));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(CardcheckConfig::from_json("{not json").is_err());
        assert!(CardcheckConfig::from_json(r#"{"poppler_path": 3, "tesseract_path": "t"}"#).is_err());
    }

    #[test]
    fn test_threshold_above_100_is_rejected() {
        let err = CardcheckConfig::from_json(
            r#"{"poppler_path": "p", "tesseract_path": "t", "match_threshold": 101}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "match_threshold", .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CardcheckConfig::template();
        config.engine.ocr_timeout_secs = Some(30);
        config.save(&path).unwrap();

        let loaded = CardcheckConfig::from_file(&path).unwrap();
        assert_eq!(loaded.engine.tesseract_path, config.engine.tesseract_path);
        assert_eq!(loaded.engine.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = CardcheckConfig::from_file(Path::new("/nonexistent/cardcheck.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cardcheck.json"));
    }
}

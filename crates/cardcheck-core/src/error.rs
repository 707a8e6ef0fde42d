//! Error types for the cardcheck-core library.
//!
//! Errors here are run-scoped: anything that reaches the caller as `Err`
//! aborts the whole batch. Document-scoped problems are reported through
//! [`crate::acquire::Acquisition::Failed`] instead.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the cardcheck library.
#[derive(Error, Debug)]
pub enum CardcheckError {
    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An external engine (OCR or page renderer) cannot be launched.
    #[error("{engine} could not be started from {}: {reason}", path.display())]
    EngineUnavailable {
        engine: &'static str,
        path: PathBuf,
        reason: String,
    },

    /// The input path is not a directory.
    #[error("not a valid directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The manufacturer vocabulary could not be loaded.
    #[error("vocabulary error: {0}")]
    Vocabulary(String),

    /// A CSV table (vocabulary or report) could not be read or written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the engine configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file is not valid JSON or is missing a required key.
    #[error("JSON file is not in correct format: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required path is present but empty.
    #[error("missing required value: {0}")]
    MissingValue(&'static str),

    /// A value is outside its accepted range.
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    /// The configuration file could not be read.
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// The page renderer executable could not be launched.
    #[error("renderer unavailable at {}: {source}", path.display())]
    RendererUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The renderer ran but produced no usable image.
    #[error("failed to render page: {0}")]
    Render(String),

    /// The renderer did not finish in time.
    #[error("rendering timed out after {0}s")]
    Timeout(u64),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR executable could not be launched.
    #[error("OCR engine unavailable at {}: {source}", path.display())]
    EngineUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The OCR engine ran and reported a failure.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The OCR engine did not finish in time.
    #[error("recognition timed out after {0}s")]
    Timeout(u64),
}

/// Result type for the cardcheck library.
pub type Result<T> = std::result::Result<T, CardcheckError>;

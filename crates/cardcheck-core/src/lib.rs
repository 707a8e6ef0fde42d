//! Core library for checking scanned COVID-19 vaccination records.
//!
//! This crate provides:
//! - Text acquisition (PDF text layer, OCR of rendered pages and images)
//! - Consensus fuzzy matching against marker and manufacturer vocabularies
//! - Date and lot number extraction
//! - Validity scoring and CSV reporting for whole directories

pub mod acquire;
pub mod error;
pub mod fields;
pub mod fuzzy;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod report;
pub mod scoring;

pub use acquire::{Acquisition, ExtractedText, TextAcquirer};
pub use error::{CardcheckError, ConfigError, Result};
pub use fuzzy::{classify, ManufacturerVocabulary, VocabularyMatch};
pub use models::config::{CardcheckConfig, EngineConfig, ExtractionConfig};
pub use models::document::DocumentRef;
pub use models::record::{FieldEvidence, Outcome, TextSource, ValidationRecord};
pub use ocr::{OcrEngine, TesseractEngine};
pub use pdf::{PageRenderer, PopplerRenderer};
pub use pipeline::{discover_documents, Pipeline, RunReport};
pub use report::{write_report, DEFAULT_REPORT_NAME};
pub use scoring::score;

//! OCR through an external engine.

mod tesseract;

pub use tesseract::TesseractEngine;

#[cfg(all(test, unix))]
pub(crate) use tesseract::tests::shell_script;

use std::future::Future;
use std::path::Path;

use crate::error::OcrError;

/// Trait for OCR engines.
pub trait OcrEngine: Send + Sync {
    /// Short engine name for diagnostics.
    fn name(&self) -> &'static str;

    /// Recognize the text in an image file.
    ///
    /// [`OcrError::EngineUnavailable`] means the engine itself cannot be
    /// launched; every other error is specific to this image.
    fn recognize(&self, image_path: &Path) -> impl Future<Output = Result<String, OcrError>> + Send;
}

//! PDF processing module.

mod extractor;
mod render;

pub use extractor::PdfExtractor;
pub use render::PopplerRenderer;

#[cfg(test)]
pub(crate) use extractor::tests::text_pdf;

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text-layer access.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}

/// Rasterizes PDF pages for OCR.
pub trait PageRenderer: Send + Sync {
    /// Render the first page of `pdf_path` into `output_dir`, returning the
    /// image path.
    ///
    /// [`PdfError::RendererUnavailable`] means the renderer itself cannot be
    /// launched; every other error is specific to this document.
    fn render_first_page(
        &self,
        pdf_path: &Path,
        output_dir: &Path,
    ) -> impl Future<Output = Result<PathBuf>> + Send;
}

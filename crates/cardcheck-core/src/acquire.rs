//! Text acquisition cascade.
//!
//! PDFs try their first-page text layer and fall back to OCR of a rendered
//! page when that text is missing or lacks the marker phrase. Everything else
//! goes straight to OCR. Only an unlaunchable engine is an error here; every
//! per-document problem comes back as [`Acquisition::Failed`].

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{CardcheckError, OcrError, PdfError, Result};
use crate::fuzzy::classify;
use crate::models::config::{CardcheckConfig, ExtractionConfig};
use crate::models::document::{DocumentKind, DocumentRef};
use crate::models::record::TextSource;
use crate::ocr::{OcrEngine, TesseractEngine};
use crate::pdf::{PageRenderer, PdfExtractor, PdfProcessor, PopplerRenderer};

/// Raw text obtained for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Text content; may be empty.
    pub content: String,
    /// Acquisition path that produced the content.
    pub source: TextSource,
}

impl ExtractedText {
    pub fn new(content: impl Into<String>, source: TextSource) -> Self {
        Self {
            content: content.into(),
            source,
        }
    }
}

/// Outcome of acquiring one document's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    /// Text was obtained (possibly empty).
    Text(ExtractedText),
    /// The document could not be read; the reason is for logs only.
    Failed(String),
}

/// Obtains text for documents using the configured engines.
pub struct TextAcquirer<O: OcrEngine = TesseractEngine, R: PageRenderer = PopplerRenderer> {
    ocr: O,
    renderer: R,
    markers: Vec<String>,
    threshold: u8,
}

impl TextAcquirer {
    /// Create an acquirer backed by tesseract and pdftoppm.
    pub fn from_config(config: &CardcheckConfig) -> Self {
        Self::new(
            TesseractEngine::from_config(&config.engine),
            PopplerRenderer::from_config(&config.engine),
            &config.extraction,
        )
    }
}

impl<O: OcrEngine, R: PageRenderer> TextAcquirer<O, R> {
    /// Create an acquirer from explicit engines.
    pub fn new(ocr: O, renderer: R, extraction: &ExtractionConfig) -> Self {
        Self {
            ocr,
            renderer,
            markers: extraction.marker_terms.clone(),
            threshold: extraction.match_threshold,
        }
    }

    /// Acquire the text of one document.
    pub async fn acquire(&self, doc: &DocumentRef) -> Result<Acquisition> {
        match doc.kind {
            DocumentKind::Pdf => self.acquire_pdf(doc).await,
            DocumentKind::Image => self.acquire_image(doc).await,
        }
    }

    async fn acquire_pdf(&self, doc: &DocumentRef) -> Result<Acquisition> {
        let data = match tokio::fs::read(&doc.path).await {
            Ok(data) => data,
            Err(e) => return Ok(failed(doc, e)),
        };

        let mut extractor = PdfExtractor::new();
        if let Err(e) = extractor.load(&data) {
            return Ok(failed(doc, e));
        }

        let native = extractor.extract_page_text(1).unwrap_or_else(|e| {
            debug!("{}: no usable text layer ({})", doc.filename, e);
            String::new()
        });

        if !native.trim().is_empty() && classify(&native, &self.markers, self.threshold).is_match() {
            debug!("{}: marker found in text layer", doc.filename);
            return Ok(Acquisition::Text(ExtractedText::new(native, TextSource::NativePdfText)));
        }

        debug!("{}: falling back to OCR of rendered page", doc.filename);
        let render_dir = tempfile::tempdir()?;
        let image_path = match self.renderer.render_first_page(&doc.path, render_dir.path()).await {
            Ok(path) => path,
            Err(PdfError::RendererUnavailable { path, source }) => {
                return Err(CardcheckError::EngineUnavailable {
                    engine: "pdftoppm",
                    path,
                    reason: source.to_string(),
                });
            }
            Err(e) => return Ok(failed(doc, e)),
        };

        self.recognize(doc, &image_path, TextSource::OcrFromPdfRender).await
    }

    async fn acquire_image(&self, doc: &DocumentRef) -> Result<Acquisition> {
        if let Err(e) = check_image(&doc.path) {
            return Ok(failed(doc, e));
        }
        self.recognize(doc, &doc.path, TextSource::OcrFromImage).await
    }

    async fn recognize(
        &self,
        doc: &DocumentRef,
        image_path: &Path,
        source: TextSource,
    ) -> Result<Acquisition> {
        match self.ocr.recognize(image_path).await {
            Ok(text) => Ok(Acquisition::Text(ExtractedText::new(text, source))),
            Err(OcrError::EngineUnavailable { path, source }) => {
                Err(CardcheckError::EngineUnavailable {
                    engine: self.ocr.name(),
                    path,
                    reason: source.to_string(),
                })
            }
            Err(e) => Ok(failed(doc, e)),
        }
    }
}

/// Read just enough of an image to know it is one.
fn check_image(path: &Path) -> std::result::Result<(), OcrError> {
    image::ImageReader::open(path)
        .map_err(|e| OcrError::InvalidImage(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| OcrError::InvalidImage(e.to_string()))?
        .into_dimensions()
        .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
    Ok(())
}

fn failed(doc: &DocumentRef, reason: impl std::fmt::Display) -> Acquisition {
    warn!("{}: could not be read: {}", doc.filename, reason);
    Acquisition::Failed(reason.to_string())
}

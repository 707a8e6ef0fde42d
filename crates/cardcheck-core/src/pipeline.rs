//! Batch orchestration: discover documents, check each one, collect records.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use futures_util::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::acquire::{Acquisition, ExtractedText, TextAcquirer};
use crate::error::{CardcheckError, Result};
use crate::fields::{extract_dates, extract_lots, normalize_dates};
use crate::fuzzy::{classify, ManufacturerVocabulary};
use crate::models::config::{CardcheckConfig, ExtractionConfig};
use crate::models::document::DocumentRef;
use crate::models::record::{FieldEvidence, Outcome, ValidationRecord};
use crate::ocr::{OcrEngine, TesseractEngine};
use crate::pdf::{PageRenderer, PopplerRenderer};
use crate::scoring::score;

/// Documents between two progress log lines.
pub const PROGRESS_INTERVAL: usize = 10;

/// List the documents of an input directory.
///
/// Only regular, non-hidden files count; symlinks are followed and dangling
/// ones skipped. Names in `skip` (typically the report file of a previous
/// run) are left out. The result is sorted by file name.
pub fn discover_documents(dir: &Path, skip: &[&str]) -> Result<Vec<DocumentRef>> {
    if !dir.is_dir() {
        return Err(CardcheckError::NotADirectory(dir.to_path_buf()));
    }

    let mut documents = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || skip.contains(&name.as_str()) {
            continue;
        }
        documents.push(DocumentRef::from_path(entry.path()));
    }

    documents.sort_by(|a, b| a.filename.cmp(&b.filename));
    debug!("Found {} documents in {}", documents.len(), dir.display());
    Ok(documents)
}

/// Records of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// One record per document, in input order.
    pub records: Vec<ValidationRecord>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn valid_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_valid).count()
    }

    pub fn unreadable_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == Outcome::Unreadable)
            .count()
    }
}

/// Checks documents against the marker and manufacturer vocabularies.
pub struct Pipeline<O: OcrEngine = TesseractEngine, R: PageRenderer = PopplerRenderer> {
    acquirer: TextAcquirer<O, R>,
    vocabulary: ManufacturerVocabulary,
    extraction: ExtractionConfig,
}

impl Pipeline {
    /// Create a pipeline backed by tesseract and pdftoppm.
    pub fn from_config(config: &CardcheckConfig, vocabulary: ManufacturerVocabulary) -> Self {
        Self::new(
            TextAcquirer::from_config(config),
            vocabulary,
            config.extraction.clone(),
        )
    }
}

impl<O: OcrEngine, R: PageRenderer> Pipeline<O, R> {
    pub fn new(
        acquirer: TextAcquirer<O, R>,
        vocabulary: ManufacturerVocabulary,
        extraction: ExtractionConfig,
    ) -> Self {
        Self {
            acquirer,
            vocabulary,
            extraction,
        }
    }

    pub fn vocabulary(&self) -> &ManufacturerVocabulary {
        &self.vocabulary
    }

    /// Extract field evidence from acquired text.
    ///
    /// Fields are only looked for once the marker phrase is found.
    pub fn evaluate_text(&self, text: &ExtractedText) -> FieldEvidence {
        let threshold = self.extraction.match_threshold;

        let marker = classify(&text.content, &self.extraction.marker_terms, threshold);
        if !marker.is_match() {
            debug!("Marker not found (best score {})", marker.score);
            return FieldEvidence::marker_not_found(text.source);
        }

        let manufacturer = classify(&text.content, self.vocabulary.terms(), threshold);
        let manufacturer_raw = manufacturer.term_or_empty().to_string();
        let canonical = if manufacturer_raw.is_empty() {
            String::new()
        } else {
            self.vocabulary.canonical_name(&manufacturer_raw).to_string()
        };
        debug!(
            "Manufacturer {:?} (score {}, {:?})",
            canonical, manufacturer.score, manufacturer.scorer
        );

        FieldEvidence {
            has_vaccine_marker: true,
            manufacturer_raw,
            manufacturer: canonical,
            dates: normalize_dates(&extract_dates(&text.content)),
            lot_numbers: extract_lots(&text.content),
            flag: String::new(),
            text_source: Some(text.source),
        }
    }

    /// Check a single document.
    ///
    /// Only an unavailable engine is an error; everything else ends up in
    /// the record.
    pub async fn process_document(&self, doc: &DocumentRef) -> Result<ValidationRecord> {
        debug!("Processing {}", doc.filename);

        let evidence = match self.acquirer.acquire(doc).await? {
            Acquisition::Text(text) => self.evaluate_text(&text),
            Acquisition::Failed(_) => FieldEvidence::unreadable(),
        };

        let record = score(doc, evidence);
        debug!(
            "{}: {:?} ({} checks)",
            doc.filename, record.outcome, record.valid_checks
        );
        Ok(record)
    }

    /// Check every document, keeping input order.
    ///
    /// Up to `jobs` documents are in flight at once. The first fatal error
    /// stops the run and drops whatever is still in flight. `on_record` is
    /// called as each record becomes available.
    pub async fn run<F>(&self, documents: &[DocumentRef], jobs: usize, mut on_record: F) -> Result<RunReport>
    where
        F: FnMut(&ValidationRecord),
    {
        let started = Instant::now();
        let processed = AtomicUsize::new(0);
        let processed = &processed;

        let records = stream::iter(documents)
            .map(|doc| async move {
                let record = self.process_document(doc).await?;
                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % PROGRESS_INTERVAL == 0 {
                    info!("{} files processed.", done);
                }
                Ok::<_, CardcheckError>(record)
            })
            .buffered(jobs.max(1))
            .inspect_ok(|record| on_record(record))
            .try_collect::<Vec<_>>()
            .await?;

        let report = RunReport {
            records,
            elapsed: started.elapsed(),
        };
        info!(
            "Checked {} documents, {} valid, {} unreadable in {:.1}s",
            report.total(),
            report.valid_count(),
            report.unreadable_count(),
            report.elapsed.as_secs_f64()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::tests::{tiny_png, FakeOcr, FakeRenderer};
    use crate::models::record::{TextSource, FLAG_MARKER_NOT_FOUND, FLAG_UNREADABLE};
    use pretty_assertions::assert_eq;

    fn vocabulary() -> ManufacturerVocabulary {
        ManufacturerVocabulary::from_pairs([
            ("Moderna", "Moderna"),
            ("Pfizer", "Pfizer-BioNTech"),
            ("Janssen", "Johnson & Johnson"),
        ])
    }

    fn pipeline(ocr: FakeOcr) -> Pipeline<FakeOcr, FakeRenderer> {
        let extraction = ExtractionConfig::default();
        Pipeline::new(
            TextAcquirer::new(ocr, FakeRenderer::default(), &extraction),
            vocabulary(),
            extraction,
        )
    }

    #[test]
    fn test_full_record_is_valid() {
        let pipeline = pipeline(FakeOcr::default());
        let text = ExtractedText::new(
            "COVID-19 Vaccination Record Card\nModerna\nLot EJ1234\n 03/15/2021",
            TextSource::OcrFromImage,
        );

        let evidence = pipeline.evaluate_text(&text);
        assert!(evidence.has_vaccine_marker);
        assert_eq!(evidence.manufacturer, "Moderna");
        assert_eq!(evidence.lot_numbers, vec!["EJ1234"]);
        assert_eq!(evidence.dates, vec!["03/15/2021"]);
        assert_eq!(evidence.flag, "");

        let record = score(&DocumentRef::from_path("/in/1_card.png"), evidence);
        assert_eq!(record.valid_checks, 3);
        assert!(record.is_valid);
    }

    #[test]
    fn test_canonical_manufacturer_name() {
        let pipeline = pipeline(FakeOcr::default());
        let text = ExtractedText::new(
            "COVID-19 Vaccine Pfizer 1st dose 01/05/2021",
            TextSource::NativePdfText,
        );

        let evidence = pipeline.evaluate_text(&text);
        assert_eq!(evidence.manufacturer_raw, "Pfizer");
        assert_eq!(evidence.manufacturer, "Pfizer-BioNTech");
        assert_eq!(evidence.text_source, Some(TextSource::NativePdfText));
    }

    #[test]
    fn test_missing_marker_skips_fields() {
        let pipeline = pipeline(FakeOcr::default());
        let text = ExtractedText::new(
            "Grocery receipt Moderna EJ1234 03/15/2021",
            TextSource::OcrFromImage,
        );

        let evidence = pipeline.evaluate_text(&text);
        assert!(!evidence.has_vaccine_marker);
        assert!(evidence.dates.is_empty());
        assert!(evidence.lot_numbers.is_empty());
        assert_eq!(evidence.manufacturer, "");
        assert_eq!(evidence.flag, FLAG_MARKER_NOT_FOUND);
    }

    #[test]
    fn test_empty_text_is_invalid() {
        let pipeline = pipeline(FakeOcr::default());
        let evidence = pipeline.evaluate_text(&ExtractedText::new("", TextSource::OcrFromImage));

        let record = score(&DocumentRef::from_path("/in/2_blank.png"), evidence);
        assert!(!record.is_valid);
        assert!(!record.evidence.flag.is_empty());
        assert_eq!(record.outcome, Outcome::Invalid);
    }

    #[test]
    fn test_discover_documents() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b_2.png", "a_1.pdf", ".hidden.png", "vaccine_data.csv"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let docs = discover_documents(dir.path(), &["vaccine_data.csv"]).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["a_1.pdf", "b_2.png"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_follows_symlinks() {
        let store = tempfile::tempdir().unwrap();
        let target = store.path().join("scan.pdf");
        std::fs::write(&target, b"x").unwrap();

        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("3_linked.pdf")).unwrap();
        std::os::unix::fs::symlink(store.path(), dir.path().join("4_dir_link")).unwrap();
        std::os::unix::fs::symlink(store.path().join("gone.pdf"), dir.path().join("5_dangling.pdf")).unwrap();

        let docs = discover_documents(dir.path(), &[]).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["3_linked.pdf"]);
        assert_eq!(docs[0].path, dir.path().join("3_linked.pdf"));
    }

    #[test]
    fn test_discover_rejects_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = discover_documents(file.path(), &[]).unwrap_err();
        assert!(matches!(err, CardcheckError::NotADirectory(_)));
    }

    #[tokio::test]
    async fn test_run_keeps_order_and_continues_past_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1_bad.pdf"), b"garbage").unwrap();
        std::fs::write(dir.path().join("2_card.png"), tiny_png()).unwrap();
        std::fs::write(dir.path().join("3_bad.jpg"), b"also garbage").unwrap();

        let ocr = FakeOcr::returning("COVID-19 Vaccination Record Janssen 205A21A 04/02/2021");
        let pipeline = pipeline(ocr.clone());
        let docs = discover_documents(dir.path(), &[]).unwrap();

        let mut seen = Vec::new();
        let report = pipeline
            .run(&docs, 2, |record| seen.push(record.filename.clone()))
            .await
            .unwrap();

        assert_eq!(seen, vec!["1_bad.pdf", "2_card.png", "3_bad.jpg"]);
        assert_eq!(report.total(), 3);
        assert_eq!(report.valid_count(), 1);
        assert_eq!(report.unreadable_count(), 2);

        let bad = &report.records[0];
        assert_eq!(bad.id, "1");
        assert_eq!(bad.evidence.flag, FLAG_UNREADABLE);
        assert!(!bad.is_valid);

        let good = &report.records[1];
        assert_eq!(good.evidence.manufacturer, "Johnson & Johnson");
        assert_eq!(good.evidence.lot_numbers, vec!["205A21A"]);
        assert_eq!(good.evidence.text_source, Some(TextSource::OcrFromImage));
        assert!(good.is_valid);

        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_aborts_on_unavailable_engine() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("1_card.png"), tiny_png()).unwrap();

        let pipeline = pipeline(FakeOcr::unavailable());
        let docs = discover_documents(dir.path(), &[]).unwrap();

        let err = pipeline.run(&docs, 1, |_| {}).await.unwrap_err();
        assert!(matches!(err, CardcheckError::EngineUnavailable { .. }));
    }
}

//! Input document references.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How a document's text has to be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// PDF: try the text layer first, OCR a rendering second.
    Pdf,
    /// Anything else is treated as an image and sent straight to OCR.
    Image,
}

/// One input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// File name without directory.
    pub filename: String,

    /// Identifier taken from the file name: everything before the first
    /// underscore. Not validated and not guaranteed to be unique.
    pub derived_id: String,

    /// Full path to the file.
    #[serde(skip)]
    pub path: PathBuf,

    /// Acquisition strategy for this file.
    pub kind: DocumentKind,
}

impl DocumentRef {
    /// Build a reference from a file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            derived_id: derive_id(&filename).to_string(),
            kind: kind_of(&path),
            filename,
            path,
        }
    }
}

/// Token preceding the first underscore, or the whole name when there is none.
pub fn derive_id(filename: &str) -> &str {
    filename.split('_').next().unwrap_or(filename)
}

fn kind_of(path: &Path) -> DocumentKind {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        DocumentKind::Pdf
    } else {
        DocumentKind::Image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_id() {
        assert_eq!(derive_id("12345_front.jpg"), "12345");
        assert_eq!(derive_id("12345_card_scan_2.pdf"), "12345");
        assert_eq!(derive_id("nounderscore.png"), "nounderscore.png");
        assert_eq!(derive_id("_leading.png"), "");
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentRef::from_path("/in/1_a.PDF").kind, DocumentKind::Pdf);
        assert_eq!(DocumentRef::from_path("/in/1_a.pdf").kind, DocumentKind::Pdf);
        assert_eq!(DocumentRef::from_path("/in/1_a.jpeg").kind, DocumentKind::Image);
        assert_eq!(DocumentRef::from_path("/in/1_a").kind, DocumentKind::Image);
    }

    #[test]
    fn test_from_path_fields() {
        let doc = DocumentRef::from_path("/scans/A77_card.png");
        assert_eq!(doc.filename, "A77_card.png");
        assert_eq!(doc.derived_id, "A77");
        assert_eq!(doc.path, PathBuf::from("/scans/A77_card.png"));
    }
}

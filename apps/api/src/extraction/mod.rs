//! Text extraction boundary: document bytes in, page-ordered text out.
//!
//! The PDF backend is `pdf-extract`. Extraction is CPU-bound, so the HTTP layer calls
//! `extract_on_blocking_pool` rather than `TextExtractor::extract` directly.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

const PDF_SIGNATURE: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Document is empty")]
    Empty,

    #[error("Document is not a PDF")]
    UnsupportedFormat,

    #[error("Could not read PDF: {0}")]
    Parse(String),

    #[error("PDF contains no pages")]
    NoPages,

    #[error("Text extraction aborted")]
    Aborted,
}

/// Turns a document byte stream into one text stream, pages in order.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Production extractor over `pdf-extract`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        check_signature(bytes)?;
        if !has_page_objects(bytes) {
            return Err(ExtractionError::NoPages);
        }

        let text = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Parse(e.to_string()))?;

        if text.trim().is_empty() {
            warn!("PDF parsed but yielded no text (scanned or image-only document?)");
        }
        debug!("Extracted {} characters from {} bytes", text.len(), bytes.len());
        Ok(text)
    }
}

fn check_signature(bytes: &[u8]) -> Result<(), ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }
    // The header may be preceded by junk within the first 1024 bytes.
    let window = &bytes[..bytes.len().min(1024)];
    if window
        .windows(PDF_SIGNATURE.len())
        .any(|w| w == PDF_SIGNATURE)
    {
        Ok(())
    } else {
        Err(ExtractionError::UnsupportedFormat)
    }
}

/// Cheap pre-check for at least one `/Type /Page` dictionary.
///
/// Compressed object streams can hide page dictionaries, so a negative here only
/// counts when no object streams are present either.
fn has_page_objects(bytes: &[u8]) -> bool {
    let contains = |needle: &[u8]| bytes.windows(needle.len()).any(|w| w == needle);
    contains(b"/Page") || contains(b"/ObjStm")
}

/// Runs `extractor` on tokio's blocking pool. A panic inside the backend surfaces
/// as `ExtractionError::Aborted`.
pub async fn extract_on_blocking_pool(
    extractor: Arc<dyn TextExtractor>,
    bytes: Vec<u8>,
) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extractor.extract(&bytes))
        .await
        .map_err(|e| {
            warn!("Extraction task failed: {e}");
            ExtractionError::Aborted
        })?
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Extractor that treats the bytes as UTF-8 text.
    pub(crate) struct PlainTextExtractor;

    impl TextExtractor for PlainTextExtractor {
        fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
            if bytes.is_empty() {
                return Err(ExtractionError::Empty);
            }
            String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::Parse(e.to_string()))
        }
    }

    struct PanickingExtractor;

    impl TextExtractor for PanickingExtractor {
        fn extract(&self, _bytes: &[u8]) -> Result<String, ExtractionError> {
            panic!("backend blew up")
        }
    }

    /// Builds an uncompressed PDF with one Helvetica text line per page.
    fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let page_refs = (0..pages.len())
            .map(|i| format!("{} 0 R", 4 + 2 * i))
            .collect::<Vec<_>>()
            .join(" ");
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!("<< /Type /Pages /Kids [{page_refs}] /Count {} >>", pages.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];
        for (i, text) in pages.iter().enumerate() {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + 2 * i
            ));
            let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
            objects.push(format!(
                "<< /Length {} >>\nstream\n{content}\nendstream",
                content.len()
            ));
        }

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend(format!("{} 0 obj\n{object}\nendobj\n", i + 1).bytes());
        }
        let xref_at = pdf.len();
        pdf.extend(format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).bytes());
        for offset in offsets {
            pdf.extend(format!("{offset:010} 00000 n \n").bytes());
        }
        pdf.extend(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
                objects.len() + 1
            )
            .bytes(),
        );
        pdf
    }

    #[test]
    fn test_pdf_text_comes_back_in_page_order() {
        let pdf = pdf_with_pages(&["Alpha", "Omega"]);
        let text = PdfTextExtractor.extract(&pdf).unwrap();
        let first = text.find("Alpha").expect("first page text");
        let second = text.find("Omega").expect("second page text");
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_pdf_extraction_on_blocking_pool() {
        let pdf = pdf_with_pages(&["Resume"]);
        let text = extract_on_blocking_pool(Arc::new(PdfTextExtractor), pdf)
            .await
            .unwrap();
        assert!(text.contains("Resume"));
    }

    #[test]
    fn test_empty_bytes_are_rejected() {
        assert!(matches!(
            PdfTextExtractor.extract(&[]),
            Err(ExtractionError::Empty)
        ));
    }

    #[test]
    fn test_non_pdf_signature_is_rejected() {
        assert!(matches!(
            PdfTextExtractor.extract(b"PK\x03\x04 this is a zip"),
            Err(ExtractionError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_pdf_without_pages_is_rejected() {
        assert!(matches!(
            PdfTextExtractor.extract(b"%PDF-1.7\n%%EOF"),
            Err(ExtractionError::NoPages)
        ));
    }

    #[test]
    fn test_signature_may_follow_leading_bytes() {
        assert!(check_signature(b"\xEF\xBB\xBF%PDF-1.4").is_ok());
    }

    #[tokio::test]
    async fn test_blocking_pool_returns_text() {
        let text = extract_on_blocking_pool(Arc::new(PlainTextExtractor), b"hello".to_vec())
            .await
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn test_backend_panic_becomes_aborted() {
        let result = extract_on_blocking_pool(Arc::new(PanickingExtractor), b"x".to_vec()).await;
        assert!(matches!(result, Err(ExtractionError::Aborted)));
    }
}

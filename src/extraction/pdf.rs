//! PDF text-layer extraction

use crate::extraction::ExtractionError;
use lopdf::Document;
use tracing::debug;

/// Reads the embedded text layer of a PDF; scanned PDFs yield no text
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Text of every page in page order, one page per line block
    pub fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let document = Document::load_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))?;

        let mut text = String::new();
        let pages = document.get_pages();
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(page_text) => {
                    text.push_str(page_text.trim());
                    text.push('\n');
                }
                Err(e) => {
                    debug!(page = page_number, error = %e, "Skipping unreadable PDF page");
                }
            }
        }

        debug!(pages = pages.len(), chars = text.len(), "PDF text extracted");
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pdf_is_an_error() {
        let result = PdfTextExtractor::new().extract(b"not a pdf at all");
        assert!(matches!(result, Err(ExtractionError::Pdf(_))));
    }
}

//! Text extraction from submitted documents.
//!
//! Extraction never fails outright: any error is turned into a short
//! placeholder description of the document so the rest of the pipeline can
//! still score it.

pub mod ocr;
pub mod pdf;

pub use ocr::{OcrEngine, TesseractOcr};
pub use pdf::PdfTextExtractor;

use crate::config::ExtractionConfig;
use crate::types::document::{Document, DocumentContent, MediaType};
use image::DynamicImage;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF parsing failed: {0}")]
    Pdf(String),
    #[error("failed to read image: {0}")]
    Image(String),
    #[error("OCR failed: {0}")]
    Ocr(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How the text of a document was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Submitted as text
    Direct,
    /// Uploaded `.txt` file
    PlainText,
    PdfTextLayer,
    Ocr,
    /// Extraction failed or found nothing; text describes the document instead
    Placeholder,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Direct => "direct",
            ExtractionMethod::PlainText => "plain_text",
            ExtractionMethod::PdfTextLayer => "pdf_text_layer",
            ExtractionMethod::Ocr => "ocr",
            ExtractionMethod::Placeholder => "placeholder",
        }
    }
}

/// Extracted text and how it was produced
#[derive(Debug, Clone)]
pub struct Extraction {
    pub text: String,
    pub method: ExtractionMethod,
}

impl Extraction {
    fn new(text: String, method: ExtractionMethod) -> Self {
        Self { text, method }
    }

    fn placeholder(text: String) -> Self {
        Self::new(text, ExtractionMethod::Placeholder)
    }

    pub fn is_placeholder(&self) -> bool {
        self.method == ExtractionMethod::Placeholder
    }
}

/// Dispatches documents to the extractor for their media type
pub struct TextExtractor {
    pdf: PdfTextExtractor,
    ocr: Box<dyn OcrEngine>,
}

impl TextExtractor {
    /// Extractor using Tesseract for images
    pub fn new(config: &ExtractionConfig) -> Self {
        Self::with_ocr_engine(Box::new(TesseractOcr::new(config)))
    }

    pub fn with_ocr_engine(ocr: Box<dyn OcrEngine>) -> Self {
        Self {
            pdf: PdfTextExtractor::new(),
            ocr,
        }
    }

    /// Extract text from `document`. Never fails.
    pub fn extract(&self, document: &Document) -> Extraction {
        let bytes = match &document.content {
            DocumentContent::Text(text) => {
                return Extraction::new(text.clone(), ExtractionMethod::Direct)
            }
            DocumentContent::Bytes(bytes) => bytes,
        };
        let name = document.display_name();

        match document.media_type {
            MediaType::Text => Extraction::new(
                String::from_utf8_lossy(bytes).into_owned(),
                ExtractionMethod::PlainText,
            ),
            MediaType::Pdf => self.extract_pdf(bytes, name),
            MediaType::Image => self.extract_image(bytes, name),
        }
    }

    fn extract_pdf(&self, bytes: &[u8], name: &str) -> Extraction {
        match self.pdf.extract(bytes) {
            Ok(text) if !text.trim().is_empty() => {
                Extraction::new(text, ExtractionMethod::PdfTextLayer)
            }
            Ok(_) => {
                info!(filename = %name, "PDF has no text layer");
                Extraction::placeholder(format!("PDF document: {} (no text layer found)", name))
            }
            Err(e) => {
                warn!(filename = %name, error = %e, "PDF text extraction failed");
                Extraction::placeholder(format!("PDF document: {} (extraction failed: {})", name, e))
            }
        }
    }

    fn extract_image(&self, bytes: &[u8], name: &str) -> Extraction {
        let image = match image::load_from_memory(bytes) {
            Ok(image) => image,
            Err(e) => {
                warn!(filename = %name, error = %e, "Failed to decode image");
                return Extraction::placeholder(format!(
                    "Image document: {} (failed to read image)",
                    name
                ));
            }
        };

        match self.recognize(&image) {
            Ok(text) if !text.is_empty() => {
                info!(filename = %name, engine = self.ocr.name(), chars = text.len(), "OCR text extracted");
                Extraction::new(text, ExtractionMethod::Ocr)
            }
            Ok(_) => Extraction::placeholder(format!(
                "Image document: {} ({}x{}, {:?}) - No text detected via OCR",
                name,
                image.width(),
                image.height(),
                image.color()
            )),
            Err(e) => {
                warn!(filename = %name, engine = self.ocr.name(), error = %e, "OCR processing failed");
                Extraction::placeholder(format!(
                    "Image document: {} (OCR processing failed: {})",
                    name, e
                ))
            }
        }
    }

    /// OCR the grayscale image, retrying on its binarized form when nothing is found
    fn recognize(&self, image: &DynamicImage) -> Result<String, ExtractionError> {
        let gray = image.to_luma8();

        let text = normalize_whitespace(&self.ocr.recognize(&gray)?);
        if !text.is_empty() {
            return Ok(text);
        }

        let binary = ocr::binarize(&gray);
        Ok(normalize_whitespace(&self.ocr.recognize(&binary)?))
    }
}

/// Collapse runs of whitespace into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma};
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns canned responses in order, then empty text
    struct ScriptedOcr {
        responses: Vec<Result<String, String>>,
        calls: Arc<AtomicUsize>,
    }

    impl OcrEngine for ScriptedOcr {
        fn name(&self) -> &str {
            "scripted"
        }

        fn recognize(&self, _image: &GrayImage) -> Result<String, ExtractionError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.responses.get(call) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(message)) => Err(ExtractionError::Ocr(message.clone())),
                None => Ok(String::new()),
            }
        }
    }

    fn extractor(responses: Vec<Result<String, String>>) -> (TextExtractor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let engine = ScriptedOcr {
            responses,
            calls: calls.clone(),
        };
        (TextExtractor::with_ocr_engine(Box::new(engine)), calls)
    }

    fn png_bytes() -> Vec<u8> {
        let image = GrayImage::from_pixel(8, 6, Luma([200]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_direct_text_passthrough() {
        let (extractor, _) = extractor(vec![]);
        let extraction = extractor.extract(&Document::from_text("  Sale deed text  "));
        assert_eq!(extraction.text, "  Sale deed text  ");
        assert_eq!(extraction.method, ExtractionMethod::Direct);
    }

    #[test]
    fn test_text_file_is_decoded_lossily() {
        let (extractor, _) = extractor(vec![]);
        let document = Document::from_file(b"lease \xFF agreement".to_vec(), MediaType::Text, "a.txt");
        let extraction = extractor.extract(&document);
        assert_eq!(extraction.method, ExtractionMethod::PlainText);
        assert!(extraction.text.starts_with("lease "));
        assert!(extraction.text.ends_with(" agreement"));
    }

    #[test]
    fn test_invalid_pdf_becomes_placeholder() {
        let (extractor, _) = extractor(vec![]);
        let document = Document::from_file(b"garbage".to_vec(), MediaType::Pdf, "deed.pdf");
        let extraction = extractor.extract(&document);
        assert!(extraction.is_placeholder());
        assert!(extraction.text.starts_with("PDF document: deed.pdf (extraction failed"));
    }

    #[test]
    fn test_image_ocr_normalizes_whitespace() {
        let (extractor, calls) = extractor(vec![Ok("RERA\n  Certificate\tNo 12\n".to_string())]);
        let document = Document::from_file(png_bytes(), MediaType::Image, "scan.png");
        let extraction = extractor.extract(&document);
        assert_eq!(extraction.method, ExtractionMethod::Ocr);
        assert_eq!(extraction.text, "RERA Certificate No 12");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_image_ocr_retries_on_binarized_image() {
        let (extractor, calls) = extractor(vec![Ok("  \n".to_string()), Ok("Lease deed".to_string())]);
        let document = Document::from_file(png_bytes(), MediaType::Image, "scan.png");
        let extraction = extractor.extract(&document);
        assert_eq!(extraction.text, "Lease deed");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_image_without_text_describes_image() {
        let (extractor, _) = extractor(vec![]);
        let document = Document::from_file(png_bytes(), MediaType::Image, "blank.png");
        let extraction = extractor.extract(&document);
        assert!(extraction.is_placeholder());
        assert!(extraction.text.starts_with("Image document: blank.png (8x6, "));
        assert!(extraction.text.ends_with("No text detected via OCR"));
    }

    #[test]
    fn test_ocr_failure_becomes_placeholder() {
        let (extractor, _) = extractor(vec![Err("engine crashed".to_string())]);
        let document = Document::from_file(png_bytes(), MediaType::Image, "scan.png");
        let extraction = extractor.extract(&document);
        assert!(extraction.is_placeholder());
        assert_eq!(
            extraction.text,
            "Image document: scan.png (OCR processing failed: OCR failed: engine crashed)"
        );
    }

    #[test]
    fn test_undecodable_image_becomes_placeholder() {
        let (extractor, calls) = extractor(vec![]);
        let document = Document::from_file(b"not an image".to_vec(), MediaType::Image, "x.jpg");
        let extraction = extractor.extract(&document);
        assert_eq!(extraction.text, "Image document: x.jpg (failed to read image)");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

//! Submitted document and document-type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declared media type of a submitted document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Pdf,
    Image,
    Text,
}

impl MediaType {
    /// Resolve the media type from a file extension (without the dot).
    ///
    /// Returns `None` for extensions the service does not accept.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(MediaType::Pdf),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" => Some(MediaType::Image),
            "txt" => Some(MediaType::Text),
            _ => None,
        }
    }

    /// Resolve the media type from a filename's extension
    pub fn from_filename(filename: &str) -> Option<Self> {
        extension_of(filename).and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Pdf => "pdf",
            MediaType::Image => "image",
            MediaType::Text => "text",
        }
    }
}

/// Extension of a filename (text after the last dot), if it has one
pub fn extension_of(filename: &str) -> Option<&str> {
    let (_, ext) = filename.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

/// Document content as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentContent {
    /// Raw file bytes (PDF, image or text file upload)
    Bytes(Vec<u8>),
    /// Text submitted directly
    Text(String),
}

/// A single submitted artifact to be verified.
///
/// Constructed per request and dropped once the pipeline completes.
#[derive(Debug, Clone)]
pub struct Document {
    pub content: DocumentContent,
    pub media_type: MediaType,
    pub filename: Option<String>,
}

impl Document {
    /// Document from raw text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: DocumentContent::Text(text.into()),
            media_type: MediaType::Text,
            filename: None,
        }
    }

    /// Document from uploaded file bytes
    pub fn from_file(bytes: Vec<u8>, media_type: MediaType, filename: impl Into<String>) -> Self {
        Self {
            content: DocumentContent::Bytes(bytes),
            media_type,
            filename: Some(filename.into()),
        }
    }

    /// Bytes that identify this document for hashing: the original file
    /// bytes for uploads, the UTF-8 encoding for raw text.
    pub fn hash_input(&self) -> &[u8] {
        match &self.content {
            DocumentContent::Bytes(bytes) => bytes,
            DocumentContent::Text(text) => text.as_bytes(),
        }
    }

    /// Filename for display and placeholder text
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("document")
    }
}

/// Canonical document label set.
///
/// Legacy model exports use other taxonomies; see [`DocumentType::from_model_label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    ReraCertificate,
    SaleDeed,
    LeaseAgreement,
    PropertyAgreement,
    Invalid,
    Unknown,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::ReraCertificate,
        DocumentType::SaleDeed,
        DocumentType::LeaseAgreement,
        DocumentType::PropertyAgreement,
        DocumentType::Invalid,
        DocumentType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::ReraCertificate => "rera_certificate",
            DocumentType::SaleDeed => "sale_deed",
            DocumentType::LeaseAgreement => "lease_agreement",
            DocumentType::PropertyAgreement => "property_agreement",
            DocumentType::Invalid => "invalid",
            DocumentType::Unknown => "unknown",
        }
    }

    /// Map a class name emitted by a trained model onto the canonical set.
    ///
    /// Accepts the canonical names plus the legacy `real_estate`/`valid`
    /// (→ property_agreement) and `fake` (→ invalid) labels. Anything else
    /// is `Unknown`.
    pub fn from_model_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "real_estate" | "valid" => DocumentType::PropertyAgreement,
            "fake" => DocumentType::Invalid,
            other => other.parse().unwrap_or(DocumentType::Unknown),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown document type: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_extension() {
        assert_eq!(MediaType::from_extension("PDF"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_extension("jpeg"), Some(MediaType::Image));
        assert_eq!(MediaType::from_extension("tiff"), Some(MediaType::Image));
        assert_eq!(MediaType::from_extension("txt"), Some(MediaType::Text));
        assert_eq!(MediaType::from_extension("docx"), None);
    }

    #[test]
    fn test_media_type_from_filename() {
        assert_eq!(MediaType::from_filename("deed.final.pdf"), Some(MediaType::Pdf));
        assert_eq!(MediaType::from_filename("scan.PNG"), Some(MediaType::Image));
        assert_eq!(MediaType::from_filename("README"), None);
        assert_eq!(MediaType::from_filename("trailing."), None);
    }

    #[test]
    fn test_model_label_mapping() {
        assert_eq!(DocumentType::from_model_label("sale_deed"), DocumentType::SaleDeed);
        assert_eq!(
            DocumentType::from_model_label("real_estate"),
            DocumentType::PropertyAgreement
        );
        assert_eq!(DocumentType::from_model_label("valid"), DocumentType::PropertyAgreement);
        assert_eq!(DocumentType::from_model_label("FAKE"), DocumentType::Invalid);
        assert_eq!(DocumentType::from_model_label("LABEL_7"), DocumentType::Unknown);
    }

    #[test]
    fn test_document_type_serialization() {
        let json = serde_json::to_string(&DocumentType::ReraCertificate).unwrap();
        assert_eq!(json, "\"rera_certificate\"");
        let back: DocumentType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DocumentType::ReraCertificate);
    }

    #[test]
    fn test_hash_input() {
        let doc = Document::from_text("abc");
        assert_eq!(doc.hash_input(), b"abc");

        let doc = Document::from_file(vec![1, 2, 3], MediaType::Image, "scan.png");
        assert_eq!(doc.hash_input(), &[1, 2, 3]);
        assert_eq!(doc.display_name(), "scan.png");
    }
}

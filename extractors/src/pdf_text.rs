use shared_types::ExtractionError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

/// Decodes PDF documents into cleaned, single-line text
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Read a PDF from disk and return its cleaned text
    pub fn extract_file(&self, path: &Path) -> Result<String, ExtractionError> {
        let bytes = std::fs::read(path).map_err(|source| ExtractionError::Io {
            path: path.display().to_string(),
            source,
        })?;

        self.extract_bytes(&bytes)
    }

    /// Decode in-memory PDF bytes and return their cleaned text
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        // pdf-extract can panic on malformed fonts and streams
        let raw = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
            .map_err(|_| ExtractionError::Decode("PDF decoder panicked".to_string()))?
            .map_err(|e| ExtractionError::Decode(e.to_string()))?;

        tracing::debug!("Decoded {} characters of raw PDF text", raw.len());

        let cleaned = clean_text(&raw);
        if cleaned.is_empty() {
            return Err(ExtractionError::EmptyText);
        }

        Ok(cleaned)
    }
}

/// Collapse every whitespace run (newlines included) to one space and trim
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_collapses_whitespace() {
        let dirty = "  Date of Birth:\n\n 05/ 03/1990 \t Age:  34  \r\n";
        assert_eq!(clean_text(dirty), "Date of Birth: 05/ 03/1990 Age: 34");
    }

    #[test]
    fn test_clean_text_of_blank_input_is_empty() {
        assert_eq!(clean_text(" \n\t "), "");
    }

    #[test]
    fn test_non_pdf_bytes_fail_to_decode() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract_bytes(b"this is a plain text file, not a PDF");
        assert!(matches!(result, Err(ExtractionError::Decode(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract_file(Path::new("/definitely/not/here.pdf"));
        assert!(matches!(result, Err(ExtractionError::Io { .. })));
    }
}

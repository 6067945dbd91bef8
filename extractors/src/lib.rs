//! Extractors Crate
//!
//! This crate turns uploaded resume PDFs into candidate fields and side assets.
//! It is designed to be reusable independently of the intake API.
//!
//! # Architecture
//!
//! - **Types**: Field mapping and error types are defined in the `shared-types` crate
//! - **Implementations**: Concrete extractors are implemented in this crate
//!
//! # Available Extractors
//!
//! - `PdfTextExtractor`: Decodes a PDF and collapses its text into a single line
//! - `CandidateFieldExtractor`: Applies the fixed candidate pattern table to cleaned text
//! - `ImageExtractor`: Writes embedded raster images to an output directory
//! - `PdftotextTableExtractor`: Best-effort table rows from `pdftotext -layout`
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{CandidateFieldExtractor, PdfTextExtractor};
//! use shared_types::FieldExtractor;
//!
//! let text = PdfTextExtractor::new().extract_file(path)?;
//! let fields = CandidateFieldExtractor::new()?.extract(&text);
//! ```

pub mod assets;
pub mod candidate_fields;
pub mod pdf_text;

// Re-export commonly used types
pub use assets::{
    ImageExtractor, NoopTableExtractor, PdftotextTableExtractor, Table, TableExtractor,
};
pub use candidate_fields::{CandidateFieldExtractor, CANDIDATE_PATTERNS};
pub use pdf_text::{clean_text, PdfTextExtractor};

// Re-export the FieldExtractor trait from shared-types for convenience
pub use shared_types::FieldExtractor;

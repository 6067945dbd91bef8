use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ExtractedFields;

/// Result of taking one uploaded document through the intake pipeline
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProcessedDocument {
    pub candidate_id: i64,
    pub pdf_path: String,
    pub fields: ExtractedFields,
    pub images: Vec<String>,
    pub tables: usize,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProcessedDocumentResponse {
    pub file_name: String,
    pub document: ProcessedDocument,
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod candidate;
pub mod extraction;
pub mod intake;

pub use candidate::{
    CandidateDetailsResponse, CandidateRecord, CandidatesResponse, CreateEducationRequest,
    CreateExperienceRequest, CreateSkillRequest, DeleteCandidateResponse, Education, Experience,
    Skill,
};
pub use intake::{ProcessedDocument, ProcessedDocumentResponse};

// Re-export extraction types
pub use extraction::*;

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

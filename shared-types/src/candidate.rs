use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A stored candidate joined with its latest processed document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CandidateRecord {
    pub candidate_id: i64,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub permanent_address: Option<String>,
    pub current_address: Option<String>,
    pub date_of_birth: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub passport_number: Option<String>,
    pub mobile: Option<String>,
    pub pan_number: Option<String>,
    pub visa_status: Option<String>,
    pub email: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub relocation_availability: Option<String>,

    // From PDFData
    pub pdf_path: Option<String>,
    pub processed_date: Option<String>,
}

impl CandidateRecord {
    /// Every displayed value of the record, as text
    pub fn display_values(&self) -> Vec<String> {
        let mut values = vec![self.candidate_id.to_string()];
        values.extend(
            [
                &self.first_name,
                &self.middle_name,
                &self.last_name,
                &self.permanent_address,
                &self.current_address,
                &self.date_of_birth,
                &self.age,
                &self.gender,
                &self.passport_number,
                &self.mobile,
                &self.pan_number,
                &self.visa_status,
                &self.email,
                &self.emergency_contact_name,
                &self.emergency_contact_number,
                &self.relocation_availability,
                &self.processed_date,
            ]
            .into_iter()
            .flatten()
            .cloned(),
        );
        values
    }

    /// Case-insensitive substring match against any displayed value.
    /// An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        self.display_values()
            .iter()
            .any(|value| value.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Experience {
    pub id: i64,
    pub candidate_id: i64,
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub responsibilities: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Skill {
    pub id: i64,
    pub candidate_id: i64,
    pub skill_name: Option<String>,
    pub proficiency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Education {
    pub id: i64,
    pub candidate_id: i64,
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<f64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export)]
pub struct CreateExperienceRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub responsibilities: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export)]
pub struct CreateSkillRequest {
    pub skill_name: Option<String>,
    pub proficiency: Option<String>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export)]
pub struct CreateEducationRequest {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub graduation_date: Option<String>,
    pub gpa: Option<f64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CandidatesResponse {
    pub candidates: Vec<CandidateRecord>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CandidateDetailsResponse {
    pub candidate: CandidateRecord,
    pub experience: Vec<Experience>,
    pub skills: Vec<Skill>,
    pub education: Vec<Education>,
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeleteCandidateResponse {
    pub candidate_id: i64,
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, email: &str) -> CandidateRecord {
        CandidateRecord {
            candidate_id: id,
            first_name: Some("ASHA".to_string()),
            middle_name: None,
            last_name: Some("RAO".to_string()),
            permanent_address: None,
            current_address: Some("12 MG Road, Bengaluru".to_string()),
            date_of_birth: Some("05/03/1990".to_string()),
            age: Some("34".to_string()),
            gender: Some("F".to_string()),
            passport_number: None,
            mobile: Some("9876543210".to_string()),
            pan_number: None,
            visa_status: None,
            email: Some(email.to_string()),
            emergency_contact_name: None,
            emergency_contact_number: None,
            relocation_availability: Some("Yes".to_string()),
            pdf_path: Some("uploads/asha.pdf".to_string()),
            processed_date: Some("2026-01-25 10:00:00.000000".to_string()),
        }
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let r = record(7, "Asha.Rao@Example.com");
        assert!(r.matches("asha.rao@example"));
        assert!(r.matches("bengaluru"));
        assert!(r.matches("7"));
        assert!(r.matches(""));
        assert!(!r.matches("chennai"));
    }
}

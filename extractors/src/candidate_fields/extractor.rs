use crate::candidate_fields::CANDIDATE_PATTERNS;
use regex::{Regex, RegexBuilder};
use shared_types::{ExtractedFields, FieldExtractor};

pub struct CandidateFieldExtractor {
    patterns: Vec<CompiledPattern>,
}

struct CompiledPattern {
    key: String,
    regex: Regex,
}

impl CandidateFieldExtractor {
    /// Compile the built-in candidate field map
    pub fn new() -> Result<Self, regex::Error> {
        Self::from_patterns(CANDIDATE_PATTERNS.iter().copied())
    }

    /// Compile an arbitrary `(key, pattern)` table, keeping its order
    pub fn from_patterns<'a>(
        patterns: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, regex::Error> {
        let mut compiled = Vec::new();

        for (key, pattern) in patterns {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .dot_matches_new_line(true)
                .build()?;

            compiled.push(CompiledPattern {
                key: key.to_string(),
                regex,
            });
        }

        Ok(Self { patterns: compiled })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    pub fn extract_from_text(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::new();

        for pattern in &self.patterns {
            if fields.contains(&pattern.key) {
                continue;
            }

            if let Some(value) = pattern
                .regex
                .captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
            {
                fields.insert(pattern.key.clone(), value);
            }
        }

        tracing::debug!(
            "Matched {} of {} candidate fields",
            fields.len(),
            self.patterns.len()
        );

        fields
    }
}

impl FieldExtractor for CandidateFieldExtractor {
    fn extract(&self, text: &str) -> ExtractedFields {
        self.extract_from_text(text)
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::FIELD_KEYS;

    const FORM_TEXT: &str = "APPLICATION FORM 1. Name (Block Letters) (First, Middle, Last): \
        _ASHA_KUMARI_RAO_ (as per passport) 2. Permanent Address: Street Address: \
        ___12 MG Road___ City: ___Bengaluru___ State: ___Karnataka___ Zip Code: ___560001___ \
        Country: ___India___ 3. Current Address: Street Address: ___45 Park Street___ \
        City: ___Kolkata___ State: ___West Bengal___ Zip Code: ___700016___ Country: ___India___ \
        4. Date of Birth: 05/ 03/1990 Age: 34 Gender: F Passport: P1234567 \
        Mobile: _9876543210_ PAN No.: ABCDE1234F Visa: H1B_ Email ID: asha.rao@example.com_ \
        Name of Emergency Contact: Ravi Rao_ Emergency Contact's Number: 9123456780 \
        Available for Relocation: Yes";

    fn extractor() -> CandidateFieldExtractor {
        CandidateFieldExtractor::new().unwrap()
    }

    #[test]
    fn test_pattern_table_matches_field_keys() {
        let keys: Vec<&str> = CANDIDATE_PATTERNS.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, FIELD_KEYS);
        assert_eq!(extractor().pattern_count(), FIELD_KEYS.len());
    }

    #[test]
    fn test_extracts_full_form() {
        let fields = extractor().extract(FORM_TEXT);

        assert_eq!(fields.get("first_name"), Some("ASHA"));
        assert_eq!(fields.get("middle_name"), Some("KUMARI"));
        assert_eq!(fields.get("last_name"), Some("RAO"));
        assert_eq!(fields.get("permanent_street"), Some("12 MG Road"));
        assert_eq!(fields.get("permanent_city"), Some("Bengaluru"));
        assert_eq!(fields.get("permanent_zip"), Some("560001"));
        assert_eq!(fields.get("current_street"), Some("45 Park Street"));
        assert_eq!(fields.get("current_state"), Some("West Bengal"));
        assert_eq!(fields.get("dob"), Some("05/ 03/1990"));
        assert_eq!(fields.get("age"), Some("34"));
        assert_eq!(fields.get("gender"), Some("F"));
        assert_eq!(fields.get("passport"), Some("P1234567"));
        assert_eq!(fields.get("mobile"), Some("9876543210"));
        assert_eq!(fields.get("pan"), Some("ABCDE1234F"));
        assert_eq!(fields.get("visa"), Some("H1B"));
        assert_eq!(fields.get("email"), Some("asha.rao@example.com"));
        assert_eq!(fields.get("emergency_contact"), Some("Ravi Rao"));
        assert_eq!(fields.get("emergency_number"), Some("9123456780"));
        assert_eq!(fields.get("relocation"), Some("Yes"));
        assert_eq!(fields.len(), FIELD_KEYS.len());
    }

    #[test]
    fn test_date_of_birth_is_captured_literally() {
        let fields = extractor().extract("Personal Date of Birth: 21/11/1987 Age: 36");
        assert_eq!(fields.get("dob"), Some("21/11/1987"));
    }

    #[test]
    fn test_matching_ignores_case() {
        let fields = extractor().extract("date of birth: 01/02/2000 gender: m mobile: 12345");
        assert_eq!(fields.get("dob"), Some("01/02/2000"));
        assert_eq!(fields.get("gender"), Some("m"));
        assert_eq!(fields.get("mobile"), Some("12345"));
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let fields = extractor().extract("Mobile: _9876543210_ Age: 29");

        assert_eq!(fields.get("mobile"), Some("9876543210"));
        assert!(!fields.contains("email"));
        assert!(!fields.contains("first_name"));
        assert!(!fields.contains("dob"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_first_match_wins() {
        let fields = extractor().extract("Age: 41 ... Age: 52");
        assert_eq!(fields.get("age"), Some("41"));
    }

    #[test]
    fn test_empty_text_yields_no_fields() {
        assert!(extractor().extract("").is_empty());
    }

    #[test]
    fn test_invalid_custom_pattern_is_rejected() {
        let result = CandidateFieldExtractor::from_patterns([("broken", r"Age:\s*(\d+")]);
        assert!(result.is_err());
    }
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Core trait for turning cleaned document text into candidate fields
pub trait FieldExtractor {
    /// Extract every field whose pattern matches the text
    fn extract(&self, text: &str) -> ExtractedFields;

    /// Get extractor version for tracking
    fn version(&self) -> String {
        "1.0.0".to_string()
    }
}

/// Extraction error types
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF decode error: {0}")]
    Decode(String),

    #[error("Document contains no extractable text")]
    EmptyText,
}

/// Field keys produced by the candidate pattern table, in table order
pub const FIELD_KEYS: &[&str] = &[
    "first_name",
    "middle_name",
    "last_name",
    "permanent_street",
    "permanent_city",
    "permanent_state",
    "permanent_zip",
    "permanent_country",
    "current_street",
    "current_city",
    "current_state",
    "current_zip",
    "current_country",
    "dob",
    "age",
    "gender",
    "passport",
    "mobile",
    "pan",
    "visa",
    "email",
    "emergency_contact",
    "emergency_number",
    "relocation",
];

/// Field key -> captured value for every pattern that matched.
///
/// Fields that did not match are absent; a present value is never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(transparent)]
pub struct ExtractedFields(BTreeMap<String, String>);

impl ExtractedFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value; blank values are ignored so absence stays the only
    /// representation of a miss.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.0.insert(key.into(), trimmed.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Join the non-empty street, city, state, zip and country fragments
    /// for an address block (`"permanent"` or `"current"`).
    pub fn address(&self, prefix: &str) -> Option<String> {
        let parts: Vec<&str> = ["street", "city", "state", "zip", "country"]
            .iter()
            .filter_map(|part| self.get(&format!("{}_{}", prefix, part)))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExtractedFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_dropped() {
        let mut fields = ExtractedFields::new();
        fields.insert("email", "   ");
        fields.insert("mobile", " 9876543210 ");

        assert!(!fields.contains("email"));
        assert_eq!(fields.get("mobile"), Some("9876543210"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_address_skips_missing_fragments() {
        let fields: ExtractedFields = [
            ("current_street", "12 MG Road"),
            ("current_state", "Karnataka"),
            ("current_country", "India"),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            fields.address("current").as_deref(),
            Some("12 MG Road, Karnataka, India")
        );
        assert_eq!(fields.address("permanent"), None);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let fields: ExtractedFields = [("dob", "05/ 03/1990")].into_iter().collect();
        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"dob":"05/ 03/1990"}"#);
    }
}

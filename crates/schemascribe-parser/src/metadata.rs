//! Document-level metadata attached to every schema

use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::format::InputFormat;
use crate::markers::DATABASE_MARKER;

pub const SOURCE_KEY: &str = "source";
pub const LINE_COUNT_KEY: &str = "line_count";
pub const CHAR_COUNT_KEY: &str = "char_count";
pub const DETECTED_FORMAT_KEY: &str = "detected_format";
pub const DATABASE_NAME_KEY: &str = "database_name";
pub const PARSED_AT_KEY: &str = "parsed_at";

/// Origin recorded for in-memory text
pub const TEXT_SOURCE: &str = "text";

pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Size counters, format tag, database name and parse time
    pub fn extract(text: &str, format: InputFormat) -> BTreeMap<String, Value> {
        let mut metadata = BTreeMap::new();

        metadata.insert(SOURCE_KEY.to_string(), Value::from(TEXT_SOURCE));
        metadata.insert(LINE_COUNT_KEY.to_string(), Value::from(text.split('\n').count()));
        metadata.insert(CHAR_COUNT_KEY.to_string(), Value::from(text.chars().count()));
        metadata.insert(DETECTED_FORMAT_KEY.to_string(), Value::from(format.as_str()));
        metadata.insert(PARSED_AT_KEY.to_string(), Value::from(Utc::now().to_rfc3339()));

        if let Some(caps) = DATABASE_MARKER.captures(text) {
            metadata.insert(DATABASE_NAME_KEY.to_string(), Value::from(&caps[1]));
        }

        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines_and_characters() {
        let metadata = MetadataExtractor::extract("tabela: ação\ncampos: id", InputFormat::KeyValue);

        assert_eq!(metadata[LINE_COUNT_KEY], 2);
        assert_eq!(metadata[CHAR_COUNT_KEY], 23);
        assert_eq!(metadata[SOURCE_KEY], "text");
        assert_eq!(metadata[DETECTED_FORMAT_KEY], "key_value");
        assert!(!metadata.contains_key(DATABASE_NAME_KEY));
    }

    #[test]
    fn parsed_at_is_rfc3339() {
        let metadata = MetadataExtractor::extract("", InputFormat::Unknown);
        let parsed_at = metadata[PARSED_AT_KEY].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(parsed_at).is_ok());
        assert_eq!(metadata[LINE_COUNT_KEY], 1);
    }

    #[test]
    fn database_marker_is_recorded() {
        let metadata = MetadataExtractor::extract("Banco: contabil\ntabela: x", InputFormat::Unknown);
        assert_eq!(metadata[DATABASE_NAME_KEY], "contabil");
    }
}

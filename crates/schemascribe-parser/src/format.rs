//! Input format classification

use crate::markers::{CREATE_TABLE, FIELD_MARKER, MARKDOWN_TABLE, TABLE_MARKER};

/// Document layout recognized by the detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    /// `table: x` / `fields: ...` notes
    KeyValue,

    /// `CREATE TABLE` statements
    SqlDdl,

    /// Markdown headings naming tables
    Markdown,

    /// No signature matched
    Unknown,
}

impl InputFormat {
    /// Stable tag stored in schema metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KeyValue => "key_value",
            Self::SqlDdl => "sql_ddl",
            Self::Markdown => "markdown",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classifies raw text; first matching rule wins
pub struct FormatDetector;

impl FormatDetector {
    /// Detect the format of `text`
    ///
    /// Order: SQL DDL, then Markdown, then key-value (both a table marker
    /// and a field marker must be present), else unknown.
    pub fn detect(text: &str) -> InputFormat {
        let cleaned = text.trim();

        if CREATE_TABLE.is_match(cleaned) {
            return InputFormat::SqlDdl;
        }

        if MARKDOWN_TABLE.is_match(cleaned) {
            return InputFormat::Markdown;
        }

        if TABLE_MARKER.is_match(cleaned) && FIELD_MARKER.is_match(cleaned) {
            return InputFormat::KeyValue;
        }

        InputFormat::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_sql_ddl_first() {
        let text = "## table: ignored\nCREATE TABLE users (id INT)";
        assert_eq!(FormatDetector::detect(text), InputFormat::SqlDdl);
    }

    #[test]
    fn detects_markdown_heading() {
        let text = "# Tabela: usuarios\ncampos: id (int)";
        assert_eq!(FormatDetector::detect(text), InputFormat::Markdown);
    }

    #[test]
    fn key_value_needs_both_markers() {
        assert_eq!(
            FormatDetector::detect("tabela: usuarios\ncampos: id"),
            InputFormat::KeyValue
        );
        assert_eq!(FormatDetector::detect("tabela: usuarios"), InputFormat::Unknown);
        assert_eq!(FormatDetector::detect("campos: id"), InputFormat::Unknown);
    }

    #[test]
    fn empty_text_is_unknown() {
        assert_eq!(FormatDetector::detect("   \n  "), InputFormat::Unknown);
    }

    #[test]
    fn format_tags_are_stable() {
        assert_eq!(InputFormat::KeyValue.to_string(), "key_value");
        assert_eq!(InputFormat::SqlDdl.as_str(), "sql_ddl");
        assert_eq!(InputFormat::Markdown.as_str(), "markdown");
        assert_eq!(InputFormat::Unknown.as_str(), "unknown");
    }
}

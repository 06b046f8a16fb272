//! Diagnostic codes and parse issue reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Format detection (1xxx)
    /// No format signature matched; fallback strategies were used
    FormatUnknown,

    /// No strategy produced any table
    NoTablesFound,

    // Table extraction (2xxx)
    /// Table block has no field list
    TableWithoutFields,

    /// Table name is empty; the table was dropped
    TableMissingName,

    /// CREATE TABLE without a balancing closing parenthesis
    TableUnbalancedParentheses,

    // Field parsing (3xxx)
    /// Field fragment could not be turned into a field and was skipped
    FieldFragmentSkipped,

    /// Table-level constraint names a column the table does not have
    ConstraintUnknownColumn,

    // Relationships (4xxx)
    /// Foreign key reference points at a table that was not parsed
    ReferenceUnknownTable,

    // General (9xxx)
    /// General informational message
    Info,

    /// General warning message
    Warning,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormatUnknown => "FORMAT_UNKNOWN",
            Self::NoTablesFound => "NO_TABLES_FOUND",
            Self::TableWithoutFields => "TABLE_WITHOUT_FIELDS",
            Self::TableMissingName => "TABLE_MISSING_NAME",
            Self::TableUnbalancedParentheses => "TABLE_UNBALANCED_PARENTHESES",
            Self::FieldFragmentSkipped => "FIELD_FRAGMENT_SKIPPED",
            Self::ConstraintUnknownColumn => "CONSTRAINT_UNKNOWN_COLUMN",
            Self::ReferenceUnknownTable => "REFERENCE_UNKNOWN_TABLE",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - input was partially understood
    Warn,

    /// Error - parse result should not be trusted
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Position in the parsed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed)
    pub line: usize,

    /// Table the issue belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl Location {
    /// Location at a line
    pub fn at_line(line: usize) -> Self {
        Self { line, table: None }
    }

    /// Location at a line inside a table block
    pub fn in_table(line: usize, table: impl Into<String>) -> Self {
        Self {
            line,
            table: Some(table.into()),
        }
    }

    /// 1-indexed line number of a byte offset in `text`
    pub fn line_of_offset(text: &str, offset: usize) -> usize {
        let end = offset.min(text.len());
        text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() + 1
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Source location (best-effort)
    pub location: Option<Location>,

    /// Offending source text, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            snippet: None,
        }
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Info, message)
    }

    pub fn warn(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warn, message)
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attach the offending source text
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        // Ensure codes are stable strings
        assert_eq!(DiagnosticCode::TableWithoutFields.as_str(), "TABLE_WITHOUT_FIELDS");
        assert_eq!(DiagnosticCode::NoTablesFound.as_str(), "NO_TABLES_FOUND");
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::warn(
            DiagnosticCode::TableWithoutFields,
            "Table 'logs' has no fields",
        )
        .with_location(Location::in_table(3, "logs"));

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("TABLE_WITHOUT_FIELDS"));
        assert!(json.contains("warn"));
        assert!(json.contains("\"table\":\"logs\""));
    }

    #[test]
    fn line_of_offset_counts_newlines() {
        let text = "a\nb\nc";
        assert_eq!(Location::line_of_offset(text, 0), 1);
        assert_eq!(Location::line_of_offset(text, 2), 2);
        assert_eq!(Location::line_of_offset(text, 4), 3);
        assert_eq!(Location::line_of_offset(text, 100), 3);
    }
}

//! Parse report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::diagnostic::{Diagnostic, Severity};
use crate::schema::Schema;

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Summary statistics for a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Tables kept after validation
    pub tables: usize,

    /// Fields across all tables
    pub fields: usize,

    /// Explicit relationships (arrows, sections, promoted references)
    pub explicit_relationships: usize,

    /// Relationships inferred by similarity
    pub implicit_relationships: usize,

    /// Number of errors
    pub errors: usize,

    /// Number of warnings
    pub warnings: usize,

    /// Number of info messages
    pub info: usize,
}

/// Parse report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Parsed document, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Summary statistics
    pub summary: ReportSummary,

    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,

    /// The parsed schema
    pub schema: Schema,
}

impl Report {
    /// Build a report from a parse result
    pub fn new(schema: Schema, diagnostics: Vec<Diagnostic>) -> Self {
        let summary = ReportSummary {
            tables: schema.tables.len(),
            fields: schema.field_count(),
            explicit_relationships: schema.explicit_relationships().count(),
            implicit_relationships: schema.implicit_relationships().count(),
            errors: count(&diagnostics, Severity::Error),
            warnings: count(&diagnostics, Severity::Warn),
            info: count(&diagnostics, Severity::Info),
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: None,
            summary,
            diagnostics,
            schema,
        }
    }

    /// Record the parsed document path
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

fn count(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticCode;
    use crate::schema::{Field, Relationship, Table};

    #[test]
    fn empty_report() {
        let report = Report::new(Schema::new(), Vec::new());
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary, ReportSummary::default());
        assert!(!report.has_errors());
    }

    #[test]
    fn report_counts_schema_and_diagnostics() {
        let mut schema = Schema::new();
        schema.tables.push(Table::with_fields("a", vec![Field::untyped("x")]));
        schema.tables.push(Table::new("b"));
        schema.relationships.push(Relationship::explicit("a", "x", "b", "x"));
        schema.relationships.push(Relationship::implicit("a", "x", "b", "x", 0.8));

        let diagnostics = vec![
            Diagnostic::warn(DiagnosticCode::TableWithoutFields, "Table 'b' has no fields"),
            Diagnostic::info(DiagnosticCode::Info, "done"),
        ];

        let report = Report::new(schema, diagnostics).with_source("doc.txt");
        assert_eq!(report.summary.tables, 2);
        assert_eq!(report.summary.fields, 1);
        assert_eq!(report.summary.explicit_relationships, 1);
        assert_eq!(report.summary.implicit_relationships, 1);
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.summary.info, 1);
        assert!(!report.has_errors());
        assert_eq!(report.source.as_deref(), Some("doc.txt"));
    }

    #[test]
    fn report_serialization() {
        let report = Report::new(Schema::new(), Vec::new());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"diagnostics\""));
        assert!(json.contains("\"schema\""));
    }
}

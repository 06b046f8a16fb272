//! Explicit relationships: arrows in the text and field references

use schemascribe_core::{Diagnostic, DiagnosticCode, Location, Relationship};

use crate::extractor::ExtractedTable;
use crate::markers::{ARROW, RELATIONSHIP_SECTION, TABLE_MARKER};
use crate::sink::DiagnosticSink;

/// Column assumed when a reference names neither a column nor a table with
/// a primary key
pub const DEFAULT_REFERENCED_COLUMN: &str = "id";

/// Finds `table.field -> table.field` statements
pub struct RelationshipExtractor;

impl RelationshipExtractor {
    /// Inline arrows anywhere in the text, then the relationships section
    ///
    /// Section entries already found inline are not repeated.
    pub fn extract(text: &str) -> Vec<Relationship> {
        let mut relationships: Vec<Relationship> = ARROW
            .captures_iter(text)
            .map(|caps| Relationship::explicit(&caps[1], &caps[2], &caps[3], &caps[4]))
            .collect();

        for line in section_lines(text) {
            for caps in ARROW.captures_iter(line) {
                let rel = Relationship::explicit(&caps[1], &caps[2], &caps[3], &caps[4]);
                if !relationships.iter().any(|r| r.key() == rel.key()) {
                    relationships.push(rel);
                }
            }
        }

        tracing::debug!(count = relationships.len(), "Explicit relationships found");
        relationships
    }
}

/// Lines of the first relationships section, up to a blank line or the next
/// table marker; `#` comment lines are dropped
fn section_lines(text: &str) -> Vec<&str> {
    let Some(marker) = RELATIONSHIP_SECTION.find(text) else {
        return Vec::new();
    };

    text[marker.end()..]
        .lines()
        .skip(1)
        .take_while(|line| !line.trim().is_empty() && !starts_with_table_marker(line))
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect()
}

fn starts_with_table_marker(line: &str) -> bool {
    TABLE_MARKER
        .find(line)
        .is_some_and(|m| line[..m.start()].trim().is_empty())
}

/// Turn field-level references into explicit foreign keys
///
/// The target column is the one named in the source, else the first primary
/// key of the target table, else `id`. Four-tuples already in
/// `relationships` are skipped.
pub fn promote_references(
    tables: &[ExtractedTable],
    relationships: &mut Vec<Relationship>,
    sink: &mut DiagnosticSink,
) {
    let mut promoted = 0usize;

    for source in tables {
        for field in &source.table.fields {
            let Some(reference) = field.reference.as_deref() else {
                continue;
            };

            let target = tables
                .iter()
                .map(|t| &t.table)
                .find(|t| t.name.eq_ignore_ascii_case(reference));

            let to_table = target.map(|t| t.name.as_str()).unwrap_or(reference);
            let to_field = source
                .referenced_column(&field.name)
                .or_else(|| target.and_then(|t| t.primary_key_fields().next()).map(|f| f.name.as_str()))
                .unwrap_or(DEFAULT_REFERENCED_COLUMN);

            if target.is_none() {
                sink.push(
                    Diagnostic::info(
                        DiagnosticCode::ReferenceUnknownTable,
                        format!(
                            "{}.{} references unknown table '{}'",
                            source.table.name, field.name, reference
                        ),
                    )
                    .with_location(Location::in_table(source.line, &source.table.name)),
                );
            }

            let rel = Relationship::explicit(&source.table.name, &field.name, to_table, to_field);
            if relationships.iter().any(|r| r.key() == rel.key()) {
                continue;
            }

            relationships.push(rel);
            promoted += 1;
        }
    }

    if promoted > 0 {
        tracing::debug!(count = promoted, "Field references promoted to relationships");
    }
}

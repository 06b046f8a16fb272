//! Final sanity pass over extracted tables

use schemascribe_core::{Diagnostic, DiagnosticCode, Location};

use crate::extractor::ExtractedTable;
use crate::sink::DiagnosticSink;

pub struct Validator;

impl Validator {
    /// Drop unnamed tables and flag tables without fields
    pub fn validate(tables: Vec<ExtractedTable>, sink: &mut DiagnosticSink) -> Vec<ExtractedTable> {
        let mut valid = Vec::with_capacity(tables.len());

        for extracted in tables {
            let name = extracted.table.name.trim();

            if name.is_empty() {
                sink.push(
                    Diagnostic::warn(DiagnosticCode::TableMissingName, "Table without a name dropped")
                        .with_location(Location::at_line(extracted.line)),
                );
                continue;
            }

            if extracted.table.fields.is_empty() {
                sink.push(
                    Diagnostic::warn(
                        DiagnosticCode::TableWithoutFields,
                        format!("Table '{}' has no fields", name),
                    )
                    .with_location(Location::in_table(extracted.line, name)),
                );
            }

            valid.push(extracted);
        }

        valid
    }
}

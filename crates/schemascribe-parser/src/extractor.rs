//! Segments a document into per-table blocks
//!
//! Key-value and Markdown documents share one segmentation: every table
//! marker opens a block that runs to the next marker. The last block stops
//! at a relationships section if one follows it. SQL documents are cut at
//! the closing parenthesis of each `CREATE TABLE`.

use regex::Regex;
use schemascribe_core::{Diagnostic, DiagnosticCode, Location, Table};

use crate::ddl::{parse_ddl_columns, ColumnReference};
use crate::fields::parse_fields;
use crate::format::InputFormat;
use crate::markers::{
    unquote_identifier, CREATE_TABLE, FIELD_MARKER, MARKDOWN_TABLE, RELATIONSHIP_SECTION,
    TABLE_MARKER,
};
use crate::sink::DiagnosticSink;

/// A table together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    pub table: Table,

    /// 1-indexed line of the table marker or `CREATE TABLE`
    pub line: usize,

    /// Referenced columns declared in SQL, keyed by field name
    pub references: Vec<ColumnReference>,
}

impl ExtractedTable {
    fn new(table: Table, line: usize) -> Self {
        Self {
            table,
            line,
            references: Vec::new(),
        }
    }

    /// Referenced column for a field, if the source named one
    pub fn referenced_column(&self, field: &str) -> Option<&str> {
        self.references
            .iter()
            .find(|r| r.field == field)
            .and_then(|r| r.column.as_deref())
    }
}

/// Strategy dispatch over the detected format
pub struct TableExtractor;

impl TableExtractor {
    /// Extract tables using the strategy for `format`
    ///
    /// For [`InputFormat::Unknown`] the key-value, SQL and Markdown
    /// strategies are tried in turn; the first one that yields a table wins.
    pub fn extract(text: &str, format: InputFormat, sink: &mut DiagnosticSink) -> Vec<ExtractedTable> {
        match format {
            InputFormat::KeyValue => Self::key_value(text),
            InputFormat::SqlDdl => Self::sql_ddl(text, sink),
            InputFormat::Markdown => Self::markdown(text),
            InputFormat::Unknown => Self::fallback(text, sink),
        }
    }

    fn fallback(text: &str, sink: &mut DiagnosticSink) -> Vec<ExtractedTable> {
        let tables = Self::key_value(text);
        if !tables.is_empty() {
            tracing::debug!("Unknown format parsed as key-value");
            return tables;
        }

        // A scratch sink keeps diagnostics of a failed attempt out of the report
        let mut attempt = DiagnosticSink::new();
        let tables = Self::sql_ddl(text, &mut attempt);
        if !tables.is_empty() {
            tracing::debug!("Unknown format parsed as SQL DDL");
            for diagnostic in attempt.into_vec() {
                sink.push(diagnostic);
            }
            return tables;
        }

        let tables = Self::markdown(text);
        if !tables.is_empty() {
            tracing::debug!("Unknown format parsed as Markdown");
        }
        tables
    }

    /// `table: name` blocks with a `fields:` line
    pub fn key_value(text: &str) -> Vec<ExtractedTable> {
        segment(text, &TABLE_MARKER)
    }

    /// `# table: name` headings with a `fields:` line
    pub fn markdown(text: &str) -> Vec<ExtractedTable> {
        segment(text, &MARKDOWN_TABLE)
    }

    /// `CREATE TABLE` statements
    pub fn sql_ddl(text: &str, sink: &mut DiagnosticSink) -> Vec<ExtractedTable> {
        let mut tables = Vec::new();

        for caps in CREATE_TABLE.captures_iter(text) {
            let (Some(statement), Some(raw_name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = unquote_identifier(raw_name.as_str());
            let line = Location::line_of_offset(text, statement.start());
            let open = statement.end();

            let Some(close) = find_closing_paren(text, open) else {
                sink.push(
                    Diagnostic::warn(
                        DiagnosticCode::TableUnbalancedParentheses,
                        format!("CREATE TABLE {} has no closing parenthesis; skipped", name),
                    )
                    .with_location(Location::in_table(line, &name))
                    .with_snippet(statement.as_str()),
                );
                continue;
            };

            let columns = parse_ddl_columns(&name, &text[open..close], line, sink);
            tracing::debug!(table = %name, fields = columns.fields.len(), "Extracted SQL table");

            tables.push(ExtractedTable {
                table: Table::with_fields(name, columns.fields),
                line,
                references: columns.references,
            });
        }

        tables
    }
}

fn segment(text: &str, marker: &Regex) -> Vec<ExtractedTable> {
    let headers: Vec<_> = marker
        .captures_iter(text)
        .filter_map(|caps| Some((caps.get(0)?, caps.get(1)?.as_str().to_string())))
        .collect();

    let mut tables = Vec::with_capacity(headers.len());

    for (i, (header, name)) in headers.iter().enumerate() {
        let end = match headers.get(i + 1) {
            Some((next, _)) => next.start(),
            None => RELATIONSHIP_SECTION
                .find_at(text, header.end())
                .map(|m| m.start())
                .unwrap_or(text.len()),
        };

        let body = &text[header.end()..end];
        let line = Location::line_of_offset(text, header.start());

        let fields = match FIELD_MARKER.captures(body).and_then(|caps| caps.get(1)) {
            Some(list) => parse_fields(list.as_str()),
            None => {
                tracing::debug!(table = %name, "Table block has no field list");
                Vec::new()
            }
        };

        tracing::debug!(table = %name, fields = fields.len(), "Extracted table");
        tables.push(ExtractedTable::new(Table::with_fields(name.clone(), fields), line));
    }

    tables
}

/// Byte offset of the parenthesis closing the one just before `start`
///
/// `--` comments are skipped so a parenthesis inside one cannot unbalance
/// the scan.
fn find_closing_paren(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                continue;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

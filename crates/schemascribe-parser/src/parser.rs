//! The parse pipeline
//!
//! text → format → tables → explicit relationships → promoted references →
//! implicit relationships → schema

use schemascribe_core::{Diagnostic, DiagnosticCode, EmptySchemaPolicy, ParserConfig, Schema};

use crate::error::ParseError;
use crate::extractor::TableExtractor;
use crate::format::{FormatDetector, InputFormat};
use crate::implicit::ImplicitRelationshipDetector;
use crate::metadata::MetadataExtractor;
use crate::relationships::{promote_references, RelationshipExtractor};
use crate::sink::DiagnosticSink;
use crate::validator::Validator;

/// Converts schema documents into a [`Schema`]
///
/// Holds only configuration, so one parser can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaParser {
    config: ParserConfig,
}

/// A schema plus everything noticed while building it
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub schema: Schema,
    pub format: InputFormat,
    pub diagnostics: Vec<Diagnostic>,
}

impl SchemaParser {
    /// Parser with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse `text`, discarding diagnostics
    pub fn parse(&self, text: &str) -> Result<Schema, ParseError> {
        self.parse_with_diagnostics(text).map(|output| output.schema)
    }

    /// Parse `text` and keep the diagnostics
    pub fn parse_with_diagnostics(&self, text: &str) -> Result<ParseOutput, ParseError> {
        let mut sink = DiagnosticSink::new();

        let format = FormatDetector::detect(text);
        tracing::info!(format = %format, "Detected input format");
        if format == InputFormat::Unknown {
            sink.push(Diagnostic::warn(
                DiagnosticCode::FormatUnknown,
                "Input format not recognized; trying every strategy",
            ));
        }

        let extracted = TableExtractor::extract(text, format, &mut sink);
        let tables = Validator::validate(extracted, &mut sink);

        if tables.is_empty() {
            if format == InputFormat::Unknown && self.config.empty_schema == EmptySchemaPolicy::Error {
                return Err(ParseError::NoTablesFound { format });
            }
            sink.push(Diagnostic::warn(
                DiagnosticCode::NoTablesFound,
                format!("No tables found in {} input", format),
            ));
        }

        let mut relationships = RelationshipExtractor::extract(text);
        if self.config.promote_references {
            promote_references(&tables, &mut relationships, &mut sink);
        }

        let tables: Vec<_> = tables.into_iter().map(|extracted| extracted.table).collect();

        if self.config.implicit_relationships {
            let detector = ImplicitRelationshipDetector::new(self.config.implicit_threshold);
            relationships.extend(detector.detect(&tables));
        }

        let schema = Schema {
            tables,
            relationships,
            metadata: MetadataExtractor::extract(text, format),
        };

        tracing::info!(
            tables = schema.tables.len(),
            fields = schema.field_count(),
            relationships = schema.relationships.len(),
            "Parsed schema"
        );

        Ok(ParseOutput {
            schema,
            format,
            diagnostics: sink.into_vec(),
        })
    }
}

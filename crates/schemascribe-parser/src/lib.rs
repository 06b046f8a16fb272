//! Heuristic schema-document parsing
//!
//! This crate handles:
//! - Detecting whether a document is key-value notes, SQL DDL or Markdown
//! - Segmenting the document into tables and parsing their field lists
//! - Normalizing vendor types to a canonical vocabulary
//! - Extracting declared relationships and inferring undeclared ones
//!
//! ```
//! use schemascribe_parser::SchemaParser;
//!
//! let schema = SchemaParser::new()
//!     .parse("tabela: usuarios\ncampos: id (int, pk), nome (varchar)")
//!     .unwrap();
//! assert_eq!(schema.tables[0].fields.len(), 2);
//! ```

pub mod markers;
pub mod sink;
pub mod format;
pub mod types;
pub mod fields;
pub mod ddl;
pub mod extractor;
pub mod relationships;
pub mod heuristics;
pub mod implicit;
pub mod validator;
pub mod metadata;
pub mod error;
pub mod parser;

pub use parser::{SchemaParser, ParseOutput};
pub use error::ParseError;
pub use format::{FormatDetector, InputFormat};
pub use types::{TypeNormalizer, TypeFamily};
pub use fields::{parse_field, parse_fields, FieldPattern};
pub use ddl::{parse_ddl_columns, ColumnReference, DdlColumns};
pub use extractor::{ExtractedTable, TableExtractor};
pub use relationships::{promote_references, RelationshipExtractor};
pub use implicit::ImplicitRelationshipDetector;
pub use validator::Validator;
pub use metadata::MetadataExtractor;
pub use sink::DiagnosticSink;

//! SchemaScribe Core
//!
//! Domain model shared by the parser and its consumers.
//! Serialized key names and diagnostic codes are part of the public API.

pub mod diagnostic;
pub mod schema;
pub mod report;
pub mod config;
pub mod store;
pub mod prompt;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use schema::{Field, Table, Relationship, RelationshipKind, Detection, Schema, UNKNOWN_TYPE};
pub use report::{Report, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, ParserConfig, EmptySchemaPolicy};
pub use store::{SchemaStore, StoreSummary};

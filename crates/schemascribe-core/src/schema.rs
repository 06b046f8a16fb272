//! Schema types produced by the parser
//!
//! JSON key names are consumed verbatim by downstream collaborators
//! (prompt builders, HTTP clients). Never rename a serialized key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Type name used when a field declares no type
pub const UNKNOWN_TYPE: &str = "unknown";

/// A field (column) of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as written in the source
    pub name: String,

    /// Canonical type (see the type normalizer)
    #[serde(rename = "type")]
    pub field_type: String,

    /// Type text as written in the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_type: Option<String>,

    /// Whether the field accepts NULL
    pub nullable: bool,

    /// Part of the primary key
    pub primary_key: bool,

    /// Declared as a foreign key
    pub foreign_key: bool,

    /// Target table of a foreign key annotation
    pub reference: Option<String>,
}

impl Field {
    /// Create a nullable field with no key flags
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            original_type: None,
            nullable: true,
            primary_key: false,
            foreign_key: false,
            reference: None,
        }
    }

    /// Create a field without a declared type
    pub fn untyped(name: impl Into<String>) -> Self {
        Self::new(name, UNKNOWN_TYPE)
    }

    /// Set the raw source type
    pub fn with_original_type(mut self, original_type: impl Into<String>) -> Self {
        self.original_type = Some(original_type.into());
        self
    }

    /// Set nullability
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark as primary key
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Mark as foreign key
    pub fn with_foreign_key(mut self, foreign_key: bool) -> Self {
        self.foreign_key = foreign_key;
        self
    }

    /// Set the referenced table (implies foreign key)
    pub fn with_reference(mut self, table: impl Into<String>) -> Self {
        self.foreign_key = true;
        self.reference = Some(table.into());
        self
    }

    /// Whether the field has a known type
    pub fn has_type(&self) -> bool {
        self.field_type != UNKNOWN_TYPE
    }
}

/// A table with its ordered fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name
    pub name: String,

    /// Fields in source order
    pub fields: Vec<Field>,
}

impl Table {
    /// Create a table with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Create a table from fields
    pub fn with_fields(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Find a field by exact name
    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Find a field by name, ignoring ASCII case
    pub fn find_field_ignore_case(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Fields flagged as primary key, in source order
    pub fn primary_key_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.primary_key)
    }

    /// Field names in source order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Relationship kind (serialized as `type`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Stated foreign key
    ForeignKey,

    /// Foreign key inferred from naming and types
    PossibleForeignKey,
}

impl std::fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ForeignKey => write!(f, "foreign_key"),
            Self::PossibleForeignKey => write!(f, "possible_foreign_key"),
        }
    }
}

/// How a relationship was found (serialized as `detected`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detection {
    /// Written in the document
    Explicit,

    /// Inferred by similarity heuristics
    Implicit,
}

impl std::fmt::Display for Detection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::Implicit => write!(f, "implicit"),
        }
    }
}

/// A link between two table fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from_table: String,
    pub from_field: String,
    pub to_table: String,
    pub to_field: String,

    /// Relationship kind
    #[serde(rename = "type")]
    pub kind: RelationshipKind,

    /// Detection path
    #[serde(rename = "detected")]
    pub detection: Detection,

    /// Similarity score in [0, 1], implicit relationships only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Relationship {
    /// Create an explicit foreign key relationship
    pub fn explicit(
        from_table: impl Into<String>,
        from_field: impl Into<String>,
        to_table: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_field: from_field.into(),
            to_table: to_table.into(),
            to_field: to_field.into(),
            kind: RelationshipKind::ForeignKey,
            detection: Detection::Explicit,
            confidence: None,
        }
    }

    /// Create an implicit relationship; confidence is clamped to [0, 1]
    pub fn implicit(
        from_table: impl Into<String>,
        from_field: impl Into<String>,
        to_table: impl Into<String>,
        to_field: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            from_table: from_table.into(),
            from_field: from_field.into(),
            to_table: to_table.into(),
            to_field: to_field.into(),
            kind: RelationshipKind::PossibleForeignKey,
            detection: Detection::Implicit,
            confidence: Some(confidence.clamp(0.0, 1.0)),
        }
    }

    /// The (from_table, from_field, to_table, to_field) tuple
    pub fn key(&self) -> (&str, &str, &str, &str) {
        (&self.from_table, &self.from_field, &self.to_table, &self.to_field)
    }

    pub fn is_explicit(&self) -> bool {
        self.detection == Detection::Explicit
    }
}

impl std::fmt::Display for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{} ({})",
            self.from_table, self.from_field, self.to_table, self.to_field, self.kind
        )
    }
}

/// Parsed database structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Tables in source order
    pub tables: Vec<Table>,

    /// Explicit relationships first, then implicit ones
    pub relationships: Vec<Relationship>,

    /// Format tag, size counters and other parse metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Schema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            relationships: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Find a table by exact name
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Table names in source order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn explicit_relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(|r| r.detection == Detection::Explicit)
    }

    pub fn implicit_relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(|r| r.detection == Detection::Implicit)
    }

    /// Total field count across all tables
    pub fn field_count(&self) -> usize {
        self.tables.iter().map(|t| t.fields.len()).sum()
    }

    /// Detected input format, if recorded
    pub fn detected_format(&self) -> Option<&str> {
        self.metadata.get("detected_format").and_then(|v| v.as_str())
    }

    /// Database name, if the document declared one
    pub fn database_name(&self) -> Option<&str> {
        self.metadata.get("database_name").and_then(|v| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

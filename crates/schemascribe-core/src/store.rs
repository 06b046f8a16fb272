//! Single-slot holder for the "current" schema
//!
//! The store is a plain owned value: last write wins, no versioning.
//! Callers that share it across threads wrap it in their own lock.

use serde::{Deserialize, Serialize};
use crate::schema::Schema;

/// Snapshot of what the store holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSummary {
    pub loaded: bool,
    pub tables_count: usize,
    pub relationships_count: usize,
    pub format: Option<String>,
    pub table_names: Vec<String>,
}

/// Holds at most one schema
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    current: Option<Schema>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current schema, returning the previous one
    pub fn set(&mut self, schema: Schema) -> Option<Schema> {
        tracing::info!(tables = schema.tables.len(), "schema stored");
        for table in &schema.tables {
            tracing::debug!(table = %table.name, fields = table.fields.len(), "stored table");
        }
        self.current.replace(schema)
    }

    /// The current schema, if any
    pub fn current(&self) -> Option<&Schema> {
        if self.current.is_none() {
            tracing::debug!("schema requested but none is loaded");
        }
        self.current.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Remove and return the current schema
    pub fn take(&mut self) -> Option<Schema> {
        self.current.take()
    }

    /// Drop the current schema
    pub fn clear(&mut self) {
        match self.current.take() {
            Some(schema) => tracing::info!(tables = schema.tables.len(), "schema cleared"),
            None => tracing::debug!("clear requested on empty store"),
        }
    }

    pub fn summary(&self) -> StoreSummary {
        match &self.current {
            Some(schema) => StoreSummary {
                loaded: true,
                tables_count: schema.tables.len(),
                relationships_count: schema.relationships.len(),
                format: Some(schema.detected_format().unwrap_or("unknown").to_string()),
                table_names: schema.tables.iter().map(|t| t.name.clone()).collect(),
            },
            None => StoreSummary {
                loaded: false,
                tables_count: 0,
                relationships_count: 0,
                format: None,
                table_names: Vec::new(),
            },
        }
    }
}

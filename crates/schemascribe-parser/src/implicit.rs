//! Infers undeclared relationships from field names and types

use schemascribe_core::{config::DEFAULT_IMPLICIT_THRESHOLD, Field, Relationship, Table};

use crate::heuristics::{name_similarity, normalize_name};
use crate::types::TypeNormalizer;

/// Pairwise field similarity across tables
///
/// Every field of every table is compared with every field of every later
/// table, so the cost is quadratic in both table count and field count.
/// Documents with hundreds of wide tables should disable detection through
/// `ParserConfig::implicit_relationships`.
#[derive(Debug, Clone, Copy)]
pub struct ImplicitRelationshipDetector {
    threshold: f64,
}

impl Default for ImplicitRelationshipDetector {
    fn default() -> Self {
        Self::new(DEFAULT_IMPLICIT_THRESHOLD)
    }
}

impl ImplicitRelationshipDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Similarity of two fields in [0, 1]
    ///
    /// Incompatible types halve the name score.
    pub fn field_similarity(a: &Field, b: &Field) -> f64 {
        let score = name_similarity(&normalize_name(&a.name), &normalize_name(&b.name));
        if score > 0.0 && !TypeNormalizer::compatible(&a.field_type, &b.field_type) {
            score * 0.5
        } else {
            score
        }
    }

    /// Relationships oriented from the earlier table to the later one
    pub fn detect(&self, tables: &[Table]) -> Vec<Relationship> {
        let mut relationships = Vec::new();
        if tables.len() < 2 {
            tracing::debug!("Fewer than two tables, skipping implicit relationships");
            return relationships;
        }

        for (i, left) in tables.iter().enumerate() {
            for right in &tables[i + 1..] {
                for a in &left.fields {
                    for b in &right.fields {
                        let score = Self::field_similarity(a, b);
                        if score < self.threshold || score <= 0.0 {
                            continue;
                        }

                        tracing::debug!(
                            from = %format!("{}.{}", left.name, a.name),
                            to = %format!("{}.{}", right.name, b.name),
                            score,
                            "Implicit relationship"
                        );
                        relationships.push(Relationship::implicit(
                            &left.name,
                            &a.name,
                            &right.name,
                            &b.name,
                            round_confidence(score),
                        ));
                    }
                }
            }
        }

        tracing::info!(count = relationships.len(), "Implicit relationships detected");
        relationships
    }
}

fn round_confidence(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

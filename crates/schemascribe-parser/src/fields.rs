//! Field list parsing for key-value and Markdown documents
//!
//! Handles Oracle-style declarations such as `COD VARCHAR2(5 BYTE)` and
//! `ANO (NUMBER(5,0))` as well as annotated notes like `id (int, pk)`.

use regex::Regex;
use schemascribe_core::Field;
use std::sync::LazyLock;

use crate::types::TypeNormalizer;

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^(\w+)\s*\((.+)\)\s*$").unwrap());

static PRIMARY_KEY_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpk\b|\bprimary\s+key\b").unwrap());

static FOREIGN_KEY_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfk\b|\bforeign\s+key\b").unwrap());

static NOT_NULL_FLAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnot\s+null\b").unwrap());

/// `fk->target`
pub(crate) static FK_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfk\s*->\s*(\w+)").unwrap());

/// Flag keywords removed from annotated types; longest alternatives first
static FLAG_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bfk\s*->\s*\w+|\bprimary\s+key\b|\bforeign\s+key\b|\bnot\s+null\b|\bnullable\b|\bnull\b|\bpk\b|\bfk\b",
    )
    .unwrap()
});

/// Prefixes of real type names; an annotation starting with one of these is
/// left intact so a flag-like substring cannot corrupt it
static TYPE_PREFIXES: &[&str] = &[
    "VARCHAR", "NVARCHAR", "CHAR", "NCHAR", "NUMBER", "NUMERIC", "DECIMAL", "DATE", "TIME",
    "INT", "BIGINT", "SMALLINT", "TINYINT", "FLOAT", "DOUBLE", "REAL", "TEXT", "CLOB", "BOOL",
    "BIT", "JSON", "BLOB", "BINARY", "UUID", "SERIAL",
];

/// Split on `separator` outside parentheses
///
/// Returns raw pieces; callers trim and drop empty ones. A stray closing
/// parenthesis never drives the depth below zero.
pub fn split_top_level(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&input[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if start < input.len() {
        parts.push(&input[start..]);
    }

    parts
}

/// Shape of one field fragment, tried in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPattern<'a> {
    /// `NAME (REST)` with REST inside the outermost parentheses
    ParenthesizedType { name: &'a str, annotation: &'a str },

    /// `NAME TYPE...` split at the first whitespace run
    WhitespaceTyped { name: &'a str, declared: &'a str },

    /// Anything else: the whole fragment is the name
    BareName { name: &'a str },
}

impl<'a> FieldPattern<'a> {
    /// Classify a trimmed, non-empty fragment
    pub fn classify(fragment: &'a str) -> Self {
        if let Some(caps) = PARENTHESIZED.captures(fragment) {
            if let (Some(name), Some(annotation)) = (caps.get(1), caps.get(2)) {
                return Self::ParenthesizedType {
                    name: name.as_str(),
                    annotation: annotation.as_str().trim(),
                };
            }
        }

        match fragment.split_once(char::is_whitespace) {
            Some((name, declared)) => Self::WhitespaceTyped {
                name,
                declared: declared.trim(),
            },
            None => Self::BareName { name: fragment },
        }
    }

    /// Build the field this pattern describes
    pub fn into_field(self) -> Field {
        match self {
            Self::ParenthesizedType { name, annotation } => annotated_field(name, annotation),
            Self::WhitespaceTyped { name, declared } => {
                Field::new(name, TypeNormalizer::normalize(declared)).with_original_type(declared)
            }
            Self::BareName { name } => Field::untyped(name),
        }
    }
}

fn annotated_field(name: &str, annotation: &str) -> Field {
    let type_text = strip_flags(annotation);
    let mut field = Field::new(name, TypeNormalizer::normalize(&type_text))
        .with_original_type(annotation)
        .with_primary_key(PRIMARY_KEY_FLAG.is_match(annotation))
        .with_foreign_key(FOREIGN_KEY_FLAG.is_match(annotation))
        .with_nullable(!NOT_NULL_FLAG.is_match(annotation));

    if let Some(caps) = FK_REFERENCE.captures(annotation) {
        field = field.with_reference(&caps[1]);
    }

    field
}

/// Remove key and nullability keywords from an annotation
///
/// Annotations that start with a known type prefix are returned unchanged.
pub fn strip_flags(annotation: &str) -> String {
    let trimmed = annotation.trim();
    let upper = trimmed.to_ascii_uppercase();
    if TYPE_PREFIXES.iter().any(|prefix| upper.starts_with(prefix)) {
        return trimmed.to_string();
    }

    let stripped = FLAG_KEYWORDS.replace_all(trimmed, " ");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a single trimmed fragment
pub fn parse_field(fragment: &str) -> Field {
    FieldPattern::classify(fragment).into_field()
}

/// Parse a comma-separated field list
///
/// Empty fragments are dropped; every other fragment yields a field.
pub fn parse_fields(list: &str) -> Vec<Field> {
    split_top_level(list.trim(), ',')
        .into_iter()
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(parse_field)
        .collect()
}

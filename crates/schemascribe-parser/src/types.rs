//! Vendor type tokens to canonical type names

use regex::Regex;
use schemascribe_core::UNKNOWN_TYPE;
use std::sync::LazyLock;

static BASE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9_]*").unwrap());

/// Canonical type and the base tokens that map to it
static TYPE_ALIASES: &[(&str, &[&str])] = &[
    ("int", &["INT", "INTEGER", "INT4", "MEDIUMINT", "SERIAL", "PLS_INTEGER"]),
    ("bigint", &["BIGINT", "INT8", "INT64", "BIGSERIAL", "LONG"]),
    ("smallint", &["SMALLINT", "INT2", "SMALLSERIAL"]),
    ("tinyint", &["TINYINT"]),
    ("decimal", &["DECIMAL", "DEC", "MONEY", "SMALLMONEY"]),
    ("numeric", &["NUMERIC", "NUMBER"]),
    ("float", &["FLOAT", "FLOAT4", "BINARY_FLOAT"]),
    ("double", &["DOUBLE", "FLOAT8", "FLOAT64", "BINARY_DOUBLE"]),
    ("real", &["REAL"]),
    ("varchar", &["VARCHAR", "VARCHAR2", "NVARCHAR", "NVARCHAR2", "STRING"]),
    ("char", &["CHAR", "NCHAR", "CHARACTER", "BPCHAR"]),
    ("text", &["TEXT", "CLOB", "NCLOB", "NTEXT", "TINYTEXT", "MEDIUMTEXT", "LONGTEXT"]),
    ("date", &["DATE"]),
    ("datetime", &["DATETIME", "DATETIME2", "SMALLDATETIME", "DATETIMEOFFSET"]),
    ("timestamp", &["TIMESTAMP", "TIMESTAMPTZ", "TIMESTAMP_NTZ", "TIMESTAMP_LTZ", "TIMESTAMP_TZ"]),
    ("time", &["TIME", "TIMETZ"]),
    ("boolean", &["BOOLEAN", "BOOL", "BIT"]),
    ("json", &["JSON", "JSONB", "VARIANT"]),
    ("blob", &["BLOB", "TINYBLOB", "MEDIUMBLOB", "LONGBLOB", "BYTEA", "IMAGE"]),
    ("binary", &["BINARY", "VARBINARY", "RAW"]),
    ("uuid", &["UUID", "UNIQUEIDENTIFIER"]),
];

/// Families whose members may join each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    Numeric,
    String,
    Date,
}

static TYPE_FAMILIES: &[(TypeFamily, &[&str])] = &[
    (
        TypeFamily::Numeric,
        &["int", "bigint", "smallint", "tinyint", "decimal", "numeric", "float", "double", "real"],
    ),
    (TypeFamily::String, &["varchar", "char", "text"]),
    (TypeFamily::Date, &["date", "datetime", "timestamp"]),
];

/// Maps raw type strings onto the canonical vocabulary
pub struct TypeNormalizer;

impl TypeNormalizer {
    /// Leading alphanumeric token of a raw type, e.g. `NUMBER` for `NUMBER(5,0)`
    pub fn base_type(raw: &str) -> Option<&str> {
        BASE_TOKEN.find(raw).map(|m| m.as_str())
    }

    /// Canonical name for a raw type
    ///
    /// Unrecognized base tokens pass through lower-cased; input without any
    /// alphabetic token becomes `unknown`.
    pub fn normalize(raw: &str) -> String {
        let Some(base) = Self::base_type(raw) else {
            return UNKNOWN_TYPE.to_string();
        };

        let upper = base.to_ascii_uppercase();
        TYPE_ALIASES
            .iter()
            .find(|(_, aliases)| aliases.contains(&upper.as_str()))
            .map(|(canonical, _)| canonical.to_string())
            .unwrap_or_else(|| base.to_lowercase())
    }

    /// Family of a type, after normalization
    pub fn family(raw: &str) -> Option<TypeFamily> {
        let canonical = Self::normalize(raw);
        TYPE_FAMILIES
            .iter()
            .find(|(_, members)| members.contains(&canonical.as_str()))
            .map(|(family, _)| *family)
    }

    /// Two types can sit on either end of a relationship
    ///
    /// Identical base types are compatible, otherwise both must belong to
    /// the same family.
    pub fn compatible(a: &str, b: &str) -> bool {
        if Self::normalize(a) == Self::normalize(b) {
            return true;
        }

        matches!((Self::family(a), Self::family(b)), (Some(x), Some(y)) if x == y)
    }
}

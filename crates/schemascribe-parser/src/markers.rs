//! Compiled patterns for the document markers
//!
//! Markers accept the Portuguese and English spellings found in schema notes.

use regex::Regex;
use std::sync::LazyLock;

/// `tabela: name` / `table: name`
pub static TABLE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:tabela|table):\s*(\w+)").unwrap());

/// `campos: ...` / `fields: ...` / `colunas: ...` / `columns: ...`
pub static FIELD_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:campos|fields|colunas|columns):\s*(.+)").unwrap());

/// `relacionamentos:` / `relationships:`
pub static RELATIONSHIP_SECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:relacionamentos|relationships):").unwrap());

/// `# tabela: name` and deeper headings
pub static MARKDOWN_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)#+\s*(?:tabela|table):\s*(\w+)").unwrap());

/// `CREATE TABLE [IF NOT EXISTS] [schema.]name (`
pub static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\bCREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?((?:[`"\[]?\w+[`"\]]?\.)*[`"\[]?\w+[`"\]]?)\s*\("#,
    )
    .unwrap()
});

/// `table.field -> table.field`
pub static ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\.(\w+)\s*->\s*(\w+)\.(\w+)").unwrap());

/// `banco: name` / `database: name` / `db: name`
pub static DATABASE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:banco|database|db):\s*(\w+)").unwrap());

/// Strip quoting and schema qualification from an SQL identifier
pub fn unquote_identifier(raw: &str) -> String {
    let last = raw.rsplit('.').next().unwrap_or(raw);
    last.trim_matches(|c| matches!(c, '`' | '"' | '\'' | '[' | ']'))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_marker_is_case_insensitive() {
        let names: Vec<&str> = TABLE_MARKER
            .captures_iter("Tabela: usuarios\nTABLE: pedidos")
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(names, vec!["usuarios", "pedidos"]);
    }

    #[test]
    fn field_marker_stops_at_line_end() {
        let caps = FIELD_MARKER.captures("campos: id (int), nome\nnext line").unwrap();
        assert_eq!(&caps[1], "id (int), nome");
    }

    #[test]
    fn create_table_accepts_qualified_names() {
        let caps = CREATE_TABLE
            .captures("create table if not exists public.\"orders\" (id int)")
            .unwrap();
        assert_eq!(unquote_identifier(&caps[1]), "orders");

        let caps = CREATE_TABLE.captures("CREATE TABLE [dbo].[Users](Id INT)").unwrap();
        assert_eq!(unquote_identifier(&caps[1]), "Users");
    }

    #[test]
    fn markdown_heading_requires_hash() {
        assert!(MARKDOWN_TABLE.is_match("## Table: users"));
        assert!(!MARKDOWN_TABLE.is_match("table: users"));
    }
}

//! Column parsing for the body of a `CREATE TABLE` statement

use regex::Regex;
use schemascribe_core::{Diagnostic, DiagnosticCode, Field, Location};
use std::sync::LazyLock;

use crate::fields::split_top_level;
use crate::markers::unquote_identifier;
use crate::sink::DiagnosticSink;
use crate::types::TypeNormalizer;

static INLINE_REFERENCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bREFERENCES\s+([\w."`\[\]]+)\s*(?:\(\s*([^)]*?)\s*\))?"#).unwrap()
});

static PRIMARY_KEY_CONSTRAINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\s*\(([^)]*)\)").unwrap());

static FOREIGN_KEY_CONSTRAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\bFOREIGN\s+KEY\s*\(([^)]*)\)\s*REFERENCES\s+([\w."`\[\]]+)\s*(?:\(([^)]*)\))?"#,
    )
    .unwrap()
});

/// Leading keyword of a table-level constraint line, as a whole word
static TABLE_CONSTRAINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:PRIMARY\s+KEY|FOREIGN\s+KEY|CONSTRAINT|UNIQUE|CHECK|INDEX|KEY)\b").unwrap()
});

/// A foreign key declared on a column, with the referenced column if named
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReference {
    pub field: String,
    pub table: String,
    pub column: Option<String>,
}

/// Fields of one `CREATE TABLE` plus the references they declare
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DdlColumns {
    pub fields: Vec<Field>,
    pub references: Vec<ColumnReference>,
}

enum TableConstraint {
    PrimaryKey(Vec<String>),
    ForeignKey {
        columns: Vec<String>,
        table: String,
        targets: Vec<String>,
    },
}

/// Parse the text between the parentheses of a `CREATE TABLE`
///
/// `line` is the 1-indexed line of the statement, used for diagnostics.
pub fn parse_ddl_columns(
    table: &str,
    block: &str,
    line: usize,
    sink: &mut DiagnosticSink,
) -> DdlColumns {
    let block = strip_line_comments(block);
    let mut columns = DdlColumns::default();
    let mut constraints = Vec::new();

    for fragment in split_top_level(&block, ',') {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }

        if is_constraint(fragment) {
            if let Some(constraint) = parse_constraint(fragment) {
                constraints.push(constraint);
            }
            continue;
        }

        match parse_column(fragment) {
            Some((field, reference)) => {
                columns.references.extend(reference);
                columns.fields.push(field);
            }
            None => sink.push(
                Diagnostic::warn(
                    DiagnosticCode::FieldFragmentSkipped,
                    format!("Column definition without a type in table '{}'", table),
                )
                .with_location(Location::in_table(line, table))
                .with_snippet(fragment),
            ),
        }
    }

    for constraint in constraints {
        apply_constraint(table, line, constraint, &mut columns, sink);
    }

    columns
}

/// Parse one column line: `name TYPE [constraints]`
fn parse_column(line: &str) -> Option<(Field, Option<ColumnReference>)> {
    let (raw_name, rest) = line.split_once(char::is_whitespace)?;
    let rest = rest.trim_start();
    if rest.is_empty() {
        return None;
    }

    let name = unquote_identifier(raw_name);
    let declared = declared_type(rest);
    let upper = line.to_ascii_uppercase();

    let mut field = Field::new(name.clone(), TypeNormalizer::normalize(declared))
        .with_original_type(declared)
        .with_primary_key(upper.contains("PRIMARY KEY"))
        .with_foreign_key(upper.contains("FOREIGN KEY") || upper.contains("REFERENCES"))
        .with_nullable(!upper.contains("NOT NULL"));

    let reference = INLINE_REFERENCES.captures(line).map(|caps| {
        let table = unquote_identifier(&caps[1]);
        field.reference = Some(table.clone());
        ColumnReference {
            field: name,
            table,
            column: caps
                .get(2)
                .and_then(|m| split_identifiers(m.as_str()).into_iter().next()),
        }
    });

    Some((field, reference))
}

/// The declared type: first token plus a parameter list if one follows,
/// e.g. `DECIMAL(10,2)` or `VARCHAR2(10 BYTE)`
fn declared_type(rest: &str) -> &str {
    let word_end = rest
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(rest.len());

    let after_word = &rest[word_end..];
    let gap = after_word.len() - after_word.trim_start().len();
    if !after_word.trim_start().starts_with('(') {
        return &rest[..word_end];
    }

    let open = word_end + gap;
    let mut depth = 0usize;
    for (i, c) in rest[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return &rest[..open + i + 1];
                }
            }
            _ => {}
        }
    }

    &rest[..word_end]
}

fn is_constraint(fragment: &str) -> bool {
    TABLE_CONSTRAINT.is_match(fragment)
}

fn parse_constraint(fragment: &str) -> Option<TableConstraint> {
    if let Some(caps) = FOREIGN_KEY_CONSTRAINT.captures(fragment) {
        return Some(TableConstraint::ForeignKey {
            columns: split_identifiers(&caps[1]),
            table: unquote_identifier(&caps[2]),
            targets: caps
                .get(3)
                .map(|m| split_identifiers(m.as_str()))
                .unwrap_or_default(),
        });
    }

    PRIMARY_KEY_CONSTRAINT
        .captures(fragment)
        .map(|caps| TableConstraint::PrimaryKey(split_identifiers(&caps[1])))
}

fn apply_constraint(
    table: &str,
    line: usize,
    constraint: TableConstraint,
    columns: &mut DdlColumns,
    sink: &mut DiagnosticSink,
) {
    let mut unknown = Vec::new();

    match constraint {
        TableConstraint::PrimaryKey(names) => {
            for name in names {
                match columns.fields.iter_mut().find(|f| f.name.eq_ignore_ascii_case(&name)) {
                    Some(field) => field.primary_key = true,
                    None => unknown.push(name),
                }
            }
        }
        TableConstraint::ForeignKey { columns: names, table: target, targets } => {
            for (i, name) in names.into_iter().enumerate() {
                match columns.fields.iter_mut().find(|f| f.name.eq_ignore_ascii_case(&name)) {
                    Some(field) => {
                        field.foreign_key = true;
                        field.reference = Some(target.clone());
                        columns.references.push(ColumnReference {
                            field: field.name.clone(),
                            table: target.clone(),
                            column: targets.get(i).cloned(),
                        });
                    }
                    None => unknown.push(name),
                }
            }
        }
    }

    for name in unknown {
        sink.push(
            Diagnostic::warn(
                DiagnosticCode::ConstraintUnknownColumn,
                format!("Constraint in table '{}' names unknown column '{}'", table, name),
            )
            .with_location(Location::in_table(line, table)),
        );
    }
}

fn split_identifiers(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| unquote_identifier(s.trim()))
        .filter(|s| !s.is_empty())
        .collect()
}

fn strip_line_comments(block: &str) -> String {
    block
        .lines()
        .map(|line| match line.find("--") {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(block: &str) -> (DdlColumns, DiagnosticSink) {
        let mut sink = DiagnosticSink::new();
        let columns = parse_ddl_columns("t", block, 1, &mut sink);
        (columns, sink)
    }

    #[test]
    fn nested_parameters_and_nullability() {
        let (columns, sink) = parse("a INT, b DECIMAL(10,2) NOT NULL");
        assert!(sink.is_empty());
        assert_eq!(columns.fields.len(), 2);

        let a = &columns.fields[0];
        assert_eq!((a.name.as_str(), a.field_type.as_str()), ("a", "int"));
        assert!(a.nullable);

        let b = &columns.fields[1];
        assert_eq!(b.field_type, "decimal");
        assert_eq!(b.original_type.as_deref(), Some("DECIMAL(10,2)"));
        assert!(!b.nullable);
    }

    #[test]
    fn quoted_names_and_inline_keys() {
        let (columns, _) = parse(
            "`id` BIGINT PRIMARY KEY,\n\"user_id\" INT NOT NULL REFERENCES users(id),\n[note] VARCHAR2(10 BYTE)",
        );

        let id = &columns.fields[0];
        assert_eq!(id.name, "id");
        assert!(id.primary_key);

        let user_id = &columns.fields[1];
        assert_eq!(user_id.name, "user_id");
        assert!(user_id.foreign_key);
        assert_eq!(user_id.reference.as_deref(), Some("users"));
        assert_eq!(
            columns.references,
            vec![ColumnReference {
                field: "user_id".to_string(),
                table: "users".to_string(),
                column: Some("id".to_string()),
            }]
        );

        let note = &columns.fields[2];
        assert_eq!(note.name, "note");
        assert_eq!(note.original_type.as_deref(), Some("VARCHAR2(10 BYTE)"));
        assert_eq!(note.field_type, "varchar");
    }

    #[test]
    fn table_level_constraints_are_applied() {
        let (columns, sink) = parse(
            "order_id INT, product_id INT, qty INT,
             PRIMARY KEY (order_id, product_id),
             CONSTRAINT fk_order FOREIGN KEY (order_id) REFERENCES orders (id)",
        );

        assert!(sink.is_empty());
        assert_eq!(columns.fields.len(), 3);
        assert!(columns.fields[0].primary_key && columns.fields[1].primary_key);
        assert!(!columns.fields[2].primary_key);
        assert!(columns.fields[0].foreign_key);
        assert_eq!(columns.fields[0].reference.as_deref(), Some("orders"));
        assert_eq!(columns.references[0].column.as_deref(), Some("id"));
    }

    #[test]
    fn constraint_on_unknown_column_is_reported() {
        let (_, sink) = parse("a INT, PRIMARY KEY (b)");
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.diagnostics()[0].code, DiagnosticCode::ConstraintUnknownColumn);
    }

    #[test]
    fn single_token_line_is_skipped() {
        let (columns, sink) = parse("a INT, orphan");
        assert_eq!(columns.fields.len(), 1);
        assert_eq!(sink.diagnostics()[0].code, DiagnosticCode::FieldFragmentSkipped);
        assert_eq!(sink.diagnostics()[0].snippet.as_deref(), Some("orphan"));
    }

    #[test]
    fn columns_named_like_constraint_keywords_are_kept() {
        let (columns, sink) = parse(
            "id INT, check_in DATE, unique_code VARCHAR(10), index_pos INT, constraint_name TEXT, keyword TEXT, key_id INT",
        );

        assert!(sink.is_empty());
        let names: Vec<&str> = columns.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["id", "check_in", "unique_code", "index_pos", "constraint_name", "keyword", "key_id"]
        );
    }

    #[test]
    fn index_definitions_are_not_columns() {
        let (columns, sink) = parse(
            "id INT, code INT, KEY(code), INDEX idx_code (code), UNIQUE (code), CHECK (code > 0)",
        );

        assert!(sink.is_empty());
        assert_eq!(columns.fields.len(), 2);
    }

    #[test]
    fn line_comments_are_ignored() {
        let (columns, _) = parse("a INT, -- surrogate key\nb TEXT");
        let names: Vec<&str> = columns.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}

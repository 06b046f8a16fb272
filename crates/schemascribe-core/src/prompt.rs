//! Plain-text rendering of a schema for LLM prompts

use crate::schema::{Field, Schema};

const RULE_WIDTH: usize = 60;

/// Render the schema as the structure block of a SQL-generation prompt
pub fn render(schema: &Schema) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut lines: Vec<String> = Vec::new();

    lines.push(heavy.clone());
    lines.push("DATABASE STRUCTURE".to_string());
    lines.push(heavy.clone());
    lines.push(String::new());

    if let Some(database) = schema.database_name() {
        lines.push(format!("Database: {}", database));
        lines.push(String::new());
    }

    for (i, table) in schema.tables.iter().enumerate() {
        lines.push(format!("[{}] TABLE: {}", i + 1, table.name));
        lines.push(light.clone());

        if table.fields.is_empty() {
            lines.push("    (no fields defined)".to_string());
        } else {
            lines.push("    FIELDS:".to_string());
            for field in &table.fields {
                lines.push(format!("      - {}", render_field(field)));
            }
        }

        lines.push(String::new());
    }

    if !schema.relationships.is_empty() {
        lines.push(heavy.clone());
        lines.push("RELATIONSHIPS".to_string());
        lines.push(heavy.clone());
        for rel in &schema.relationships {
            lines.push(format!("  {}", rel));
        }
        lines.push(String::new());
    }

    lines.push(heavy);
    lines.join("\n")
}

fn render_field(field: &Field) -> String {
    let mut extras = Vec::new();
    if field.primary_key {
        extras.push("PRIMARY KEY".to_string());
    }
    if field.foreign_key {
        match &field.reference {
            Some(target) => extras.push(format!("FOREIGN KEY -> {}", target)),
            None => extras.push("FOREIGN KEY".to_string()),
        }
    }
    if !field.nullable {
        extras.push("NOT NULL".to_string());
    }

    if extras.is_empty() {
        format!("{}: {}", field.name, field.field_type)
    } else {
        format!("{}: {} ({})", field.name, field.field_type, extras.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Relationship, Table};

    #[test]
    fn renders_tables_fields_and_relationships() {
        let mut schema = Schema::new();
        schema
            .metadata
            .insert("database_name".to_string(), "loja".into());
        schema.tables.push(Table::with_fields(
            "pedidos",
            vec![
                Field::new("id", "int").with_primary_key(true).with_nullable(false),
                Field::new("usuario_id", "int").with_reference("usuarios"),
                Field::new("obs", "text"),
            ],
        ));
        schema.tables.push(Table::new("vazia"));
        schema
            .relationships
            .push(Relationship::explicit("pedidos", "usuario_id", "usuarios", "id"));

        let text = render(&schema);
        assert!(text.contains("Database: loja"));
        assert!(text.contains("[1] TABLE: pedidos"));
        assert!(text.contains("- id: int (PRIMARY KEY, NOT NULL)"));
        assert!(text.contains("- usuario_id: int (FOREIGN KEY -> usuarios)"));
        assert!(text.contains("- obs: text\n"));
        assert!(text.contains("[2] TABLE: vazia"));
        assert!(text.contains("(no fields defined)"));
        assert!(text.contains("pedidos.usuario_id -> usuarios.id (foreign_key)"));
    }

    #[test]
    fn omits_optional_sections() {
        let text = render(&Schema::new());
        assert!(!text.contains("Database:"));
        assert!(!text.contains("RELATIONSHIPS"));
    }
}

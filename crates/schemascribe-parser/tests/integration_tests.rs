//! Integration tests for the parse pipeline

use pretty_assertions::assert_eq;
use schemascribe_core::{Detection, DiagnosticCode, Field, RelationshipKind, Schema};
use schemascribe_parser::{InputFormat, SchemaParser};

const USUARIOS_PEDIDOS: &str = "\
tabela: usuarios
campos: id (int, pk), nome (varchar), email (varchar), data_cadastro (datetime)

tabela: pedidos
campos: id (int, pk), usuario_id (int, fk->usuarios), valor (decimal), status (varchar)
";

fn parse(text: &str) -> Schema {
    SchemaParser::new().parse(text).unwrap()
}

fn without_timestamp(mut schema: Schema) -> Schema {
    schema.metadata.remove("parsed_at");
    schema
}

#[test]
fn usuarios_and_pedidos_end_to_end() {
    let schema = parse(USUARIOS_PEDIDOS);

    assert_eq!(schema.table_names(), vec!["usuarios", "pedidos"]);
    assert_eq!(schema.tables[0].fields.len(), 4);
    assert_eq!(schema.tables[1].fields.len(), 4);

    let id = schema.tables[0].find_field("id").unwrap();
    assert_eq!(
        id,
        &Field::new("id", "int")
            .with_original_type("int, pk")
            .with_primary_key(true)
    );

    let usuario_id = schema.tables[1].find_field("usuario_id").unwrap();
    assert!(usuario_id.foreign_key);
    assert_eq!(usuario_id.reference.as_deref(), Some("usuarios"));

    let explicit: Vec<_> = schema.explicit_relationships().collect();
    assert_eq!(explicit.len(), 1);
    assert_eq!(explicit[0].key(), ("pedidos", "usuario_id", "usuarios", "id"));
    assert_eq!(explicit[0].kind, RelationshipKind::ForeignKey);

    assert_eq!(schema.detected_format(), Some("key_value"));
    assert_eq!(schema.metadata["source"], "text");
}

#[test]
fn explicit_relationships_come_before_implicit_ones() {
    let schema = parse(USUARIOS_PEDIDOS);

    let detections: Vec<Detection> = schema.relationships.iter().map(|r| r.detection).collect();
    let first_implicit = detections
        .iter()
        .position(|d| *d == Detection::Implicit)
        .unwrap();
    assert!(detections[first_implicit..].iter().all(|d| *d == Detection::Implicit));

    let ids = schema
        .implicit_relationships()
        .find(|r| r.key() == ("usuarios", "id", "pedidos", "id"))
        .unwrap();
    assert_eq!(ids.confidence, Some(1.0));
}

#[test]
fn table_count_matches_marker_count() {
    let text: String = (0..7)
        .map(|i| format!("table: t{}\nfields: a{}, b{}\n", i, i, i))
        .collect();
    let schema = parse(&text);
    assert_eq!(schema.tables.len(), 7);
}

#[test]
fn nested_parameters_stay_in_one_field() {
    let schema = parse("tabela: periodo\ncampos: ANO (NUMBER(5,0))");
    assert_eq!(schema.tables[0].field_names(), vec!["ANO"]);
    assert_eq!(schema.tables[0].fields[0].field_type, "numeric");
}

#[test]
fn sql_ddl_nullability() {
    let schema = parse("CREATE TABLE t (a INT, b DECIMAL(10,2) NOT NULL);");

    assert_eq!(schema.detected_format(), Some("sql_ddl"));
    assert_eq!(schema.table_names(), vec!["t"]);
    let t = &schema.tables[0];
    assert!(t.fields[0].nullable);
    assert!(!t.fields[1].nullable);
}

#[test]
fn sql_references_become_relationships() {
    let ddl = "
        CREATE TABLE clientes (
            codigo INT PRIMARY KEY,
            nome VARCHAR(100) NOT NULL
        );

        CREATE TABLE contas (
            id INT,
            cliente INT NOT NULL,
            saldo DECIMAL(12,2),
            PRIMARY KEY (id),
            FOREIGN KEY (cliente) REFERENCES clientes (codigo)
        );
    ";
    let schema = parse(ddl);

    let contas = schema.find_table("contas").unwrap();
    assert!(contas.find_field("id").unwrap().primary_key);
    assert_eq!(contas.find_field("cliente").unwrap().reference.as_deref(), Some("clientes"));

    let explicit: Vec<_> = schema.explicit_relationships().map(|r| r.key()).collect();
    assert_eq!(explicit, vec![("contas", "cliente", "clientes", "codigo")]);
}

#[test]
fn shared_column_name_scores_one() {
    let schema = parse(
        "tabela: usuarios\ncampos: usuario_id (int), nome\n\ntabela: enderecos\ncampos: rua, usuario_id (int)",
    );

    let rel = schema
        .implicit_relationships()
        .find(|r| r.from_field == "usuario_id" && r.to_field == "usuario_id")
        .unwrap();
    assert_eq!(rel.confidence, Some(1.0));
    assert_eq!(rel.kind, RelationshipKind::PossibleForeignKey);
    assert!(schema
        .relationships
        .iter()
        .filter_map(|r| r.confidence)
        .all(|c| (0.0..=1.0).contains(&c)));
}

#[test]
fn parsing_is_idempotent() {
    let first = without_timestamp(parse(USUARIOS_PEDIDOS));
    let second = without_timestamp(parse(USUARIOS_PEDIDOS));
    assert_eq!(first, second);
}

#[test]
fn markdown_document() {
    let text = "\
# Banco: loja

## Tabela: produtos
campos: id (int, pk), nome (varchar)

## Tabela: estoque
campos: produto_id (int, fk->produtos), quantidade (int)
";
    let output = SchemaParser::new().parse_with_diagnostics(text).unwrap();

    assert_eq!(output.format, InputFormat::Markdown);
    assert_eq!(output.schema.table_names(), vec!["produtos", "estoque"]);
    assert_eq!(output.schema.database_name(), Some("loja"));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn relationships_section_is_read() {
    let text = "\
tabela: itens
campos: id, pedido_id

tabela: pedidos
campos: id

relacionamentos:
itens.pedido_id -> pedidos.id
# comentario
";
    let schema = parse(text);

    let explicit: Vec<_> = schema.explicit_relationships().map(|r| r.key()).collect();
    assert_eq!(explicit, vec![("itens", "pedido_id", "pedidos", "id")]);
}

#[test]
fn empty_table_is_reported_not_rejected() {
    let output = SchemaParser::new()
        .parse_with_diagnostics("tabela: logs\n\ntabela: users\ncampos: id")
        .unwrap();

    assert_eq!(output.schema.tables.len(), 2);
    assert!(output.schema.tables[0].fields.is_empty());
    assert_eq!(output.diagnostics[0].code, DiagnosticCode::TableWithoutFields);
}

#[test]
fn schema_json_uses_wire_keys() {
    let json: serde_json::Value =
        serde_json::from_str(&parse(USUARIOS_PEDIDOS).to_json().unwrap()).unwrap();

    let field = &json["tables"][1]["fields"][1];
    assert_eq!(field["name"], "usuario_id");
    assert_eq!(field["type"], "int");
    assert_eq!(field["reference"], "usuarios");

    let rel = &json["relationships"][0];
    assert_eq!(rel["type"], "foreign_key");
    assert_eq!(rel["detected"], "explicit");
    assert!(rel.get("confidence").is_none());
}

#[test]
fn explicit_and_implicit_with_same_columns_are_both_reported() {
    let text = "\
tabela: a
campos: x (int)

tabela: b
campos: x (int)

relacionamentos:
a.x -> b.x
";
    let schema = parse(text);

    let matching: Vec<(Detection, Option<f64>)> = schema
        .relationships
        .iter()
        .filter(|r| r.key() == ("a", "x", "b", "x"))
        .map(|r| (r.detection, r.confidence))
        .collect();
    assert_eq!(
        matching,
        vec![(Detection::Explicit, None), (Detection::Implicit, Some(1.0))]
    );
}

#[test]
fn sql_columns_named_after_constraint_keywords() {
    let output = SchemaParser::new()
        .parse_with_diagnostics(
            "CREATE TABLE reservas (id INT, check_in DATE, unique_code VARCHAR(10), index_pos INT, constraint_name TEXT, keyword TEXT, KEY(index_pos))",
        )
        .unwrap();

    assert_eq!(
        output.schema.tables[0].field_names(),
        vec!["id", "check_in", "unique_code", "index_pos", "constraint_name", "keyword"]
    );
    assert!(output.diagnostics.is_empty());
}

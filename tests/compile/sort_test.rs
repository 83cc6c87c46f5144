//! Tests for foreign-key dependency ordering across compiled models.

use morphe_psql::compile::{compile_model, sort_tables, CompileError, Compiler, SortError};
use morphe_psql::config::ModelsConfig;
use morphe_psql::model::{FieldType, InMemoryRegistry, Model, Registry, RelationKind};
use morphe_psql::sql::Table;
use morphe_psql::writer::Writers;

fn keyed(name: &str) -> Model {
    Model::new(name)
        .field("ID", FieldType::AutoIncrement)
        .identifier("primary", &["ID"])
}

fn compile_registry(registry: &InMemoryRegistry) -> Vec<Table> {
    let config = ModelsConfig::default();
    registry
        .model_names()
        .iter()
        .flat_map(|name| {
            let model = registry.model(name).unwrap();
            compile_model(&config, registry, model).unwrap().into_tables()
        })
        .collect()
}

fn names(tables: &[Table]) -> Vec<&str> {
    tables.iter().map(|t| t.name.as_str()).collect()
}

#[test]
fn test_referenced_tables_come_first() {
    let registry = InMemoryRegistry::new()
        .with_model(keyed("Person").relation("ContactInfo", RelationKind::FOR_ONE))
        .with_model(keyed("ContactInfo").relation("Person", RelationKind::HAS_ONE));

    let sorted = sort_tables(compile_registry(&registry)).unwrap();
    assert_eq!(names(&sorted), vec!["contact_infos", "people"]);
}

#[test]
fn test_junction_after_both_sides() {
    let registry = InMemoryRegistry::new()
        .with_model(keyed("Person").relation("Tag", RelationKind::FOR_MANY))
        .with_model(keyed("Tag"));

    let sorted = sort_tables(compile_registry(&registry)).unwrap();
    assert_eq!(names(&sorted), vec!["people", "tags", "person_tags"]);
}

#[test]
fn test_chain_and_ties() {
    // Invoice → Order → Customer; Product is independent.
    let registry = InMemoryRegistry::new()
        .with_model(keyed("Invoice").relation("Order", RelationKind::FOR_ONE))
        .with_model(keyed("Order").relation("Customer", RelationKind::FOR_ONE))
        .with_model(keyed("Customer"))
        .with_model(keyed("Product"));

    let sorted = sort_tables(compile_registry(&registry)).unwrap();
    assert_eq!(
        names(&sorted),
        vec!["customers", "orders", "invoices", "products"]
    );
}

#[test]
fn test_order_independent_of_input_order() {
    let registry = InMemoryRegistry::new()
        .with_model(keyed("Invoice").relation("Order", RelationKind::FOR_ONE))
        .with_model(keyed("Order").relation("Customer", RelationKind::FOR_ONE))
        .with_model(keyed("Customer"));

    let tables = compile_registry(&registry);
    let mut reversed = tables.clone();
    reversed.reverse();

    let a = sort_tables(tables).unwrap();
    let b = sort_tables(reversed).unwrap();
    assert_eq!(names(&a), names(&b));
}

#[test]
fn test_self_reference_does_not_block() {
    let registry = InMemoryRegistry::new().with_model(
        keyed("Employee").aliased_relation("Manager", RelationKind::FOR_ONE, "Employee"),
    );

    let sorted = sort_tables(compile_registry(&registry)).unwrap();
    assert_eq!(names(&sorted), vec!["employees"]);
    assert!(sorted[0].foreign_keys[0].is_self_reference());
}

#[test]
fn test_mutual_references_are_a_cycle() {
    let registry = InMemoryRegistry::new()
        .with_model(keyed("Alpha").relation("Beta", RelationKind::FOR_ONE))
        .with_model(keyed("Beta").relation("Alpha", RelationKind::FOR_ONE));

    let err = sort_tables(compile_registry(&registry)).unwrap_err();
    match err {
        SortError::Cycle { tables } => assert_eq!(tables, vec!["public.alphas", "public.betas"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_cycle_fails_whole_compilation() {
    let registry = InMemoryRegistry::new()
        .with_model(keyed("Alpha").relation("Beta", RelationKind::FOR_ONE))
        .with_model(keyed("Beta").relation("Alpha", RelationKind::FOR_ONE));

    let err = Compiler::default()
        .compile_all(&registry, &mut Writers::psql())
        .unwrap_err();
    assert!(matches!(err, CompileError::Graph(SortError::Cycle { .. })));
}

//! Tests for lowering entities to views.

use insta::assert_snapshot;
use morphe_psql::compile::{compile_entity, CompileError};
use morphe_psql::config::EntitiesConfig;
use morphe_psql::model::{Entity, FieldType, InMemoryRegistry, Model, RelationKind};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

fn assert_valid_sql(sql: &str) {
    if let Err(e) = Parser::parse_sql(&PostgreSqlDialect {}, sql) {
        panic!("Invalid SQL: {}\nSQL: {}", e, sql);
    }
}

/// Person → ContactInfo → Address, plus a many-valued Person → Pet.
fn registry() -> InMemoryRegistry {
    InMemoryRegistry::new()
        .with_model(
            Model::new("Person")
                .field("ID", FieldType::AutoIncrement)
                .field("Name", FieldType::String)
                .identifier("primary", &["ID"])
                .relation("ContactInfo", RelationKind::FOR_ONE)
                .relation("Pet", RelationKind::HAS_MANY),
        )
        .with_model(
            Model::new("ContactInfo")
                .field("ID", FieldType::AutoIncrement)
                .field("Email", FieldType::String)
                .identifier("primary", &["ID"])
                .relation("Address", RelationKind::HAS_ONE),
        )
        .with_model(
            Model::new("Address")
                .field("ID", FieldType::AutoIncrement)
                .field("City", FieldType::String)
                .identifier("primary", &["ID"]),
        )
        .with_model(
            Model::new("Pet")
                .field("ID", FieldType::AutoIncrement)
                .identifier("primary", &["ID"]),
        )
}

#[test]
fn test_single_hop_projection() {
    let entity = Entity::new("Person")
        .field("ID", "Person.ID")
        .field("Email", "Person.ContactInfo.Email");

    let view = compile_entity(&EntitiesConfig::default(), &registry(), &entity).unwrap();
    let sql = view.to_sql();

    assert_snapshot!(sql, @r"
    CREATE OR REPLACE VIEW public.people_entities AS SELECT
      contact_infos.email,
      people.id
    FROM public.people
    LEFT JOIN public.contact_infos AS contact_infos ON people.id = contact_infos.id;
    ");
    assert_valid_sql(&sql);
}

#[test]
fn test_multi_hop_chains_joins() {
    let entity = Entity::new("Person")
        .field("City", "Person.ContactInfo.Address.City")
        .field("Email", "Person.ContactInfo.Email");

    let view = compile_entity(&EntitiesConfig::default(), &registry(), &entity).unwrap();

    let aliases: Vec<&str> = view.joins.iter().map(|j| j.alias.as_str()).collect();
    assert_eq!(aliases, vec!["contact_infos", "addresses"]);

    let address = view.get_join("addresses").unwrap();
    assert_eq!(address.conditions[0].left, "contact_infos.id");
    assert_eq!(address.conditions[0].right, "addresses.id");

    assert_eq!(view.columns[0].source, "addresses.city");
    assert_eq!(view.columns[1].source, "contact_infos.email");
    assert_valid_sql(&view.to_sql());
}

#[test]
fn test_shared_hop_joined_once() {
    let entity = Entity::new("Person")
        .field("Email", "Person.ContactInfo.Email")
        .field("ContactID", "Person.ContactInfo.ID");

    let view = compile_entity(&EntitiesConfig::default(), &registry(), &entity).unwrap();
    assert_eq!(view.joins.len(), 1);
    assert_eq!(view.columns.len(), 2);
    assert_eq!(view.columns[0].alias.as_deref(), Some("contact_id"));
}

#[test]
fn test_has_many_hop_rejected() {
    let entity = Entity::new("Person").field("PetID", "Person.Pet.ID");
    let err = compile_entity(&EntitiesConfig::default(), &registry(), &entity).unwrap_err();
    assert!(matches!(
        err,
        CompileError::NonSingularHop { ref relation, .. } if relation == "Pet"
    ));
}

#[test]
fn test_entity_view_is_deterministic() {
    let entity = Entity::new("Person")
        .field("Name", "Person.Name")
        .field("Email", "Person.ContactInfo.Email")
        .field("City", "Person.ContactInfo.Address.City")
        .field("ID", "Person.ID");

    let registry = registry();
    let first = compile_entity(&EntitiesConfig::default(), &registry, &entity)
        .unwrap()
        .to_sql();
    for _ in 0..10 {
        let again = compile_entity(&EntitiesConfig::default(), &registry, &entity)
            .unwrap()
            .to_sql();
        assert_eq!(again, first);
    }
}

#[test]
fn test_self_relation_hop_gets_own_alias() {
    let registry = InMemoryRegistry::new().with_model(
        Model::new("Person")
            .field("ID", FieldType::AutoIncrement)
            .field("Name", FieldType::String)
            .identifier("primary", &["ID"])
            .aliased_relation("Manager", RelationKind::FOR_ONE, "Person"),
    );
    let entity = Entity::new("Person")
        .field("Name", "Person.Name")
        .field("ManagerName", "Person.Manager.Name");

    let view = compile_entity(&EntitiesConfig::default(), &registry, &entity).unwrap();

    assert_eq!(view.joins.len(), 1);
    let join = &view.joins[0];
    assert_ne!(join.alias, view.from_alias);
    assert_eq!(join.table, "people");
    assert_eq!(join.alias, "people_manager");
    assert_eq!(join.conditions[0].left, "people.id");
    assert_eq!(join.conditions[0].right, "people_manager.id");

    assert_eq!(view.columns[0].source, "people_manager.name");
    assert_eq!(view.columns[0].alias.as_deref(), Some("manager_name"));
    assert_eq!(view.columns[1].source, "people.name");

    let sql = view.to_sql();
    assert!(sql.contains("LEFT JOIN public.people AS people_manager ON people.id = people_manager.id"));
    assert_valid_sql(&sql);
}

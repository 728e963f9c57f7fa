//! Integration tests for schema derivation.

use pretty_assertions::assert_eq;
use schemagen_core::{
    derive_schema, DdlEmitter, DerivedSchema, EdgeType, EntityCatalog, Error, GeneratorConfig,
    MysqlEmitter, MysqlTypes, ReferenceOption, ValidationError,
};
use std::collections::HashMap;
use std::io::Write;

fn derive(json: &str) -> Result<DerivedSchema, Error> {
    let catalog = EntityCatalog::from_json_str(json)?;
    derive_schema(&catalog, &MysqlTypes, catalog.seeds())
}

fn names(schema: &DerivedSchema) -> Vec<&str> {
    schema.tables.iter().map(|t| t.name()).collect()
}

/// Every dependency of a table appears before it.
fn assert_linearization(schema: &DerivedSchema) {
    let position: HashMap<&str, usize> = names(schema)
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name, i))
        .collect();

    for (i, table) in schema.tables.iter().enumerate() {
        for dep in table.dependencies() {
            if dep != table.name() {
                assert!(
                    position[dep] < i,
                    "{} must come after {}",
                    table.name(),
                    dep
                );
            }
        }
    }
}

const SHOP: &str = r#"{
    "seeds": ["Customer", "Order"],
    "entities": [
        {"name": "Customer", "fields": [
            {"name": "id", "type": "uint64", "tags": ["primaryKey", "autoIncrement"]},
            {"name": "email", "type": "string", "tags": ["width:255", "unique:email"]},
            {"name": "address", "type": "Address"}
        ]},
        {"name": "Address", "fields": [
            {"name": "street", "type": "string", "tags": ["width:128"]},
            {"name": "city", "type": "string", "tags": ["width:64"]}
        ]},
        {"name": "Order", "fields": [
            {"name": "id", "type": "uint64", "tags": ["primaryKey", "autoIncrement"]},
            {"name": "buyer", "type": "*Customer"},
            {"name": "lines", "type": "[]Line"},
            {"name": "coupons", "type": "[]*Coupon"},
            {"name": "placedAt", "type": "timestamp", "tags": ["composite:byDate"]}
        ]},
        {"name": "Line", "fields": [
            {"name": "order", "type": "*Order", "tags": ["parent", "primaryKey"]},
            {"name": "position", "type": "uint16", "tags": ["primaryKey"]},
            {"name": "product", "type": "*Product"},
            {"name": "quantity", "type": "uint32"}
        ]},
        {"name": "Product", "fields": [
            {"name": "sku", "type": "string", "tags": ["primaryKey", "width:16", "fixed"]},
            {"name": "price", "type": "float64"}
        ]},
        {"name": "Coupon", "fields": [
            {"name": "code", "type": "string", "tags": ["primaryKey", "width:12"]}
        ]}
    ]
}"#;

#[test]
fn test_shop_order_is_valid_and_stable() {
    let schema = derive(SHOP).unwrap();

    assert_eq!(schema.tables.len(), 6);
    assert_linearization(&schema);
    assert_eq!(
        names(&schema),
        vec!["Coupon", "Customer", "Address", "Order", "Product", "Line"]
    );

    let again = derive(SHOP).unwrap();
    assert_eq!(schema, again);
}

#[test]
fn test_shop_relationships() {
    let schema = derive(SHOP).unwrap();

    let order = schema.get("Order").unwrap();
    assert_eq!(order.find_edge_by_name("buyer").unwrap().edge_type, EdgeType::MultiOne);
    assert_eq!(order.find_edge_by_name("lines").unwrap().edge_type, EdgeType::OneMulti);
    assert_eq!(order.find_edge_by_name("coupons").unwrap().edge_type, EdgeType::MultiMulti);

    let line = schema.get("Line").unwrap();
    assert_eq!(
        line.find_edge_by_name("order").unwrap().edge_type,
        EdgeType::MultiOneParent
    );
    assert_eq!(line.table.primary_keys, vec!["Order_id", "position"]);

    let parent_fk = line
        .table
        .foreign_keys
        .iter()
        .find(|fk| fk.ref_table == "Order")
        .unwrap();
    assert_eq!(parent_fk.on_update, ReferenceOption::Cascade);
    assert_eq!(parent_fk.on_delete, ReferenceOption::Cascade);

    let product_fk = line
        .table
        .foreign_keys
        .iter()
        .find(|fk| fk.ref_table == "Product")
        .unwrap();
    assert_eq!(product_fk.source_columns, vec!["Product_sku"]);
    assert_eq!(product_fk.on_delete, ReferenceOption::Restrict);
    assert_eq!(
        line.table.find_field("Product_sku").unwrap().column_type,
        "CHAR(16)"
    );

    // Address is embedded by value, so it gets an inferred parent edge.
    let address = schema.get("Address").unwrap();
    assert_eq!(address.known_parent.as_deref(), Some("Customer"));
    assert_eq!(
        address.find_edge_by_name("_parent_").unwrap().edge_type,
        EdgeType::OneOneParent
    );
    assert_eq!(address.table.fields[2].name, "Customer_id");
    assert!(!address.table.fields[2].auto_increment);

    let bridge = &order.aux_tables[0];
    assert_eq!(bridge.name, "Order_coupons");
    assert_eq!(bridge.primary_keys, vec!["Order_id", "Coupon_code"]);
}

#[test]
fn test_explicit_parent_pointer() {
    let schema = derive(
        r#"{
            "seeds": ["Y"],
            "entities": [
                {"name": "X", "fields": [
                    {"name": "id", "type": "uint32", "tags": ["primaryKey"]},
                    {"name": "parent", "type": "*Y", "tags": ["parent"]}
                ]},
                {"name": "Y", "fields": [
                    {"name": "id", "type": "uint32", "tags": ["primaryKey"]},
                    {"name": "children", "type": "[]X"}
                ]}
            ]
        }"#,
    )
    .unwrap();

    let y = schema.get("Y").unwrap();
    assert_eq!(y.find_edge_by_peer("X").unwrap().edge_type, EdgeType::OneMulti);
    assert!(y.table.foreign_keys.is_empty());

    let x = schema.get("X").unwrap();
    assert_eq!(x.find_edge_by_peer("Y").unwrap().edge_type, EdgeType::MultiOneParent);
    assert_eq!(x.table.foreign_keys.len(), 1);
    assert_eq!(x.table.foreign_keys[0].ref_table, "Y");
    assert_eq!(x.table.foreign_keys[0].on_update, ReferenceOption::Cascade);
    assert_eq!(x.table.foreign_keys[0].on_delete, ReferenceOption::Cascade);
}

#[test]
fn test_self_parent_pointer_before_embedding() {
    let schema = derive(
        r#"{
            "seeds": ["Node"],
            "entities": [
                {"name": "Node", "fields": [
                    {"name": "up", "type": "*Node", "tags": ["parent"]},
                    {"name": "id", "type": "uint32", "tags": ["primaryKey"]},
                    {"name": "children", "type": "[]Node"}
                ]}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(names(&schema), vec!["Node"]);
    let node = schema.get("Node").unwrap();
    assert_eq!(node.find_edge_by_name("up").unwrap().edge_type, EdgeType::MultiOneParent);
    assert!(node.find_edge_by_name("_parent_").is_none());

    let fk = &node.table.foreign_keys[0];
    assert_eq!(fk.source_columns, vec!["Node_id"]);
    assert_eq!(fk.ref_table, "Node");
    assert_eq!(fk.on_delete, ReferenceOption::Cascade);
}

#[test]
fn test_two_pointers_to_same_peer_collide() {
    let err = derive(
        r#"{
            "seeds": ["Post"],
            "entities": [
                {"name": "User", "fields": [
                    {"name": "id", "type": "uint64", "tags": ["primaryKey"]}
                ]},
                {"name": "Post", "fields": [
                    {"name": "id", "type": "uint64", "tags": ["primaryKey"]},
                    {"name": "author", "type": "*User"},
                    {"name": "editor", "type": "*User"}
                ]}
            ]
        }"#,
    )
    .unwrap_err();

    assert!(!err.is_defect());
    assert!(matches!(
        err,
        Error::Validation(ValidationError::ColumnCollision { ref table, ref column })
            if table == "Post" && column == "User_id"
    ));
}

#[test]
fn test_pointer_slice_bridge() {
    let schema = derive(
        r#"{
            "seeds": ["X"],
            "entities": [
                {"name": "X", "fields": [
                    {"name": "id", "type": "uint32", "tags": ["primaryKey"]},
                    {"name": "ys", "type": "[]*Y"}
                ]},
                {"name": "Y", "fields": [
                    {"name": "id", "type": "uint32", "tags": ["primaryKey"]}
                ]}
            ]
        }"#,
    )
    .unwrap();

    let x = schema.get("X").unwrap();
    assert_eq!(x.find_edge_by_name("ys").unwrap().edge_type, EdgeType::MultiMulti);

    let bridge = &x.aux_tables[0];
    assert_eq!(bridge.name, "X_ys");
    assert_eq!(bridge.primary_keys, vec!["X_id", "Y_id"]);

    let y_side = bridge.foreign_keys.iter().find(|fk| fk.ref_table == "Y").unwrap();
    assert_eq!(y_side.source_columns, vec!["Y_id"]);
    assert_eq!(y_side.on_update, ReferenceOption::Cascade);
    assert_eq!(y_side.on_delete, ReferenceOption::Cascade);
}

#[test]
fn test_pointer_policy_follows_nullability() {
    let catalog = |nullable: &str| {
        format!(
            r#"{{
                "seeds": ["X"],
                "entities": [
                    {{"name": "X", "fields": [{{"name": "y", "type": "*Y"}}]}},
                    {{"name": "Y", "fields": [
                        {{"name": "code", "type": "string", "tags": ["primaryKey", "width:8"{}]}}
                    ]}}
                ]
            }}"#,
            nullable
        )
    };

    let optional = derive(&catalog(r#", "nullable""#)).unwrap();
    let fk = &optional.get("X").unwrap().table.foreign_keys[0];
    assert_eq!(fk.on_update, ReferenceOption::SetNull);
    assert_eq!(fk.on_delete, ReferenceOption::SetNull);

    let required = derive(&catalog("")).unwrap();
    let fk = &required.get("X").unwrap().table.foreign_keys[0];
    assert_eq!(fk.on_update, ReferenceOption::Restrict);
    assert_eq!(fk.on_delete, ReferenceOption::Restrict);
}

#[test]
fn test_reference_cycle_fails() {
    let err = derive(
        r#"{
            "seeds": ["A"],
            "entities": [
                {"name": "A", "fields": [
                    {"name": "id", "type": "uint32", "tags": ["primaryKey"]},
                    {"name": "b", "type": "*B"}
                ]},
                {"name": "B", "fields": [
                    {"name": "id", "type": "uint32", "tags": ["primaryKey"]},
                    {"name": "c", "type": "*C"}
                ]},
                {"name": "C", "fields": [
                    {"name": "id", "type": "uint32", "tags": ["primaryKey"]},
                    {"name": "a", "type": "*A"}
                ]}
            ]
        }"#,
    )
    .unwrap_err();

    assert!(!err.is_defect());
    assert_eq!(err.to_string(), "reference cycle detected: A -> B -> C -> A");
}

#[test]
fn test_separator_in_field_name_fails_for_any_type() {
    for ty in ["uint32", "*Y", "[]Y", "[]*Y"] {
        let json = format!(
            r#"{{
                "seeds": ["X"],
                "entities": [
                    {{"name": "X", "fields": [{{"name": "foo_bar", "type": "{}"}}]}},
                    {{"name": "Y", "fields": []}}
                ]
            }}"#,
            ty
        );
        let err = derive(&json).unwrap_err();
        assert!(
            matches!(
                err,
                Error::Validation(ValidationError::UnderscoreInFieldName { ref field, .. })
                    if field == "foo_bar"
            ),
            "type {}: {}",
            ty,
            err
        );
    }
}

#[test]
fn test_parent_pointer_without_embedding_fails() {
    let err = derive(
        r#"{
            "seeds": ["X"],
            "entities": [
                {"name": "X", "fields": [
                    {"name": "id", "type": "uint32", "tags": ["primaryKey"]},
                    {"name": "owner", "type": "*Y", "tags": ["parent"]}
                ]},
                {"name": "Y", "fields": [
                    {"name": "id", "type": "uint32", "tags": ["primaryKey"]}
                ]}
            ]
        }"#,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::ParentNotEmbedding { .. })
    ));
}

#[test]
fn test_catalog_file_to_ddl() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SHOP.as_bytes()).unwrap();

    let catalog = EntityCatalog::from_path(file.path()).unwrap();
    let schema = derive_schema(&catalog, &MysqlTypes, catalog.seeds()).unwrap();
    let sql = MysqlEmitter.render(&schema, &GeneratorConfig::default());

    let creates: Vec<&str> = sql
        .lines()
        .filter_map(|line| line.strip_prefix("CREATE TABLE "))
        .map(|rest| rest.trim_end_matches(" ("))
        .collect();
    assert_eq!(
        creates,
        vec!["Coupon", "Customer", "Address", "Order", "Order_coupons", "Product", "Line"]
    );
    assert!(sql.contains(
        "\tFOREIGN KEY (Order_id) REFERENCES Order(id) ON UPDATE CASCADE ON DELETE CASCADE"
    ));
    assert!(sql.contains("\tKEY `byDate` (placedAt)"));
}

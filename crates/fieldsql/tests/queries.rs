use fieldsql::prelude::*;
use fieldsql::{Operator, RowMap};

#[derive(Debug, Default, Clone, PartialEq, Schema)]
struct Order {
    #[orm(column = "ID")]
    id: u64,
    #[orm(column = "CustomerID")]
    customer_id: u64,
    status: String,
    total: f64,
    note: Option<String>,
}

#[derive(Debug, Default, Schema)]
struct Unregistered {
    code: String,
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register::<Order>();
    registry
}

#[test]
fn foreign_field_anywhere_in_a_tree_means_false() {
    let registry = registry();
    let f = Order::fields();
    let stray = Unregistered::fields();

    let alone = Condition::eq(&stray.code, "x".to_string()).build(&registry);
    assert_eq!(alone.sql, "false");
    assert!(alone.values.is_empty());

    let nested = Condition::or([
        Condition::eq(&f.status, "open".to_string()),
        Condition::and([
            Condition::gt(&f.total, 10.0),
            Condition::in_list(&stray.code, ["a".to_string(), "b".to_string()]),
        ]),
    ])
    .build(&registry);
    assert_eq!(nested.sql, "false");
    assert!(nested.values.is_empty());
    assert!(nested.is_always_false());
}

#[test]
fn nested_conditions_keep_parameter_order() {
    let registry = registry();
    let f = Order::fields();
    let fragment = Condition::and([
        Condition::eq(&f.customer_id, 4),
        Condition::or([
            Condition::eq(&f.status, "open".to_string()),
            Condition::not_in(&f.status, ["void".to_string(), "lost".to_string()]),
        ]),
        Condition::ne(&f.note, None),
    ])
    .build(&registry);

    assert_eq!(
        fragment.sql,
        "(`CustomerID` = ? AND (`status` = ? OR `status` NOT IN (?, ?)) AND `note` IS NOT NULL)"
    );
    assert_eq!(
        fragment.values,
        vec![
            Value::UInt(4),
            Value::Text("open".into()),
            Value::Text("void".into()),
            Value::Text("lost".into()),
        ]
    );
}

#[test]
fn single_value_lists_degenerate_to_the_solo_operator() {
    let registry = registry();
    let f = Order::fields();
    assert_eq!(
        Condition::in_list(&f.id, [7]).build(&registry),
        Condition::eq(&f.id, 7).build(&registry)
    );
    assert_eq!(
        Condition::not_in(&f.id, [7]).build(&registry).sql,
        "`ID` != ?"
    );
    assert_eq!(Condition::in_list(&f.id, Vec::new()).build(&registry).sql, "false");
    assert_eq!(Operator::NotIn.to_string(), "NOT IN");
}

#[test]
fn paging_and_ordering() {
    let registry = registry();
    let f = Order::fields();
    let q = SelectRows::<Order>::full(&registry, "orders")
        .filter(Condition::substring(&f.status, "pen"))
        .order_asc(&f.total)
        .page(2, 10);
    let built = q.build();
    assert_eq!(
        built.sql,
        "SELECT `ID`, `CustomerID`, `status`, `total`, `note` FROM `orders` \
         WHERE `status` LIKE ? ORDER BY `total` ASC LIMIT 10, 10"
    );
    assert_eq!(built.params, vec![Value::Text("%pen%".into())]);

    let q = q.limit(5);
    assert!(q.to_sql().ends_with("LIMIT 0, 5"));
}

#[test]
fn insert_many_from_structs() {
    let registry = registry();
    let orders = [
        Order {
            id: 1,
            customer_id: 9,
            status: "open".into(),
            ..Order::default()
        },
        Order {
            id: 2,
            customer_id: 9,
            status: "paid".into(),
            total: 12.5,
            ..Order::default()
        },
    ];
    let rows: Vec<RowMap> = orders.iter().map(|o| to_row(&registry, o)).collect();
    let built = InsertRows::new("orders").rows(rows).build();
    assert_eq!(
        built.sql,
        "INSERT INTO `orders` (`CustomerID`, `ID`, `note`, `status`, `total`) \
         VALUES (?, ?, ?, ?, ?), (?, ?, ?, ?, ?)"
    );
    assert_eq!(built.params.len(), 10);
    assert_eq!(built.params[6], Value::UInt(2));
}

#[test]
fn unregistered_struct_cannot_be_inserted() {
    let registry = registry();
    let row = to_row(&registry, &Unregistered { code: "x".into() });
    assert!(row.is_empty());
    assert!(InsertRow::new("things").row(row).build().is_empty());
}

#[test]
fn update_and_delete_never_widen() {
    let registry = registry();
    let f = Order::fields();
    let stray = Unregistered::fields();

    let update = Update::<Order>::new(&registry, "orders").set(&f.status, "void".to_string());
    assert_eq!(update.to_sql(), "UPDATE `orders` SET `status` = ? WHERE false");

    let update = update.filter(Condition::and([
        Condition::eq(&f.id, 1),
        Condition::eq(&stray.code, "a".to_string()),
    ]));
    assert_eq!(update.to_sql(), "UPDATE `orders` SET `status` = ? WHERE false");

    let delete = Delete::new(&registry, "orders").filter(Condition::lte(&f.total, 0.0));
    assert_eq!(delete.to_sql(), "DELETE FROM `orders` WHERE `total` <= ?");
}

#[test]
fn debug_rendering() {
    let registry = registry();
    let f = Order::fields();
    let q = Count::new(&registry, "orders").filter(Condition::and([
        Condition::eq(&f.status, "open".to_string()),
        Condition::gte(&f.total, 2.5),
    ]));
    assert_eq!(
        q.to_debug_string(),
        "SELECT COUNT(*) FROM `orders` WHERE (`status` = 'open' AND `total` >= 2.5)"
    );
}

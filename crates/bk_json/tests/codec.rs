use std::collections::{BTreeMap, HashMap};
use std::sync::Barrier;
use std::thread;

use bk_json::{DecodeError, EncodeError, SchemaError};
use bk_reflect::derive::Reflect;
use serde_json::{Value, json};

#[derive(Reflect, Default, Debug, PartialEq, Clone)]
struct Address {
    #[json("line1")]
    line1: String,
    #[json("postal_code")]
    postal_code: Option<String>,
}

#[derive(Reflect, Default, Debug, PartialEq, Clone)]
struct Account {
    #[json("id,required")]
    id: Option<String>,
    #[json("balance")]
    balance: i64,
    #[json("active")]
    active: bool,
    #[json("tags")]
    tags: Vec<String>,
    #[json("limits")]
    limits: BTreeMap<String, u32>,
    #[json("address")]
    address: Option<Address>,
    #[json("rate")]
    rate: Option<f64>,
}

#[test]
fn round_trip_with_golden_bytes() {
    let account = Account {
        id: Some("acc_123".into()),
        balance: -50,
        active: true,
        tags: vec!["b".into(), "a".into()],
        limits: BTreeMap::from([("daily".into(), 10), ("atm".into(), 2)]),
        address: Some(Address {
            line1: "1 Main St".into(),
            postal_code: None,
        }),
        rate: Some(0.25),
    };

    let bytes = bk_json::to_vec(&account).unwrap();
    assert_eq!(
        String::from_utf8(bytes.clone()).unwrap(),
        r#"{"active":true,"address":{"line1":"1 Main St"},"balance":-50,"id":"acc_123","limits":{"atm":2,"daily":10},"rate":0.25,"tags":["b","a"]}"#
    );

    let decoded: Account = bk_json::from_slice(&bytes).unwrap();
    assert_eq!(decoded, account);
}

#[test]
fn required_absent_field_is_null() {
    let bytes = bk_json::to_vec(&Account::default()).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        r#"{"active":false,"balance":0,"id":null,"limits":{},"tags":[]}"#
    );
}

#[test]
fn lenient_coercion_in_fields() {
    let account: Account =
        bk_json::from_slice(br#"{"balance":"65","active":"true","tags":[12,false],"limits":{"x":true}}"#)
            .unwrap();
    assert_eq!(account.balance, 65);
    assert!(account.active);
    assert_eq!(account.tags, ["12", "false"]);
    assert_eq!(account.limits["x"], 1);
}

#[test]
fn errors_name_the_field_path() {
    let err = bk_json::from_slice::<Account>(br#"{"address":{"line1":{"x":1}}}"#).unwrap_err();
    assert_eq!(err.to_string(), "$.address.line1: expected string, found object");

    let err = bk_json::from_slice::<Account>(br#"{"tags":"a"}"#).unwrap_err();
    assert_eq!(err.to_string(), "$.tags: expected array, found string");
}

// -----------------------------------------------------------------------------
// Extras and flattening

#[derive(Reflect, Default, Debug, PartialEq)]
struct Flag {
    #[json("a")]
    a: bool,
    #[json(",extras")]
    extras: HashMap<String, Value>,
}

#[test]
fn unknown_fields_go_to_extras() {
    let flag: Flag = bk_json::from_slice(br#"{"a":true,"foo":"bar"}"#).unwrap();
    assert!(flag.a);
    assert_eq!(flag.extras, HashMap::from([("foo".to_string(), json!("bar"))]));
}

#[test]
fn unknown_fields_without_extras_are_ignored() {
    let address: Address = bk_json::from_slice(br#"{"line1":"x","country":"US"}"#).unwrap();
    assert_eq!(address.line1, "x");
}

#[test]
fn extras_are_spliced_sorted_and_win() {
    let flag = Flag {
        a: false,
        extras: HashMap::from([
            ("z".to_string(), json!(1)),
            ("a".to_string(), json!("override")),
            ("m".to_string(), json!(null)),
        ]),
    };
    let bytes = bk_json::to_vec(&flag).unwrap();
    assert_eq!(bytes, br#"{"a":"override","m":null,"z":1}"#);
}

#[derive(Reflect, Default, Debug, PartialEq)]
struct Entity {
    #[json("id")]
    id: String,
    #[json(flatten)]
    address: Address,
    #[json(",extras")]
    extras: BTreeMap<String, Value>,
}

#[test]
fn flattened_fields_share_the_parent_object() {
    let entity: Entity =
        bk_json::from_slice(br#"{"id":"ent_1","line1":"2 High St","postal_code":"N1","kind":"llc"}"#).unwrap();
    assert_eq!(entity.address.line1, "2 High St");
    assert_eq!(entity.address.postal_code.as_deref(), Some("N1"));
    assert_eq!(entity.extras, BTreeMap::from([("kind".to_string(), json!("llc"))]));

    let bytes = bk_json::to_vec(&entity).unwrap();
    assert_eq!(
        bytes,
        br#"{"id":"ent_1","kind":"llc","line1":"2 High St","postal_code":"N1"}"#
    );
}

#[test]
fn decode_into_keeps_absent_fields() {
    let mut entity = Entity {
        id: "ent_1".into(),
        ..Default::default()
    };
    entity.address.line1 = "old".into();
    bk_json::decode_into(br#"{"postal_code":"E2"}"#, &mut entity).unwrap();
    assert_eq!(entity.id, "ent_1");
    assert_eq!(entity.address.line1, "old");
    assert_eq!(entity.address.postal_code.as_deref(), Some("E2"));
}

// -----------------------------------------------------------------------------
// Misconfiguration

#[derive(Reflect, Default, Debug)]
struct TwoExtras {
    #[json(",extras")]
    first: HashMap<String, Value>,
    #[json(flatten)]
    nested: Flag,
}

#[derive(Reflect, Default, Debug)]
struct BadExtras {
    #[json(",extras")]
    extras: Vec<Value>,
}

#[derive(Reflect, Default, Debug)]
struct BadFlatten {
    #[json(flatten)]
    inner: Vec<u8>,
}

#[test]
fn misconfigured_types_fail_every_time() {
    for _ in 0..2 {
        let err = bk_json::from_slice::<TwoExtras>(b"{}").unwrap_err();
        assert!(matches!(err, DecodeError::Schema(SchemaError::DuplicateExtras { .. })));
    }

    let err = bk_json::to_vec(&BadExtras::default()).unwrap_err();
    assert!(matches!(err, EncodeError::Schema(SchemaError::InvalidExtras { field: "extras", .. })));

    let err = bk_json::prepare::<BadFlatten>().unwrap_err();
    assert!(matches!(err, SchemaError::FlattenNonStruct { field: "inner", .. }));
}

// -----------------------------------------------------------------------------
// Recursive types

#[derive(Reflect, Default, Debug, PartialEq)]
struct Node {
    #[json("name")]
    name: String,
    #[json("child")]
    child: Option<Box<Node>>,
    #[json("siblings")]
    siblings: Vec<Node>,
}

#[test]
fn recursive_types_decode_and_round_trip() {
    let input = br#"{"child":{"child":{"name":"Sam"},"name":"Alex"},"name":"Robert"}"#;
    let node: Node = bk_json::from_slice(input).unwrap();
    assert_eq!(node.name, "Robert");
    let child = node.child.as_deref().unwrap();
    assert_eq!(child.name, "Alex");
    assert_eq!(child.child.as_deref().unwrap().name, "Sam");

    let bytes = bk_json::to_vec(&node).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        r#"{"child":{"child":{"name":"Sam","siblings":[]},"name":"Alex","siblings":[]},"name":"Robert","siblings":[]}"#
    );
}

#[derive(Reflect, Default, Debug, PartialEq)]
struct Tree {
    #[json("label")]
    label: String,
    #[json("children")]
    children: Vec<Tree>,
}

#[test]
fn concurrent_first_use_of_a_recursive_type() {
    const THREADS: usize = 8;
    let barrier = Barrier::new(THREADS);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    let input = format!(r#"{{"label":"root{i}","children":[{{"label":"leaf"}}]}}"#);
                    bk_json::from_slice::<Tree>(input.as_bytes()).unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let tree = handle.join().unwrap();
            assert_eq!(tree.label, format!("root{i}"));
            assert_eq!(tree.children[0].label, "leaf");
        }
    });
}

// -----------------------------------------------------------------------------
// Unions

#[derive(Reflect, Default, Debug, PartialEq)]
struct TypeA {
    #[json("type")]
    kind: String,
    #[json("amount")]
    amount: i64,
}

#[derive(Reflect, Default, Debug, PartialEq)]
struct TypeB {
    #[json("type")]
    kind: String,
    #[json("note")]
    note: String,
}

#[derive(Reflect, Debug, PartialEq)]
#[json(discriminator = "type")]
enum Payload {
    Text(String),
    Number(i64),
    #[json(variant = "typeA")]
    A(TypeA),
    #[json(variant = "typeB")]
    B(TypeB),
}

#[derive(Reflect, Default, Debug, PartialEq)]
struct Envelope {
    #[json("union")]
    union: Option<Payload>,
}

#[test]
fn union_discrimination() {
    let cases = [
        (json!({"union": "hello"}), Payload::Text("hello".into())),
        (json!({"union": 12}), Payload::Number(12)),
        (
            json!({"union": {"type": "typeA", "amount": 5}}),
            Payload::A(TypeA {
                kind: "typeA".into(),
                amount: 5,
            }),
        ),
        (
            json!({"union": {"type": "typeB", "note": "n"}}),
            Payload::B(TypeB {
                kind: "typeB".into(),
                note: "n".into(),
            }),
        ),
    ];

    for (input, expected) in cases {
        let envelope: Envelope = bk_json::from_value(&input).unwrap();
        assert_eq!(envelope.union, Some(expected));
        assert_eq!(bk_json::to_value(&envelope).unwrap(), input);
    }
}

#[test]
fn union_errors() {
    let err = bk_json::from_value::<Envelope>(&json!({"union": {"type": "typeC"}})).unwrap_err();
    assert!(matches!(err, DecodeError::NoVariant { union, .. } if union.ends_with("Payload")));
    assert_eq!(err.path().unwrap().to_string(), "$.union");

    let envelope: Envelope = bk_json::from_value(&json!({"union": null})).unwrap();
    assert_eq!(envelope.union, None);
}

#[derive(Reflect, Debug, PartialEq)]
enum Expr {
    Num(i64),
    Neg(Box<Expr>),
}

#[derive(Reflect, Debug, PartialEq)]
enum Operand {
    Flag(bool),
    Expr(Box<Expr>),
}

#[test]
fn self_referential_unions() {
    assert_eq!(bk_json::from_value::<Expr>(&json!(7)).unwrap(), Expr::Num(7));
    let err = bk_json::from_value::<Expr>(&json!("x")).unwrap_err();
    assert!(matches!(err, DecodeError::NoVariant { union, .. } if union.ends_with("Expr")));

    assert_eq!(
        bk_json::from_value::<Operand>(&json!(3)).unwrap(),
        Operand::Expr(Box::new(Expr::Num(3)))
    );
    let err = bk_json::from_value::<Operand>(&json!({"x": 1})).unwrap_err();
    assert!(matches!(err, DecodeError::NoVariant { .. }));
}

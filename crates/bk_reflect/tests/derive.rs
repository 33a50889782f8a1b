use std::collections::HashMap;

use bk_reflect::Reflect;
use bk_reflect::derive::Reflect;
use bk_reflect::info::{ReflectKind, Typed};
use bk_reflect::ops::{ReflectMut, ReflectRef};

#[derive(Reflect, Default, Debug, PartialEq)]
struct Address {
    #[json("line1")]
    line1: String,
    #[json("city")]
    city: Option<String>,
}

#[derive(Reflect, Default, Debug, PartialEq)]
struct Entity {
    #[json("id,required")]
    id: String,
    #[json(flatten)]
    address: Address,
    #[json(",extras")]
    extras: HashMap<String, serde_json::Value>,
    #[json("-")]
    hidden: u8,
}

#[derive(Reflect, Default)]
struct Node {
    #[json("name")]
    name: String,
    #[json("child")]
    child: Option<Box<Node>>,
}

#[derive(Reflect, Default)]
struct Page<T> {
    #[json("data")]
    data: Vec<T>,
    #[json("next_cursor")]
    next_cursor: Option<String>,
}

#[derive(Reflect, Debug, PartialEq)]
#[json(discriminator = "type")]
enum Payee {
    Name(String),
    #[json(variant = "address")]
    Address(Address),
}

#[test]
fn struct_info_keeps_active_fields_in_order() {
    let info = Entity::type_info().as_struct().unwrap();
    let idents: Vec<_> = info.iter().map(|field| field.ident()).collect();
    assert_eq!(idents, ["id", "address", "extras", "hidden"]);

    assert_eq!(info.field("id").map(|(index, _)| index), Some(0));
    assert!(info.field("line1").is_none());
    assert!(info.field_at(1).unwrap().is_flatten());
    assert!(info.field_at(2).unwrap().is_extras());
    assert_eq!(info.field_at(3).unwrap().wire_name(), None);
}

#[test]
fn field_access_by_index() {
    let mut entity = Entity::default();
    {
        let ReflectMut::Struct(fields) = entity.reflect_mut() else {
            panic!("expected a struct");
        };
        assert_eq!(fields.field_len(), 4);
        let id = fields.field_at_mut(0).unwrap();
        id.set(Box::new("ent_1".to_string())).unwrap();
        assert!(fields.field_at_mut(4).is_none());
    }
    assert_eq!(entity.id, "ent_1");
}

#[test]
fn recursive_type_info_resolves_lazily() {
    let info = Node::type_info().as_struct().unwrap();
    let (_, child) = info.field("child").unwrap();
    let pointee = child.type_info().innermost();
    assert!(core::ptr::eq(pointee, Node::type_info()));
}

#[test]
fn generic_struct_has_one_info_per_instantiation() {
    let a = <Page<u32> as Typed>::type_info();
    let b = <Page<String> as Typed>::type_info();
    assert!(a.type_is::<Page<u32>>());
    assert!(b.type_is::<Page<String>>());
    assert!(core::ptr::eq(a, <Page<u32> as Typed>::type_info()));
}

#[test]
fn union_table_and_access() {
    let info = Payee::type_info().as_union().unwrap();
    assert_eq!(info.discriminator(), Some("type"));
    assert_eq!(info.variant_len(), 2);
    assert_eq!(info.variant_at(0).unwrap().name(), "Name");
    assert_eq!(info.variant_at(0).unwrap().discriminant(), None);
    assert_eq!(info.variant_at(1).unwrap().discriminant(), Some("address"));

    let wrapped = info
        .variant_at(0)
        .unwrap()
        .wrap(Box::new("Ada".to_string()))
        .unwrap();
    let payee = wrapped.take::<Payee>().unwrap();
    assert_eq!(payee, Payee::Name("Ada".to_string()));

    let ReflectRef::Union(union) = payee.reflect_ref() else {
        panic!("expected a union");
    };
    assert_eq!(union.variant_index(), 0);
    assert_eq!(union.variant_value().reflect_kind(), ReflectKind::Scalar);
}

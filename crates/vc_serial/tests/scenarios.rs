//! Error paths and the behaviors documents rely on.

use std::collections::BTreeMap;

use rstest::rstest;
use vc_serial::derive::Serial;
use vc_serial::{Accessor, Described, MemberBuilder, RegistryError, SerialError};

#[derive(Serial, Default, Debug, Clone, PartialEq)]
struct Item {
    i: i32,
}

#[derive(Serial, Default, Debug, PartialEq)]
struct Five {
    a: i32,
    b: String,
    c: f64,
    d: Vec<u8>,
    e: Option<Item>,
}

#[derive(Serial, Default, Debug, PartialEq)]
struct Numeric {
    a: u32,
}

#[derive(Serial, Default, Debug, PartialEq)]
struct WithOptional {
    id: u8,
    extra: Option<Item>,
    count: Option<u8>,
}

// -----------------------------------------------------------------------------
// Maps and documents

#[test]
fn string_keyed_map_is_an_object() {
    let json = r#"{ "a": { "i": -13 }, "b": { "i": -14 } }"#;
    let map: BTreeMap<String, Item> = vc_serial::from_json(json).unwrap();
    assert_eq!(map["a"], Item { i: -13 });
    assert_eq!(map["b"], Item { i: -14 });

    let text = vc_serial::to_json(&map).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc, serde_json::json!({ "a": { "i": -13 }, "b": { "i": -14 } }));
}

#[test]
fn untyped_xml_leaf_is_a_shape_error() {
    let _ = vc_serial::xml::startup();
    let err = vc_serial::from_xml::<Numeric>("<root><a>0</a></root>").unwrap_err();
    assert!(err.is_shape(), "{err}");
    assert!(err.to_string().contains("type"), "{err}");

    let ok: Numeric = vc_serial::from_xml(r#"<root><a type="uint">3</a></root>"#).unwrap();
    assert_eq!(ok.a, 3);
}

// -----------------------------------------------------------------------------
// Registry errors

struct Twice {
    a: i32,
}

impl Described for Twice {
    fn describe(members: &mut MemberBuilder<Self>) -> Result<(), RegistryError> {
        members.define("a", vc_serial::accessor!(Twice, a))?;
        members.define(
            "a",
            Accessor::new("a_again", |t: &Twice| &t.a, |t: &mut Twice| &mut t.a),
        )?;
        Ok(())
    }
}

#[test]
fn same_field_twice_names_the_field() {
    let err = vc_serial::MemberRegistry::<Twice>::build().unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateField { field: "a", .. }));
    assert!(err.to_string().contains("`a`"), "{err}");
}

#[derive(Serial, Default)]
struct Account {
    id: u64,
    owner: String,
}

#[derive(Serial, Default)]
struct Device {
    id: u32,
}

#[derive(Serial, Default)]
struct Login {
    #[serial(extend)]
    account: Account,
    #[serial(extend)]
    device: Device,
}

#[test]
fn two_bases_sharing_a_name_is_rejected() {
    let err = vc_serial::MemberRegistry::<Login>::build().unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateField { field: "id", .. }), "{err}");
}

#[test]
fn selective_call_rejects_unknown_field() {
    let err = vc_serial::to_json_fields(&Five::default(), &["a", "zz"]).unwrap_err();
    assert!(matches!(
        err,
        SerialError::Registry(RegistryError::UnknownField { ref field, .. }) if field == "zz"
    ));
}

// -----------------------------------------------------------------------------
// Selective fields

fn five() -> Five {
    Five {
        a: 11,
        b: String::from("bee"),
        c: 2.5,
        d: vec![1, 2],
        e: Some(Item { i: 3 }),
    }
}

#[test]
fn selective_round_trip_json() {
    let text = vc_serial::to_json_fields(&five(), &["a", "b"]).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc, serde_json::json!({ "a": 11, "b": "bee" }));

    let back: Five = vc_serial::from_json_fields(&text, &["a"]).unwrap();
    assert_eq!(back, Five { a: 11, ..Five::default() });
}

#[test]
fn selective_round_trip_xml() {
    let _ = vc_serial::xml::startup();
    let text = vc_serial::to_xml_fields(&five(), &["a", "b"]).unwrap();
    let back: Five = vc_serial::from_xml_fields(&text, &["a"]).unwrap();
    assert_eq!(back, Five { a: 11, ..Five::default() });

    let full: Five = vc_serial::from_xml_fields(&text, &["a", "b"]).unwrap();
    assert_eq!(full.b, "bee");
}

#[test]
fn selective_read_into_existing_value() {
    let mut value = five();
    let mut json = vc_serial::JsonSerializer::new();
    vc_serial::read_root_fields(&mut value, &mut json, r#"{ "a": 1, "c": 9.0 }"#, &["c"]).unwrap();
    assert_eq!(value.a, 11);
    assert_eq!(value.c, 9.0);
}

// -----------------------------------------------------------------------------
// Range and shape checks

#[derive(Serial, Default)]
struct Narrow {
    small: i8,
    byte: u8,
    word: u32,
}

#[rstest]
#[case(r#"{ "small": 4096, "byte": 0, "word": 0 }"#)]
#[case(r#"{ "small": -4096, "byte": 0, "word": 0 }"#)]
#[case(r#"{ "small": 0, "byte": 4096, "word": 0 }"#)]
#[case(r#"{ "small": 0, "byte": 0, "word": -1 }"#)]
#[case(r#"{ "small": 0, "byte": 0, "word": 1.5 }"#)]
#[case(r#"{ "small": 0, "byte": "0", "word": 0 }"#)]
fn out_of_range_is_a_shape_error(#[case] json: &str) {
    let err = vc_serial::from_json::<Narrow>(json).err().unwrap();
    assert!(err.is_shape(), "{err}");
}

#[rstest]
#[case::empty_object("{}")]
#[case::array_for_struct("[1, 2]")]
#[case::primitive_for_struct("3")]
#[case::null_field(r#"{ "a": null }"#)]
#[case::malformed(r#"{ "a": "#)]
fn struct_shape_mismatch(#[case] json: &str) {
    let err = vc_serial::from_json::<Numeric>(json).unwrap_err();
    assert!(err.is_shape(), "{err}");
}

#[test]
fn xml_array_child_with_foreign_tag() {
    let _ = vc_serial::xml::startup();
    let xml = r#"<root><values><___containerEntry___ type="int">1</___containerEntry___><x type="int">2</x></values></root>"#;

    #[derive(Serial, Default, Debug)]
    struct Values {
        values: Vec<i64>,
    }

    let err = vc_serial::from_xml::<Values>(xml).unwrap_err();
    assert!(err.is_shape(), "{err}");
    assert!(err.to_string().contains("<x>"), "{err}");
}

#[test]
fn unknown_enum_name() {
    #[derive(Serial, Default, Clone, PartialEq, Debug)]
    enum Mode {
        #[default]
        On,
        Off,
    }

    assert_eq!(vc_serial::from_json::<Mode>(r#""Off""#).unwrap(), Mode::Off);
    let err = vc_serial::from_json::<Mode>(r#""Dim""#).unwrap_err();
    assert!(err.is_shape(), "{err}");
    assert!(err.to_string().contains("Dim"), "{err}");
}

// -----------------------------------------------------------------------------
// Optionals

#[test]
fn malformed_optional_reads_as_absent() {
    let json = r#"{ "id": 1, "extra": { "i": "seven" }, "count": 300 }"#;
    let value: WithOptional = vc_serial::from_json(json).unwrap();
    assert_eq!(value, WithOptional { id: 1, extra: None, count: None });
}

#[test]
fn null_optional_reads_as_absent() {
    let json = r#"{ "id": 2, "extra": null, "count": 4 }"#;
    let value: WithOptional = vc_serial::from_json(json).unwrap();
    assert_eq!(value, WithOptional { id: 2, extra: None, count: Some(4) });
}

#[test]
fn malformed_optional_in_xml() {
    let _ = vc_serial::xml::startup();
    let xml = r#"<root><id type="uint">3</id><extra><i type="string">x</i></extra><count type="uint">5</count></root>"#;
    let value: WithOptional = vc_serial::from_xml(xml).unwrap();
    assert_eq!(value, WithOptional { id: 3, extra: None, count: Some(5) });
}

//! Whole-document round trips through both bundled backends.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use rstest::rstest;
use vc_serial::derive::Serial;
use vc_serial::{Described, Result};

#[derive(Serial, Default, Debug, Clone, PartialEq)]
struct Inner {
    i: i32,
}

#[derive(Serial, Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Color {
    #[default]
    Red,
    #[serial(rename = "verde")]
    Green,
    Blue,
}

#[derive(Serial, Default, Debug, PartialEq)]
struct Base {
    id: u64,
    tag: String,
}

#[derive(Serial, Default, Debug, PartialEq)]
struct Everything {
    #[serial(extend)]
    base: Base,
    a: i8,
    b: i16,
    c: i32,
    d: i64,
    e: u8,
    f: u16,
    g: u32,
    h: u64,
    size: usize,
    offset: isize,
    ratio: f32,
    precise: f64,
    flag: bool,
    #[serial(rename = "label")]
    text: String,
    inner: Inner,
    items: Vec<Inner>,
    numbers: VecDeque<i32>,
    set: BTreeSet<String>,
    by_name: BTreeMap<String, Inner>,
    by_id: HashMap<u32, String>,
    by_color: BTreeMap<Color, i32>,
    color: Color,
    palette: Vec<Color>,
    maybe: Option<Inner>,
    nothing: Option<i32>,
    nested: Vec<Vec<u8>>,
    #[serial(skip)]
    cache: u32,
}

fn sample() -> Everything {
    Everything {
        base: Base { id: 7, tag: String::from("base") },
        a: i8::MIN,
        b: i16::MAX,
        c: -123_456,
        d: i64::MIN,
        e: u8::MAX,
        f: 65_000,
        g: u32::MAX,
        h: u64::MAX,
        size: 42,
        offset: -42,
        ratio: 0.1,
        precise: -1.0e-300,
        flag: true,
        text: String::from("a <b> & \"c\""),
        inner: Inner { i: -13 },
        items: vec![Inner { i: 1 }, Inner { i: 2 }],
        numbers: VecDeque::from([3, -4, 5]),
        set: BTreeSet::from([String::from("x"), String::from("y")]),
        by_name: BTreeMap::from([
            (String::from("alpha"), Inner { i: 1 }),
            (String::from("beta"), Inner { i: 2 }),
        ]),
        by_id: HashMap::from([(1, String::from("one")), (20, String::from("twenty"))]),
        by_color: BTreeMap::from([(Color::Green, 2), (Color::Blue, 3)]),
        color: Color::Green,
        palette: vec![Color::Blue, Color::Red],
        maybe: Some(Inner { i: 99 }),
        nothing: None,
        nested: vec![vec![1, 2], vec![], vec![3]],
        cache: 0,
    }
}

type Writer = fn(&Everything) -> Result<String>;
type Reader = fn(&str) -> Result<Everything>;

fn xml_writer(value: &Everything) -> Result<String> {
    let _ = vc_serial::xml::startup();
    vc_serial::to_xml(value)
}

fn xml_reader(text: &str) -> Result<Everything> {
    vc_serial::from_xml(text)
}

#[rstest]
#[case::json(vc_serial::to_json::<Everything>, vc_serial::from_json::<Everything>)]
#[case::xml(xml_writer, xml_reader)]
fn every_shape_round_trips(#[case] write: Writer, #[case] read: Reader) {
    let original = sample();
    let text = write(&original).unwrap();
    assert_eq!(read(&text).unwrap(), original, "{text}");
}

#[rstest]
#[case::json(vc_serial::to_json::<Everything>, vc_serial::from_json::<Everything>)]
#[case::xml(xml_writer, xml_reader)]
fn defaults_round_trip(#[case] write: Writer, #[case] read: Reader) {
    let text = write(&Everything::default()).unwrap();
    assert_eq!(read(&text).unwrap(), Everything::default(), "{text}");
}

#[rstest]
#[case::json(vc_serial::to_json::<Everything>, vc_serial::from_json::<Everything>)]
#[case::xml(xml_writer, xml_reader)]
fn absence_is_idempotent(#[case] write: Writer, #[case] read: Reader) {
    let original = Everything {
        maybe: None,
        nothing: None,
        by_id: HashMap::new(),
        ..sample()
    };
    let once = write(&original).unwrap();
    let back = read(&once).unwrap();
    assert_eq!(back.maybe, None);
    assert_eq!(back.nothing, None);
    assert_eq!(write(&back).unwrap(), once);
}

#[test]
fn skipped_field_is_not_written() {
    let value = Everything { cache: 5, ..sample() };
    let json = vc_serial::to_json(&value).unwrap();
    assert!(!json.contains("cache"), "{json}");

    let back: Everything = vc_serial::from_json(&json).unwrap();
    assert_eq!(back.cache, 0);
}

#[test]
fn json_layout() {
    let json = vc_serial::to_json(&sample()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();

    // Extended fields are flattened ahead of the direct ones.
    let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).take(3).collect();
    assert_eq!(keys, ["id", "tag", "a"]);

    assert_eq!(doc["label"], "a <b> & \"c\"");
    assert_eq!(doc["color"], "verde");
    assert_eq!(doc["by_name"]["beta"]["i"], 2);
    assert_eq!(doc["by_color"][0]["__mapKey__"], "verde");
    assert_eq!(doc["by_color"][0]["__mapValue__"], 2);
    assert_eq!(doc["h"], u64::MAX);
    assert!(doc.get("nothing").is_none());
}

#[test]
fn xml_layout() {
    let _ = vc_serial::xml::startup();
    let xml = vc_serial::to_xml(&sample()).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"), "{xml}");
    assert!(xml.contains("<flag type=\"bool\">true</flag>"), "{xml}");
    assert!(xml.contains("<___containerEntry___>"), "{xml}");
    assert!(xml.contains("<__mapKey__ type=\"string\">verde</__mapKey__>"), "{xml}");
    assert!(xml.contains("<alpha>"), "{xml}");
    assert!(!xml.contains("<nothing"), "{xml}");
}

#[test]
fn root_primitives() {
    assert_eq!(vc_serial::to_json(&-5_i64).unwrap(), "-5");
    assert_eq!(vc_serial::from_json::<u16>("65535").unwrap(), u16::MAX);
    assert_eq!(vc_serial::from_json::<Vec<Color>>(r#"["Blue", "verde"]"#).unwrap(), [
        Color::Blue,
        Color::Green
    ]);

    let mut value = Inner::default();
    let mut json = vc_serial::JsonSerializer::new();
    vc_serial::read_root(&mut value, &mut json, r#"{"i": 8}"#).unwrap();
    assert_eq!(value.i, 8);
}

// -----------------------------------------------------------------------------
// Recursive and multiply extended types

#[derive(Clone, Copy, Debug)]
enum Backend {
    Json,
    Xml,
}

impl Backend {
    fn round_trip<T: vc_serial::Serial + Default>(self, value: &T) -> (String, T) {
        match self {
            Backend::Json => {
                let text = vc_serial::to_json(value).unwrap();
                let back = vc_serial::from_json(&text).unwrap();
                (text, back)
            }
            Backend::Xml => {
                let _ = vc_serial::xml::startup();
                let text = vc_serial::to_xml(value).unwrap();
                let back = vc_serial::from_xml(&text).unwrap();
                (text, back)
            }
        }
    }
}

#[derive(Serial, Default, Debug, PartialEq)]
struct Tree {
    label: String,
    children: Vec<Tree>,
    next: Option<Box<Tree>>,
}

fn leaf(label: &str) -> Tree {
    Tree { label: label.to_owned(), ..Tree::default() }
}

#[rstest]
fn recursive_type_round_trips(#[values(Backend::Json, Backend::Xml)] backend: Backend) {
    let tree = Tree {
        label: String::from("root"),
        children: vec![
            Tree { children: vec![leaf("a1"), leaf("a2")], ..leaf("a") },
            leaf("b"),
        ],
        next: Some(Box::new(Tree { next: Some(Box::new(leaf("tail"))), ..leaf("sibling") })),
    };
    let (text, back) = backend.round_trip(&tree);
    assert_eq!(back, tree, "{text}");
}

#[derive(Serial, Default, Debug, PartialEq)]
struct Stamp {
    created: u64,
    author: String,
}

#[derive(Serial, Default, Debug, PartialEq)]
struct Tagged {
    #[serial(extend)]
    base: Base,
    #[serial(extend)]
    stamp: Stamp,
    note: String,
}

#[test]
fn two_bases_flatten_in_declaration_order() {
    let registry = Tagged::registry();
    assert_eq!(registry.field_names().collect::<Vec<_>>(), [
        "id", "tag", "created", "author", "note"
    ]);
    assert_eq!(registry.extensions().len(), 2);

    let json = vc_serial::to_json(&Tagged::default()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["id", "tag", "created", "author", "note"]);
}

#[rstest]
fn two_bases_round_trip(#[values(Backend::Json, Backend::Xml)] backend: Backend) {
    let tagged = Tagged {
        base: Base { id: 3, tag: String::from("t") },
        stamp: Stamp { created: 1_700_000_000, author: String::from("ana") },
        note: String::from("n"),
    };
    let (text, back) = backend.round_trip(&tagged);
    assert_eq!(back, tagged, "{text}");
}

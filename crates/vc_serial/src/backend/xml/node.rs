use core::str;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;

/// Attribute carrying the [`ValueKind`](crate::ValueKind) tag of a leaf.
pub(super) const TYPE_ATTR: &str = "type";

// -----------------------------------------------------------------------------
// Element

/// One owned XML element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }

    pub fn type_tag(&self) -> Option<&str> {
        self.attr(TYPE_ATTR)
    }

    /// Index of the first child named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| c.name == name)
    }
}

/// `true` for names this backend can write as element names.
pub(super) fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

// -----------------------------------------------------------------------------
// Parsing

/// Parses `text` into its root element.
///
/// Whitespace between child elements is dropped. Text of typed leaves is kept
/// verbatim.
pub(super) fn parse(text: &str) -> Result<Element, String> {
    let mut reader = Reader::from_str(text);
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| format!("{err} at byte {}", reader.buffer_position()))?;

        match event {
            Event::Start(start) => open.push(start_element(&start)?),
            Event::Empty(start) => {
                let element = start_element(&start)?;
                close(element, &mut open, &mut root)?;
            }
            Event::End(_) => match open.pop() {
                Some(element) => close(element, &mut open, &mut root)?,
                None => return Err("unbalanced end tag".to_owned()),
            },
            Event::Text(text) => {
                let text = text.unescape().map_err(|err| err.to_string())?;
                push_text(&mut open, &text)?;
            }
            Event::CData(data) => {
                let data = data.into_inner();
                let text = str::from_utf8(&data).map_err(|err| err.to_string())?;
                push_text(&mut open, text)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes.
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(format!("unclosed element `{}`", open[open.len() - 1].name));
    }
    root.ok_or_else(|| "document has no root element".to_owned())
}

fn start_element(start: &BytesStart<'_>) -> Result<Element, String> {
    let name = str::from_utf8(start.name().as_ref())
        .map_err(|err| err.to_string())?
        .to_owned();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let key = str::from_utf8(attr.key.as_ref())
            .map_err(|err| err.to_string())?
            .to_owned();
        let value = attr.unescape_value().map_err(|err| err.to_string())?;
        element.attrs.push((key, value.into_owned()));
    }
    Ok(element)
}

fn push_text(open: &mut [Element], text: &str) -> Result<(), String> {
    match open.last_mut() {
        Some(element) => {
            element.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err("text outside of the root element".to_owned()),
    }
}

fn close(mut element: Element, open: &mut [Element], root: &mut Option<Element>) -> Result<(), String> {
    if !element.children.is_empty() || (element.type_tag().is_none() && element.text.trim().is_empty()) {
        element.text.clear();
    }

    match open.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err("more than one root element".to_owned()),
    }
}

// -----------------------------------------------------------------------------
// Writing

/// Renders `root` with an XML declaration.
///
/// `indent == 0` writes everything on one line.
pub(super) fn write(root: &Element, indent: usize) -> Result<String, String> {
    let mut writer = if indent == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', indent)
    };

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|err| err.to_string())?;
    write_element(&mut writer, root)?;

    String::from_utf8(writer.into_inner()).map_err(|err| err.to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), String> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attrs {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let is_leaf = element.type_tag().is_some();
    if element.children.is_empty() && !is_leaf {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|err| err.to_string());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|err| err.to_string())?;
    if is_leaf {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(|err| err.to_string())?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Element, is_xml_name, parse, write};

    #[test]
    fn keeps_leaf_text_and_drops_layout() {
        let root = parse(
            "<?xml version=\"1.0\"?>\n<root>\n  <a type=\"string\">  two  words </a>\n  <b/>\n</root>\n",
        )
        .unwrap();

        assert_eq!(root.name, "root");
        assert_eq!(root.text, "");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text, "  two  words ");
        assert_eq!(root.children[0].type_tag(), Some("string"));
        assert_eq!(root.position("b"), Some(1));
    }

    #[test]
    fn unescapes_entities() {
        let root = parse("<r><s type=\"string\">a &amp; &lt;b&gt;</s></r>").unwrap();
        assert_eq!(root.children[0].text, "a & <b>");
    }

    #[test]
    fn written_text_parses_back() {
        let mut root = Element::new("root");
        let mut leaf = Element::new("s");
        leaf.attrs.push(("type".into(), "string".into()));
        leaf.text = " <x> & \"y\" ".into();
        root.children.push(leaf);
        root.children.push(Element::new("empty"));

        let text = write(&root, 2).unwrap();
        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(parse(&text).unwrap(), root);
    }

    #[test]
    fn rejects_broken_documents() {
        assert!(parse("<a><b></a>").is_err());
        assert!(parse("<a/><b/>").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn xml_names() {
        assert!(is_xml_name("__mapKey__"));
        assert!(is_xml_name("a.b-c1"));
        assert!(!is_xml_name("1a"));
        assert!(!is_xml_name("a b"));
        assert!(!is_xml_name(""));
    }
}

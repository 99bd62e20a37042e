//! Preset metadata markup parsing
//!
//! Parses an XML document into a plain key/value tree. Attributes become
//! fields on the node; character data and CDATA sections become the `text`
//! and `cdata` pseudo-fields. Child elements are always grouped into
//! sequences by name, so single-child and many-children markup read the
//! same way to callers.

use indexmap::IndexMap;
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

/// Markup parsing errors
#[derive(Error, Debug)]
pub enum MarkupError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("document has no root element")]
    NoRoot,
}

impl From<quick_xml::Error> for MarkupError {
    fn from(e: quick_xml::Error) -> Self {
        MarkupError::Xml(e.to_string())
    }
}

/// One element of the parsed tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    name: String,
    fields: IndexMap<String, String>,
    children: IndexMap<String, Vec<Node>>,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            fields: IndexMap::new(),
            children: IndexMap::new(),
        }
    }

    /// Element name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an attribute or the `text`/`cdata` pseudo-fields
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children(name).first()
    }

    /// All child elements with the given name, possibly empty
    pub fn children(&self, name: &str) -> &[Node] {
        self.children.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Re-serialize this element and its subtree to markup text.
    ///
    /// Attribute order and grouped child order follow the parsed tree; the
    /// `text` and `cdata` pseudo-fields come back out as character data.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    /// Serialize this element's children, concatenated, for parameters whose
    /// value is raw nested markup rather than character data. `None` when the
    /// element has no children.
    pub fn nested_markup(&self) -> Option<String> {
        if self.children.is_empty() {
            return None;
        }
        let mut out = String::new();
        for nodes in self.children.values() {
            for node in nodes {
                node.write_markup(&mut out);
            }
        }
        Some(out)
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.fields {
            if key == "text" || key == "cdata" {
                continue;
            }
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }

        let text = self.fields.get("text");
        let cdata = self.fields.get("cdata");
        if text.is_none() && cdata.is_none() && self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');

        if let Some(text) = text {
            out.push_str(&escape(text));
        }
        if let Some(cdata) = cdata {
            out.push_str("<![CDATA[");
            out.push_str(cdata);
            out.push_str("]]>");
        }
        for nodes in self.children.values() {
            for node in nodes {
                node.write_markup(out);
            }
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn append_field(&mut self, name: &str, value: &str) {
        self.fields
            .entry(name.to_string())
            .and_modify(|existing| existing.push_str(value))
            .or_insert_with(|| value.to_string());
    }

    fn push_child(&mut self, child: Node) {
        self.children
            .entry(child.name.clone())
            .or_default()
            .push(child);
    }
}

/// Parse an XML document and return its root element.
pub fn parse(text: &str) -> Result<Node, MarkupError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let mut node = Node::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr.unescape_value()?;
                    node.fields.insert(key, value.into_owned());
                }
                stack.push(node);
            }
            Event::Empty(e) => {
                let mut node = Node::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                    let value = attr.unescape_value()?;
                    node.fields.insert(key, value.into_owned());
                }
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let node = stack.pop().ok_or_else(|| {
                    MarkupError::Xml("closing tag without matching open".to_string())
                })?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(t) => {
                if let Some(current) = stack.last_mut() {
                    let text = t.unescape()?;
                    current.append_field("text", &text);
                }
            }
            Event::CData(t) => {
                if let Some(current) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    current.append_field("cdata", &text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or(MarkupError::NoRoot)
}

fn attach(stack: &mut Vec<Node>, root: &mut Option<Node>, node: Node) -> Result<(), MarkupError> {
    match stack.last_mut() {
        Some(parent) => parent.push_child(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(MarkupError::Xml("multiple root elements".to_string())),
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_attributes_as_fields() {
        let root = parse(r#"<Preset name="Ink" paintopid="brush"/>"#).unwrap();
        assert_eq!(root.name(), "Preset");
        assert_eq!(root.field("name"), Some("Ink"));
        assert_eq!(root.field("paintopid"), Some("brush"));
        assert_eq!(root.field("missing"), None);
    }

    #[test]
    fn single_child_is_a_sequence() {
        let root = parse(r#"<Preset><param name="a"/></Preset>"#).unwrap();
        assert_eq!(root.children("param").len(), 1);
        assert_eq!(root.child("param").unwrap().field("name"), Some("a"));
    }

    #[test]
    fn many_children_group_by_name() {
        let root = parse(
            r#"<Preset><param name="a"/><param name="b"/><other/><param name="c"/></Preset>"#,
        )
        .unwrap();
        assert_eq!(root.children("param").len(), 3);
        assert_eq!(root.children("other").len(), 1);
        assert!(root.children("absent").is_empty());
    }

    #[test]
    fn text_and_cdata_become_pseudo_fields() {
        let root = parse(r#"<param name="x">0.25</param>"#).unwrap();
        assert_eq!(root.field("text"), Some("0.25"));

        let root = parse(r#"<param name="x"><![CDATA[<Brush/>]]></param>"#).unwrap();
        assert_eq!(root.field("cdata"), Some("<Brush/>"));
    }

    #[test]
    fn text_entities_are_unescaped() {
        let root = parse(r#"<param>&lt;Brush type=&quot;auto&quot;/&gt;</param>"#).unwrap();
        assert_eq!(root.field("text"), Some(r#"<Brush type="auto"/>"#));
    }

    #[test]
    fn nested_elements() {
        let root = parse(r#"<Brush spacing="0.1"><MaskGenerator diameter="50"/></Brush>"#).unwrap();
        let mask = root.child("MaskGenerator").unwrap();
        assert_eq!(mask.field("diameter"), Some("50"));
    }

    #[test]
    fn to_markup_round_trips_through_parse() {
        let text = r#"<Brush type="auto" spacing="0.1"><MaskGenerator diameter="50" ratio="1.0"/></Brush>"#;
        let root = parse(text).unwrap();
        let serialized = root.to_markup();
        assert_eq!(parse(&serialized).unwrap(), root);
    }

    #[test]
    fn to_markup_escapes_attribute_values() {
        let root = parse(r#"<param name="a&lt;b"/>"#).unwrap();
        assert_eq!(root.to_markup(), r#"<param name="a&lt;b"/>"#);
    }

    #[test]
    fn nested_markup_serializes_children_only() {
        let root = parse(r#"<param name="x"><Brush type="auto"><MaskGenerator diameter="50"/></Brush></param>"#)
            .unwrap();
        assert_eq!(
            root.nested_markup().as_deref(),
            Some(r#"<Brush type="auto"><MaskGenerator diameter="50"/></Brush>"#)
        );
    }

    #[test]
    fn nested_markup_is_absent_without_children() {
        let root = parse(r#"<param name="x">0.8</param>"#).unwrap();
        assert!(root.nested_markup().is_none());
    }

    #[test]
    fn rejects_unclosed_document() {
        assert!(parse("<Preset><param></Preset>").is_err());
    }

    #[test]
    fn rejects_empty_document() {
        assert!(matches!(parse(""), Err(MarkupError::NoRoot)));
    }
}

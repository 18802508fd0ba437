//! Minimal element tree for pane markup.
//!
//! The loader only needs element names, attributes, child elements and text
//! content, so the document is read once with `quick_xml` into this owned
//! tree and walked from there.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("markup syntax error at byte {position}: {source}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("markup document has no root element")]
    Empty,
    #[error("unexpected closing tag `{0}`")]
    UnbalancedClose(String),
    #[error("element `{0}` is never closed")]
    Unclosed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Parse a document and return its root element.
    pub fn parse(source: &str) -> Result<Element, MarkupError> {
        let mut reader = Reader::from_str(source);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|source| MarkupError::Syntax {
                    position: reader.buffer_position() as u64,
                    source,
                })?;
            match event {
                Event::Start(ref start) => {
                    let element = Self::open(start).map_err(|source| MarkupError::Syntax {
                        position: reader.buffer_position() as u64,
                        source,
                    })?;
                    stack.push(element);
                }
                Event::Empty(ref start) => {
                    let element = Self::open(start).map_err(|source| MarkupError::Syntax {
                        position: reader.buffer_position() as u64,
                        source,
                    })?;
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::End(ref end) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    let element = stack
                        .pop()
                        .ok_or_else(|| MarkupError::UnbalancedClose(name.clone()))?;
                    if element.name != name {
                        return Err(MarkupError::UnbalancedClose(name));
                    }
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::Text(ref text) => {
                    if let Some(current) = stack.last_mut() {
                        let unescaped = text.unescape().map_err(|source| MarkupError::Syntax {
                            position: reader.buffer_position() as u64,
                            source,
                        })?;
                        current.text.push_str(&unescaped);
                    }
                }
                Event::CData(ref data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(MarkupError::Unclosed(open.name));
        }
        root.ok_or(MarkupError::Empty)
    }

    fn open(start: &BytesStart<'_>) -> Result<Element, quick_xml::Error> {
        let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => {
                if root.is_none() {
                    *root = Some(element);
                }
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Child elements named `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text directly inside this element, whitespace trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Text directly inside this element exactly as written.
    pub fn raw_text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_attributes_and_text() {
        let root = Element::parse(
            r#"<gui title="Shop &amp; Co" rows="3">
                 <staticpane x="0" y="0" length="9" height="1">
                   <item id="stone"><properties><property type="integer"> 42 </property></properties></item>
                 </staticpane>
                 <empty/>
               </gui>"#,
        )
        .unwrap();
        assert_eq!(root.name(), "gui");
        assert_eq!(root.attr("title"), Some("Shop & Co"));
        assert_eq!(root.children().len(), 2);
        let pane = &root.children()[0];
        assert_eq!(pane.attr("length"), Some("9"));
        let property = pane.children()[0].children()[0].children_named("property").next().unwrap();
        assert_eq!(property.attr("type"), Some("integer"));
        assert_eq!(property.text(), "42");
        assert_eq!(root.children()[1].name(), "empty");
        assert!(!root.children()[1].has_attr("x"));
    }

    #[test]
    fn raw_text_keeps_surrounding_whitespace() {
        let root = Element::parse("<p>  two words  <b/> tail</p>").unwrap();
        assert_eq!(root.raw_text(), "  two words   tail");
        assert_eq!(root.text(), "two words   tail");
        let blank = Element::parse("<property type=\"character\"> </property>").unwrap();
        assert_eq!(blank.raw_text(), " ");
        assert_eq!(blank.text(), "");
    }

    #[test]
    fn rejects_broken_documents() {
        assert!(matches!(Element::parse(""), Err(MarkupError::Empty)));
        assert!(matches!(
            Element::parse("<gui><pane></gui>"),
            Err(MarkupError::UnbalancedClose(_)) | Err(MarkupError::Syntax { .. })
        ));
        assert!(matches!(
            Element::parse("<gui>"),
            Err(MarkupError::Unclosed(_)) | Err(MarkupError::Syntax { .. })
        ));
    }

    #[test]
    fn builder_matches_parsed_tree() {
        let built = Element::new("page").with_child(Element::new("item").with_attr("id", "dirt"));
        let parsed = Element::parse(r#"<page><item id="dirt"/></page>"#).unwrap();
        assert_eq!(built, parsed);
    }
}

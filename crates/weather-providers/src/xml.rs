//! Minimal XML element tree built from quick-xml events.
//!
//! Provider documents are small (a few hundred KB at most for the NOAA
//! station index), so they are read fully into a tree and queried with
//! slash-separated element paths instead of being matched event by event.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use weather_common::{WeatherError, WeatherResult};

/// One XML element with its attributes, direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> WeatherResult<XmlElement> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    stack.push(Self::from_start(&e));
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::from_start(&e);
                    Self::attach(&mut stack, &mut root, element);
                }
                Ok(Event::End(_)) => {
                    if let Some(element) = stack.pop() {
                        Self::attach(&mut stack, &mut root, element);
                    }
                }
                Ok(Event::Text(t)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = match t.unescape() {
                            Ok(text) => text.into_owned(),
                            Err(_) => String::from_utf8_lossy(&t).into_owned(),
                        };
                        current.text.push_str(&text);
                    }
                }
                Ok(Event::CData(c)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(WeatherError::provider_with(
                        format!("XML parsing error at position {}", reader.buffer_position()),
                        e,
                    ))
                }
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(WeatherError::provider("Unexpected end of XML document"));
        }
        root.ok_or_else(|| WeatherError::provider("Empty XML document"))
    }

    fn from_start(e: &BytesStart<'_>) -> XmlElement {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let attributes = e
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = match attr.unescape_value() {
                    Ok(v) => v.into_owned(),
                    Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
                };
                (key, value)
            })
            .collect();
        XmlElement {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        }
    }

    fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None => {
                if root.is_none() {
                    *root = Some(element);
                }
            }
        }
    }

    /// Qualified name, including any namespace prefix (e.g. `aws:ob`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct text content, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn elements(&self) -> &[XmlElement] {
        &self.children
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name.
    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first direct child with the given name, if non-empty.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text()).filter(|t| !t.is_empty())
    }

    /// First element at a slash-separated path relative to this element.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        self.find_all(path).into_iter().next()
    }

    /// All elements at a slash-separated path relative to this element.
    pub fn find_all(&self, path: &str) -> Vec<&XmlElement> {
        let mut current: Vec<&XmlElement> = vec![self];
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current
                .into_iter()
                .flat_map(|e| e.children.iter().filter(move |c| c.name == segment))
                .collect();
        }
        current
    }

    /// All descendants (depth first) with the given name.
    pub fn descendants(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }
}

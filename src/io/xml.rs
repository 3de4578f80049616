//! Minimal XML element tree for the KML and GPX readers.
//!
//! Names are stored without namespace prefix (`gx:Track` becomes `Track`),
//! which is all both formats need.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{ParseError, io::Format};

/// Deepest element nesting accepted; real KML and GPX stay far below it.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Default)]
pub(crate) struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    /// First direct child called `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text content of this element.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Trimmed, non-empty text of the first child called `name`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Element::text).filter(|t| !t.is_empty())
    }

    /// All elements called `name` below this one, in document order. Does not
    /// descend into a match.
    pub fn descendants_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        let mut pending: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(element) = pending.pop() {
            if element.name == name {
                out.push(element);
            } else {
                pending.extend(element.children.iter().rev());
            }
        }
    }
}

/// Parse `text` and return its root element.
pub(crate) fn parse_document(text: &str, format: Format) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(text);
    // Synthetic document node; the real root ends up as its only child.
    let mut stack = vec![Element::default()];

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                // The synthetic document node is not an open element.
                if stack.len() > MAX_DEPTH {
                    return Err(ParseError::syntax(format, "document nested too deeply"));
                }
                stack.push(start_element(&e, format)?);
            }
            Ok(Event::Empty(e)) => {
                let element = start_element(&e, format)?;
                attach(&mut stack, element);
            }
            Ok(Event::End(_)) => {
                if stack.len() < 2 {
                    return Err(ParseError::syntax(format, "unexpected closing tag"));
                }
                if let Some(element) = stack.pop() {
                    attach(&mut stack, element);
                }
            }
            Ok(Event::Text(e)) => {
                // Unknown entities (e.g. HTML's &nbsp; in descriptions) are kept verbatim.
                let text = e.unescape()
                    .map(|t| t.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::syntax(format, format!("at byte {}: {e}", reader.buffer_position())));
            }
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(ParseError::syntax(format, "unexpected end of document"));
    }
    stack.pop()
        .and_then(|doc| doc.children.into_iter().next())
        .ok_or_else(|| ParseError::syntax(format, "no root element"))
}

fn attach(stack: &mut [Element], element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    }
}

fn start_element(e: &BytesStart, format: Format) -> Result<Element, ParseError> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ParseError::syntax(format, err))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|err| ParseError::syntax(format, err))?.into_owned();
        attrs.push((key, value));
    }
    Ok(Element { name, attrs, ..Element::default() })
}

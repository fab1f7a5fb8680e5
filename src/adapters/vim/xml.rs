use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::ports::{SessionError, SessionResult};

/// Namespace-free XML element tree, enough to walk SOAP responses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

fn xml_error(err: impl std::fmt::Display) -> SessionError {
    SessionError::Xml(err.to_string())
}

impl Element {
    /// Parse a document; element and attribute names lose their namespace prefix
    pub fn parse(content: &str) -> SessionResult<Element> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        // Bottom of the stack is a synthetic document node
        let mut stack = vec![Element::default()];

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Start(start) => stack.push(Self::open(&start)?),
                Event::Empty(start) => {
                    let element = Self::open(&start)?;
                    Self::append(&mut stack, element)?;
                }
                Event::End(_) => {
                    if stack.len() < 2 {
                        return Err(SessionError::Xml("Unbalanced end tag".to_string()));
                    }
                    let element = stack.pop().ok_or_else(|| xml_error("Empty element stack"))?;
                    Self::append(&mut stack, element)?;
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(xml_error)?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::CData(data) => {
                    let data = data.into_inner();
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(SessionError::Xml("Unexpected end of document".to_string()));
        }

        stack
            .pop()
            .and_then(|document| document.children.into_iter().next())
            .ok_or_else(|| SessionError::Xml("Empty document".to_string()))
    }

    fn open(start: &BytesStart<'_>) -> SessionResult<Element> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(xml_error)?;
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute.unescape_value().map_err(xml_error)?.into_owned();
            attributes.push((key, value));
        }

        Ok(Element {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn append(stack: &mut [Element], element: Element) -> SessionResult<()> {
        let parent = stack
            .last_mut()
            .ok_or_else(|| xml_error("Element outside of document"))?;
        parent.children.push(element);
        Ok(())
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }
}

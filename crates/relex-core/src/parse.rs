use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};
use thiserror::Error;

/// The sections of the response document worth keeping. Everything
/// else (the echoed input text, sentence and dependency parse trees)
/// is skipped without being materialized.
pub const SECTION_NAMES: [&str; 3] = ["mentions", "entities", "relations"];

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed document: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("Malformed attribute: {0}")]
    Attr(#[from] AttrError),
    #[error("Document ended inside an open element")]
    Truncated,
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Pull parser that walks the response document and yields each
/// subscribed section as a completed object tree, in document order.
///
/// The mapping from XML to objects mirrors what the service's
/// downstream consumers expect: attributes become string fields, text
/// content accumulates under `$t`, and a repeated child element name
/// becomes an array while a single occurrence stays a bare object.
/// That last rule is why [`crate::wire::OneOrMany`] exists.
pub struct SectionParser<'a> {
    reader: Reader<&'a [u8]>,
    sections: &'a [&'a str],
}

impl<'a> SectionParser<'a> {
    #[must_use]
    pub fn new(document: &'a str, sections: &'a [&'a str]) -> Self {
        Self {
            reader: Reader::from_str(document),
            sections,
        }
    }

    /// The next completed section, or `None` once the document is
    /// fully consumed.
    pub fn next_section(&mut self) -> ParseResult<Option<(String, Value)>> {
        loop {
            match self.reader.read_event()? {
                Event::Start(start) => {
                    let name = element_name(&start);
                    if self.sections.contains(&name.as_str()) {
                        let value = self.read_element(&start)?;
                        return Ok(Some((name, value)));
                    }
                }
                Event::Empty(start) => {
                    let name = element_name(&start);
                    if self.sections.contains(&name.as_str()) {
                        return Ok(Some((name, Value::Object(attribute_map(&start)?))));
                    }
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }

    fn read_element(&mut self, start: &BytesStart<'_>) -> ParseResult<Value> {
        let mut object = attribute_map(start)?;
        let mut text = String::new();

        loop {
            match self.reader.read_event()? {
                Event::Start(child) => {
                    let name = element_name(&child);
                    let value = self.read_element(&child)?;
                    insert_child(&mut object, name, value);
                }
                Event::Empty(child) => {
                    let name = element_name(&child);
                    let value = Value::Object(attribute_map(&child)?);
                    insert_child(&mut object, name, value);
                }
                Event::Text(t) => {
                    let chunk = t.unescape()?;
                    if !chunk.trim().is_empty() {
                        text.push_str(&chunk);
                    }
                }
                Event::CData(c) => {
                    let bytes = c.into_inner();
                    text.push_str(&String::from_utf8_lossy(&bytes));
                }
                Event::End(_) => break,
                Event::Eof => return Err(ParseError::Truncated),
                _ => {}
            }
        }

        if !text.is_empty() {
            object.insert("$t".to_string(), Value::String(text));
        }
        Ok(Value::Object(object))
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn attribute_map(start: &BytesStart<'_>) -> ParseResult<Map<String, Value>> {
    let mut map = Map::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        map.insert(key, Value::String(value));
    }
    Ok(map)
}

/// A second occurrence of a child name promotes the existing entry to
/// an array; later occurrences append.
fn insert_child(object: &mut Map<String, Value>, name: String, value: Value) {
    match object.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            object.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sections(document: &str) -> Vec<(String, Value)> {
        let mut parser = SectionParser::new(document, &SECTION_NAMES);
        let mut out = Vec::new();
        while let Some(section) = parser.next_section().unwrap() {
            out.push(section);
        }
        out
    }

    #[test]
    fn test_single_child_stays_bare_object() {
        let doc = r#"<doc><entities><entity eid="-E1"/></entities></doc>"#;

        let parsed = sections(doc);

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].0, "entities");
        assert_eq!(parsed[0].1, json!({ "entity": { "eid": "-E1" } }));
    }

    #[test]
    fn test_repeated_children_become_array() {
        let doc = r#"<doc><entities><entity eid="-E1"/><entity eid="-E2"/></entities></doc>"#;

        let parsed = sections(doc);

        assert_eq!(
            parsed[0].1,
            json!({ "entity": [{ "eid": "-E1" }, { "eid": "-E2" }] })
        );
    }

    #[test]
    fn test_covered_text_lands_in_text_field() {
        let doc = r#"<doc><mentions><mention mid="-M1">John Smith</mention></mentions></doc>"#;

        let parsed = sections(doc);

        assert_eq!(
            parsed[0].1,
            json!({ "mention": { "mid": "-M1", "$t": "John Smith" } })
        );
    }

    #[test]
    fn test_unsubscribed_sections_are_skipped() {
        let doc = concat!(
            "<doc>",
            "<text>ignored</text>",
            "<sents><sent sid=\"0\">also ignored</sent></sents>",
            "<mentions><mention mid=\"-M1\">John</mention></mentions>",
            "</doc>"
        );

        let parsed = sections(doc);

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].0, "mentions");
    }

    #[test]
    fn test_sections_yield_in_document_order() {
        let doc = concat!(
            "<doc>",
            "<mentions><mention mid=\"-M1\">John</mention></mentions>",
            "<entities><entity eid=\"-E1\"/></entities>",
            "<relations version=\"1\"><relation type=\"employedBy\"/></relations>",
            "</doc>"
        );

        let parsed = sections(doc);

        let names: Vec<&str> = parsed.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["mentions", "entities", "relations"]);
    }

    #[test]
    fn test_nested_structure() {
        let doc = concat!(
            "<doc><relations><relation type=\"employedBy\">",
            "<rel_entity_arg eid=\"-E1\" argnum=\"1\"/>",
            "<rel_entity_arg eid=\"-E2\" argnum=\"2\"/>",
            "<relmentions><relmention rmid=\"-R1-1\" score=\"0.9\">",
            "<rel_mention_arg mid=\"-M1\" argnum=\"1\">John Smith</rel_mention_arg>",
            "<rel_mention_arg mid=\"-M4\" argnum=\"2\">IBM</rel_mention_arg>",
            "</relmention></relmentions>",
            "</relation></relations></doc>"
        );

        let parsed = sections(doc);

        assert_eq!(
            parsed[0].1,
            json!({
                "relation": {
                    "type": "employedBy",
                    "rel_entity_arg": [
                        { "eid": "-E1", "argnum": "1" },
                        { "eid": "-E2", "argnum": "2" }
                    ],
                    "relmentions": {
                        "relmention": {
                            "rmid": "-R1-1",
                            "score": "0.9",
                            "rel_mention_arg": [
                                { "mid": "-M1", "argnum": "1", "$t": "John Smith" },
                                { "mid": "-M4", "argnum": "2", "$t": "IBM" }
                            ]
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let doc = "<doc><entities><entity></entities></doc>";

        let mut parser = SectionParser::new(doc, &SECTION_NAMES);

        assert!(parser.next_section().is_err());
    }

    #[test]
    fn test_truncated_document_is_an_error() {
        let doc = "<doc><entities><entity eid=\"-E1\">";

        let mut parser = SectionParser::new(doc, &SECTION_NAMES);

        assert!(parser.next_section().is_err());
    }

    #[test]
    fn test_escaped_attribute_values() {
        let doc = r#"<doc><mentions><mention mid="-M1">AT&amp;T</mention></mentions></doc>"#;

        let parsed = sections(doc);

        assert_eq!(
            parsed[0].1,
            json!({ "mention": { "mid": "-M1", "$t": "AT&T" } })
        );
    }
}

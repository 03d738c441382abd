//! Indented XML output for an assembled [`Element`] tree.
//!
//! This is a thin formatting layer over `xml-rs`; all structural decisions are made by the
//! assembler. Text content is escaped by the emitter, so scalar cell values round-trip
//! through a standard XML parser unchanged.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use xml::writer::{EmitterConfig, EventWriter, XmlEvent};

use crate::error::ConversionResult;
use crate::types::Element;

/// Serialize `root` as an indented XML document to `sink`.
pub fn write_document<W: Write>(root: &Element, sink: W) -> ConversionResult<()> {
    let mut writer = EmitterConfig::new()
        .perform_indent(true)
        .create_writer(sink);
    write_element(&mut writer, root)?;
    Ok(())
}

/// Serialize `root` as an indented XML document string.
pub fn to_string(root: &Element) -> ConversionResult<String> {
    let mut buf = Vec::new();
    write_document(root, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Serialize `root` as an indented XML document to a file at `path`.
pub fn to_file(root: &Element, path: impl AsRef<Path>) -> ConversionResult<()> {
    let file = File::create(path)?;
    write_document(root, BufWriter::new(file))
}

fn write_element<W: Write>(
    writer: &mut EventWriter<W>,
    element: &Element,
) -> Result<(), xml::writer::Error> {
    let mut start = XmlEvent::start_element(element.name.as_str());
    for (name, value) in &element.attributes {
        start = start.attr(name.as_str(), value.as_str());
    }
    writer.write(start)?;

    if !element.text.is_empty() {
        writer.write(XmlEvent::characters(&element.text))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }

    writer.write(XmlEvent::end_element())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::to_string;
    use crate::types::Element;

    #[test]
    fn writes_nested_elements_with_indentation() {
        let mut person = Element::new("person");
        person.push(Element::with_text("id", "1"));
        person.push(Element::with_text("name", "Alice"));
        let mut root = Element::new("personList");
        root.push(person);

        let out = to_string(&root).unwrap();
        assert!(out.contains("<personList>"));
        assert!(out.contains("  <person>"));
        assert!(out.contains("<id>1</id>"));
        assert!(out.contains("<name>Alice</name>"));
        assert!(out.trim_end().ends_with("</personList>"));
    }

    #[test]
    fn escapes_structural_characters_in_text() {
        let root = Element::with_text("note", "a < b & c");
        let out = to_string(&root).unwrap();
        assert!(out.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn writes_attributes() {
        let mut root = Element::new("record");
        root.set_attribute("version", "2");
        let out = to_string(&root).unwrap();
        assert!(out.contains(r#"<record version="2""#));
    }

    #[test]
    fn empty_element_is_self_contained() {
        let mut root = Element::new("personList");
        root.push(Element::new("petListList"));
        let out = to_string(&root).unwrap();
        assert!(out.contains("<petListList />") || out.contains("<petListList/>"));
    }
}

//! Support for the XLIFF 1.2 subset produced by translation vendors.
//!
//! Only `xliff/file/body/trans-unit` with its `id`, `source` and `target` is
//! read; everything else is skipped. The root element has to be `xliff` in the
//! XLIFF 1.2 namespace, otherwise the document is rejected as
//! [`Error::InvalidXliff`].

use std::io::{BufRead, Write};

use quick_xml::{
    NsReader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    name::{Namespace, ResolveResult},
};
use serde_json::Value;

use crate::{error::Error, traits::Parser, types::ResourceEntry};

pub const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";
pub const XLIFF_VERSION: &str = "1.2";

/// A parsed XLIFF document: one [`FileGroup`] per `<file>` element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XliffDocument {
    pub files: Vec<FileGroup>,
}

/// A `<file>` element. `original` names the resource the units belong to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileGroup {
    pub original: String,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
    pub units: Vec<TransUnit>,
}

/// A `<trans-unit>`; `target` is `None` when the unit has no translation yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransUnit {
    pub id: String,
    pub source: Option<String>,
    pub target: Option<String>,
}

impl TransUnit {
    pub fn new(id: impl Into<String>, target: Option<&str>) -> Self {
        Self {
            id: id.into(),
            source: None,
            target: target.map(str::to_string),
        }
    }
}

impl FileGroup {
    pub fn new(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            ..Default::default()
        }
    }

    /// Collapses the units into `id -> target`. Units without a target map to
    /// `null`. Two units sharing an id are an error.
    pub fn collapse(&self) -> Result<ResourceEntry, Error> {
        let mut entry = ResourceEntry::new();
        for unit in &self.units {
            if entry.get(&unit.id).is_some() {
                return Err(Error::DuplicateKey {
                    group: self.original.clone(),
                    key: unit.id.clone(),
                });
            }
            let value = unit.target.clone().map_or(Value::Null, Value::String);
            entry.insert(unit.id.clone(), value);
        }
        Ok(entry)
    }
}

impl Parser for XliffDocument {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        // Text is kept verbatim; whitespace between elements is never collected.
        let mut xml_reader = NsReader::from_reader(reader);

        let mut buf = Vec::new();
        let mut document = XliffDocument::default();
        let mut seen_root = false;

        loop {
            let (resolved, event) = xml_reader.read_resolved_event_into(&mut buf)?;
            match event {
                Event::Start(ref e) | Event::Empty(ref e) if !seen_root => {
                    check_root(&resolved, e)?;
                    seen_root = true;
                }
                Event::Start(ref e) if e.local_name().as_ref() == b"file" => {
                    let group = parse_file_group(e, &mut xml_reader)?;
                    document.files.push(group);
                }
                Event::Empty(ref e) if e.local_name().as_ref() == b"file" => {
                    document.files.push(file_group_header(e)?);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !seen_root {
            return Err(Error::invalid_xliff("document has no root element"));
        }
        Ok(document)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 2);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut root = BytesStart::new("xliff");
        root.push_attribute(("version", XLIFF_VERSION));
        root.push_attribute(("xmlns", XLIFF_NAMESPACE));
        xml_writer.write_event(Event::Start(root))?;

        for group in &self.files {
            let mut file = BytesStart::new("file");
            file.push_attribute(("original", group.original.as_str()));
            if let Some(lang) = &group.source_language {
                file.push_attribute(("source-language", lang.as_str()));
            }
            if let Some(lang) = &group.target_language {
                file.push_attribute(("target-language", lang.as_str()));
            }
            file.push_attribute(("datatype", "plaintext"));
            xml_writer.write_event(Event::Start(file))?;
            xml_writer.write_event(Event::Start(BytesStart::new("body")))?;

            for unit in &group.units {
                let mut elem = BytesStart::new("trans-unit");
                elem.push_attribute(("id", unit.id.as_str()));
                xml_writer.write_event(Event::Start(elem))?;
                if let Some(source) = &unit.source {
                    write_text_element(&mut xml_writer, "source", source)?;
                }
                if let Some(target) = &unit.target {
                    write_text_element(&mut xml_writer, "target", target)?;
                }
                xml_writer.write_event(Event::End(BytesEnd::new("trans-unit")))?;
            }

            xml_writer.write_event(Event::End(BytesEnd::new("body")))?;
            xml_writer.write_event(Event::End(BytesEnd::new("file")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("xliff")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn check_root(resolved: &ResolveResult, e: &BytesStart) -> Result<(), Error> {
    let local = e.local_name();
    if local.as_ref() != b"xliff" {
        return Err(Error::invalid_xliff(format!(
            "root element is `{}`, expected `xliff`",
            String::from_utf8_lossy(local.as_ref())
        )));
    }
    match resolved {
        ResolveResult::Bound(Namespace(ns)) if *ns == XLIFF_NAMESPACE.as_bytes() => Ok(()),
        ResolveResult::Bound(Namespace(ns)) => Err(Error::invalid_xliff(format!(
            "root element is in namespace `{}`, expected `{}`",
            String::from_utf8_lossy(ns),
            XLIFF_NAMESPACE
        ))),
        _ => Err(Error::invalid_xliff(format!(
            "root element is not in namespace `{XLIFF_NAMESPACE}`"
        ))),
    }
}

fn file_group_header(e: &BytesStart) -> Result<FileGroup, Error> {
    let mut group = FileGroup::default();
    let mut original = None;
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.local_name().as_ref() {
            b"original" => original = Some(attr.unescape_value()?.into_owned()),
            b"source-language" => group.source_language = Some(attr.unescape_value()?.into_owned()),
            b"target-language" => group.target_language = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }
    group.original =
        original.ok_or_else(|| Error::invalid_xliff("file element missing 'original'"))?;
    Ok(group)
}

fn parse_file_group<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut NsReader<R>,
) -> Result<FileGroup, Error> {
    let mut group = file_group_header(e)?;
    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"trans-unit" => {
                let unit = parse_trans_unit(e, xml_reader)?;
                group.units.push(unit);
            }
            Event::Empty(ref e) if e.local_name().as_ref() == b"trans-unit" => {
                group.units.push(TransUnit {
                    id: unit_id(e)?,
                    ..Default::default()
                });
            }
            Event::End(ref e) if e.local_name().as_ref() == b"file" => break,
            Event::Eof => return Err(Error::invalid_xliff("unexpected EOF inside <file>")),
            _ => {}
        }
        buf.clear();
    }
    Ok(group)
}

fn unit_id(e: &BytesStart) -> Result<String, Error> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"id" {
            return Ok(attr.unescape_value()?.into_owned());
        }
    }
    Err(Error::invalid_xliff("trans-unit element missing 'id'"))
}

fn parse_trans_unit<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut NsReader<R>,
) -> Result<TransUnit, Error> {
    let mut unit = TransUnit {
        id: unit_id(e)?,
        ..Default::default()
    };
    // Only direct children count; `alt-trans` carries its own source and target.
    let mut buf = Vec::new();
    let mut depth = 0usize;
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if depth == 0 && e.local_name().as_ref() == b"source" => {
                unit.source = Some(read_element_text(xml_reader, b"source")?);
            }
            Event::Start(ref e) if depth == 0 && e.local_name().as_ref() == b"target" => {
                unit.target = Some(read_element_text(xml_reader, b"target")?);
            }
            Event::Empty(ref e) if depth == 0 && e.local_name().as_ref() == b"source" => {
                unit.source = Some(String::new());
            }
            Event::Empty(ref e) if depth == 0 && e.local_name().as_ref() == b"target" => {
                unit.target = Some(String::new());
            }
            Event::Start(_) => depth += 1,
            Event::End(ref e) if depth == 0 && e.local_name().as_ref() == b"trans-unit" => break,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => return Err(Error::invalid_xliff("unexpected EOF inside <trans-unit>")),
            _ => {}
        }
        buf.clear();
    }
    Ok(unit)
}

/// Concatenates the text of an element up to its end tag; inline markup is dropped.
fn read_element_text<R: BufRead>(
    xml_reader: &mut NsReader<R>,
    name: &[u8],
) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(t) => text.push_str(&t.decode()?),
            Event::Start(_) => depth += 1,
            Event::End(ref e) if depth == 0 && e.local_name().as_ref() == name => break,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => {
                return Err(Error::invalid_xliff(format!(
                    "unexpected EOF inside <{}>",
                    String::from_utf8_lossy(name)
                )));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(text)
}

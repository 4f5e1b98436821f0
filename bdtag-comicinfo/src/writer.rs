use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::ComicInfoError;
use crate::fields::{Field, Value};

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Write `fields` as the children of a single `root` element.
///
/// Simple values become text elements; item lists become a wrapper element
/// holding one empty element per item, with the item's fields as attributes.
/// An empty item list is omitted.
pub fn write_document(root: &str, fields: &[Field]) -> Result<String, ComicInfoError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    emit(&mut writer, Event::Start(BytesStart::new(root)))?;
    for field in fields {
        write_field(&mut writer, field)?;
    }
    emit(&mut writer, Event::End(BytesEnd::new(root)))?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| ComicInfoError::xml(e.to_string()))
}

fn write_field(writer: &mut XmlWriter, field: &Field) -> Result<(), ComicInfoError> {
    let name = field.element.as_ref();
    match &field.value {
        Value::Items { element, items } => {
            if items.is_empty() {
                return Ok(());
            }
            emit(writer, Event::Start(BytesStart::new(name)))?;
            for item in items {
                let mut start = BytesStart::new(*element);
                for attr in item {
                    let value = attr.value.lexical();
                    start.push_attribute((attr.element.as_ref(), value.as_ref()));
                }
                emit(writer, Event::Empty(start))?;
            }
            emit(writer, Event::End(BytesEnd::new(name)))
        }
        value => {
            emit(writer, Event::Start(BytesStart::new(name)))?;
            emit(writer, Event::Text(BytesText::new(&value.lexical())))?;
            emit(writer, Event::End(BytesEnd::new(name)))
        }
    }
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), ComicInfoError> {
    writer
        .write_event(event)
        .map_err(|e| ComicInfoError::xml(e.to_string()))
}

//! XML schema-document parser.
//!
//! The external front end dumps an already-parsed Thrift program as XML in the
//! shape of `thrift --gen xml`. This module reads that document into the raw
//! [`Document`] form. Nothing here understands Thrift IDL text.

use crate::document::{
    Document, RawConst, RawField, RawFunction, RawService, RawStruct, RawTypedef, TypeRef,
};
use crate::error::ParseError;
use crate::types::{BaseType, ConstValue, EnumDef, EnumValue, Requiredness, StructKind};
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use std::collections::HashSet;

/// Generic XML element, the intermediate form between events and declarations.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn require(&self, key: &str) -> Result<&str, ParseError> {
        self.attr(key)
            .ok_or_else(|| ParseError::missing_attr(&self.name, key))
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn require_child(&self, name: &str) -> Result<&Element, ParseError> {
        self.child(name).ok_or_else(|| {
            ParseError::structure(format!(
                "element '{}' is missing its '{}' child",
                self.name, name
            ))
        })
    }

    fn doc(&self) -> Option<String> {
        self.attr("doc").map(str::to_string)
    }

    fn find(&self, name: &str) -> Option<&Element> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

/// Parses an XML schema document from a string.
///
/// # Arguments
/// * `xml` - Schema document content
///
/// # Returns
/// Raw document or parse error.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed, lacks a `document` element,
/// or contains invalid declarations.
pub fn parse_document(xml: &str) -> Result<Document, ParseError> {
    let root = read_tree(xml)?;
    let document = root
        .find("document")
        .ok_or_else(|| ParseError::structure("no document element found"))?;

    let mut doc = Document {
        name: document.require("name")?.to_string(),
        ..Document::default()
    };
    let mut declared = HashSet::new();

    for el in &document.children {
        match el.name.as_str() {
            "namespace" => {
                doc.namespaces.push((
                    el.require("name")?.to_string(),
                    el.require("value")?.to_string(),
                ));
            }
            "typedef" => {
                let typedef = RawTypedef {
                    name: el.require("name")?.to_string(),
                    ty: parse_type_ref(el)?,
                    doc: el.doc(),
                };
                declare(&mut declared, "typedef", &typedef.name)?;
                doc.typedefs.push(typedef);
            }
            "enum" => {
                let enum_def = parse_enum(el)?;
                declare(&mut declared, "enum", &enum_def.name)?;
                doc.enums.push(enum_def);
            }
            "const" => doc.consts.push(parse_const(el)?),
            "struct" | "union" | "exception" => {
                let raw = parse_struct(el)?;
                declare(&mut declared, &el.name, &raw.name)?;
                doc.structs.push(raw);
            }
            "service" => doc.services.push(parse_service(el)?),
            other => tracing::debug!("ignoring document element '{}'", other),
        }
    }

    Ok(doc)
}

/// Registers a type name, rejecting duplicates across all type declarations.
fn declare(declared: &mut HashSet<String>, kind: &str, name: &str) -> Result<(), ParseError> {
    if declared.insert(name.to_string()) {
        Ok(())
    } else {
        Err(ParseError::duplicate(kind, name))
    }
}

/// Reads the whole document into an element tree.
fn read_tree(xml: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(xml);

    let mut stack = vec![Element::default()];
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => stack.push(start_element(e)?),
            Ok(Event::Empty(ref e)) => {
                let element = start_element(e)?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(element);
                }
            }
            Ok(Event::Text(ref t)) => {
                let text = std::str::from_utf8(t.as_ref())?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&unescape(text)?);
                }
            }
            Ok(Event::GeneralRef(ref r)) => {
                let resolved = match r.resolve_char_ref()? {
                    Some(c) => c.to_string(),
                    None => {
                        let name = std::str::from_utf8(r.as_ref())?;
                        resolve_predefined_entity(name)
                            .ok_or_else(|| {
                                ParseError::structure(format!("unknown entity '&{name};'"))
                            })?
                            .to_string()
                    }
                };
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&resolved);
                }
            }
            Ok(Event::End(_)) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| ParseError::structure("unbalanced end tag"))?;
                // Text and entity events arrive separately; only the
                // assembled text is trimmed.
                element.text = element.text.trim().to_string();
                let parent = stack
                    .last_mut()
                    .ok_or_else(|| ParseError::structure("unbalanced end tag"))?;
                parent.children.push(element);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if stack.len() != 1 {
        return Err(ParseError::structure("unexpected end of document"));
    }
    stack
        .pop()
        .ok_or_else(|| ParseError::structure("empty document"))
}

/// Builds an element from a start (or empty) tag.
fn start_element(e: &BytesStart<'_>) -> Result<Element, ParseError> {
    let name_bytes = e.name().as_ref().to_vec();
    let name = std::str::from_utf8(&name_bytes)?.to_string();

    let mut attrs = Vec::new();
    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = std::str::from_utf8(&attr.value)?;
        attrs.push((key.to_string(), unescape(value)?.into_owned()));
    }

    Ok(Element {
        name,
        attrs,
        children: Vec::new(),
        text: String::new(),
    })
}

/// Parses the `type` attribute (and container children) of an element.
fn parse_type_ref(el: &Element) -> Result<TypeRef, ParseError> {
    let ty = el.require("type")?;
    match ty {
        "id" => Ok(TypeRef::Named {
            module: el.attr("type-module").map(str::to_string),
            name: el.require("type-id")?.to_string(),
        }),
        "list" => Ok(TypeRef::List(Box::new(parse_type_ref(
            el.require_child("elemType")?,
        )?))),
        "set" => Ok(TypeRef::Set(Box::new(parse_type_ref(
            el.require_child("elemType")?,
        )?))),
        "map" => Ok(TypeRef::Map(
            Box::new(parse_type_ref(el.require_child("keyType")?)?),
            Box::new(parse_type_ref(el.require_child("valueType")?)?),
        )),
        other => BaseType::from_thrift_name(other)
            .map(TypeRef::Base)
            .ok_or_else(|| ParseError::invalid_attr(&el.name, "type", other)),
    }
}

/// Parses an enum declaration.
fn parse_enum(el: &Element) -> Result<EnumDef, ParseError> {
    let mut enum_def = EnumDef::new(el.require("name")?);
    enum_def.doc = el.doc();

    for member in el.children.iter().filter(|c| c.name == "member") {
        let raw_value = member.require("value")?;
        let value = raw_value
            .parse()
            .map_err(|_| ParseError::invalid_attr("member", "value", raw_value))?;
        let mut enum_value = EnumValue::new(member.require("name")?, value);
        enum_value.doc = member.doc();
        enum_def.add_value(enum_value);
    }

    Ok(enum_def)
}

/// Parses a constant declaration.
fn parse_const(el: &Element) -> Result<RawConst, ParseError> {
    let value_el = el
        .children
        .iter()
        .find(|c| !matches!(c.name.as_str(), "elemType" | "keyType" | "valueType"))
        .ok_or_else(|| ParseError::structure("const element has no value"))?;

    Ok(RawConst {
        name: el.require("name")?.to_string(),
        ty: parse_type_ref(el)?,
        value: parse_const_value(value_el)?,
        doc: el.doc(),
    })
}

/// Parses a constant value element.
fn parse_const_value(el: &Element) -> Result<ConstValue, ParseError> {
    match el.name.as_str() {
        "int" => el
            .text
            .parse()
            .map(ConstValue::Integer)
            .map_err(|_| ParseError::invalid_attr("int", "value", el.text.as_str())),
        "double" => el
            .text
            .parse()
            .map(ConstValue::Double)
            .map_err(|_| ParseError::invalid_attr("double", "value", el.text.as_str())),
        "string" => Ok(ConstValue::String(el.text.clone())),
        "id" => Ok(ConstValue::Identifier(el.text.clone())),
        "list" | "set" => el
            .children
            .iter()
            .map(parse_const_value)
            .collect::<Result<Vec<_>, _>>()
            .map(ConstValue::List),
        "map" => {
            let mut entries = Vec::new();
            for entry in el.children.iter().filter(|c| c.name == "entry") {
                let key = single_value(entry.require_child("key")?)?;
                let value = single_value(entry.require_child("value")?)?;
                entries.push((key, value));
            }
            Ok(ConstValue::Map(entries))
        }
        other => Err(ParseError::structure(format!(
            "unknown constant value element '{other}'"
        ))),
    }
}

/// Parses the single value element wrapped by `key`, `value`, or `default`.
fn single_value(el: &Element) -> Result<ConstValue, ParseError> {
    let inner = el.children.first().ok_or_else(|| {
        ParseError::structure(format!("element '{}' holds no value", el.name))
    })?;
    parse_const_value(inner)
}

/// Parses a struct, union, or exception.
fn parse_struct(el: &Element) -> Result<RawStruct, ParseError> {
    let kind = match el.name.as_str() {
        "union" => StructKind::Union,
        "exception" => StructKind::Exception,
        _ => StructKind::Struct,
    };

    Ok(RawStruct {
        name: el.require("name")?.to_string(),
        kind,
        fields: parse_fields(el, "field")?,
        doc: el.doc(),
    })
}

/// Parses all `tag` children of `el` as fields.
///
/// Fields without an explicit id get negative ids counting down from -1, the
/// way the Thrift front end assigns implicit keys.
fn parse_fields(el: &Element, tag: &str) -> Result<Vec<RawField>, ParseError> {
    let mut fields = Vec::new();
    let mut next_implicit = -1;

    for field_el in el.children.iter().filter(|c| c.name == tag) {
        let id = match field_el.attr("field-id") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ParseError::invalid_attr(tag, "field-id", raw))?,
            None => {
                let id = next_implicit;
                next_implicit -= 1;
                id
            }
        };
        let requiredness = match field_el.attr("required") {
            Some(raw) => Requiredness::parse(raw)
                .ok_or_else(|| ParseError::invalid_attr(tag, "required", raw))?,
            None => Requiredness::Default,
        };
        let default = field_el.child("default").map(single_value).transpose()?;

        fields.push(RawField {
            id,
            name: field_el.require("name")?.to_string(),
            ty: parse_type_ref(field_el)?,
            requiredness,
            default,
            doc: field_el.doc(),
        });
    }

    Ok(fields)
}

/// Parses a service declaration.
fn parse_service(el: &Element) -> Result<RawService, ParseError> {
    let mut functions = Vec::new();

    for method in el.children.iter().filter(|c| c.name == "method") {
        let returns = match method.child("returns") {
            Some(returns) => parse_type_ref(returns)?,
            None => TypeRef::Base(BaseType::Void),
        };
        let oneway = match method.attr("oneway") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ParseError::invalid_attr("method", "oneway", raw))?,
            None => false,
        };

        functions.push(RawFunction {
            name: method.require("name")?.to_string(),
            returns,
            args: parse_fields(method, "arg")?,
            oneway,
            doc: method.doc(),
        });
    }

    Ok(RawService {
        name: el.require("name")?.to_string(),
        extends: el.attr("extends").map(str::to_string),
        functions,
        doc: el.doc(),
    })
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Cow;
use std::fmt;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use crate::model::{DiagramElement, ElementKind, Point, ProcessDiagram};
use crate::schema;

use super::{BPMN_DI_NAMESPACE, BPMN_MODEL_NAMESPACE, BPMN_TARGET_NAMESPACE, DC_NAMESPACE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BpmnExportError {
    Write { message: String },
    UnknownNamespace { element_id: String, namespace: String },
}

impl fmt::Display for BpmnExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write { message } => write!(f, "cannot write BPMN XML: {message}"),
            Self::UnknownNamespace { element_id, namespace } => write!(
                f,
                "element {element_id} carries an attribute in undeclared namespace {namespace}"
            ),
        }
    }
}

impl std::error::Error for BpmnExportError {}

/// Builds an attribute whose value is escaped for XML, including line breaks and tabs.
///
/// Composite task labels contain `\n`; emitting it as `&#10;` keeps the value intact through
/// parsers that normalize attribute whitespace.
fn attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    let escaped = escape(value).replace('\n', "&#10;").replace('\r', "&#13;").replace('\t', "&#9;");
    Attribute { key: QName(key.as_bytes()), value: Cow::Owned(escaped.into_bytes()) }
}

fn write_error(err: impl fmt::Display) -> BpmnExportError {
    BpmnExportError::Write { message: err.to_string() }
}

/// Serializes a diagram as a BPMN 2.0 document with one `bpmn:process`.
///
/// Declared schema attributes are written as `prefix:localName="value"` on their owning element.
/// Element positions are written as `bpmndi:BPMNShape` bounds with a default size per kind;
/// edge waypoints are not emitted.
pub fn export_bpmn(diagram: &ProcessDiagram) -> Result<String, BpmnExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_error)?;

    let mut definitions = BytesStart::new("bpmn:definitions");
    definitions.push_attribute(attribute("xmlns:bpmn", BPMN_MODEL_NAMESPACE));
    definitions.push_attribute(attribute("xmlns:bpmndi", BPMN_DI_NAMESPACE));
    definitions.push_attribute(attribute("xmlns:dc", DC_NAMESPACE));
    let mut declared = Vec::<(&str, &str)>::new();
    for descriptor in schema::descriptors() {
        if !declared.contains(&(descriptor.prefix, descriptor.namespace)) {
            declared.push((descriptor.prefix, descriptor.namespace));
        }
    }
    let xmlns_keys = declared
        .iter()
        .map(|(prefix, namespace)| (format!("xmlns:{prefix}"), *namespace))
        .chain(
            diagram
                .extra_namespaces()
                .iter()
                .map(|(prefix, namespace)| (format!("xmlns:{prefix}"), namespace.as_str())),
        )
        .collect::<Vec<_>>();
    for (key, namespace) in &xmlns_keys {
        definitions.push_attribute(attribute(key, namespace));
    }
    definitions.push_attribute(attribute("id", diagram.definitions_id()));
    definitions.push_attribute(attribute("targetNamespace", BPMN_TARGET_NAMESPACE));
    writer.write_event(Event::Start(definitions)).map_err(write_error)?;

    let mut process = BytesStart::new("bpmn:process");
    process.push_attribute(attribute("id", diagram.process_id().as_str()));
    process.push_attribute(attribute("isExecutable", "false"));
    writer.write_event(Event::Start(process)).map_err(write_error)?;

    for element in diagram.elements() {
        write_element(&mut writer, diagram, element)?;
    }

    writer.write_event(Event::End(BytesEnd::new("bpmn:process"))).map_err(write_error)?;
    write_shapes(&mut writer, diagram)?;
    writer.write_event(Event::End(BytesEnd::new("bpmn:definitions"))).map_err(write_error)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(write_error)?;
    xml.push('\n');
    Ok(xml)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    diagram: &ProcessDiagram,
    element: &DiagramElement,
) -> Result<(), BpmnExportError> {
    let tag = format!("bpmn:{}", element.kind().tag());
    let mut start = BytesStart::new(tag.as_str());
    start.push_attribute(attribute("id", element.id().as_str()));
    if let Some(name) = element.name() {
        start.push_attribute(attribute("name", name));
    }
    if let (Some(source), Some(target)) = (element.source_ref(), element.target_ref()) {
        start.push_attribute(attribute("sourceRef", source.as_str()));
        start.push_attribute(attribute("targetRef", target.as_str()));
    }

    let mut qualified_keys = Vec::with_capacity(element.extension_attrs().len());
    for (name, value) in element.extension_attrs() {
        let prefix = schema::prefix_for_namespace(name.namespace()).ok_or_else(|| {
            BpmnExportError::UnknownNamespace {
                element_id: element.id().to_string(),
                namespace: name.namespace().to_owned(),
            }
        })?;
        qualified_keys.push((format!("{prefix}:{}", name.local_name()), value.as_str()));
    }
    for (key, value) in &qualified_keys {
        start.push_attribute(attribute(key, value));
    }
    for (key, value) in element.passthrough_attrs() {
        start.push_attribute(attribute(key, value));
    }

    let (incoming, outgoing) = if element.kind().is_connection() {
        (Vec::new(), Vec::new())
    } else {
        (diagram.incoming(element.id().as_str()), diagram.outgoing(element.id().as_str()))
    };

    if incoming.is_empty() && outgoing.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for (child, flows) in [("bpmn:incoming", &incoming), ("bpmn:outgoing", &outgoing)] {
        for flow in flows {
            writer.write_event(Event::Start(BytesStart::new(child))).map_err(write_error)?;
            writer
                .write_event(Event::Text(BytesText::new(flow.id().as_str())))
                .map_err(write_error)?;
            writer.write_event(Event::End(BytesEnd::new(child))).map_err(write_error)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(tag.as_str()))).map_err(write_error)
}

fn shape_size(kind: &ElementKind) -> (f64, f64) {
    match kind {
        ElementKind::ExclusiveGateway | ElementKind::ParallelGateway => (50.0, 50.0),
        ElementKind::StartEvent | ElementKind::EndEvent => (36.0, 36.0),
        _ => (100.0, 80.0),
    }
}

fn write_shapes(writer: &mut Writer<Vec<u8>>, diagram: &ProcessDiagram) -> Result<(), BpmnExportError> {
    let positioned = diagram
        .elements()
        .filter(|element| !element.kind().is_connection())
        .filter_map(|element| element.position().map(|position| (element, position)))
        .collect::<Vec<(&DiagramElement, Point)>>();
    if positioned.is_empty() {
        return Ok(());
    }

    let mut plane_diagram = BytesStart::new("bpmndi:BPMNDiagram");
    plane_diagram.push_attribute(attribute("id", "BPMNDiagram_1"));
    writer.write_event(Event::Start(plane_diagram)).map_err(write_error)?;
    let mut plane = BytesStart::new("bpmndi:BPMNPlane");
    plane.push_attribute(attribute("id", "BPMNPlane_1"));
    plane.push_attribute(attribute("bpmnElement", diagram.process_id().as_str()));
    writer.write_event(Event::Start(plane)).map_err(write_error)?;

    for (element, position) in positioned {
        let shape_id = format!("{}_di", element.id());
        let mut shape = BytesStart::new("bpmndi:BPMNShape");
        shape.push_attribute(attribute("id", &shape_id));
        shape.push_attribute(attribute("bpmnElement", element.id().as_str()));
        writer.write_event(Event::Start(shape)).map_err(write_error)?;

        let (width, height) = shape_size(element.kind());
        let mut bounds = BytesStart::new("dc:Bounds");
        bounds.push_attribute(attribute("x", &position.x.to_string()));
        bounds.push_attribute(attribute("y", &position.y.to_string()));
        bounds.push_attribute(attribute("width", &width.to_string()));
        bounds.push_attribute(attribute("height", &height.to_string()));
        writer.write_event(Event::Empty(bounds)).map_err(write_error)?;

        writer.write_event(Event::End(BytesEnd::new("bpmndi:BPMNShape"))).map_err(write_error)?;
    }

    writer.write_event(Event::End(BytesEnd::new("bpmndi:BPMNPlane"))).map_err(write_error)?;
    writer.write_event(Event::End(BytesEnd::new("bpmndi:BPMNDiagram"))).map_err(write_error)
}

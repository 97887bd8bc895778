// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::model::{
    DiagramElement, ElementId, ElementKind, IdError, Point, ProcessDiagram, ProcessId, QualifiedName,
};
use crate::schema;

use super::{
    is_builtin_namespace, is_reserved_prefix, BPMN_DI_NAMESPACE, BPMN_MODEL_NAMESPACE,
    DC_NAMESPACE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BpmnParseError {
    Xml { position: u64, message: String },
    MissingDefinitions,
    MissingProcess,
    MissingAttribute { tag: String, attribute: &'static str },
    InvalidId { tag: String, value: String, reason: IdError },
    DuplicateId { id: String },
}

impl fmt::Display for BpmnParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xml { position, message } => {
                write!(f, "malformed XML at byte {position}: {message}")
            }
            Self::MissingDefinitions => f.write_str("document has no bpmn:definitions root"),
            Self::MissingProcess => f.write_str("bpmn:definitions contains no bpmn:process"),
            Self::MissingAttribute { tag, attribute } => {
                write!(f, "<{tag}> is missing required attribute '{attribute}'")
            }
            Self::InvalidId { tag, value, reason } => {
                write!(f, "<{tag}> has invalid id {value:?}: {reason}")
            }
            Self::DuplicateId { id } => write!(f, "duplicate element id '{id}'"),
        }
    }
}

impl std::error::Error for BpmnParseError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Model,
    Interchange,
    Bounds,
    Foreign,
}

impl Scope {
    fn of(ns: &ResolveResult<'_>) -> Self {
        let ResolveResult::Bound(Namespace(uri)) = ns else {
            return Self::Foreign;
        };
        match *uri {
            uri if uri == BPMN_MODEL_NAMESPACE.as_bytes() => Self::Model,
            uri if uri == BPMN_DI_NAMESPACE.as_bytes() => Self::Interchange,
            uri if uri == DC_NAMESPACE.as_bytes() => Self::Bounds,
            _ => Self::Foreign,
        }
    }
}

fn is_xmlns_declaration(key: &[u8]) -> bool {
    key == b"xmlns" || key.starts_with(b"xmlns:")
}

#[derive(Debug, Default)]
struct ParseState {
    depth: usize,
    definitions_id: Option<String>,
    extra_namespaces: Vec<(String, String)>,
    process_depth: Option<usize>,
    process_seen: bool,
    diagram: Option<ProcessDiagram>,
    /// Foreign `xmlns` prefixes that clash with a prefix the exporter writes, as `(from, to)`.
    prefix_renames: Vec<(String, String)>,
    /// `(depth, bpmnElement)` of the open `bpmndi:BPMNShape`.
    shape: Option<(usize, String)>,
    positions: Vec<(String, Point)>,
}

impl ParseState {
    fn rename_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefix_renames
            .iter()
            .find(|(from, _)| from == prefix)
            .map(|(_, to)| to.as_str())
    }

    /// A free replacement for a foreign prefix the exporter reserves (`prob` -> `prob1`).
    fn free_prefix(&self, prefix: &str, declared: &[(String, String)]) -> String {
        let mut idx = 1usize;
        loop {
            let candidate = format!("{prefix}{idx}");
            let taken = is_reserved_prefix(&candidate)
                || declared.iter().any(|(taken, _)| *taken == candidate)
                || self.prefix_renames.iter().any(|(_, taken)| *taken == candidate);
            if !taken {
                return candidate;
            }
            idx += 1;
        }
    }
}

/// Parses a BPMN 2.0 document into a `ProcessDiagram`.
///
/// Only the first `bpmn:process` is read. Of the diagram interchange only shape bounds are kept,
/// as element positions; documentation and extension elements are not retained. Attributes in
/// the probability/time namespaces are matched by namespace URI, so any prefix works. Foreign
/// namespaces declared under a prefix the exporter writes itself are renamed.
pub fn parse_bpmn(input: &str) -> Result<ProcessDiagram, BpmnParseError> {
    let mut reader = NsReader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut state = ParseState::default();

    loop {
        let position = reader.buffer_position() as u64;
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|err| BpmnParseError::Xml { position, message: err.to_string() })?;
        let scope = Scope::of(&ns);

        match event {
            Event::Start(start) => {
                handle_open(&reader, &mut state, &start, scope)?;
                state.depth += 1;
            }
            Event::Empty(start) => {
                handle_open(&reader, &mut state, &start, scope)?;
                let depth = state.depth;
                handle_close(&mut state, depth);
            }
            Event::End(_) => {
                state.depth = state.depth.saturating_sub(1);
                let depth = state.depth;
                handle_close(&mut state, depth);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if state.definitions_id.is_none() {
        return Err(BpmnParseError::MissingDefinitions);
    }
    let mut diagram = state.diagram.ok_or(BpmnParseError::MissingProcess)?;

    for (element_id, point) in state.positions {
        match diagram.get_element_mut(&element_id) {
            Some(element) if !element.kind().is_connection() => element.set_position(Some(point)),
            _ => tracing::debug!(element = %element_id, "shape bounds for an unknown element ignored"),
        }
    }

    for flow in diagram.elements().filter(|element| element.kind().is_connection()) {
        for endpoint in [flow.source_ref(), flow.target_ref()].into_iter().flatten() {
            if !diagram.contains(endpoint.as_str()) {
                tracing::warn!(flow = %flow.id(), endpoint = %endpoint, "sequence flow references a missing element");
            }
        }
    }

    Ok(diagram)
}

fn handle_open(
    reader: &NsReader<&[u8]>,
    state: &mut ParseState,
    start: &BytesStart<'_>,
    scope: Scope,
) -> Result<(), BpmnParseError> {
    let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

    if state.depth == 0 {
        if !(scope == Scope::Model && local == "definitions") {
            return Err(BpmnParseError::MissingDefinitions);
        }
        let mut definitions_id = String::new();
        let mut declared = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| xml_error(reader, err))?;
            let key = attr.key.as_ref();
            let value = attr.unescape_value().map_err(|err| xml_error(reader, err))?.into_owned();
            if let Some(prefix) = key.strip_prefix(b"xmlns:") {
                if !is_builtin_namespace(&value) {
                    declared.push((String::from_utf8_lossy(prefix).into_owned(), value));
                }
            } else if key == b"id" {
                definitions_id = value;
            }
        }
        for (prefix, uri) in &declared {
            let prefix = if is_reserved_prefix(prefix) {
                let renamed = state.free_prefix(prefix, &declared);
                tracing::debug!(from = %prefix, to = %renamed, "foreign namespace prefix renamed");
                state.prefix_renames.push((prefix.clone(), renamed.clone()));
                renamed
            } else {
                prefix.clone()
            };
            state.extra_namespaces.push((prefix, uri.clone()));
        }
        state.definitions_id = Some(definitions_id);
        return Ok(());
    }

    match scope {
        Scope::Model => {}
        Scope::Interchange => {
            if local == "BPMNShape" {
                if let Some(element_id) = optional_attr(reader, start, "bpmnElement")? {
                    state.shape = Some((state.depth, element_id));
                }
            }
            return Ok(());
        }
        Scope::Bounds => {
            if local == "Bounds" {
                if let Some(element_id) = state.shape.as_ref().map(|(_, id)| id.clone()) {
                    let x = optional_attr(reader, start, "x")?;
                    let y = optional_attr(reader, start, "y")?;
                    if let (Some(x), Some(y)) = (x, y) {
                        let (Ok(x), Ok(y)) = (x.trim().parse::<f64>(), y.trim().parse::<f64>()) else {
                            tracing::debug!(element = %element_id, "non-numeric shape bounds ignored");
                            return Ok(());
                        };
                        state.positions.push((element_id, Point::new(x, y)));
                    }
                }
            }
            return Ok(());
        }
        Scope::Foreign => return Ok(()),
    }

    match state.process_depth {
        None if local == "process" && !state.process_seen && state.depth == 1 => {
            let id = required_attr(reader, start, &local, "id")?;
            let process_id = ProcessId::new(id.clone())
                .map_err(|reason| BpmnParseError::InvalidId { tag: local.clone(), value: id, reason })?;
            let mut diagram =
                ProcessDiagram::new(state.definitions_id.clone().unwrap_or_default(), process_id);
            for (prefix, uri) in state.extra_namespaces.drain(..) {
                diagram.push_extra_namespace(prefix, uri);
            }
            state.diagram = Some(diagram);
            state.process_depth = Some(state.depth);
            state.process_seen = true;
        }
        Some(process_depth) if state.depth == process_depth + 1 => {
            let element = read_element(reader, state, start, &local)?;
            let Some(diagram) = state.diagram.as_mut() else {
                return Ok(());
            };
            if diagram.contains(element.id().as_str()) {
                return Err(BpmnParseError::DuplicateId { id: element.id().to_string() });
            }
            diagram.insert_element(element);
        }
        _ => {}
    }

    Ok(())
}

fn handle_close(state: &mut ParseState, depth: usize) {
    if state.process_depth == Some(depth) {
        state.process_depth = None;
    }
    if state.shape.as_ref().is_some_and(|(shape_depth, _)| *shape_depth == depth) {
        state.shape = None;
    }
}

fn read_element(
    reader: &NsReader<&[u8]>,
    state: &ParseState,
    start: &BytesStart<'_>,
    local: &str,
) -> Result<DiagramElement, BpmnParseError> {
    let kind = ElementKind::from_tag(local);
    let id = parse_element_id(local, required_attr(reader, start, local, "id")?)?;

    let mut element = if kind.is_connection() {
        let source = parse_element_id(local, required_attr(reader, start, local, "sourceRef")?)?;
        let target = parse_element_id(local, required_attr(reader, start, local, "targetRef")?)?;
        DiagramElement::new_flow(id, source, target)
    } else {
        DiagramElement::new(id, kind)
    };

    for attr in start.attributes() {
        let attr = attr.map_err(|err| xml_error(reader, err))?;
        let raw_key = attr.key.as_ref();
        if is_xmlns_declaration(raw_key) {
            continue;
        }
        let value = attr.unescape_value().map_err(|err| xml_error(reader, err))?.into_owned();

        let (ns, attr_local) = reader.resolve_attribute(attr.key);
        match ns {
            ResolveResult::Bound(Namespace(uri)) => {
                let uri = String::from_utf8_lossy(uri).into_owned();
                if schema::is_schema_namespace(&uri) {
                    let local_name = String::from_utf8_lossy(attr_local.as_ref()).into_owned();
                    element.set_extension_attr(QualifiedName::new(uri, local_name), value);
                } else {
                    let key = String::from_utf8_lossy(raw_key);
                    let key = match key.split_once(':') {
                        Some((prefix, local_name)) => match state.rename_prefix(prefix) {
                            Some(renamed) => format!("{renamed}:{local_name}"),
                            None => key.into_owned(),
                        },
                        None => key.into_owned(),
                    };
                    element.push_passthrough_attr(key, value);
                }
            }
            _ => match raw_key {
                b"id" | b"sourceRef" | b"targetRef" => {}
                b"name" => element.set_name(Some(value)),
                _ => element.push_passthrough_attr(String::from_utf8_lossy(raw_key), value),
            },
        }
    }

    Ok(element)
}

fn optional_attr(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    attribute: &str,
) -> Result<Option<String>, BpmnParseError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|err| xml_error(reader, err))?;
        if attr.key.as_ref() == attribute.as_bytes() {
            let value = attr.unescape_value().map_err(|err| xml_error(reader, err))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attr(
    reader: &NsReader<&[u8]>,
    start: &BytesStart<'_>,
    tag: &str,
    attribute: &'static str,
) -> Result<String, BpmnParseError> {
    optional_attr(reader, start, attribute)?
        .ok_or_else(|| BpmnParseError::MissingAttribute { tag: tag.to_owned(), attribute })
}

fn parse_element_id(tag: &str, value: String) -> Result<ElementId, BpmnParseError> {
    ElementId::new(value.clone())
        .map_err(|reason| BpmnParseError::InvalidId { tag: tag.to_owned(), value, reason })
}

fn xml_error(reader: &NsReader<&[u8]>, err: impl fmt::Display) -> BpmnParseError {
    BpmnParseError::Xml { position: reader.buffer_position() as u64, message: err.to_string() }
}

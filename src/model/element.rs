// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use super::ids::ElementId;

/// The BPMN type tag of an element.
///
/// Only `SequenceFlow`, `ExclusiveGateway` and `Task` carry editable annotations; the remaining
/// variants exist so imported diagrams survive an export unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    SequenceFlow,
    ExclusiveGateway,
    ParallelGateway,
    Task,
    StartEvent,
    EndEvent,
    Other(String),
}

impl ElementKind {
    /// Maps a BPMN local tag name (`task`, `sequenceFlow`, ...) to a kind.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "sequenceFlow" => Self::SequenceFlow,
            "exclusiveGateway" => Self::ExclusiveGateway,
            "parallelGateway" => Self::ParallelGateway,
            "task" => Self::Task,
            "startEvent" => Self::StartEvent,
            "endEvent" => Self::EndEvent,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::SequenceFlow => "sequenceFlow",
            Self::ExclusiveGateway => "exclusiveGateway",
            Self::ParallelGateway => "parallelGateway",
            Self::Task => "task",
            Self::StartEvent => "startEvent",
            Self::EndEvent => "endEvent",
            Self::Other(tag) => tag,
        }
    }

    /// The `bpmn:`-qualified type name used by the editor surface (`bpmn:Task`, ...).
    pub fn type_name(&self) -> String {
        let tag = self.tag();
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => format!("bpmn:{}{}", first.to_ascii_uppercase(), chars.as_str()),
            None => "bpmn:".to_owned(),
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Self::SequenceFlow)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_name())
    }
}

/// A namespaced attribute name, independent of the prefix used in a particular document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    namespace: String,
    local_name: String,
}

impl QualifiedName {
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), local_name: local_name.into() }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }
}

/// Canvas position where a shape was placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiagramElement {
    id: ElementId,
    kind: ElementKind,
    name: Option<String>,
    source_ref: Option<ElementId>,
    target_ref: Option<ElementId>,
    extension_attrs: BTreeMap<QualifiedName, String>,
    passthrough_attrs: Vec<(String, String)>,
    position: Option<Point>,
}

impl DiagramElement {
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            name: None,
            source_ref: None,
            target_ref: None,
            extension_attrs: BTreeMap::new(),
            passthrough_attrs: Vec::new(),
            position: None,
        }
    }

    pub fn new_flow(id: ElementId, source_ref: ElementId, target_ref: ElementId) -> Self {
        let mut flow = Self::new(id, ElementKind::SequenceFlow);
        flow.source_ref = Some(source_ref);
        flow.target_ref = Some(target_ref);
        flow
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> &ElementId {
        &self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name<T: Into<String>>(&mut self, name: Option<T>) {
        self.name = name.map(Into::into);
    }

    pub fn source_ref(&self) -> Option<&ElementId> {
        self.source_ref.as_ref()
    }

    pub fn target_ref(&self) -> Option<&ElementId> {
        self.target_ref.as_ref()
    }

    pub fn set_endpoints(&mut self, source_ref: Option<ElementId>, target_ref: Option<ElementId>) {
        self.source_ref = source_ref;
        self.target_ref = target_ref;
    }

    pub fn extension_attr(&self, name: &QualifiedName) -> Option<&str> {
        self.extension_attrs.get(name).map(String::as_str)
    }

    pub fn extension_attrs(&self) -> &BTreeMap<QualifiedName, String> {
        &self.extension_attrs
    }

    pub fn set_extension_attr(&mut self, name: QualifiedName, value: impl Into<String>) {
        self.extension_attrs.insert(name, value.into());
    }

    /// Attributes outside the known namespaces, kept verbatim as `(qname, value)` pairs.
    pub fn passthrough_attrs(&self) -> &[(String, String)] {
        &self.passthrough_attrs
    }

    pub fn push_passthrough_attr(&mut self, qname: impl Into<String>, value: impl Into<String>) {
        self.passthrough_attrs.push((qname.into(), value.into()));
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn set_position(&mut self, position: Option<Point>) {
        self.position = position;
    }
}

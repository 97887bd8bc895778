// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::element::{DiagramElement, ElementKind};
use super::ids::{ElementId, ProcessId};

/// One open process diagram: a single `bpmn:process` plus its definitions envelope.
///
/// Elements keep document order, which is also the native order of a node's outgoing flows.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessDiagram {
    definitions_id: String,
    process_id: ProcessId,
    extra_namespaces: Vec<(String, String)>,
    elements: BTreeMap<ElementId, DiagramElement>,
    order: Vec<ElementId>,
    rev: u64,
    dirty: bool,
}

impl ProcessDiagram {
    pub fn new(definitions_id: impl Into<String>, process_id: ProcessId) -> Self {
        Self {
            definitions_id: definitions_id.into(),
            process_id,
            extra_namespaces: Vec::new(),
            elements: BTreeMap::new(),
            order: Vec::new(),
            rev: 0,
            dirty: false,
        }
    }

    pub fn definitions_id(&self) -> &str {
        &self.definitions_id
    }

    pub fn process_id(&self) -> &ProcessId {
        &self.process_id
    }

    /// `xmlns:<prefix>` declarations from an imported document that the exporter does not emit
    /// on its own, as `(prefix, uri)` pairs.
    pub fn extra_namespaces(&self) -> &[(String, String)] {
        &self.extra_namespaces
    }

    pub fn push_extra_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.extra_namespaces.push((prefix.into(), uri.into()));
    }

    pub fn get_element(&self, id: &str) -> Option<&DiagramElement> {
        self.elements.get(id)
    }

    pub fn get_element_mut(&mut self, id: &str) -> Option<&mut DiagramElement> {
        self.elements.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &DiagramElement> + '_ {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Inserts an element at the end of the document. Returns the displaced element when the id
    /// was already taken (its document position is kept).
    pub fn insert_element(&mut self, element: DiagramElement) -> Option<DiagramElement> {
        let id = element.id().clone();
        let previous = self.elements.insert(id.clone(), element);
        if previous.is_none() {
            self.order.push(id);
        }
        previous
    }

    pub fn remove_element(&mut self, id: &str) -> Option<DiagramElement> {
        let removed = self.elements.remove(id)?;
        self.order.retain(|existing| existing.as_str() != id);
        Some(removed)
    }

    /// Sequence flows leaving `id`, in native (document) order.
    pub fn outgoing(&self, id: &str) -> Vec<&DiagramElement> {
        self.elements()
            .filter(|element| {
                element.kind().is_connection()
                    && element.source_ref().is_some_and(|source| source.as_str() == id)
            })
            .collect()
    }

    /// Sequence flows entering `id`, in native (document) order.
    pub fn incoming(&self, id: &str) -> Vec<&DiagramElement> {
        self.elements()
            .filter(|element| {
                element.kind().is_connection()
                    && element.target_ref().is_some_and(|target| target.as_str() == id)
            })
            .collect()
    }

    /// The element a flow starts at, if both the flow and its source still exist.
    pub fn source_of(&self, flow_id: &str) -> Option<&DiagramElement> {
        let flow = self.get_element(flow_id)?;
        self.get_element(flow.source_ref()?.as_str())
    }

    /// Allocates a fresh id of the form `<Prefix>_<n>` for newly created shapes.
    pub fn allocate_id(&self, kind: &ElementKind) -> ElementId {
        let base = kind.type_name().trim_start_matches("bpmn:").to_owned();
        (1..)
            .map(|idx| format!("{base}_{idx}"))
            .find(|candidate| !self.elements.contains_key(candidate.as_str()))
            .and_then(|candidate| ElementId::new(candidate).ok())
            .unwrap_or_else(|| unreachable!("exhausted element id space"))
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn set_rev(&mut self, rev: u64) {
        self.rev = rev;
    }

    pub fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }

    /// Whether attribute writes happened since the last export.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

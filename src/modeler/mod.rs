// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram engine: owns the diagram, the current selection and the selection bus.
//!
//! Every structural or attribute change goes through `ops::apply_ops` at the current revision.

pub mod events;

use std::sync::Arc;

use crate::model::{DiagramElement, ElementId, ElementKind, Point, ProcessDiagram};
use crate::ops::{apply_ops, ApplyError, ApplyResult, Op, PropertyPatch};
use crate::palette::ShapeCreator;

pub use events::{SelectionBus, SelectionChanged, SelectionListener, Subscription};

/// Element read/write surface used when committing drafts.
pub trait DiagramEngine {
    fn get_element(&self, id: &str) -> Option<&DiagramElement>;

    /// Partial update: attributes not named in `patch` stay untouched.
    fn update_properties(
        &mut self,
        element_id: &ElementId,
        patch: PropertyPatch,
    ) -> Result<ApplyResult, ApplyError>;
}

#[derive(Debug)]
pub struct Modeler {
    diagram: ProcessDiagram,
    selection: Vec<ElementId>,
    bus: SelectionBus,
}

impl Modeler {
    pub fn new(diagram: ProcessDiagram) -> Self {
        Self { diagram, selection: Vec::new(), bus: SelectionBus::new() }
    }

    pub fn diagram(&self) -> &ProcessDiagram {
        &self.diagram
    }

    pub fn get_element(&self, id: &str) -> Option<&DiagramElement> {
        self.diagram.get_element(id)
    }

    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    pub fn subscribe(&self, listener: Arc<dyn SelectionListener>) -> Subscription {
        self.bus.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.bus.listener_count()
    }

    /// Replaces the selection and notifies listeners synchronously.
    ///
    /// Ids that do not resolve are dropped, as are repeats. Listeners are notified even when the
    /// resulting selection equals the previous one.
    pub fn select<I, S>(&mut self, ids: I) -> &[ElementId]
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Vec::<ElementId>::new();
        for id in ids {
            let id = id.as_ref();
            match self.diagram.get_element(id) {
                Some(element) if !selection.contains(element.id()) => {
                    selection.push(element.id().clone())
                }
                Some(_) => {}
                None => tracing::debug!(element = id, "ignoring unknown id in selection"),
            }
        }
        self.selection = selection;
        self.emit_selection();
        &self.selection
    }

    /// Replaces the whole diagram (e.g. after an import). Clears the selection.
    pub fn replace_diagram(&mut self, diagram: ProcessDiagram) -> ProcessDiagram {
        let previous = std::mem::replace(&mut self.diagram, diagram);
        self.selection.clear();
        self.emit_selection();
        previous
    }

    /// Partial update of the named attributes on one element.
    pub fn update_properties(
        &mut self,
        element_id: &ElementId,
        patch: PropertyPatch,
    ) -> Result<ApplyResult, ApplyError> {
        self.apply(&[Op::UpdateProperties { element_id: element_id.clone(), patch }])
    }

    pub fn add_element(&mut self, element: DiagramElement) -> Result<ApplyResult, ApplyError> {
        self.apply(&[Op::AddElement { element }])
    }

    pub fn add_flow(
        &mut self,
        flow_id: ElementId,
        source_id: ElementId,
        target_id: ElementId,
        name: Option<String>,
    ) -> Result<ApplyResult, ApplyError> {
        self.apply(&[Op::AddFlow { flow_id, source_id, target_id, name }])
    }

    /// Removes an element (and, for nodes, every attached flow).
    ///
    /// Removed ids leave the selection; listeners are only notified when the selection changed.
    pub fn remove_element(&mut self, element_id: &ElementId) -> Result<ApplyResult, ApplyError> {
        self.apply(&[Op::RemoveElement { element_id: element_id.clone() }])
    }

    /// Applies a batch at the current revision.
    pub fn apply(&mut self, ops: &[Op]) -> Result<ApplyResult, ApplyError> {
        let rev = self.diagram.rev();
        let result = apply_ops(&mut self.diagram, rev, ops)?;
        if !result.delta.removed.is_empty() {
            let before = self.selection.len();
            self.selection.retain(|id| !result.delta.removed.contains(id));
            if self.selection.len() != before {
                self.emit_selection();
            }
        }
        Ok(result)
    }

    pub fn mark_saved(&mut self) {
        self.diagram.mark_clean();
    }

    fn emit_selection(&self) {
        let event = SelectionChanged { new_selection: self.selection.clone() };
        let notified = self.bus.emit(&self.diagram, &event);
        tracing::debug!(selected = event.new_selection.len(), notified, "selection changed");
    }
}

impl DiagramEngine for Modeler {
    fn get_element(&self, id: &str) -> Option<&DiagramElement> {
        Modeler::get_element(self, id)
    }

    fn update_properties(
        &mut self,
        element_id: &ElementId,
        patch: PropertyPatch,
    ) -> Result<ApplyResult, ApplyError> {
        Modeler::update_properties(self, element_id, patch)
    }
}

impl ShapeCreator for Modeler {
    fn start_create(&mut self, shape: ElementKind, at: Point) -> Result<ElementId, ApplyError> {
        let id = self.diagram.allocate_id(&shape);
        let mut element = DiagramElement::new(id.clone(), shape);
        element.set_position(Some(at));
        self.add_element(element)?;
        self.select([id.as_str()]);
        Ok(id)
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Selection classification and draft projection.

use crate::model::{DiagramElement, ElementId, ElementKind, ProcessDiagram};
use crate::schema::{self, AttributeName};

use super::draft::{Draft, DraftKind, DraftStore, FlowDraft, FlowEntry, GatewayDraft, TaskDraft};
use super::label::plain_name;
use super::validate::parse_integer;

/// A selection reduced to the one element kind the editor can work with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selected<'a> {
    Flow(&'a DiagramElement),
    Gateway(&'a DiagramElement),
    Task(&'a DiagramElement),
    Unrecognized,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Idle,
    Editing(DraftKind),
}

pub fn classify<'a>(diagram: &'a ProcessDiagram, selection: &[ElementId]) -> Selected<'a> {
    let [only] = selection else {
        return Selected::Unrecognized;
    };
    let Some(element) = diagram.get_element(only.as_str()) else {
        return Selected::Unrecognized;
    };
    match element.kind() {
        ElementKind::SequenceFlow => Selected::Flow(element),
        ElementKind::ExclusiveGateway => Selected::Gateway(element),
        ElementKind::Task => Selected::Task(element),
        _ => Selected::Unrecognized,
    }
}

/// A flow is editable when it leaves an exclusive gateway that branches (two or more outgoing).
pub fn is_editable_flow(diagram: &ProcessDiagram, flow: &DiagramElement) -> bool {
    diagram.source_of(flow.id().as_str()).is_some_and(|source| {
        source.kind() == &ElementKind::ExclusiveGateway
            && diagram.outgoing(source.id().as_str()).len() >= 2
    })
}

pub fn flow_draft(diagram: &ProcessDiagram, flow: &DiagramElement) -> FlowDraft {
    FlowDraft {
        id: flow.id().clone(),
        name: flow.name().unwrap_or_default().to_owned(),
        probability: schema::get(flow, AttributeName::Probability),
        editable: is_editable_flow(diagram, flow),
    }
}

pub fn gateway_draft(diagram: &ProcessDiagram, gateway: &DiagramElement) -> GatewayDraft {
    GatewayDraft {
        gateway_id: gateway.id().clone(),
        outgoing: diagram
            .outgoing(gateway.id().as_str())
            .into_iter()
            .map(|flow| FlowEntry {
                id: flow.id().clone(),
                name: plain_name(flow.name().unwrap_or_default()).to_owned(),
                probability: schema::get(flow, AttributeName::Probability),
            })
            .collect(),
    }
}

pub fn task_draft(task: &DiagramElement) -> TaskDraft {
    TaskDraft::new(
        task.id().clone(),
        plain_name(task.name().unwrap_or_default()),
        parse_integer(&schema::get(task, AttributeName::TimeMin)),
        parse_integer(&schema::get(task, AttributeName::TimeMax)),
    )
}

pub fn build_draft(diagram: &ProcessDiagram, selected: Selected<'_>) -> Option<Draft> {
    match selected {
        Selected::Flow(flow) => Some(Draft::Flow(flow_draft(diagram, flow))),
        Selected::Gateway(gateway) => Some(Draft::Gateway(gateway_draft(diagram, gateway))),
        Selected::Task(task) => Some(Draft::Task(task_draft(task))),
        Selected::Unrecognized => None,
    }
}

/// Idle / Editing state machine driven by selection notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionObserver {
    state: SelectionState,
}

impl SelectionObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Handles one notification. The previous draft is always discarded.
    pub fn observe(
        &mut self,
        diagram: &ProcessDiagram,
        selection: &[ElementId],
        store: &mut DraftStore,
    ) -> SelectionState {
        match build_draft(diagram, classify(diagram, selection)) {
            Some(draft) => {
                let kind = draft.kind();
                tracing::debug!(element = %draft.element_id(), kind = kind.as_str(), "draft opened");
                store.replace(draft);
                self.state = SelectionState::Editing(kind);
            }
            None => {
                if store.clear().is_some() {
                    tracing::debug!(selected = selection.len(), "draft cleared");
                }
                self.state = SelectionState::Idle;
            }
        }
        self.state
    }

    /// Returns to Idle and drops the draft.
    pub fn close(&mut self, store: &mut DraftStore) {
        store.clear();
        self.state = SelectionState::Idle;
    }
}

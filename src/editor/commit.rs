// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Writes drafts back onto the diagram.
//!
//! Commits are best effort per element: an id that no longer resolves is skipped and reported,
//! the remaining elements are still written. Re-running a commit with the same draft yields the
//! same element state.

use std::fmt;

use crate::model::{ElementId, ElementKind};
use crate::modeler::DiagramEngine;
use crate::ops::PropertyPatch;

use super::draft::{Draft, FlowDraft, GatewayDraft, TaskDraft};
use super::label::{flow_label, task_label};
use super::validate::{validate_gateway, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    Applied,
    Skipped,
}

impl CommitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitItem {
    pub element_id: ElementId,
    pub status: CommitStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub items: Vec<CommitItem>,
    /// Whether the draft was closed as part of the commit.
    pub closed: bool,
}

impl CommitReport {
    pub fn applied(&self) -> impl Iterator<Item = &ElementId> + '_ {
        self.with_status(CommitStatus::Applied)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &ElementId> + '_ {
        self.with_status(CommitStatus::Skipped)
    }

    fn with_status(&self, status: CommitStatus) -> impl Iterator<Item = &ElementId> + '_ {
        self.items.iter().filter(move |item| item.status == status).map(|item| &item.element_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CommitError {
    NoDraft,
    ReadOnly { flow_id: ElementId },
    Invalid { verdict: Verdict },
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDraft => f.write_str("no draft is open"),
            Self::ReadOnly { flow_id } => write!(
                f,
                "flow {flow_id} does not leave a branching exclusive gateway and is read-only"
            ),
            Self::Invalid { verdict } => match &verdict.reason {
                Some(reason) => f.write_str(reason),
                None => f.write_str("draft is not valid"),
            },
        }
    }
}

impl std::error::Error for CommitError {}

/// Writes one element; a missing element or a rejected patch becomes a skipped item.
fn write_element(
    engine: &mut impl DiagramEngine,
    element_id: &ElementId,
    expected: &ElementKind,
    patch: PropertyPatch,
) -> CommitItem {
    let found = engine.get_element(element_id.as_str()).map(|element| element.kind().clone());
    let status = match found {
        None => {
            tracing::warn!(element = %element_id, "skipping commit for element that no longer exists");
            CommitStatus::Skipped
        }
        Some(kind) if &kind != expected => {
            tracing::warn!(element = %element_id, kind = %kind, "skipping commit for element of unexpected kind");
            CommitStatus::Skipped
        }
        Some(_) => match engine.update_properties(element_id, patch) {
            Ok(_) => CommitStatus::Applied,
            Err(err) => {
                tracing::warn!(element = %element_id, error = %err, "skipping rejected commit");
                CommitStatus::Skipped
            }
        },
    };
    CommitItem { element_id: element_id.clone(), status }
}

/// Writes the flow's plain name and probability. Read-only flows are refused.
pub fn commit_flow(
    engine: &mut impl DiagramEngine,
    draft: &FlowDraft,
) -> Result<CommitReport, CommitError> {
    if !draft.editable {
        return Err(CommitError::ReadOnly { flow_id: draft.id.clone() });
    }
    let patch = PropertyPatch {
        name: Some(draft.name.clone()),
        probability: Some(draft.probability.clone()),
        ..PropertyPatch::default()
    };
    let item = write_element(engine, &draft.id, &ElementKind::SequenceFlow, patch);
    Ok(CommitReport { items: vec![item], closed: false })
}

/// Writes every outgoing entry as `"<name>: <probability>"` plus its probability.
///
/// Nothing is written unless the probabilities sum to exactly 1. The draft stays open.
pub fn commit_gateway(
    engine: &mut impl DiagramEngine,
    draft: &GatewayDraft,
) -> Result<CommitReport, CommitError> {
    let verdict = validate_gateway(draft);
    if !verdict.valid {
        return Err(CommitError::Invalid { verdict });
    }

    let items = draft
        .outgoing
        .iter()
        .map(|entry| {
            let patch = PropertyPatch {
                name: Some(flow_label(&entry.name, &entry.probability)),
                probability: Some(entry.probability.clone()),
                ..PropertyPatch::default()
            };
            write_element(engine, &entry.id, &ElementKind::SequenceFlow, patch)
        })
        .collect::<Vec<_>>();

    let report = CommitReport { items, closed: false };
    tracing::info!(
        gateway = %draft.gateway_id,
        applied = report.applied().count(),
        skipped = report.skipped().count(),
        "gateway draft committed"
    );
    Ok(report)
}

/// Writes the composite label and both times as integer strings. Closes the draft when the
/// task was written.
pub fn commit_task(
    engine: &mut impl DiagramEngine,
    draft: &TaskDraft,
) -> Result<CommitReport, CommitError> {
    let (time_min, time_max) = (draft.min_minutes(), draft.max_minutes());
    let patch = PropertyPatch {
        name: Some(task_label(&draft.name, time_min, time_max)),
        time_min: Some(time_min.to_string()),
        time_max: Some(time_max.to_string()),
        ..PropertyPatch::default()
    };
    let item = write_element(engine, &draft.id, &ElementKind::Task, patch);
    let closed = item.status == CommitStatus::Applied;
    Ok(CommitReport { items: vec![item], closed })
}

pub fn commit(engine: &mut impl DiagramEngine, draft: &Draft) -> Result<CommitReport, CommitError> {
    match draft {
        Draft::Flow(flow) => commit_flow(engine, flow),
        Draft::Gateway(gateway) => commit_gateway(engine, gateway),
        Draft::Task(task) => commit_task(engine, task),
    }
}

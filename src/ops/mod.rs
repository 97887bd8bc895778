// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Mutation operations for process diagrams.
//!
//! This is the diagram engine's modification API. Operations are applied with optimistic
//! concurrency (revision checks), all-or-nothing per batch, and produce a minimal delta the
//! editor uses to refresh derived state.

use std::collections::HashSet;
use std::fmt;

use crate::model::{DiagramElement, ElementId, ElementKind, ProcessDiagram};
use crate::schema::{self, AttributeName};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    AddElement { element: DiagramElement },
    AddFlow { flow_id: ElementId, source_id: ElementId, target_id: ElementId, name: Option<String> },
    UpdateProperties { element_id: ElementId, patch: PropertyPatch },
    RemoveElement { element_id: ElementId },
}

/// Partial property update; `None` fields are left untouched.
///
/// `probability`, `time_min` and `time_max` are declared schema attributes and are written under
/// their namespaces. Setting one on an element kind that does not declare it is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyPatch {
    pub name: Option<String>,
    pub probability: Option<String>,
    pub time_min: Option<String>,
    pub time_max: Option<String>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.probability.is_none()
            && self.time_min.is_none()
            && self.time_max.is_none()
    }

    fn attributes(&self) -> impl Iterator<Item = (AttributeName, &str)> + '_ {
        [
            (AttributeName::Probability, self.probability.as_deref()),
            (AttributeName::TimeMin, self.time_min.as_deref()),
            (AttributeName::TimeMax, self.time_max.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyResult {
    pub new_rev: u64,
    pub applied: usize,
    pub delta: Delta,
}

/// Minimal delta describing which elements changed as the result of applying ops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Delta {
    pub added: Vec<ElementId>,
    pub removed: Vec<ElementId>,
    pub updated: Vec<ElementId>,
}

#[derive(Debug, Default)]
struct DeltaBuilder {
    added: HashSet<ElementId>,
    removed: HashSet<ElementId>,
    updated: HashSet<ElementId>,
}

impl DeltaBuilder {
    fn record_added(&mut self, element_id: ElementId) {
        self.removed.remove(&element_id);
        self.updated.remove(&element_id);
        self.added.insert(element_id);
    }

    fn record_removed(&mut self, element_id: ElementId) {
        // Added and removed within one batch cancels out.
        if self.added.remove(&element_id) {
            self.updated.remove(&element_id);
            return;
        }
        self.updated.remove(&element_id);
        self.removed.insert(element_id);
    }

    fn record_updated(&mut self, element_id: ElementId) {
        if self.added.contains(&element_id) || self.removed.contains(&element_id) {
            return;
        }
        self.updated.insert(element_id);
    }

    fn finish(self) -> Delta {
        let mut added = self.added.into_iter().collect::<Vec<_>>();
        let mut removed = self.removed.into_iter().collect::<Vec<_>>();
        let mut updated = self.updated.into_iter().collect::<Vec<_>>();

        added.sort();
        removed.sort();
        updated.sort();

        Delta { added, removed, updated }
    }
}

pub fn apply_ops(
    diagram: &mut ProcessDiagram,
    base_rev: u64,
    ops: &[Op],
) -> Result<ApplyResult, ApplyError> {
    let current_rev = diagram.rev();
    if base_rev != current_rev {
        return Err(ApplyError::Conflict { base_rev, current_rev });
    }

    if ops.is_empty() {
        return Ok(ApplyResult { new_rev: current_rev, applied: 0, delta: Delta::default() });
    }

    let mut next = diagram.clone();
    let mut delta = DeltaBuilder::default();

    for op in ops {
        apply_op(&mut next, op, &mut delta)?;
    }

    next.bump_rev();
    next.mark_dirty();
    *diagram = next;
    let new_rev = diagram.rev();

    Ok(ApplyResult { new_rev, applied: ops.len(), delta: delta.finish() })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    Conflict { base_rev: u64, current_rev: u64 },
    AlreadyExists { element_id: ElementId },
    NotFound { element_id: ElementId },
    MissingFlowEndpoint { node_id: ElementId },
    ConnectionNotAllowed { element_id: ElementId },
    NotApplicable { element_id: ElementId, kind: ElementKind, attribute: AttributeName },
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { base_rev, current_rev } => {
                write!(f, "stale base_rev (base_rev={base_rev}, current_rev={current_rev})")
            }
            Self::AlreadyExists { element_id } => {
                write!(f, "element already exists (id={element_id})")
            }
            Self::NotFound { element_id } => write!(f, "element not found (id={element_id})"),
            Self::MissingFlowEndpoint { node_id } => {
                write!(f, "flow endpoint not found (id={node_id})")
            }
            Self::ConnectionNotAllowed { element_id } => {
                write!(f, "sequence flows must be added with AddFlow (id={element_id})")
            }
            Self::NotApplicable { element_id, kind, attribute } => write!(
                f,
                "attribute '{attribute}' is not declared for {kind} (id={element_id})"
            ),
        }
    }
}

impl std::error::Error for ApplyError {}

// Extracted op-application implementation.
include!("ops_impl.rs");

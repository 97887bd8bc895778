// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Speculative edit records for the selected element.
//!
//! Drafts hold plain values copied out of the diagram. Nothing reaches the diagram until a
//! commit.

use std::fmt;
use std::str::FromStr;

use crate::model::ElementId;

use super::validate::parse_integer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftKind {
    Flow,
    Gateway,
    Task,
}

impl DraftKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flow => "flow",
            Self::Gateway => "gateway",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for DraftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowDraft {
    pub id: ElementId,
    pub name: String,
    pub probability: String,
    /// Only flows leaving a branching exclusive gateway accept edits.
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowEntry {
    pub id: ElementId,
    pub name: String,
    pub probability: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayDraft {
    pub gateway_id: ElementId,
    /// Outgoing flows in the diagram's native order.
    pub outgoing: Vec<FlowEntry>,
}

/// Task draft. Times are kept as entered; `min_minutes`/`max_minutes` interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub id: ElementId,
    pub name: String,
    pub time_min: String,
    pub time_max: String,
}

impl TaskDraft {
    pub fn new(id: ElementId, name: impl Into<String>, time_min: i64, time_max: i64) -> Self {
        Self { id, name: name.into(), time_min: time_min.to_string(), time_max: time_max.to_string() }
    }

    pub fn min_minutes(&self) -> i64 {
        parse_integer(&self.time_min)
    }

    pub fn max_minutes(&self) -> i64 {
        parse_integer(&self.time_max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Flow(FlowDraft),
    Gateway(GatewayDraft),
    Task(TaskDraft),
}

impl Draft {
    pub fn kind(&self) -> DraftKind {
        match self {
            Self::Flow(_) => DraftKind::Flow,
            Self::Gateway(_) => DraftKind::Gateway,
            Self::Task(_) => DraftKind::Task,
        }
    }

    /// The selected element this draft mirrors.
    pub fn element_id(&self) -> &ElementId {
        match self {
            Self::Flow(flow) => &flow.id,
            Self::Gateway(gateway) => &gateway.gateway_id,
            Self::Task(task) => &task.id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Probability,
    TimeMin,
    TimeMax,
}

impl DraftField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Probability => "probability",
            Self::TimeMin => "timeMin",
            Self::TimeMax => "timeMax",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DraftField {
    type Err = DraftError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "probability" => Ok(Self::Probability),
            "timeMin" => Ok(Self::TimeMin),
            "timeMax" => Ok(Self::TimeMax),
            other => Err(DraftError::UnknownField { field: other.to_owned() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    NoDraft,
    UnknownDraftId { draft_id: String },
    UnknownField { field: String },
    FieldNotApplicable { kind: DraftKind, field: DraftField },
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDraft => f.write_str("no draft is open"),
            Self::UnknownDraftId { draft_id } => {
                write!(f, "draft has no entry with id '{draft_id}'")
            }
            Self::UnknownField { field } => write!(f, "unknown draft field '{field}'"),
            Self::FieldNotApplicable { kind, field } => {
                write!(f, "field '{field}' does not apply to a {kind} draft")
            }
        }
    }
}

impl std::error::Error for DraftError {}

/// Holds at most one live draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftStore {
    draft: Option<Draft>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Installs `draft`, discarding the previous one unconditionally.
    pub fn replace(&mut self, draft: Draft) -> Option<Draft> {
        self.draft.replace(draft)
    }

    pub fn clear(&mut self) -> Option<Draft> {
        self.draft.take()
    }

    /// Replaces exactly one field, verbatim. No validation happens here.
    ///
    /// `draft_id` names the flow or task being edited; for a gateway draft it names one of the
    /// outgoing flow entries.
    pub fn set_field(
        &mut self,
        draft_id: &str,
        field: DraftField,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        let draft = self.draft.as_mut().ok_or(DraftError::NoDraft)?;
        let kind = draft.kind();
        let not_applicable = || DraftError::FieldNotApplicable { kind, field };
        let unknown_id = || DraftError::UnknownDraftId { draft_id: draft_id.to_owned() };

        let slot = match draft {
            Draft::Flow(flow) => {
                if flow.id.as_str() != draft_id {
                    return Err(unknown_id());
                }
                match field {
                    DraftField::Name => &mut flow.name,
                    DraftField::Probability => &mut flow.probability,
                    DraftField::TimeMin | DraftField::TimeMax => return Err(not_applicable()),
                }
            }
            Draft::Gateway(gateway) => {
                let entry = gateway
                    .outgoing
                    .iter_mut()
                    .find(|entry| entry.id.as_str() == draft_id)
                    .ok_or_else(unknown_id)?;
                match field {
                    DraftField::Name => &mut entry.name,
                    DraftField::Probability => &mut entry.probability,
                    DraftField::TimeMin | DraftField::TimeMax => return Err(not_applicable()),
                }
            }
            Draft::Task(task) => {
                if task.id.as_str() != draft_id {
                    return Err(unknown_id());
                }
                match field {
                    DraftField::Name => &mut task.name,
                    DraftField::TimeMin => &mut task.time_min,
                    DraftField::TimeMax => &mut task.time_max,
                    DraftField::Probability => return Err(not_applicable()),
                }
            }
        };
        *slot = value.into();
        Ok(())
    }
}

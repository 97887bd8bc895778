// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! BPMN 2.0 XML import/export for annotated process diagrams.

mod export;
mod import;

use std::collections::BTreeMap;

use crate::model::{ElementId, ElementKind, ProcessDiagram};
use crate::schema::{self, AttributeName};

pub use export::{export_bpmn, BpmnExportError};
pub use import::{parse_bpmn, BpmnParseError};

pub const BPMN_MODEL_NAMESPACE: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
pub const BPMN_TARGET_NAMESPACE: &str = "http://bpmn.io/schema/bpmn";
pub const BPMN_DI_NAMESPACE: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
pub const DC_NAMESPACE: &str = "http://www.omg.org/spec/DD/20100524/DC";

const BUILTIN_NAMESPACES: [&str; 5] = [
    BPMN_MODEL_NAMESPACE,
    BPMN_DI_NAMESPACE,
    DC_NAMESPACE,
    "http://www.omg.org/spec/DD/20100524/DI",
    "http://www.w3.org/2001/XMLSchema-instance",
];

/// Prefixes the exporter always declares.
const EXPORT_PREFIXES: [&str; 3] = ["bpmn", "bpmndi", "dc"];

/// Namespaces the exporter declares itself (or deliberately drops, for edge waypoints).
fn is_builtin_namespace(uri: &str) -> bool {
    BUILTIN_NAMESPACES.contains(&uri) || schema::is_schema_namespace(uri)
}

/// Prefixes a foreign namespace must not keep, since the exporter binds them.
fn is_reserved_prefix(prefix: &str) -> bool {
    EXPORT_PREFIXES.contains(&prefix)
        || schema::descriptors().iter().any(|descriptor| descriptor.prefix == prefix)
}

/// Probability annotation per sequence flow, as the downstream converter reads it.
///
/// Flows without a `prob:probability` attribute are omitted.
pub fn flow_probabilities(diagram: &ProcessDiagram) -> BTreeMap<ElementId, String> {
    diagram
        .elements()
        .filter(|element| element.kind() == &ElementKind::SequenceFlow)
        .filter_map(|flow| {
            let probability = schema::get(flow, AttributeName::Probability);
            (!probability.is_empty()).then(|| (flow.id().clone(), probability))
        })
        .collect()
}

/// `(timeMin, timeMax)` per task carrying both bounds.
pub fn task_durations(diagram: &ProcessDiagram) -> BTreeMap<ElementId, (String, String)> {
    diagram
        .elements()
        .filter(|element| element.kind() == &ElementKind::Task)
        .filter_map(|task| {
            let min = schema::get(task, AttributeName::TimeMin);
            let max = schema::get(task, AttributeName::TimeMax);
            (!min.is_empty() && !max.is_empty()).then(|| (task.id().clone(), (min, max)))
        })
        .collect()
}

#[cfg(test)]
mod tests;

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in process diagrams for `--demo` and tests.

use super::diagram::ProcessDiagram;
use super::element::{DiagramElement, ElementKind};
use super::ids::{ElementId, ProcessId};
use crate::schema::{self, AttributeName};

pub(crate) fn eid(value: &str) -> ElementId {
    ElementId::new(value).expect("element id")
}

fn node(id: &str, kind: ElementKind, name: &str) -> DiagramElement {
    DiagramElement::new(eid(id), kind).with_name(name)
}

fn flow(id: &str, source: &str, target: &str) -> DiagramElement {
    DiagramElement::new_flow(eid(id), eid(source), eid(target))
}

/// Review task feeding an exclusive gateway with two annotated branches:
///
/// `Start -> Review -> Decide -(A: 0.6)-> Approve -> End`
/// `                         -(B: 0.4)-> Reject  -> End`
pub fn branching_process() -> ProcessDiagram {
    let mut diagram =
        ProcessDiagram::new("Definitions_1", ProcessId::new("Process_1").expect("process id"));

    let mut review = node("Task_Review", ElementKind::Task, "Review");
    schema::set(&mut review, AttributeName::TimeMin, "5").expect("task declares timeMin");
    schema::set(&mut review, AttributeName::TimeMax, "10").expect("task declares timeMax");

    let mut flow_a = flow("Flow_A", "Gateway_1", "Task_A").with_name("A: 0.6");
    schema::set(&mut flow_a, AttributeName::Probability, "0.6").expect("flow declares probability");
    let mut flow_b = flow("Flow_B", "Gateway_1", "Task_B").with_name("B: 0.4");
    schema::set(&mut flow_b, AttributeName::Probability, "0.4").expect("flow declares probability");

    for element in [
        node("StartEvent_1", ElementKind::StartEvent, "Start"),
        review,
        node("Gateway_1", ElementKind::ExclusiveGateway, "Decide"),
        node("Task_A", ElementKind::Task, "Approve"),
        node("Task_B", ElementKind::Task, "Reject"),
        node("EndEvent_1", ElementKind::EndEvent, "End"),
        flow("Flow_start", "StartEvent_1", "Task_Review"),
        flow("Flow_review", "Task_Review", "Gateway_1"),
        flow_a,
        flow_b,
        flow("Flow_A_end", "Task_A", "EndEvent_1"),
        flow("Flow_B_end", "Task_B", "EndEvent_1"),
    ] {
        diagram.insert_element(element);
    }

    diagram
}

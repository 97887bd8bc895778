// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

// Shared deterministic benchmark fixtures (no RNG).

use probflow::model::{DiagramElement, ElementId, ElementKind, ProcessDiagram, ProcessId};
use probflow::schema::{self, AttributeName};

#[derive(Debug, Clone, Copy)]
pub enum Case {
    Small,
    Medium,
    Large,
}

impl Case {
    pub fn id(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Number of branches leaving the decision gateway.
    pub fn branches(self) -> usize {
        match self {
            Self::Small => 2,
            Self::Medium => 16,
            Self::Large => 128,
        }
    }
}

fn eid(value: String) -> ElementId {
    ElementId::new(value).expect("element id")
}

/// `Start -> Gateway_1 -> Task_i -> End` with one annotated branch per task.
///
/// Every branch carries `1 / branches`, so the gateway does not necessarily sum to exactly `1`.
pub fn wide_gateway(case: Case) -> ProcessDiagram {
    let branches = case.branches();
    let mut diagram = ProcessDiagram::new(
        "Definitions_bench",
        ProcessId::new(format!("Process_{}", case.id())).expect("process id"),
    );

    diagram.insert_element(
        DiagramElement::new(eid("StartEvent_1".to_owned()), ElementKind::StartEvent).with_name("Start"),
    );
    diagram.insert_element(
        DiagramElement::new(eid("Gateway_1".to_owned()), ElementKind::ExclusiveGateway)
            .with_name("Decide"),
    );
    diagram.insert_element(
        DiagramElement::new(eid("EndEvent_1".to_owned()), ElementKind::EndEvent).with_name("End"),
    );
    diagram.insert_element(DiagramElement::new_flow(
        eid("Flow_start".to_owned()),
        eid("StartEvent_1".to_owned()),
        eid("Gateway_1".to_owned()),
    ));

    let share = format!("{}", 1.0 / branches as f64);
    for idx in 0..branches {
        let mut task = DiagramElement::new(eid(format!("Task_{idx:04}")), ElementKind::Task)
            .with_name(format!("Step {idx}: \n {idx}-{} min", idx + 5));
        schema::set(&mut task, AttributeName::TimeMin, idx.to_string()).expect("timeMin");
        schema::set(&mut task, AttributeName::TimeMax, (idx + 5).to_string()).expect("timeMax");
        diagram.insert_element(task);

        let mut branch = DiagramElement::new_flow(
            eid(format!("Flow_{idx:04}")),
            eid("Gateway_1".to_owned()),
            eid(format!("Task_{idx:04}")),
        )
        .with_name(format!("Branch {idx}: {share}"));
        schema::set(&mut branch, AttributeName::Probability, share.clone()).expect("probability");
        diagram.insert_element(branch);

        diagram.insert_element(DiagramElement::new_flow(
            eid(format!("Flow_{idx:04}_end")),
            eid(format!("Task_{idx:04}")),
            eid("EndEvent_1".to_owned()),
        ));
    }

    diagram
}

/// Probabilities that sum to exactly `1` under left-to-right addition.
pub fn normalized_shares(branches: usize) -> Vec<String> {
    let mut shares = vec!["0".to_owned(); branches];
    if let Some(first) = shares.first_mut() {
        *first = "1".to_owned();
    }
    shares
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Path, PathBuf};

use probflow::editor::{DraftField, DraftKind, Editor, SelectionState, NORMALIZATION_MESSAGE};
use probflow::format::bpmn::{export_bpmn, flow_probabilities, parse_bpmn, task_durations};
use probflow::model::ProcessDiagram;
use probflow::modeler::Modeler;
use probflow::schema::{self, AttributeName};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn load_fixture(name: &str) -> ProcessDiagram {
    let path = fixtures_dir().join(name);
    let xml =
        fs::read_to_string(&path).unwrap_or_else(|err| panic!("failed to read {path:?}: {err}"));
    parse_bpmn(&xml).unwrap_or_else(|err| panic!("expected {name} to parse, got error: {err}"))
}

fn attr(diagram: &ProcessDiagram, id: &str, name: AttributeName) -> String {
    let element = diagram.get_element(id).unwrap_or_else(|| panic!("missing element {id}"));
    schema::get(element, name)
}

#[test]
fn order_process_fixture_loads_with_annotations() {
    let diagram = load_fixture("order_process.bpmn");

    assert_eq!(diagram.process_id().as_str(), "Process_order");
    assert_eq!(diagram.outgoing("Gateway_route").len(), 3);

    let probabilities = flow_probabilities(&diagram);
    assert_eq!(probabilities.len(), 3);
    assert_eq!(probabilities.get("Flow_ship").map(String::as_str), Some("0.7"));

    let durations = task_durations(&diagram);
    assert_eq!(durations.get("Task_check"), Some(&("2".to_owned(), "4".to_owned())));
}

#[test]
fn three_way_split_sums_left_to_right_with_exact_comparison() {
    let mut editor = Editor::mount(Modeler::new(load_fixture("order_process.bpmn")));
    assert_eq!(editor.select(["Gateway_route"]), SelectionState::Editing(DraftKind::Gateway));

    // 0.7 + 0.2 + 0.1 lands just below 1 in binary floating point.
    let verdict = editor.verdict().expect("gateway verdict");
    assert!(!verdict.valid);
    assert_eq!(verdict.reason.as_deref(), Some(NORMALIZATION_MESSAGE));
    assert!(!editor.can_commit());

    editor.set_field("Flow_ship", DraftField::Probability, "0.5").expect("edit ship");
    let verdict =
        editor.set_field("Flow_backorder", DraftField::Probability, "0.3").expect("edit backorder");
    assert!(!verdict.valid);
    let verdict =
        editor.set_field("Flow_cancel", DraftField::Probability, "0.2").expect("edit cancel");
    assert!(verdict.valid, "{verdict:?}");
    assert_eq!(verdict.total, Some(1.0));
}

#[test]
fn committed_gateway_and_task_survive_export_and_reimport() {
    let mut editor = Editor::mount(Modeler::new(load_fixture("order_process.bpmn")));

    editor.select(["Gateway_route"]);
    for (flow_id, probability) in [("Flow_ship", "0.5"), ("Flow_backorder", "0.3"), ("Flow_cancel", "0.2")] {
        editor.set_field(flow_id, DraftField::Probability, probability).expect("edit branch");
    }
    editor.set_field("Flow_cancel", DraftField::Name, "Abort").expect("rename branch");
    let report = editor.commit().expect("commit gateway");
    assert_eq!(report.applied().count(), 3);

    editor.select(["Task_check"]);
    editor.set_field("Task_check", DraftField::TimeMin, "3").expect("edit min");
    editor.set_field("Task_check", DraftField::TimeMax, "8").expect("edit max");
    let report = editor.commit().expect("commit task");
    assert!(report.closed);

    let xml = export_bpmn(editor.diagram()).expect("export");
    assert!(xml.contains(r#"camunda:assignee="warehouse""#), "{xml}");
    let reparsed = parse_bpmn(&xml).expect("reparse");

    assert_eq!(attr(&reparsed, "Flow_ship", AttributeName::Probability), "0.5");
    assert_eq!(attr(&reparsed, "Flow_backorder", AttributeName::Probability), "0.3");
    assert_eq!(attr(&reparsed, "Flow_cancel", AttributeName::Probability), "0.2");
    assert_eq!(
        reparsed.get_element("Flow_cancel").and_then(|flow| flow.name()),
        Some("Abort: 0.2")
    );
    assert_eq!(attr(&reparsed, "Task_check", AttributeName::TimeMin), "3");
    assert_eq!(attr(&reparsed, "Task_check", AttributeName::TimeMax), "8");
    assert_eq!(
        reparsed.get_element("Task_check").and_then(|task| task.name()),
        Some("Check stock: \n 3-8 min")
    );

    // Reopening the gateway after reimport shows plain names again.
    let mut reopened = Editor::mount(Modeler::new(reparsed));
    reopened.select(["Gateway_route"]);
    let Some(probflow::editor::Draft::Gateway(draft)) = reopened.draft() else {
        panic!("expected a gateway draft");
    };
    let names = draft.outgoing.iter().map(|entry| entry.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["In stock", "Partial", "Abort"]);
    assert!(reopened.can_commit());
}

#[test]
fn plain_flows_into_the_gateway_are_read_only() {
    let mut editor = Editor::mount(Modeler::new(load_fixture("order_process.bpmn")));
    editor.select(["Flow_1"]);

    let Some(probflow::editor::Draft::Flow(draft)) = editor.draft() else {
        panic!("expected a flow draft");
    };
    assert!(!draft.editable);
    assert!(!editor.can_commit());
    assert!(editor.commit().is_err());
}

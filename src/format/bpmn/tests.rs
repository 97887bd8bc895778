// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use rstest::rstest;

use super::*;
use crate::model::fixtures::{branching_process, eid};
use crate::model::Point;
use crate::ops::{apply_ops, Op, PropertyPatch};

const MODELER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:bpmndi="http://www.omg.org/spec/BPMN/20100524/DI" xmlns:dc="http://www.omg.org/spec/DD/20100524/DC" xmlns:prob="http://example.com/probability" xmlns:time="http://example.com/time" xmlns:camunda="http://camunda.org/schema/1.0/bpmn" id="Definitions_0abc" targetNamespace="http://bpmn.io/schema/bpmn">
  <bpmn:process id="Process_1" isExecutable="false">
    <bpmn:startEvent id="StartEvent_1">
      <bpmn:outgoing>Flow_0</bpmn:outgoing>
    </bpmn:startEvent>
    <bpmn:task id="Task_1" name="Review: &#10; 5-10 min" time:timeMin="5" time:timeMax="10">
      <bpmn:incoming>Flow_0</bpmn:incoming>
      <bpmn:outgoing>Flow_1</bpmn:outgoing>
    </bpmn:task>
    <bpmn:exclusiveGateway id="Gateway_1" default="Flow_A" camunda:asyncBefore="true" />
    <bpmn:sequenceFlow id="Flow_0" sourceRef="StartEvent_1" targetRef="Task_1" />
    <bpmn:sequenceFlow id="Flow_1" sourceRef="Task_1" targetRef="Gateway_1" />
    <bpmn:sequenceFlow id="Flow_A" name="A: 0.6" sourceRef="Gateway_1" targetRef="Task_1" prob:probability="0.6" />
    <bpmn:sequenceFlow id="Flow_B" name="B: 0.4" sourceRef="Gateway_1" targetRef="StartEvent_1" prob:probability="0.4" />
  </bpmn:process>
  <bpmndi:BPMNDiagram id="BPMNDiagram_1">
    <bpmndi:BPMNPlane id="BPMNPlane_1" bpmnElement="Process_1">
      <bpmndi:BPMNShape id="Task_1_di" bpmnElement="Task_1">
        <dc:Bounds x="160" y="80" width="100" height="80" />
      </bpmndi:BPMNShape>
    </bpmndi:BPMNPlane>
  </bpmndi:BPMNDiagram>
</bpmn:definitions>
"#;

#[test]
fn parses_modeler_output_with_namespaced_annotations() {
    let diagram = parse_bpmn(MODELER_XML).expect("parse");

    assert_eq!(diagram.definitions_id(), "Definitions_0abc");
    assert_eq!(diagram.process_id().as_str(), "Process_1");
    assert_eq!(diagram.len(), 7);

    let task = diagram.get_element("Task_1").expect("task");
    assert_eq!(task.kind(), &ElementKind::Task);
    assert_eq!(task.name(), Some("Review: \n 5-10 min"));
    assert_eq!(schema::get(task, AttributeName::TimeMin), "5");
    assert_eq!(schema::get(task, AttributeName::TimeMax), "10");

    let flow = diagram.get_element("Flow_A").expect("flow");
    assert_eq!(flow.source_ref().map(|id| id.as_str()), Some("Gateway_1"));
    assert_eq!(schema::get(flow, AttributeName::Probability), "0.6");

    let outgoing = diagram
        .outgoing("Gateway_1")
        .into_iter()
        .map(|flow| flow.id().as_str())
        .collect::<Vec<_>>();
    assert_eq!(outgoing, vec!["Flow_A", "Flow_B"]);
}

#[test]
fn unknown_attributes_and_namespaces_survive_export() {
    let diagram = parse_bpmn(MODELER_XML).expect("parse");
    let gateway = diagram.get_element("Gateway_1").expect("gateway");
    assert_eq!(
        gateway.passthrough_attrs(),
        &[
            ("default".to_owned(), "Flow_A".to_owned()),
            ("camunda:asyncBefore".to_owned(), "true".to_owned()),
        ]
    );

    let xml = export_bpmn(&diagram).expect("export");
    assert!(xml.contains(r#"xmlns:camunda="http://camunda.org/schema/1.0/bpmn""#), "{xml}");
    assert!(xml.contains(r#"camunda:asyncBefore="true""#), "{xml}");
    assert!(xml.contains(r#"bpmnElement="Task_1""#), "{xml}");
    assert!(xml.contains(r#"x="160" y="80" width="100" height="80""#), "{xml}");

    let reparsed = parse_bpmn(&xml).expect("reparse");
    assert_eq!(reparsed, diagram);
}

#[test]
fn declared_attributes_export_as_namespaced_attributes() {
    let xml = export_bpmn(&branching_process()).expect("export");

    assert!(xml.contains(r#"xmlns:prob="http://example.com/probability""#), "{xml}");
    assert!(xml.contains(r#"xmlns:time="http://example.com/time""#), "{xml}");
    assert!(xml.contains(r#"prob:probability="0.6""#), "{xml}");
    assert!(xml.contains(r#"time:timeMin="5""#), "{xml}");
    assert!(xml.contains(r#"time:timeMax="10""#), "{xml}");
    assert!(!xml.contains("<prob:"), "annotations must not be nested elements: {xml}");
}

#[test]
fn export_then_import_reproduces_the_diagram() {
    let diagram = branching_process();
    let xml = export_bpmn(&diagram).expect("export");
    let reparsed = parse_bpmn(&xml).expect("reparse");
    assert_eq!(reparsed, diagram);
}

#[rstest]
#[case("0.6")]
#[case(" 0.25 ")]
#[case("abc & <def>")]
#[case("\"quoted\" 'single'")]
#[case("")]
fn committed_attribute_strings_round_trip_exactly(#[case] value: &str) {
    let mut diagram = branching_process();
    apply_ops(
        &mut diagram,
        0,
        &[
            Op::UpdateProperties {
                element_id: eid("Flow_A"),
                patch: PropertyPatch { probability: Some(value.to_owned()), ..PropertyPatch::default() },
            },
            Op::UpdateProperties {
                element_id: eid("Task_Review"),
                patch: PropertyPatch {
                    name: Some(format!("Review: \n {value}")),
                    time_min: Some(value.to_owned()),
                    ..PropertyPatch::default()
                },
            },
        ],
    )
    .expect("apply");

    let reparsed = parse_bpmn(&export_bpmn(&diagram).expect("export")).expect("reparse");
    let flow = reparsed.get_element("Flow_A").expect("flow");
    assert_eq!(schema::get(flow, AttributeName::Probability), value);
    let task = reparsed.get_element("Task_Review").expect("task");
    assert_eq!(schema::get(task, AttributeName::TimeMin), value);
    assert_eq!(task.name(), Some(format!("Review: \n {value}").as_str()));
}

#[test]
fn annotations_are_recognized_by_namespace_not_prefix() {
    let xml = r#"<definitions xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:p="http://example.com/probability" id="D">
  <process id="P">
    <exclusiveGateway id="G" />
    <task id="T" />
    <sequenceFlow id="F" sourceRef="G" targetRef="T" p:probability="0.3" />
  </process>
</definitions>"#;

    let diagram = parse_bpmn(xml).expect("parse");
    let flow = diagram.get_element("F").expect("flow");
    assert_eq!(schema::get(flow, AttributeName::Probability), "0.3");

    let exported = export_bpmn(&diagram).expect("export");
    assert!(exported.contains(r#"prob:probability="0.3""#), "{exported}");
}

#[test]
fn shape_bounds_import_as_positions() {
    let diagram = parse_bpmn(MODELER_XML).expect("parse");
    assert_eq!(diagram.get_element("Task_1").and_then(|task| task.position()), Some(Point::new(160.0, 80.0)));
    assert_eq!(diagram.get_element("Gateway_1").and_then(|gateway| gateway.position()), None);
}

#[test]
fn placed_elements_keep_their_position_through_export() {
    let mut diagram = branching_process();
    for (id, point) in [("Gateway_1", Point::new(320.5, 95.0)), ("Task_Review", Point::new(40.0, 60.0))] {
        diagram.get_element_mut(id).expect("element").set_position(Some(point));
    }

    let xml = export_bpmn(&diagram).expect("export");
    assert!(xml.contains(r#"xmlns:bpmndi="http://www.omg.org/spec/BPMN/20100524/DI""#), "{xml}");
    assert!(xml.contains(r#"x="320.5" y="95" width="50" height="50""#), "{xml}");
    assert!(xml.contains(r#"x="40" y="60" width="100" height="80""#), "{xml}");

    let reparsed = parse_bpmn(&xml).expect("reparse");
    assert_eq!(reparsed, diagram);
}

#[test]
fn diagrams_without_positions_export_no_interchange() {
    let xml = export_bpmn(&branching_process()).expect("export");
    assert!(!xml.contains("<bpmndi:BPMNDiagram"), "{xml}");
}

#[test]
fn foreign_namespace_on_a_reserved_prefix_is_renamed() {
    let xml = r#"<definitions xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:p="http://example.com/probability" xmlns:prob="urn:other" id="D">
  <process id="P">
    <exclusiveGateway id="G" />
    <task id="T" prob:foo="x" />
    <sequenceFlow id="F" sourceRef="G" targetRef="T" p:probability="0.5" />
  </process>
</definitions>"#;

    let diagram = parse_bpmn(xml).expect("parse");
    assert_eq!(diagram.extra_namespaces(), &[("prob1".to_owned(), "urn:other".to_owned())]);
    let task = diagram.get_element("T").expect("task");
    assert_eq!(task.passthrough_attrs(), &[("prob1:foo".to_owned(), "x".to_owned())]);

    let exported = export_bpmn(&diagram).expect("export");
    assert_eq!(exported.matches("xmlns:prob=").count(), 1, "{exported}");
    assert!(exported.contains(r#"xmlns:prob1="urn:other""#), "{exported}");
    assert!(exported.contains(r#"prob1:foo="x""#), "{exported}");

    let reparsed = parse_bpmn(&exported).expect("reparse");
    assert_eq!(reparsed, diagram);
    let flow = reparsed.get_element("F").expect("flow");
    assert_eq!(schema::get(flow, AttributeName::Probability), "0.5");
}

#[test]
fn renamed_prefix_skips_names_already_declared() {
    let xml = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" xmlns:dc="urn:dublin-core" xmlns:dc1="urn:taken" id="D">
  <bpmn:process id="P">
    <bpmn:task id="T" dc:creator="ann" dc1:tag="a" />
  </bpmn:process>
</bpmn:definitions>"#;

    let diagram = parse_bpmn(xml).expect("parse");
    assert_eq!(
        diagram.extra_namespaces(),
        &[("dc2".to_owned(), "urn:dublin-core".to_owned()), ("dc1".to_owned(), "urn:taken".to_owned())]
    );
    let task = diagram.get_element("T").expect("task");
    assert_eq!(
        task.passthrough_attrs(),
        &[("dc2:creator".to_owned(), "ann".to_owned()), ("dc1:tag".to_owned(), "a".to_owned())]
    );
}

#[test]
fn summaries_list_annotated_flows_and_tasks() {
    let diagram = branching_process();

    let probabilities = flow_probabilities(&diagram);
    assert_eq!(probabilities.len(), 2);
    assert_eq!(probabilities.get("Flow_A").map(String::as_str), Some("0.6"));
    assert_eq!(probabilities.get("Flow_B").map(String::as_str), Some("0.4"));

    let durations = task_durations(&diagram);
    assert_eq!(durations.len(), 1);
    assert_eq!(durations.get("Task_Review"), Some(&("5".to_owned(), "10".to_owned())));
}

#[test]
fn rejects_documents_without_process() {
    let xml = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="D" />"#;
    assert_eq!(parse_bpmn(xml).unwrap_err(), BpmnParseError::MissingProcess);
}

#[test]
fn rejects_non_bpmn_root() {
    let xml = r#"<pnml><net id="n" /></pnml>"#;
    assert_eq!(parse_bpmn(xml).unwrap_err(), BpmnParseError::MissingDefinitions);
}

#[test]
fn rejects_flow_without_endpoints() {
    let xml = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="D">
  <bpmn:process id="P">
    <bpmn:sequenceFlow id="F" sourceRef="A" />
  </bpmn:process>
</bpmn:definitions>"#;
    assert_eq!(
        parse_bpmn(xml).unwrap_err(),
        BpmnParseError::MissingAttribute { tag: "sequenceFlow".to_owned(), attribute: "targetRef" }
    );
}

#[test]
fn rejects_duplicate_ids() {
    let xml = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="D">
  <bpmn:process id="P">
    <bpmn:task id="T" />
    <bpmn:task id="T" />
  </bpmn:process>
</bpmn:definitions>"#;
    assert_eq!(parse_bpmn(xml).unwrap_err(), BpmnParseError::DuplicateId { id: "T".to_owned() });
}

#[test]
fn malformed_xml_is_reported() {
    let xml = r#"<bpmn:definitions xmlns:bpmn="http://www.omg.org/spec/BPMN/20100524/MODEL" id="D"><bpmn:process id="P"></bpmn:definitions>"#;
    assert!(matches!(parse_bpmn(xml).unwrap_err(), BpmnParseError::Xml { .. }));
}

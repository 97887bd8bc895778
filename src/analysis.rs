// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Payloads for the downstream conversion and simulation services.
//!
//! The editor builds complete requests and hands them off without waiting for a response.
//! Transport lives outside this crate.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::format::bpmn::{export_bpmn, BpmnExportError};
use crate::model::ProcessDiagram;

pub const CONVERT_ENDPOINT: &str = "/convert_bpmn_to_pnml";
pub const SIMULATE_ENDPOINT: &str = "/convert_pnml_to_webppl";

pub const DEFAULT_SAMPLE_COUNT: u32 = 10;
pub const DEFAULT_STEP_COUNT: u32 = 10;

/// Export request: the annotated diagram as BPMN XML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub bpmn_xml: String,
}

impl ConvertRequest {
    pub fn from_diagram(diagram: &ProcessDiagram) -> Result<Self, AnalysisError> {
        let bpmn_xml = export_bpmn(diagram).map_err(AnalysisError::Export)?;
        Ok(Self { bpmn_xml })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    pub sample_count: u32,
    pub step_count: u32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self { sample_count: DEFAULT_SAMPLE_COUNT, step_count: DEFAULT_STEP_COUNT }
    }
}

/// Simulation request over a previously converted net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimulateRequest {
    pub pnml_xml: String,
    #[serde(flatten)]
    pub params: SimulationParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisRequest {
    Convert(ConvertRequest),
    Simulate(SimulateRequest),
}

impl AnalysisRequest {
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Convert(_) => CONVERT_ENDPOINT,
            Self::Simulate(_) => SIMULATE_ENDPOINT,
        }
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string(self).map_err(|err| AnalysisError::Payload { message: err.to_string() })
    }
}

/// One simulation report row: how often a trace occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub trace: String,
    pub count: u64,
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_time: Option<f64>,
}

/// Parses a simulation report (`[{ trace, count, percentage, avgTime? }, ...]`).
pub fn parse_report(json: &str) -> Result<Vec<ReportRow>, AnalysisError> {
    serde_json::from_str(json).map_err(|err| AnalysisError::Payload { message: err.to_string() })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    Export(BpmnExportError),
    Payload { message: String },
    Closed,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Export(err) => write!(f, "cannot serialize diagram: {err}"),
            Self::Payload { message } => write!(f, "invalid analysis payload: {message}"),
            Self::Closed => f.write_str("analysis handoff is closed"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Export(err) => Some(err),
            _ => None,
        }
    }
}

/// Fire-and-forget submission of fully built requests.
pub trait Handoff: Send + Sync {
    fn submit(&self, request: AnalysisRequest) -> Result<(), AnalysisError>;
}

/// Hands requests to whatever task drains the paired receiver.
#[derive(Debug, Clone)]
pub struct ChannelHandoff {
    tx: mpsc::UnboundedSender<AnalysisRequest>,
}

impl ChannelHandoff {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AnalysisRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Handoff for ChannelHandoff {
    fn submit(&self, request: AnalysisRequest) -> Result<(), AnalysisError> {
        let endpoint = request.endpoint();
        self.tx.send(request).map_err(|_| AnalysisError::Closed)?;
        tracing::info!(endpoint, "analysis request handed off");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::bpmn::parse_bpmn;
    use crate::model::fixtures::branching_process;

    #[test]
    fn convert_request_carries_exported_xml_as_bpmn_xml() {
        let request = ConvertRequest::from_diagram(&branching_process()).expect("request");
        let json = serde_json::to_value(&request).expect("json");
        let xml = json["bpmnXml"].as_str().expect("bpmnXml field");
        assert!(xml.contains(r#"prob:probability="0.6""#));
        assert_eq!(parse_bpmn(xml).expect("reparse"), branching_process());
    }

    #[test]
    fn simulate_request_flattens_params() {
        let request = AnalysisRequest::Simulate(SimulateRequest {
            pnml_xml: "<pnml/>".to_owned(),
            params: SimulationParams::default(),
        });
        assert_eq!(request.endpoint(), SIMULATE_ENDPOINT);
        let json: serde_json::Value =
            serde_json::from_str(&request.to_json().expect("json")).expect("value");
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "simulate",
                "pnmlXml": "<pnml/>",
                "sampleCount": 10,
                "stepCount": 10,
            })
        );
    }

    #[test]
    fn report_rows_parse_with_optional_average_time() {
        let rows = parse_report(
            r#"[
                {"trace": "Start,Review,Approve,End", "count": 6, "percentage": 60.0, "avgTime": 12.5},
                {"trace": "Start,Review,Reject,End", "count": 4, "percentage": 40.0}
            ]"#,
        )
        .expect("report");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].avg_time, Some(12.5));
        assert_eq!(rows[1].count, 4);
        assert_eq!(rows[1].avg_time, None);

        assert!(matches!(parse_report("{}"), Err(AnalysisError::Payload { .. })));
    }

    #[tokio::test]
    async fn channel_handoff_delivers_without_waiting() {
        let (handoff, mut rx) = ChannelHandoff::channel();
        let request = AnalysisRequest::Convert(ConvertRequest { bpmn_xml: "<x/>".to_owned() });
        handoff.submit(request.clone()).expect("submit");
        assert_eq!(rx.recv().await, Some(request));

        drop(rx);
        assert_eq!(
            handoff.submit(AnalysisRequest::Convert(ConvertRequest { bpmn_xml: String::new() })),
            Err(AnalysisError::Closed)
        );
    }
}

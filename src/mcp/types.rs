// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpElement {
    pub element_id: String,
    /// `bpmn:`-qualified type, e.g. `bpmn:SequenceFlow`.
    pub kind: String,
    pub name: Option<String>,
    pub source_ref: Option<String>,
    pub target_ref: Option<String>,
    /// Declared annotations by local name (`probability`, `timeMin`, `timeMax`).
    pub attributes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramReadResponse {
    pub definitions_id: String,
    pub process_id: String,
    pub rev: u64,
    pub dirty: bool,
    pub elements: Vec<McpElement>,
    pub selection: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramExportResponse {
    pub rev: u64,
    pub bpmn_xml: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DiagramImportParams {
    pub bpmn_xml: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiagramImportResponse {
    pub process_id: String,
    pub elements: u64,
    /// Sequence flow id → `prob:probability`.
    pub probabilities: BTreeMap<String, String>,
    /// Task id → `[timeMin, timeMax]`.
    pub durations: BTreeMap<String, [String; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    #[default]
    Replace,
    Add,
    Remove,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectionReadResponse {
    pub element_ids: Vec<String>,
    /// `idle`, `flow`, `gateway` or `task`.
    pub state: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SelectionUpdateParams {
    pub element_ids: Vec<String>,
    #[serde(default)]
    pub mode: UpdateMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SelectionUpdateResponse {
    pub applied: Vec<String>,
    pub ignored: Vec<String>,
    pub element_ids: Vec<String>,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct McpFlowEntry {
    pub element_id: String,
    pub name: String,
    pub probability: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum McpDraft {
    Flow { element_id: String, name: String, probability: String, editable: bool },
    Gateway { gateway_id: String, outgoing: Vec<McpFlowEntry> },
    Task { element_id: String, name: String, time_min: String, time_max: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct McpVerdict {
    pub valid: bool,
    pub total: Option<f64>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DraftReadResponse {
    pub state: String,
    pub draft: Option<McpDraft>,
    pub verdict: Option<McpVerdict>,
    pub can_commit: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DraftSetFieldParams {
    /// Flow or task id; for gateway drafts, the id of one outgoing flow.
    pub draft_id: String,
    /// `name`, `probability`, `timeMin` or `timeMax`.
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DraftSetFieldResponse {
    pub draft: Option<McpDraft>,
    pub verdict: McpVerdict,
    pub can_commit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpCommitItem {
    pub element_id: String,
    /// `applied` or `skipped`.
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DraftCommitResponse {
    pub items: Vec<McpCommitItem>,
    pub closed: bool,
    pub rev: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct McpPaletteEntry {
    pub key: String,
    pub group: String,
    pub icon_class: String,
    pub title: String,
    pub shape: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaletteListResponse {
    pub provider: String,
    pub entries: Vec<McpPaletteEntry>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PaletteTriggerParams {
    pub key: String,
    /// `click` (default) or `dragstart`.
    pub action: Option<String>,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PaletteTriggerResponse {
    pub element_id: String,
    pub rev: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    #[default]
    Convert,
    Simulate,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalysisSubmitParams {
    #[serde(default)]
    pub kind: AnalysisKind,
    /// Required for `simulate`.
    pub pnml_xml: Option<String>,
    pub sample_count: Option<u32>,
    pub step_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisSubmitResponse {
    pub endpoint: String,
    pub payload_bytes: u64,
}

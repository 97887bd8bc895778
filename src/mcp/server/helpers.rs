// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// MCP server helper functions:
/// element/draft/verdict mapping and error translation.
fn state_label(state: SelectionState) -> &'static str {
    match state {
        SelectionState::Idle => "idle",
        SelectionState::Editing(kind) => kind.as_str(),
    }
}

fn ids_to_strings(ids: &[ElementId]) -> Vec<String> {
    ids.iter().map(|id| id.as_str().to_owned()).collect()
}

fn element_to_mcp(element: &DiagramElement) -> McpElement {
    McpElement {
        element_id: element.id().as_str().to_owned(),
        kind: element.kind().type_name(),
        name: element.name().map(str::to_owned),
        source_ref: element.source_ref().map(|id| id.as_str().to_owned()),
        target_ref: element.target_ref().map(|id| id.as_str().to_owned()),
        attributes: element
            .extension_attrs()
            .iter()
            .map(|(name, value)| (name.local_name().to_owned(), value.clone()))
            .collect(),
    }
}

fn draft_to_mcp(draft: &Draft) -> McpDraft {
    match draft {
        Draft::Flow(flow) => McpDraft::Flow {
            element_id: flow.id.as_str().to_owned(),
            name: flow.name.clone(),
            probability: flow.probability.clone(),
            editable: flow.editable,
        },
        Draft::Gateway(gateway) => McpDraft::Gateway {
            gateway_id: gateway.gateway_id.as_str().to_owned(),
            outgoing: gateway
                .outgoing
                .iter()
                .map(|entry| McpFlowEntry {
                    element_id: entry.id.as_str().to_owned(),
                    name: entry.name.clone(),
                    probability: entry.probability.clone(),
                })
                .collect(),
        },
        Draft::Task(task) => McpDraft::Task {
            element_id: task.id.as_str().to_owned(),
            name: task.name.clone(),
            time_min: task.time_min.clone(),
            time_max: task.time_max.clone(),
        },
    }
}

fn verdict_to_mcp(verdict: &Verdict) -> McpVerdict {
    McpVerdict { valid: verdict.valid, total: verdict.total, reason: verdict.reason.clone() }
}

fn commit_report_to_mcp(report: &CommitReport, rev: u64) -> DraftCommitResponse {
    DraftCommitResponse {
        items: report
            .items
            .iter()
            .map(|item| McpCommitItem {
                element_id: item.element_id.as_str().to_owned(),
                status: item.status.as_str().to_owned(),
            })
            .collect(),
        closed: report.closed,
        rev,
    }
}

fn map_draft_error(err: DraftError) -> ErrorData {
    match err {
        DraftError::NoDraft => ErrorData::invalid_request("no draft is open", None),
        DraftError::UnknownDraftId { draft_id } => ErrorData::resource_not_found(
            "draft entry not found",
            Some(serde_json::json!({ "draft_id": draft_id })),
        ),
        DraftError::UnknownField { field } => ErrorData::invalid_params(
            "unknown draft field",
            Some(serde_json::json!({ "field": field })),
        ),
        DraftError::FieldNotApplicable { kind, field } => ErrorData::invalid_params(
            "field does not apply to this draft",
            Some(serde_json::json!({ "kind": kind.as_str(), "field": field.as_str() })),
        ),
    }
}

fn map_commit_error(err: CommitError) -> ErrorData {
    match err {
        CommitError::NoDraft => ErrorData::invalid_request("no draft is open", None),
        CommitError::ReadOnly { flow_id } => ErrorData::invalid_request(
            "flow is read-only; only branches of an exclusive gateway accept edits",
            Some(serde_json::json!({ "flow_id": flow_id.as_str() })),
        ),
        CommitError::Invalid { verdict } => ErrorData::invalid_request(
            verdict.reason.clone().unwrap_or_else(|| "draft is invalid".to_owned()),
            Some(serde_json::json!({ "total": verdict.total })),
        ),
    }
}

fn map_apply_error(err: ApplyError) -> ErrorData {
    match err {
        ApplyError::Conflict { base_rev, current_rev } => ErrorData::invalid_request(
            "conflict: stale base_rev",
            Some(serde_json::json!({ "base_rev": base_rev, "current_rev": current_rev })),
        ),
        ApplyError::AlreadyExists { element_id } => ErrorData::invalid_params(
            "element already exists",
            Some(serde_json::json!({ "element_id": element_id.as_str() })),
        ),
        ApplyError::NotFound { element_id } => ErrorData::resource_not_found(
            "element not found",
            Some(serde_json::json!({ "element_id": element_id.as_str() })),
        ),
        ApplyError::MissingFlowEndpoint { node_id } => ErrorData::resource_not_found(
            "flow endpoint not found",
            Some(serde_json::json!({ "node_id": node_id.as_str() })),
        ),
        ApplyError::ConnectionNotAllowed { element_id } => ErrorData::invalid_params(
            "sequence flows must be added with a source and target",
            Some(serde_json::json!({ "element_id": element_id.as_str() })),
        ),
        ApplyError::NotApplicable { element_id, kind, attribute } => ErrorData::invalid_params(
            "attribute does not apply to this element",
            Some(serde_json::json!({
                "element_id": element_id.as_str(),
                "kind": kind.type_name(),
                "attribute": attribute.as_str(),
            })),
        ),
    }
}

fn map_palette_error(err: PaletteError) -> ErrorData {
    match err {
        PaletteError::UnknownEntry { key } => ErrorData::resource_not_found(
            "palette entry not found",
            Some(serde_json::json!({ "key": key })),
        ),
        PaletteError::UnknownAction { action } => ErrorData::invalid_params(
            "unknown palette action",
            Some(serde_json::json!({ "action": action })),
        ),
        PaletteError::Create(err) => map_apply_error(err),
    }
}

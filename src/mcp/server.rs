// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::{Json, Parameters};
use rmcp::model::{ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler, ServiceExt};
use tokio::sync::Mutex;

use crate::analysis::{
    AnalysisRequest, ConvertRequest, Handoff, SimulateRequest, SimulationParams,
};
use crate::editor::{
    CommitError, CommitReport, Draft, DraftError, DraftField, Editor, SelectionState, Verdict,
};
use crate::format::bpmn::{export_bpmn, flow_probabilities, parse_bpmn, task_durations};
use crate::model::{DiagramElement, ElementId, ProcessDiagram};
use crate::modeler::Modeler;
use crate::ops::ApplyError;
use crate::palette::{PaletteAction, PaletteError, PaletteEvent};

use super::types::*;

#[derive(Debug)]
struct McpState {
    editor: Editor,
}

#[derive(Clone)]
pub struct ProbflowMcp {
    state: Arc<Mutex<McpState>>,
    handoff: Option<Arc<dyn Handoff>>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl ProbflowMcp {
    pub fn new(diagram: ProcessDiagram) -> Self {
        Self {
            state: Arc::new(Mutex::new(McpState { editor: Editor::mount(Modeler::new(diagram)) })),
            handoff: None,
            tool_router: Self::tool_router(),
        }
    }

    pub fn with_handoff(mut self, handoff: Arc<dyn Handoff>) -> Self {
        self.handoff = Some(handoff);
        self
    }

    pub async fn serve_stdio(self) -> Result<(), rmcp::RmcpError> {
        let service = self.serve((tokio::io::stdin(), tokio::io::stdout())).await?;
        service.waiting().await?;
        Ok(())
    }

    /// Read the whole process (elements in document order, annotations, current selection);
    /// start here before `selection.update`.
    #[tool(name = "diagram.read")]
    async fn diagram_read(&self) -> Result<Json<DiagramReadResponse>, ErrorData> {
        let state = self.state.lock().await;
        let diagram = state.editor.diagram();
        Ok(Json(DiagramReadResponse {
            definitions_id: diagram.definitions_id().to_owned(),
            process_id: diagram.process_id().as_str().to_owned(),
            rev: diagram.rev(),
            dirty: diagram.is_dirty(),
            elements: diagram.elements().map(element_to_mcp).collect(),
            selection: ids_to_strings(state.editor.modeler().selection()),
        }))
    }

    /// Export the annotated process as BPMN 2.0 XML (probabilities and durations as namespaced
    /// attributes); marks the diagram saved.
    #[tool(name = "diagram.export_bpmn")]
    async fn diagram_export_bpmn(&self) -> Result<Json<DiagramExportResponse>, ErrorData> {
        let mut state = self.state.lock().await;
        let bpmn_xml = export_bpmn(state.editor.diagram()).map_err(|err| {
            ErrorData::internal_error(format!("cannot export BPMN: {err}"), None)
        })?;
        let modeler = state.editor.modeler_mut();
        modeler.mark_saved();
        Ok(Json(DiagramExportResponse { rev: modeler.diagram().rev(), bpmn_xml }))
    }

    /// Replace the open process with a BPMN 2.0 document; clears selection and any draft.
    #[tool(name = "diagram.import_bpmn")]
    async fn diagram_import_bpmn(
        &self,
        params: Parameters<DiagramImportParams>,
    ) -> Result<Json<DiagramImportResponse>, ErrorData> {
        let diagram = parse_bpmn(&params.0.bpmn_xml).map_err(|err| {
            ErrorData::invalid_params(
                format!("cannot parse BPMN: {err}"),
                Some(serde_json::json!({ "bytes": params.0.bpmn_xml.len() as u64 })),
            )
        })?;

        let response = DiagramImportResponse {
            process_id: diagram.process_id().as_str().to_owned(),
            elements: diagram.len() as u64,
            probabilities: flow_probabilities(&diagram)
                .into_iter()
                .map(|(id, probability)| (id.into_string(), probability))
                .collect(),
            durations: task_durations(&diagram)
                .into_iter()
                .map(|(id, (min, max))| (id.into_string(), [min, max]))
                .collect(),
        };

        let mut state = self.state.lock().await;
        state.editor.modeler_mut().replace_diagram(diagram);
        tracing::info!(process = %response.process_id, elements = response.elements, "diagram imported");
        Ok(Json(response))
    }

    /// Read the current selection and the editor state it produced.
    #[tool(name = "selection.read")]
    async fn selection_read(&self) -> Result<Json<SelectionReadResponse>, ErrorData> {
        let state = self.state.lock().await;
        Ok(Json(SelectionReadResponse {
            element_ids: ids_to_strings(state.editor.modeler().selection()),
            state: state_label(state.editor.state()).to_owned(),
        }))
    }

    /// Update the selection (`replace`/`add`/`remove`); a single flow, exclusive gateway or
    /// task opens a draft, anything else clears it. Follow with `draft.read`.
    #[tool(name = "selection.update")]
    async fn selection_update(
        &self,
        params: Parameters<SelectionUpdateParams>,
    ) -> Result<Json<SelectionUpdateResponse>, ErrorData> {
        let SelectionUpdateParams { element_ids, mode } = params.0;

        let mut state = self.state.lock().await;
        let mut applied = Vec::<String>::new();
        let mut ignored = Vec::<String>::new();
        for element_id in element_ids {
            let bucket =
                if state.editor.diagram().contains(&element_id) { &mut applied } else { &mut ignored };
            if !bucket.contains(&element_id) {
                bucket.push(element_id);
            }
        }

        let mut selection = ids_to_strings(state.editor.modeler().selection());
        match mode {
            UpdateMode::Replace => {
                selection = applied.clone();
            }
            UpdateMode::Add => {
                for element_id in &applied {
                    if !selection.contains(element_id) {
                        selection.push(element_id.clone());
                    }
                }
            }
            UpdateMode::Remove => selection.retain(|element_id| !applied.contains(element_id)),
        }

        let editor_state = state.editor.select(&selection);
        Ok(Json(SelectionUpdateResponse {
            applied,
            ignored,
            element_ids: ids_to_strings(state.editor.modeler().selection()),
            state: state_label(editor_state).to_owned(),
        }))
    }

    /// Read the live draft with its validation verdict and whether commit is enabled.
    #[tool(name = "draft.read")]
    async fn draft_read(&self) -> Result<Json<DraftReadResponse>, ErrorData> {
        let state = self.state.lock().await;
        let editor = &state.editor;
        Ok(Json(DraftReadResponse {
            state: state_label(editor.state()).to_owned(),
            draft: editor.draft().as_ref().map(draft_to_mcp),
            verdict: editor.verdict().as_ref().map(verdict_to_mcp),
            can_commit: editor.can_commit(),
        }))
    }

    /// Change one draft field (`name`, `probability`, `timeMin`, `timeMax`); values are kept
    /// verbatim and re-validated. Nothing is written to the diagram until `draft.commit`.
    #[tool(name = "draft.set_field")]
    async fn draft_set_field(
        &self,
        params: Parameters<DraftSetFieldParams>,
    ) -> Result<Json<DraftSetFieldResponse>, ErrorData> {
        let DraftSetFieldParams { draft_id, field, value } = params.0;
        let field = field.parse::<DraftField>().map_err(map_draft_error)?;

        let mut state = self.state.lock().await;
        let verdict =
            state.editor.set_field(&draft_id, field, value).map_err(map_draft_error)?;
        Ok(Json(DraftSetFieldResponse {
            draft: state.editor.draft().as_ref().map(draft_to_mcp),
            verdict: verdict_to_mcp(&verdict),
            can_commit: state.editor.can_commit(),
        }))
    }

    /// Commit the live draft; reports each written element as applied or skipped. Task drafts
    /// close after commit, gateway and flow drafts stay open.
    #[tool(name = "draft.commit")]
    async fn draft_commit(&self) -> Result<Json<DraftCommitResponse>, ErrorData> {
        let mut state = self.state.lock().await;
        let report = state.editor.commit().map_err(map_commit_error)?;
        Ok(Json(commit_report_to_mcp(&report, state.editor.diagram().rev())))
    }

    /// List the creation palette entries.
    #[tool(name = "palette.list")]
    async fn palette_list(&self) -> Result<Json<PaletteListResponse>, ErrorData> {
        let state = self.state.lock().await;
        let palette = state.editor.palette();
        let entries = palette
            .entries()
            .into_iter()
            .map(|(key, entry)| McpPaletteEntry {
                key: key.to_owned(),
                group: entry.group.to_owned(),
                icon_class: entry.icon_class.to_owned(),
                title: entry.title.to_owned(),
                shape: entry.shape.type_name(),
            })
            .collect();
        Ok(Json(PaletteListResponse { provider: palette.provider_name().to_owned(), entries }))
    }

    /// Trigger a palette entry (`click` or `dragstart`) at a canvas point; the new shape is
    /// created there and selected.
    #[tool(name = "palette.trigger")]
    async fn palette_trigger(
        &self,
        params: Parameters<PaletteTriggerParams>,
    ) -> Result<Json<PaletteTriggerResponse>, ErrorData> {
        let PaletteTriggerParams { key, action, x, y } = params.0;
        let action = match action.as_deref() {
            None => PaletteAction::Click,
            Some(raw) => raw.parse::<PaletteAction>().map_err(map_palette_error)?,
        };

        let mut state = self.state.lock().await;
        let element_id = state
            .editor
            .trigger_palette(&key, action, &PaletteEvent::at(x, y))
            .map_err(map_palette_error)?;
        Ok(Json(PaletteTriggerResponse {
            element_id: element_id.into_string(),
            rev: state.editor.diagram().rev(),
        }))
    }

    /// Hand the annotated diagram (`convert`) or a converted net (`simulate`) to the analysis
    /// services; returns once the request is queued.
    #[tool(name = "analysis.submit")]
    async fn analysis_submit(
        &self,
        params: Parameters<AnalysisSubmitParams>,
    ) -> Result<Json<AnalysisSubmitResponse>, ErrorData> {
        let Some(handoff) = self.handoff.as_ref() else {
            return Err(ErrorData::invalid_request("analysis handoff is not configured", None));
        };
        let AnalysisSubmitParams { kind, pnml_xml, sample_count, step_count } = params.0;

        let request = match kind {
            AnalysisKind::Convert => {
                let state = self.state.lock().await;
                let convert = ConvertRequest::from_diagram(state.editor.diagram()).map_err(|err| {
                    ErrorData::internal_error(format!("cannot build convert request: {err}"), None)
                })?;
                AnalysisRequest::Convert(convert)
            }
            AnalysisKind::Simulate => {
                let Some(pnml_xml) = pnml_xml else {
                    return Err(ErrorData::invalid_params(
                        "simulate requires pnml_xml",
                        Some(serde_json::json!({ "kind": "simulate" })),
                    ));
                };
                let defaults = SimulationParams::default();
                AnalysisRequest::Simulate(SimulateRequest {
                    pnml_xml,
                    params: SimulationParams {
                        sample_count: sample_count.unwrap_or(defaults.sample_count),
                        step_count: step_count.unwrap_or(defaults.step_count),
                    },
                })
            }
        };

        let payload = request.to_json().map_err(|err| {
            ErrorData::internal_error(format!("cannot encode analysis request: {err}"), None)
        })?;
        let endpoint = request.endpoint();
        handoff.submit(request).map_err(|err| {
            ErrorData::internal_error(
                format!("cannot hand off analysis request: {err}"),
                Some(serde_json::json!({ "endpoint": endpoint })),
            )
        })?;

        Ok(Json(AnalysisSubmitResponse {
            endpoint: endpoint.to_owned(),
            payload_bytes: payload.len() as u64,
        }))
    }
}

#[tool_handler]
impl ServerHandler for ProbflowMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Probflow process editor (tools: diagram.read, diagram.export_bpmn, diagram.import_bpmn, selection.read, selection.update, draft.read, draft.set_field, draft.commit, palette.list, palette.trigger, analysis.submit)"
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// Extracted mapping helpers for MCP tool handlers.
include!("server/helpers.rs");

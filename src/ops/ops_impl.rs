// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Per-op mutation helpers used by `apply_ops`.
/// Keeps `ops::mod` focused on public op types and orchestration.
fn apply_op(diagram: &mut ProcessDiagram, op: &Op, delta: &mut DeltaBuilder) -> Result<(), ApplyError> {
    match op {
        Op::AddElement { element } => {
            if element.kind().is_connection() {
                return Err(ApplyError::ConnectionNotAllowed { element_id: element.id().clone() });
            }
            if diagram.contains(element.id().as_str()) {
                return Err(ApplyError::AlreadyExists { element_id: element.id().clone() });
            }
            diagram.insert_element(element.clone());
            delta.record_added(element.id().clone());
            Ok(())
        }
        Op::AddFlow { flow_id, source_id, target_id, name } => {
            if diagram.contains(flow_id.as_str()) {
                return Err(ApplyError::AlreadyExists { element_id: flow_id.clone() });
            }
            for node_id in [source_id, target_id] {
                let is_node = diagram
                    .get_element(node_id.as_str())
                    .is_some_and(|node| !node.kind().is_connection());
                if !is_node {
                    return Err(ApplyError::MissingFlowEndpoint { node_id: node_id.clone() });
                }
            }
            let mut flow =
                DiagramElement::new_flow(flow_id.clone(), source_id.clone(), target_id.clone());
            flow.set_name(name.clone());
            diagram.insert_element(flow);
            delta.record_added(flow_id.clone());
            Ok(())
        }
        Op::UpdateProperties { element_id, patch } => {
            let Some(element) = diagram.get_element_mut(element_id.as_str()) else {
                return Err(ApplyError::NotFound { element_id: element_id.clone() });
            };

            if let Some(name) = &patch.name {
                element.set_name(Some(name.clone()));
            }
            for (attribute, value) in patch.attributes() {
                schema::set(element, attribute, value).map_err(|_| ApplyError::NotApplicable {
                    element_id: element_id.clone(),
                    kind: element.kind().clone(),
                    attribute,
                })?;
            }
            delta.record_updated(element_id.clone());
            Ok(())
        }
        Op::RemoveElement { element_id } => {
            let Some(removed) = diagram.remove_element(element_id.as_str()) else {
                return Err(ApplyError::NotFound { element_id: element_id.clone() });
            };

            if !removed.kind().is_connection() {
                let attached = diagram
                    .elements()
                    .filter(|element| {
                        element.kind().is_connection()
                            && (element.source_ref() == Some(element_id)
                                || element.target_ref() == Some(element_id))
                    })
                    .map(|flow| flow.id().clone())
                    .collect::<Vec<_>>();
                for flow_id in attached {
                    diagram.remove_element(flow_id.as_str());
                    delta.record_removed(flow_id);
                }
            }
            delta.record_removed(element_id.clone());
            Ok(())
        }
    }
}

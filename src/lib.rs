// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Probflow: probability- and duration-annotated BPMN editing (properties panel + palette + MCP).
//!
//! Selecting a sequence flow, exclusive gateway or task opens a draft; drafts are validated and
//! committed back into the diagram as namespaced BPMN attributes and composite labels.

pub mod analysis;
pub mod editor;
pub mod format;
pub mod mcp;
pub mod model;
pub mod modeler;
pub mod ops;
pub mod palette;
pub mod schema;

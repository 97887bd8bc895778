// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A process diagram holds typed elements (tasks, gateways, events, sequence flows) with their
//! native name and namespaced domain attributes.

pub mod diagram;
pub mod element;
pub mod fixtures;
pub mod ids;

pub use diagram::ProcessDiagram;
pub use element::{DiagramElement, ElementKind, Point, QualifiedName};
pub use ids::{ElementId, Id, IdError, ProcessId};

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Diagram format parsing/export.
//!
//! Currently this module covers BPMN 2.0 XML with the probability/time annotation namespaces.

pub mod bpmn;

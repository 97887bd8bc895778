// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Model Context Protocol (MCP) server surface.
//!
//! The MCP layer exposes the mounted editor to agents: reading and importing diagrams, driving the
//! selection, editing and committing drafts, the creation palette and analysis handoff.

mod server;
mod types;

pub use server::ProbflowMcp;

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Display-label codec.
//!
//! Committed labels carry data (`"A: 0.6"`, `"Review: \n 5-10 min"`) and the plain name is only
//! recoverable by splitting on the first `:`. Downstream consumers parse labels the same way, so
//! the format must not drift.

/// Composite label for an outgoing gateway flow.
pub fn flow_label(name: &str, probability: &str) -> String {
    format!("{name}: {probability}")
}

/// Composite label for a task with a duration range in minutes.
pub fn task_label(name: &str, time_min: i64, time_max: i64) -> String {
    format!("{name}: \n {time_min}-{time_max} min")
}

/// Plain name recovered from a (possibly composite) label: text before the first `:`, trimmed.
pub fn plain_name(label: &str) -> &str {
    label.split_once(':').map_or(label, |(head, _)| head).trim()
}

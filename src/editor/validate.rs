// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Probflow and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Draft validation. Pure functions over drafts; nothing here touches the diagram.

use super::draft::{Draft, GatewayDraft, TaskDraft};

pub const NORMALIZATION_MESSAGE: &str = "Total probability does not sum up to 1. Please adjust.";

/// Outcome of validating a draft.
///
/// `valid == false` disables commit. A valid verdict may still carry an advisory `reason`.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub valid: bool,
    /// Probability sum for gateway drafts.
    pub total: Option<f64>,
    pub reason: Option<String>,
}

impl Verdict {
    pub fn ok() -> Self {
        Self { valid: true, total: None, reason: None }
    }
}

/// Decimal interpretation of a probability field. Unparsable or non-finite text reads as `0`.
pub fn parse_decimal(value: &str) -> f64 {
    value.trim().parse::<f64>().ok().filter(|number| number.is_finite()).unwrap_or(0.0)
}

/// Base-10 integer interpretation of a time field.
///
/// Leading whitespace and an optional sign are accepted, then the longest run of digits;
/// anything after it is ignored (`"12min"` reads as `12`). No digits reads as `0`.
pub fn parse_integer(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).fold(0i64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
    });
    if negative {
        -digits
    } else {
        digits
    }
}

/// Gateway normalization: valid iff the outgoing probabilities sum to exactly `1`.
///
/// The sum is taken in outgoing order with no tolerance, so some decimal combinations that
/// add up to 1 on paper are rejected (`0.2 + 0.7 + 0.1`).
pub fn validate_gateway(draft: &GatewayDraft) -> Verdict {
    let total = draft.outgoing.iter().map(|entry| parse_decimal(&entry.probability)).sum::<f64>();
    let valid = total == 1.0;
    Verdict {
        valid,
        total: Some(total),
        reason: (!valid).then(|| NORMALIZATION_MESSAGE.to_owned()),
    }
}

/// Task range check. Always valid; an inverted range only produces an advisory reason.
pub fn validate_task(draft: &TaskDraft) -> Verdict {
    let (min, max) = (draft.min_minutes(), draft.max_minutes());
    Verdict {
        valid: true,
        total: None,
        reason: (min > max).then(|| format!("timeMin ({min}) exceeds timeMax ({max})")),
    }
}

pub fn validate(draft: &Draft) -> Verdict {
    match draft {
        Draft::Flow(_) => Verdict::ok(),
        Draft::Gateway(gateway) => validate_gateway(gateway),
        Draft::Task(task) => validate_task(task),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::editor::draft::FlowEntry;
    use crate::model::fixtures::eid;

    fn gateway(probabilities: &[&str]) -> GatewayDraft {
        GatewayDraft {
            gateway_id: eid("Gateway_1"),
            outgoing: probabilities
                .iter()
                .enumerate()
                .map(|(idx, probability)| FlowEntry {
                    id: eid(&format!("Flow_{idx}")),
                    name: format!("F{idx}"),
                    probability: (*probability).to_owned(),
                })
                .collect(),
        }
    }

    #[rstest]
    #[case("0.6", 0.6)]
    #[case(" 0.25 ", 0.25)]
    #[case("1", 1.0)]
    #[case("abc", 0.0)]
    #[case("", 0.0)]
    #[case("NaN", 0.0)]
    #[case("inf", 0.0)]
    fn decimals_fall_back_to_zero(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(parse_decimal(text), expected);
    }

    #[rstest]
    #[case("5", 5)]
    #[case(" 10", 10)]
    #[case("12min", 12)]
    #[case("7.9", 7)]
    #[case("-3", -3)]
    #[case("+4", 4)]
    #[case("abc", 0)]
    #[case("", 0)]
    fn integers_parse_leading_digits(#[case] text: &str, #[case] expected: i64) {
        assert_eq!(parse_integer(text), expected);
    }

    #[rstest]
    #[case(&["0.6", "0.4"], true)]
    #[case(&["0.5", "0.25", "0.25"], true)]
    #[case(&["1"], true)]
    #[case(&["0.6", "0.3"], false)]
    #[case(&["0.6", "abc"], false)]
    #[case(&["1", "abc"], true)]
    #[case(&[], false)]
    fn gateway_valid_iff_sum_is_exactly_one(#[case] probabilities: &[&str], #[case] valid: bool) {
        let verdict = validate_gateway(&gateway(probabilities));
        assert_eq!(verdict.valid, valid);
        assert_eq!(verdict.reason.is_none(), valid);
    }

    #[test]
    fn invalid_gateway_reports_total_and_message() {
        let verdict = validate_gateway(&gateway(&["0.6", "0.3"]));
        assert_eq!(verdict.total, Some(0.6 + 0.3));
        assert_eq!(verdict.reason.as_deref(), Some(NORMALIZATION_MESSAGE));
    }

    #[test]
    fn exact_comparison_depends_on_binary_rounding() {
        assert!(validate_gateway(&gateway(&["0.1", "0.2", "0.7"])).valid);
        assert!(!validate_gateway(&gateway(&["0.2", "0.7", "0.1"])).valid);
    }

    #[test]
    fn inverted_task_range_is_accepted_with_advice() {
        let draft = TaskDraft::new(eid("Task_1"), "Review", 10, 5);
        let verdict = validate_task(&draft);
        assert!(verdict.valid);
        assert_eq!(verdict.reason.as_deref(), Some("timeMin (10) exceeds timeMax (5)"));

        assert_eq!(validate_task(&TaskDraft::new(eid("Task_1"), "Review", 5, 10)), Verdict::ok());
    }
}

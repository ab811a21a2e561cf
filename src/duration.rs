//! ISO-8601 duration parsing and Shorts classification
//!
//! The platform reports video durations as ISO-8601 strings (`PT1H2M3S`).
//! We derive a seconds value for range queries plus an `is_short` flag,
//! tagged with the rule version that produced it so stale classifications
//! can be reconciled when the rule changes.

use crate::constants::{SHORTS_MAX_SECONDS, SHORTS_RULE_VERSION};

/// Derived duration fields stored on the video row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedDuration {
    pub seconds: Option<i64>,
    pub is_short: bool,
    pub rule_version: i32,
}

/// Classify a raw ISO-8601 duration under the current rule version.
/// Unparseable input yields no seconds and `is_short = false`.
pub fn classify(raw: Option<&str>) -> DerivedDuration {
    let seconds = raw.and_then(parse_iso8601_seconds);
    DerivedDuration {
        seconds,
        is_short: seconds.is_some_and(|s| s <= SHORTS_MAX_SECONDS),
        rule_version: SHORTS_RULE_VERSION,
    }
}

/// Parse an ISO-8601 duration of the shape the platform emits
/// (`PnDTnHnMnS`, no year/month components) into whole seconds.
pub fn parse_iso8601_seconds(raw: &str) -> Option<i64> {
    let rest = raw.strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((d, t)) => (d, t),
        None => (rest, ""),
    };

    let mut total: i64 = 0;
    let mut saw_component = false;

    let mut consume = |part: &str, units: &[(char, i64)]| -> Option<()> {
        let mut num = String::new();
        for c in part.chars() {
            if c.is_ascii_digit() {
                num.push(c);
                continue;
            }
            let value: i64 = num.parse().ok()?;
            num.clear();
            let scale = units.iter().find(|(u, _)| *u == c).map(|(_, s)| *s)?;
            total = total.checked_add(value.checked_mul(scale)?)?;
            saw_component = true;
        }
        // Trailing digits without a unit designator are malformed
        if num.is_empty() { Some(()) } else { None }
    };

    consume(date_part, &[('D', 86_400)])?;
    consume(time_part, &[('H', 3_600), ('M', 60), ('S', 1)])?;

    if saw_component { Some(total) } else { None }
}

//! RRULE expansion for session templates.
//!
//! The rule is rebuilt from `(expression, anchor_start)` on every query —
//! no shared mutable rule object, so repeated calls can never contaminate
//! each other. Cadence is always relative to the template's original first
//! occurrence, never to the reference instant.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use guildpost_core::error::{GuildPostError, Result};
use rrule::{RRule, Unvalidated};

/// Next qualifying occurrence at or after `reference`, or `None` once a
/// finite series (COUNT/UNTIL) is exhausted.
///
/// The expression is evaluated in `tz` so BYDAY and friends follow the
/// guild's local calendar. Any DTSTART embedded in the expression is
/// ignored; `anchor_start` always wins.
pub fn next_occurrence_on_or_after(
    expression: &str,
    anchor_start: DateTime<Utc>,
    reference: DateTime<Utc>,
    tz: Tz,
) -> Result<Option<DateTime<Utc>>> {
    let rule: RRule<Unvalidated> = rule_body(expression)
        .parse()
        .map_err(|e| GuildPostError::InvalidRecurrenceRule(format!("{expression}: {e}")))?;

    let rule_tz = rrule::Tz::Tz(tz);
    let set = rule
        .build(anchor_start.with_timezone(&rule_tz))
        .map_err(|e| GuildPostError::InvalidRecurrenceRule(format!("{expression}: {e}")))?;

    // Lower bound is inclusive: an occurrence exactly at `reference` counts.
    let next = set.after(reference.with_timezone(&rule_tz)).all(1);
    Ok(next.dates.into_iter().next().map(|dt| dt.with_timezone(&Utc)))
}

/// Strip an `RRULE:` prefix and discard DTSTART lines some clients embed.
fn rule_body(expression: &str) -> &str {
    expression
        .lines()
        .map(str::trim)
        .find(|line| line.contains("FREQ="))
        .unwrap_or_else(|| expression.trim())
        .trim_start_matches("RRULE:")
}

//! Computes the next UTC instant at which a template's sign-up announcement
//! is due.

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use guildpost_core::error::Result;
use guildpost_core::types::SessionTemplate;

use crate::anchor::{parse_zone, resolve_local, start_of_local_day};
use crate::recurrence::next_occurrence_on_or_after;

/// Debounce window: a due instant at or before `now + buffer` counts as
/// already handled and is not re-fired.
pub const GRACE_BUFFER_MS: i64 = 5 * 60 * 1000;

/// Next due post instant for `template`, or `None` when the series is
/// exhausted or the pending occurrence falls inside the grace buffer.
///
/// Pure: identical `(template, now)` inputs always produce the identical
/// result. Callers persist the returned value; this function never mutates
/// the template.
pub fn next_due_post(
    template: &SessionTemplate,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>> {
    let tz = parse_zone(&template.time_zone)?;

    let occurrence_start = match &template.recurrence_expression {
        None => template.starts_at_utc,
        Some(expression) => {
            // Search from the start of the current local day, not from
            // `now`, so an occurrence already in progress today is still
            // reachable.
            let day_start = start_of_local_day(now, tz);
            let occurrence =
                next_occurrence_on_or_after(expression, template.starts_at_utc, day_start, tz)?;
            match occurrence {
                Some(occurrence) => project_anchor_time(occurrence, template.starts_at_utc, tz),
                None => return Ok(None),
            }
        }
    };

    if let Some(expiry) = template.expires_at_utc {
        if occurrence_start >= expiry {
            return Ok(None);
        }
    }

    let candidate = occurrence_start + Duration::milliseconds(template.post_before_ms);
    if candidate <= now + Duration::milliseconds(GRACE_BUFFER_MS) {
        return Ok(None);
    }
    Ok(Some(candidate))
}

/// Keep the recurrence engine's calendar date but pin the time of day to the
/// anchor's local hour/minute. Shields the schedule from recurrence-library
/// idiosyncrasies around the time-of-day component.
fn project_anchor_time(occurrence: DateTime<Utc>, anchor_start: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let anchor_local = anchor_start.with_timezone(&tz);
    let date = occurrence.with_timezone(&tz).date_naive();
    let time = NaiveTime::from_hms_opt(anchor_local.hour(), anchor_local.minute(), 0)
        .unwrap_or(NaiveTime::MIN);
    resolve_local(tz, date.and_time(time)).with_timezone(&Utc)
}

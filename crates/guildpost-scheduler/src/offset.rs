//! Post-offset computation: how far before a session's start its sign-up
//! announcement publishes.

use chrono::{DateTime, Days, NaiveTime, Utc};
use guildpost_core::error::{GuildPostError, Result};
use guildpost_core::types::{DayPolicy, PostTime};

use crate::anchor::{parse_zone, resolve_local};

/// Signed millisecond offset from `start` to the announcement publish
/// instant, for a post at `post_time` on the start's local calendar day
/// (`DayOf`) or the day before (`DayBefore`).
///
/// Clamped to ≤ 0: announcements never publish after the event begins. The
/// clamp is a safety rail, not a silent truncation to hide — a "post after
/// start" request becomes "post at start".
pub fn compute_offset_ms(
    start: DateTime<Utc>,
    post_time: PostTime,
    policy: DayPolicy,
    zone: &str,
) -> Result<i64> {
    let tz = parse_zone(zone)?;
    let start_local = start.with_timezone(&tz);

    let mut post_date = start_local.date_naive();
    if policy == DayPolicy::DayBefore {
        post_date = post_date
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| GuildPostError::invalid_template("post date out of range"))?;
    }

    let time = NaiveTime::from_hms_opt(post_time.hour, post_time.minute, 0).ok_or_else(|| {
        GuildPostError::invalid_template(format!(
            "invalid post time {}:{:02}",
            post_time.hour, post_time.minute
        ))
    })?;

    let post_instant = resolve_local(tz, post_date.and_time(time)).with_timezone(&Utc);
    let offset = (post_instant - start).num_milliseconds();
    Ok(offset.min(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post_time(hour: u32, minute: u32) -> PostTime {
        PostTime { hour, minute }
    }

    #[test]
    fn day_of_earlier_post_time() {
        // Session 20:00 UTC, post at 09:00 the same day: -11h.
        let start = Utc.with_ymd_and_hms(2026, 6, 10, 20, 0, 0).unwrap();
        let offset = compute_offset_ms(start, post_time(9, 0), DayPolicy::DayOf, "UTC").unwrap();
        assert_eq!(offset, -11 * 3_600_000);
    }

    #[test]
    fn day_of_later_post_time_clamps_to_zero() {
        let start = Utc.with_ymd_and_hms(2026, 6, 10, 9, 0, 0).unwrap();
        let offset = compute_offset_ms(start, post_time(20, 0), DayPolicy::DayOf, "UTC").unwrap();
        assert_eq!(offset, 0);
    }

    #[test]
    fn day_before_offset() {
        // Session Wed 18:00, post Tue 09:00: -33h.
        let start = Utc.with_ymd_and_hms(2026, 6, 10, 18, 0, 0).unwrap();
        let offset = compute_offset_ms(start, post_time(9, 0), DayPolicy::DayBefore, "UTC").unwrap();
        assert_eq!(offset, -33 * 3_600_000);
    }

    #[test]
    fn day_before_crosses_month_boundary() {
        // Session Mar 1, announcement lands on Feb 28.
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let offset = compute_offset_ms(start, post_time(12, 0), DayPolicy::DayBefore, "UTC").unwrap();
        assert_eq!(offset, -24 * 3_600_000);
    }

    #[test]
    fn day_before_across_spring_forward_counts_real_hours() {
        // Berlin 2026-03-29 loses an hour; 33 wall-clock hours are only 32
        // real ones.
        let start = Utc
            .with_ymd_and_hms(2026, 3, 29, 16, 0, 0) // 18:00 CEST
            .unwrap();
        let offset =
            compute_offset_ms(start, post_time(9, 0), DayPolicy::DayBefore, "Europe/Berlin")
                .unwrap();
        assert_eq!(offset, -32 * 3_600_000);
    }

    #[test]
    fn unknown_zone_rejected() {
        let start = Utc.with_ymd_and_hms(2026, 6, 10, 18, 0, 0).unwrap();
        let err =
            compute_offset_ms(start, post_time(9, 0), DayPolicy::DayOf, "Nowhere/Else").unwrap_err();
        assert!(matches!(err, GuildPostError::InvalidTimezone(_)));
    }
}

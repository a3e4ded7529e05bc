//! Wall-clock ↔ UTC anchoring in a guild's IANA timezone.
//!
//! Users enter session times as timezone-naive wall-clock fields; everything
//! stored and compared is UTC. Minute resolution throughout.

use std::str::FromStr;

use chrono::offset::LocalResult;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use guildpost_core::error::{GuildPostError, Result};
use guildpost_core::types::LocalDateFields;

/// Look up an IANA zone name. Unknown names are a hard configuration error.
pub fn parse_zone(name: &str) -> Result<Tz> {
    Tz::from_str(name).map_err(|_| GuildPostError::InvalidTimezone(name.to_string()))
}

/// Convert user-entered wall-clock fields to an absolute instant.
///
/// DST-ambiguous local times resolve to the earlier instant; times that fall
/// in a spring-forward gap roll forward to the first representable
/// wall-clock time.
pub fn local_to_utc(fields: &LocalDateFields, zone: &str) -> Result<DateTime<Utc>> {
    let tz = parse_zone(zone)?;
    let naive = naive_from_fields(fields)?;
    Ok(resolve_local(tz, naive).with_timezone(&Utc))
}

/// Render a stored UTC instant back into wall-clock fields, with an optional
/// additive millisecond offset applied before conversion (used when editing
/// a post time that is stored as an offset from the session start).
pub fn utc_to_local(
    instant: DateTime<Utc>,
    zone: &str,
    add_ms: Option<i64>,
) -> Result<LocalDateFields> {
    let tz = parse_zone(zone)?;
    let local = (instant + Duration::milliseconds(add_ms.unwrap_or(0))).with_timezone(&tz);
    Ok(LocalDateFields {
        year: local.year(),
        month: local.month(),
        day: local.day(),
        hour: local.hour(),
        minute: local.minute(),
    })
}

/// UTC instant at which the local calendar day containing `instant` begins.
pub(crate) fn start_of_local_day(instant: DateTime<Utc>, tz: Tz) -> DateTime<Utc> {
    let date = instant.with_timezone(&tz).date_naive();
    resolve_local(tz, date.and_time(NaiveTime::MIN)).with_timezone(&Utc)
}

/// Pin a naive local datetime to the zone. Ambiguous (fall-back) times take
/// the earlier instant; nonexistent (spring-forward) times probe forward in
/// 30-minute steps until the clock exists again.
pub(crate) fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    let mut probe = naive;
    for _ in 0..48 {
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(dt) => return dt,
            LocalResult::Ambiguous(earliest, _) => return earliest,
            LocalResult::None => probe += Duration::minutes(30),
        }
    }
    // A day-long gap (historic zone cutovers); treat the fields as UTC.
    tz.from_utc_datetime(&naive)
}

fn naive_from_fields(fields: &LocalDateFields) -> Result<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(fields.year, fields.month, fields.day).ok_or_else(|| {
        GuildPostError::invalid_template(format!(
            "invalid date {}-{:02}-{:02}",
            fields.year, fields.month, fields.day
        ))
    })?;
    // Seconds are truncated to zero — the system is minute-resolution.
    let time = NaiveTime::from_hms_opt(fields.hour, fields.minute, 0).ok_or_else(|| {
        GuildPostError::invalid_template(format!(
            "invalid time {}:{:02}",
            fields.hour, fields.minute
        ))
    })?;
    Ok(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> LocalDateFields {
        LocalDateFields {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    #[test]
    fn unknown_zone_is_invalid_timezone() {
        let err = local_to_utc(&fields(2026, 6, 1, 12, 0), "Mars/Olympus").unwrap_err();
        assert!(matches!(err, GuildPostError::InvalidTimezone(_)));
    }

    #[test]
    fn berlin_summer_conversion() {
        let utc = local_to_utc(&fields(2026, 7, 10, 20, 30), "Europe/Berlin").unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 7, 10, 18, 30, 0).unwrap());
    }

    #[test]
    fn round_trip_minute_resolution() {
        let original = fields(2026, 11, 3, 9, 45);
        let utc = local_to_utc(&original, "America/New_York").unwrap();
        let back = utc_to_local(utc, "America/New_York", None).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn utc_to_local_with_offset() {
        let instant = Utc.with_ymd_and_hms(2026, 7, 10, 18, 0, 0).unwrap();
        let back = utc_to_local(instant, "Europe/Berlin", Some(-3_600_000)).unwrap();
        // One hour earlier, rendered in CEST.
        assert_eq!(back, fields(2026, 7, 10, 19, 0));
    }

    #[test]
    fn spring_forward_gap_rolls_forward() {
        // Berlin skips 02:00–03:00 on 2026-03-29; 02:30 does not exist.
        let utc = local_to_utc(&fields(2026, 3, 29, 2, 30), "Europe/Berlin").unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 3, 29, 1, 0, 0).unwrap());
    }

    #[test]
    fn fall_back_ambiguity_takes_earlier_instant() {
        // 02:30 occurs twice on 2026-10-25 in Berlin; the CEST reading wins.
        let utc = local_to_utc(&fields(2026, 10, 25, 2, 30), "Europe/Berlin").unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 10, 25, 0, 30, 0).unwrap());
    }

    #[test]
    fn invalid_date_fields_rejected() {
        let err = local_to_utc(&fields(2026, 2, 30, 12, 0), "UTC").unwrap_err();
        assert!(matches!(err, GuildPostError::InvalidTemplate(_)));
    }

    #[test]
    fn start_of_day_respects_zone() {
        let instant = Utc.with_ymd_and_hms(2026, 7, 10, 1, 0, 0).unwrap();
        // 01:00 UTC is still 2026-07-09 evening in New York.
        let tz = parse_zone("America/New_York").unwrap();
        let day_start = start_of_local_day(instant, tz);
        assert_eq!(day_start, Utc.with_ymd_and_hms(2026, 7, 9, 4, 0, 0).unwrap());
    }
}

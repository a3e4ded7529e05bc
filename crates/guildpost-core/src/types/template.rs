//! Session template types — the persisted description of a (possibly
//! recurring) session and its announcement bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled session owned by a guild, one-time or recurring.
///
/// The scheduler only reads this; computed `last_post_utc`/`next_post_utc`
/// values go back to the store through `TemplateStore::persist_schedule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTemplate {
    pub id: Uuid,
    pub guild_id: String,
    /// User the sign-up thread is opened for.
    pub owner_id: String,
    pub name: String,
    /// Start instant of the first (or only) occurrence.
    pub starts_at_utc: DateTime<Utc>,
    /// IANA zone name the template's wall-clock fields are anchored to.
    pub time_zone: String,
    /// RRULE expression; absent means a single occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence_expression: Option<String>,
    /// Signed offset (<= 0) from occurrence start to announcement publish.
    pub post_before_ms: i64,
    /// Preferred channel for the sign-up thread.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_channel_id: Option<String>,
    pub last_post_utc: Option<DateTime<Utc>>,
    /// Advisory cache of the last computed due instant. Recomputed every
    /// sweep, never trusted blindly.
    pub next_post_utc: Option<DateTime<Utc>>,
    /// Occurrences at or after this instant are not scheduled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_utc: Option<DateTime<Utc>>,
}

/// Wall-clock local date/time as entered by a user. Minute resolution;
/// seconds are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDateFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Time of day an announcement should publish at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTime {
    pub hour: u32,
    pub minute: u32,
}

/// Coarse policy for which calendar day the announcement lands on,
/// relative to the occurrence start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayPolicy {
    #[serde(rename = "Day of")]
    DayOf,
    #[serde(rename = "Day before")]
    DayBefore,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_policy_serde_labels() {
        let json = serde_json::to_string(&DayPolicy::DayBefore).unwrap();
        assert_eq!(json, "\"Day before\"");
        let parsed: DayPolicy = serde_json::from_str("\"Day of\"").unwrap();
        assert_eq!(parsed, DayPolicy::DayOf);
    }

    #[test]
    fn test_template_json_roundtrip() {
        let template = SessionTemplate {
            id: Uuid::new_v4(),
            guild_id: "g1".into(),
            owner_id: "u1".into(),
            name: "Friday raid".into(),
            starts_at_utc: Utc::now(),
            time_zone: "Europe/Berlin".into(),
            recurrence_expression: Some("FREQ=WEEKLY;BYDAY=FR".into()),
            post_before_ms: -3_600_000,
            post_channel_id: None,
            last_post_utc: None,
            next_post_utc: None,
            expires_at_utc: None,
        };
        let json = serde_json::to_string(&template).unwrap();
        let parsed: SessionTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, template.id);
        assert_eq!(parsed.post_before_ms, -3_600_000);
        assert!(!json.contains("post_channel_id"));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded device action from `GET /logs`.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceLog {
    pub id: i64,
    pub action: String,
    /// As sent by the backend (HTTP-date style, e.g. `Mon, 19 Oct 2026 10:00:00 GMT`)
    pub timestamp: String,
    pub device_id: i64,
}

impl DeviceLog {
    /// Parse the timestamp, accepting HTTP-date/RFC 2822 or RFC 3339.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }

    /// Relative age such as "5m ago", falling back to the raw timestamp.
    pub fn age_display(&self, now: DateTime<Utc>) -> String {
        match self.recorded_at() {
            Some(at) => age_display((now - at).num_minutes()),
            None => self.timestamp.clone(),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn age_display(minutes: i64) -> String {
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / 1440)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn log_at(timestamp: &str) -> DeviceLog {
        DeviceLog {
            id: 1,
            action: "Device turned on".to_string(),
            timestamp: timestamp.to_string(),
            device_id: 4,
        }
    }

    #[test]
    fn test_parses_http_date() {
        let log = log_at("Mon, 19 Oct 2026 10:00:00 GMT");
        let expected = Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();
        assert_eq!(log.recorded_at(), Some(expected));
    }

    #[test]
    fn test_parses_rfc3339() {
        let log = log_at("2026-10-19T10:00:00Z");
        assert!(log.recorded_at().is_some());
    }

    #[test]
    fn test_age_display() {
        let log = log_at("Mon, 19 Oct 2026 10:00:00 GMT");
        let base = Utc.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();

        assert_eq!(log.age_display(base), "just now");
        assert_eq!(log.age_display(base - chrono::Duration::minutes(5)), "just now");
        assert_eq!(log.age_display(base + chrono::Duration::minutes(5)), "5m ago");
        assert_eq!(log.age_display(base + chrono::Duration::hours(3)), "3h ago");
        assert_eq!(log.age_display(base + chrono::Duration::days(2)), "2d ago");
    }

    #[test]
    fn test_unparseable_timestamp_falls_back_to_raw() {
        let log = log_at("yesterday-ish");
        assert_eq!(log.recorded_at(), None);
        assert_eq!(log.age_display(Utc::now()), "yesterday-ish");
    }
}

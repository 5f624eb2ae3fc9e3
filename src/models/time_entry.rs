use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// Raw record returned by the time-entries endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TimeEntry {
    #[serde(default, alias = "id")]
    pub id: Option<String>,
    #[serde(default, alias = "employeeName")]
    pub employee_name: Option<String>,
    // The endpoint spells this field "StarTimeUtc"
    #[serde(
        rename = "StarTimeUtc",
        alias = "StartTimeUtc",
        alias = "starTimeUtc",
        alias = "startTimeUtc",
        deserialize_with = "utc_timestamp"
    )]
    pub start_time_utc: DateTime<Utc>,
    #[serde(alias = "endTimeUtc", deserialize_with = "utc_timestamp")]
    pub end_time_utc: DateTime<Utc>,
    #[serde(default, alias = "entryNotes", alias = "notes")]
    pub entry_notes: Option<String>,
    #[serde(
        default,
        alias = "deletedOn",
        deserialize_with = "optional_utc_timestamp"
    )]
    pub deleted_on: Option<DateTime<Utc>>,
}

impl TimeEntry {
    /// Elapsed time between start and end in fractional hours.
    ///
    /// Negative when the record ends before it starts; no correction is applied.
    pub fn duration_hours(&self) -> f64 {
        let elapsed = self.end_time_utc - self.start_time_utc;
        match elapsed.num_nanoseconds() {
            Some(nanos) => nanos as f64 / 3_600_000_000_000.0,
            // Spans beyond roughly 292 years overflow nanoseconds
            None => elapsed.num_seconds() as f64 / 3_600.0,
        }
    }

    /// Soft-deleted records and records without a usable name are excluded
    /// from every aggregate.
    pub fn is_reportable(&self) -> bool {
        if self.deleted_on.is_some() {
            return false;
        }

        match &self.employee_name {
            Some(name) => !name.trim().is_empty(),
            None => false,
        }
    }
}

/// Total hours worked by one employee.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EmployeeSummary {
    pub name: String,
    pub total_hours: f64,
}

impl fmt::Display for EmployeeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}h", self.name, self.total_hours)
    }
}

pub fn parse_utc_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|date| date.and_utc())
        })
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|date| date.and_utc()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|date| date.and_utc()))
        .map_err(|e| format!("Invalid timestamp format '{}': {}", raw, e))
}

fn utc_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_utc_timestamp(&raw).map_err(serde::de::Error::custom)
}

fn optional_utc_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_utc_timestamp(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_endpoint_shape() {
        let json = r#"{
            "Id": "6b1d",
            "EmployeeName": "Abhay Singh",
            "StarTimeUtc": "2022-02-22T15:11:01",
            "EndTimeUtc": "2022-02-22T17:41:01",
            "EntryNotes": "Fix the build",
            "DeletedOn": null
        }"#;

        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.employee_name.as_deref(), Some("Abhay Singh"));
        assert_eq!(entry.duration_hours(), 2.5);
        assert!(entry.deleted_on.is_none());
        assert!(entry.is_reportable());
    }

    #[test]
    fn accepts_corrected_and_camel_case_names() {
        let json = r#"{
            "employeeName": "Tamoy Smith",
            "startTimeUtc": "2022-03-01T08:00:00Z",
            "endTimeUtc": "2022-03-01T10:00:00+01:00",
            "deletedOn": "2022-03-02T00:00:00.123"
        }"#;

        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.duration_hours(), 1.0);
        assert!(entry.id.is_none());
        assert!(entry.deleted_on.is_some());
        assert!(!entry.is_reportable());
    }

    #[test]
    fn rejects_garbage_timestamps() {
        let json = r#"{"EmployeeName": "X", "StarTimeUtc": "yesterday", "EndTimeUtc": "2022-03-01T10:00:00"}"#;
        let err = serde_json::from_str::<TimeEntry>(json).unwrap_err();
        assert!(err.to_string().contains("Invalid timestamp format"));
    }

    #[test]
    fn blank_names_are_not_reportable() {
        let json = r#"{"EmployeeName": "   ", "StarTimeUtc": "2022-03-01T08:00:00", "EndTimeUtc": "2022-03-01T10:00:00"}"#;
        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.is_reportable());

        let nameless = TimeEntry {
            employee_name: None,
            ..entry
        };
        assert!(!nameless.is_reportable());
    }

    #[test]
    fn keeps_sub_millisecond_precision() {
        let json = r#"{"EmployeeName": "X", "StarTimeUtc": "2022-03-01T08:00:00", "EndTimeUtc": "2022-03-01T08:00:00.000900"}"#;
        let entry: TimeEntry = serde_json::from_str(json).unwrap();

        let expected = 0.0009 / 3600.0;
        assert!(entry.duration_hours() > 0.0);
        assert!((entry.duration_hours() - expected).abs() < 1e-15);
    }

    #[test]
    fn negative_durations_are_kept() {
        let json = r#"{"EmployeeName": "X", "StarTimeUtc": "2022-03-01T10:00:00", "EndTimeUtc": "2022-03-01T08:30:00"}"#;
        let entry: TimeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.duration_hours(), -1.5);
    }
}

use serde::{Deserialize, Serialize};

pub const DEFAULT_EVENT_TYPE: &str = "주일 예배";
pub const DEFAULT_TIME: &str = "11:00";

/// One dated bulletin row. `date` (`YYYY-MM-DD`) is the primary key and is
/// immutable once created; changing it is modeled as delete + create.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BulletinRecord {
    pub date: String,
    pub event_type: String,
    pub time: String,
    pub sermon_title_main: String,
    pub sermon_title_main_color: Option<String>,
    pub sermon_title_sub: String,
    pub sermon_title_sub_color: Option<String>,
    /// Praise-codec blob; decode with [`crate::praise::decode`].
    pub praises: String,
    pub prayers: String,
    pub passage: String,
    pub sermon_description: String,
    pub announcements: String,
    pub intro_background_url: Option<String>,
    pub youtube_url: Option<String>,
    pub og_image_url: Option<String>,
}

/// List row for the date picker, newest date first.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BulletinSummary {
    pub date: String,
    pub sermon_title_main: String,
    pub event_type: String,
}

/// Incoming save payload. Absent fields mean "set to the canonical default",
/// not "leave unchanged" — the upsert is a full-field replace.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletinInput {
    pub date: String,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub sermon_title_main: Option<String>,
    #[serde(default)]
    pub sermon_title_main_color: Option<String>,
    #[serde(default)]
    pub sermon_title_sub: Option<String>,
    #[serde(default)]
    pub sermon_title_sub_color: Option<String>,
    #[serde(default)]
    pub praises: Option<String>,
    #[serde(default)]
    pub prayers: Option<String>,
    #[serde(default)]
    pub passage: Option<String>,
    #[serde(default)]
    pub sermon_description: Option<String>,
    #[serde(default)]
    pub announcements: Option<String>,
    #[serde(default)]
    pub intro_background_url: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub og_image_url: Option<String>,
}

impl BulletinInput {
    /// Apply canonical defaults, producing the record that will be stored.
    pub fn into_record(self) -> BulletinRecord {
        BulletinRecord {
            date: self.date.trim().to_string(),
            event_type: non_empty_or(self.event_type, DEFAULT_EVENT_TYPE),
            time: non_empty_or(self.time, DEFAULT_TIME),
            sermon_title_main: self.sermon_title_main.unwrap_or_default(),
            sermon_title_main_color: blank_to_none(self.sermon_title_main_color),
            sermon_title_sub: self.sermon_title_sub.unwrap_or_default(),
            sermon_title_sub_color: blank_to_none(self.sermon_title_sub_color),
            praises: self.praises.unwrap_or_default(),
            prayers: self.prayers.unwrap_or_default(),
            passage: self.passage.unwrap_or_default(),
            sermon_description: self.sermon_description.unwrap_or_default(),
            announcements: self.announcements.unwrap_or_default(),
            intro_background_url: blank_to_none(self.intro_background_url),
            youtube_url: blank_to_none(self.youtube_url),
            og_image_url: blank_to_none(self.og_image_url),
        }
    }
}

/// `true` only for well-formed `YYYY-MM-DD` calendar dates. chrono accepts
/// single-digit months and days, so the zero-padded form is re-checked.
pub fn is_valid_date(date: &str) -> bool {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|parsed| parsed.format("%Y-%m-%d").to_string() == date)
        .unwrap_or(false)
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_become_canonical_defaults() {
        let input = BulletinInput {
            date: "2025-01-26".to_string(),
            ..Default::default()
        };
        let record = input.into_record();
        assert_eq!(record.event_type, DEFAULT_EVENT_TYPE);
        assert_eq!(record.time, DEFAULT_TIME);
        assert_eq!(record.sermon_title_main, "");
        assert_eq!(record.sermon_title_main_color, None);
        assert_eq!(record.intro_background_url, None);
    }

    #[test]
    fn blank_optional_urls_are_stored_as_absent() {
        let input = BulletinInput {
            date: "2025-01-26".to_string(),
            youtube_url: Some("  ".to_string()),
            og_image_url: Some("https://example.com/og.png".to_string()),
            ..Default::default()
        };
        let record = input.into_record();
        assert_eq!(record.youtube_url, None);
        assert_eq!(
            record.og_image_url.as_deref(),
            Some("https://example.com/og.png")
        );
    }

    #[test]
    fn provided_fields_pass_through() {
        let input = BulletinInput {
            date: "2025-01-26".to_string(),
            event_type: Some("금요 기도회".to_string()),
            time: Some("20:00".to_string()),
            praises: Some("[{\"title\":\"a\",\"imageUrl\":\"\"}]".to_string()),
            ..Default::default()
        };
        let record = input.into_record();
        assert_eq!(record.event_type, "금요 기도회");
        assert_eq!(record.time, "20:00");
        assert!(record.praises.starts_with('['));
    }

    #[test]
    fn padded_date_is_trimmed_before_storage() {
        let input = BulletinInput {
            date: " 2025-01-26 ".to_string(),
            ..Default::default()
        };
        assert_eq!(input.into_record().date, "2025-01-26");
    }

    #[test]
    fn date_validation() {
        assert!(is_valid_date("2025-01-26"));
        assert!(!is_valid_date("2025-13-01"));
        assert!(!is_valid_date("2025-1-26"));
        assert!(!is_valid_date("next sunday"));
    }
}

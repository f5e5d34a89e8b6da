//! Parental-control preferences.
//!
//! The backend stores the settings as an opaque JSON object, so every field
//! is optional on read and unrecognized keys are carried through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Apps the dashboard offers to restrict.
pub const KNOWN_APPS: [&str; 3] = ["YouTube", "Facebook", "Instagram"];

#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFilter {
    #[default]
    Strict,
    Moderate,
    #[serde(rename = "none")]
    Unfiltered,
}

impl std::str::FromStr for ContentFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(ContentFilter::Strict),
            "moderate" => Ok(ContentFilter::Moderate),
            "none" => Ok(ContentFilter::Unfiltered),
            other => Err(format!(
                "unknown content filter '{}' (expected strict, moderate or none)",
                other
            )),
        }
    }
}

/// An hour range picked on a 0-24 slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourRange {
    pub start: u8,
    pub end: u8,
}

impl HourRange {
    pub fn new(start: u8, end: u8) -> Result<Self, String> {
        if start > 24 || end > 24 {
            return Err(format!("hours must be within 0-24, got {}-{}", start, end));
        }
        Ok(Self { start, end })
    }

    /// Daytime window, rendered `"{start}am-{end}pm"`.
    pub fn daytime(&self) -> String {
        format!("{}am-{}pm", self.start, self.end)
    }

    /// Overnight window, rendered `"{start}pm-{end}am"`.
    pub fn overnight(&self) -> String {
        format!("{}pm-{}am", self.start, self.end)
    }
}

impl std::str::FromStr for HourRange {
    type Err = String;

    /// Parses `"8-20"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| format!("expected START-END, got '{}'", s))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u8>()
                .map_err(|_| format!("invalid hour '{}'", part.trim()))
        };
        HourRange::new(parse(start)?, parse(end)?)
    }
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentalControls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_filtering: Option<ContentFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limits: Option<String>,
    /// Daily screen time in hours
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_time_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_restrictions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedtime: Option<String>,
    /// Restricted devices, by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_restrictions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internet_access_schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_reports: Option<bool>,
    #[cfg_attr(feature = "ts", ts(skip))]
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ParentalControls {
    /// The form's initial values: strict filtering, 8-20 daytime, 2h of
    /// screen time, bedtime 22-6, internet 6-22, no restrictions.
    pub fn dashboard_defaults() -> Self {
        Self {
            content_filtering: Some(ContentFilter::Strict),
            time_limits: Some(HourRange { start: 8, end: 20 }.daytime()),
            screen_time_limit: Some(2.0),
            app_restrictions: Some(Vec::new()),
            bedtime: Some(HourRange { start: 22, end: 6 }.overnight()),
            device_restrictions: Some(Vec::new()),
            internet_access_schedule: Some(HourRange { start: 6, end: 22 }.daytime()),
            usage_reports: Some(false),
            extra: Map::new(),
        }
    }

    pub fn set_time_limits(&mut self, range: HourRange) {
        self.time_limits = Some(range.daytime());
    }

    pub fn set_bedtime(&mut self, range: HourRange) {
        self.bedtime = Some(range.overnight());
    }

    pub fn set_internet_access_schedule(&mut self, range: HourRange) {
        self.internet_access_schedule = Some(range.daytime());
    }

    /// Add the app if absent, remove it if present.
    pub fn toggle_app_restriction(&mut self, app: &str) {
        toggle(self.app_restrictions.get_or_insert_with(Vec::new), app);
    }

    /// Add the device if absent, remove it if present.
    pub fn toggle_device_restriction(&mut self, device_name: &str) {
        toggle(self.device_restrictions.get_or_insert_with(Vec::new), device_name);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn toggle(list: &mut Vec<String>, item: &str) {
    if let Some(pos) = list.iter().position(|existing| existing == item) {
        list.remove(pos);
    } else {
        list.push(item.to_string());
    }
}

/// Body of `POST /parental-control/settings`.
#[derive(Debug, Serialize)]
pub(crate) struct SettingsEnvelope<'a> {
    pub settings: &'a ParentalControls,
}

/// Response of both settings endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct SettingsResponse {
    #[serde(default)]
    pub settings: Option<ParentalControls>,
}

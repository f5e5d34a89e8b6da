//! Plain-text rendering for each screen.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, Utc};
use smarthome_core::models::{
    ContentFilter, Device, DeviceLog, DeviceStatus, ParentalControls, TemperatureReading,
    UserProfile,
};

/// Width of the name column in device tables
const NAME_WIDTH: usize = 24;

/// Width of the type column in device tables
const TYPE_WIDTH: usize = 14;

/// Truncate a string to a maximum length, adding ellipsis if needed
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub fn devices(devices: &[Device]) -> String {
    if devices.is_empty() {
        return "No devices.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<name$}  {:<ty$}  {:<6} {}",
        "ID",
        "NAME",
        "TYPE",
        "STATUS",
        "LAST ACTION",
        name = NAME_WIDTH,
        ty = TYPE_WIDTH
    );
    for device in devices {
        let _ = writeln!(
            out,
            "{:>5}  {:<name$}  {:<ty$}  {:<6} {}",
            device.id,
            truncate(&device.name, NAME_WIDTH),
            truncate(&device.device_type, TYPE_WIDTH),
            device.status.display(),
            or_dash(device.last_action.as_deref()),
            name = NAME_WIDTH,
            ty = TYPE_WIDTH
        );
    }
    out
}

/// Devices grouped under their room, rooms in alphabetical order.
pub fn rooms(all: &[Device]) -> String {
    if all.is_empty() {
        return "No devices.\n".to_string();
    }

    let mut by_room: BTreeMap<&str, Vec<&Device>> = BTreeMap::new();
    for device in all {
        by_room.entry(device.location_display()).or_default().push(device);
    }

    let mut out = String::new();
    for (room, devices) in by_room {
        let on = devices.iter().filter(|d| d.is_on()).count();
        let _ = writeln!(out, "{} ({} of {} on)", room, on, devices.len());
        for device in devices {
            let _ = writeln!(
                out,
                "  [{:>3}] {:<name$} {}",
                device.status.display(),
                truncate(&device.name, NAME_WIDTH),
                device.id,
                name = NAME_WIDTH
            );
        }
    }
    out
}

pub fn device_status(status: &DeviceStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{}, {})", status.name, status.device_id, status.device_type);
    let _ = writeln!(out, "Status:      {}", status.status.display());
    let _ = writeln!(out, "Last action: {}", or_dash(status.last_action.as_deref()));
    if status.logs.is_empty() {
        let _ = writeln!(out, "No history.");
    } else {
        let _ = writeln!(out, "History:");
        for entry in &status.logs {
            let _ = writeln!(out, "  {}  {}", entry.timestamp, entry.action);
        }
    }
    out
}

pub fn logs(logs: &[DeviceLog]) -> String {
    logs_at(logs, Utc::now())
}

fn logs_at(logs: &[DeviceLog], now: DateTime<Utc>) -> String {
    if logs.is_empty() {
        return "No device activity.\n".to_string();
    }

    let mut out = String::new();
    for log in logs {
        let _ = writeln!(
            out,
            "#{:<5} device {:<5} {:<10} {}",
            log.id,
            log.device_id,
            log.age_display(now),
            log.action
        );
    }
    out
}

fn filter_name(filter: ContentFilter) -> &'static str {
    match filter {
        ContentFilter::Strict => "strict",
        ContentFilter::Moderate => "moderate",
        ContentFilter::Unfiltered => "none",
    }
}

fn list_or_none(items: Option<&Vec<String>>) -> String {
    match items {
        Some(items) if !items.is_empty() => items.join(", "),
        _ => "none".to_string(),
    }
}

pub fn parental(settings: &ParentalControls) -> String {
    if settings.is_empty() {
        return "No parental controls saved.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Content filtering:   {}",
        settings
            .content_filtering
            .map(filter_name)
            .unwrap_or("-")
    );
    let _ = writeln!(out, "Time limits:         {}", or_dash(settings.time_limits.as_deref()));
    let _ = writeln!(
        out,
        "Screen time limit:   {}",
        settings
            .screen_time_limit
            .map(|h| format!("{}h", h))
            .unwrap_or_else(|| "-".to_string())
    );
    let _ = writeln!(out, "Bedtime:             {}", or_dash(settings.bedtime.as_deref()));
    let _ = writeln!(
        out,
        "Internet access:     {}",
        or_dash(settings.internet_access_schedule.as_deref())
    );
    let _ = writeln!(
        out,
        "Restricted apps:     {}",
        list_or_none(settings.app_restrictions.as_ref())
    );
    let _ = writeln!(
        out,
        "Restricted devices:  {}",
        list_or_none(settings.device_restrictions.as_ref())
    );
    let _ = writeln!(
        out,
        "Usage reports:       {}",
        if settings.usage_reports.unwrap_or(false) { "on" } else { "off" }
    );
    for (key, value) in &settings.extra {
        let _ = writeln!(out, "{:<20} {}", format!("{}:", key), value);
    }
    out
}

pub fn user(user: &UserProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Username: {}", user.username);
    if let Some(id) = user.id {
        let _ = writeln!(out, "ID:       {}", id);
    }
    let _ = writeln!(out, "Email:    {}", or_dash(user.email.as_deref()));
    if user.is_admin() {
        let _ = writeln!(out, "Role:     admin");
    }
    out
}

pub fn temperature(reading: &TemperatureReading) -> String {
    format!("Current temperature: {}\n", reading.display())
}

//! Mock IoT devices and the actions that control them.

use serde::{Deserialize, Serialize};

/// Power state reported by the backend.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    #[default]
    Off,
    #[serde(other)]
    Unknown,
}

impl PowerState {
    pub fn display(&self) -> &'static str {
        match self {
            PowerState::On => "on",
            PowerState::Off => "off",
            PowerState::Unknown => "unknown",
        }
    }
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub device_type: String,
    #[serde(default)]
    pub status: PowerState,
    #[serde(default)]
    pub last_action: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Device {
    pub fn is_on(&self) -> bool {
        self.status == PowerState::On
    }

    /// The action that flips this device: off when on, on otherwise.
    pub fn toggle_action(&self) -> DeviceAction {
        if self.is_on() {
            DeviceAction::TurnOff
        } else {
            DeviceAction::TurnOn
        }
    }

    /// Fold a control response back into the local copy.
    pub fn apply(&mut self, response: &ControlResponse) {
        self.status = response.status;
        self.last_action = response.last_action.clone();
    }

    pub fn location_display(&self) -> &str {
        self.location.as_deref().unwrap_or("Unassigned")
    }
}

/// Body of `POST /mock/devices/:id/control`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DeviceAction {
    TurnOn,
    TurnOff,
    Adjust { value: serde_json::Value },
}

impl DeviceAction {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceAction::TurnOn => "turn_on",
            DeviceAction::TurnOff => "turn_off",
            DeviceAction::Adjust { .. } => "adjust",
        }
    }
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: PowerState,
    #[serde(default)]
    pub last_action: Option<String>,
}

/// Body of `POST /mock/devices`.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDevice {
    pub name: String,
    pub device_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDeviceResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub device_id: i64,
}

/// Partial update for `PUT /mock/devices/:id`. Unset fields are left alone.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl DeviceUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.device_type.is_none() && self.location.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UpdateDeviceResponse {
    pub device: Device,
}

/// One entry in a device's status history.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusLogEntry {
    pub action: String,
    pub timestamp: String,
}

/// Response of `GET /mock/devices/:id/status`.
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub device_id: i64,
    pub name: String,
    pub device_type: String,
    #[serde(default)]
    pub status: PowerState,
    #[serde(default)]
    pub last_action: Option<String>,
    #[serde(default)]
    pub logs: Vec<StatusLogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lamp(status: PowerState) -> Device {
        Device {
            id: 7,
            name: "Lamp".to_string(),
            device_type: "light".to_string(),
            status,
            last_action: None,
            location: Some("Bedroom".to_string()),
        }
    }

    #[test]
    fn test_device_parses_backend_payload() {
        let device: Device = serde_json::from_value(json!({
            "id": 3,
            "name": "Heater",
            "device_type": "thermostat",
            "status": "on",
            "last_action": "Device turned on"
        }))
        .unwrap();
        assert!(device.is_on());
        assert_eq!(device.location, None);
        assert_eq!(device.location_display(), "Unassigned");
    }

    #[test]
    fn test_missing_status_defaults_to_off() {
        let device: Device =
            serde_json::from_value(json!({"id": 1, "name": "Fan", "device_type": "fan"})).unwrap();
        assert_eq!(device.status, PowerState::Off);
    }

    #[test]
    fn test_unrecognized_status_is_unknown() {
        let device: Device = serde_json::from_value(
            json!({"id": 1, "name": "Fan", "device_type": "fan", "status": "standby"}),
        )
        .unwrap();
        assert_eq!(device.status, PowerState::Unknown);
        assert_eq!(device.toggle_action(), DeviceAction::TurnOn);
    }

    #[test]
    fn test_toggle_action() {
        assert_eq!(lamp(PowerState::On).toggle_action(), DeviceAction::TurnOff);
        assert_eq!(lamp(PowerState::Off).toggle_action(), DeviceAction::TurnOn);
    }

    #[test]
    fn test_action_wire_format() {
        assert_eq!(
            serde_json::to_value(DeviceAction::TurnOn).unwrap(),
            json!({"action": "turn_on"})
        );
        assert_eq!(
            serde_json::to_value(DeviceAction::Adjust { value: json!(21) }).unwrap(),
            json!({"action": "adjust", "value": 21})
        );
    }

    #[test]
    fn test_apply_control_response() {
        let mut device = lamp(PowerState::Off);
        let response: ControlResponse = serde_json::from_value(json!({
            "message": "Device controlled",
            "status": "on",
            "last_action": "Device turned on"
        }))
        .unwrap();
        device.apply(&response);
        assert!(device.is_on());
        assert_eq!(device.last_action.as_deref(), Some("Device turned on"));
    }

    #[test]
    fn test_device_update_skips_unset_fields() {
        let update = DeviceUpdate {
            location: Some("Kitchen".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"location": "Kitchen"})
        );
        assert!(DeviceUpdate::default().is_empty());
    }
}

//! Logs, parental controls, the signed-in user and sensor readings.

use super::{ApiClient, ApiError, PendingRequest};
use crate::models::parental::{SettingsEnvelope, SettingsResponse};
use crate::models::user::{PasswordCheck, PasswordCheckResponse};
use crate::models::{
    DeviceLog, MessageResponse, ParentalControls, TemperatureReading, UserProfile, UserUpdate,
};

const SETTINGS_PATH: &str = "parental-control/settings";

impl ApiClient {
    /// Fetch the action log across all devices
    pub async fn device_logs(&self) -> Result<Vec<DeviceLog>, ApiError> {
        self.send_json(PendingRequest::get("logs")).await
    }

    /// Fetch parental-control settings. Never-saved settings read as empty.
    pub async fn parental_controls(&self) -> Result<ParentalControls, ApiError> {
        let response: SettingsResponse = self.send_json(PendingRequest::get(SETTINGS_PATH)).await?;
        Ok(response.settings.unwrap_or_default())
    }

    /// Replace the stored settings, returning what the backend echoed back.
    pub async fn save_parental_controls(
        &self,
        settings: &ParentalControls,
    ) -> Result<ParentalControls, ApiError> {
        let pending = PendingRequest::post(SETTINGS_PATH).json(&SettingsEnvelope { settings })?;
        let response: SettingsResponse = self.send_json(pending).await?;
        Ok(response.settings.unwrap_or_else(|| settings.clone()))
    }

    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.send_json(PendingRequest::get("users/me")).await
    }

    /// Check the signed-in user's current password.
    ///
    /// A rejected password is `Ok(false)`; only transport and HTTP failures
    /// are errors.
    pub async fn verify_password(&self, current_password: &str) -> Result<bool, ApiError> {
        let pending = PendingRequest::post("verify-password").json(&PasswordCheck { current_password })?;
        let response: PasswordCheckResponse = self.send_json(pending).await?;
        Ok(response.success)
    }

    /// Change the signed-in user's username, password or email.
    pub async fn update_user(&self, update: &UserUpdate) -> Result<MessageResponse, ApiError> {
        let pending = PendingRequest::put("update-user").json(update)?;
        self.send_json(pending).await
    }

    pub async fn temperature(&self) -> Result<TemperatureReading, ApiError> {
        self.send_json(PendingRequest::get("temperature")).await
    }
}

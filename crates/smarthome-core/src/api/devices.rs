//! Mock device endpoints.

use tracing::debug;

use super::{ApiClient, ApiError, PendingRequest};
use crate::models::device::UpdateDeviceResponse;
use crate::models::{
    AddDeviceResponse, ControlResponse, Device, DeviceAction, DeviceStatus, DeviceUpdate,
    NewDevice,
};

const DEVICES_PATH: &str = "mock/devices";

impl ApiClient {
    /// Fetch every device visible to the signed-in user
    pub async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        self.send_json(PendingRequest::get(DEVICES_PATH)).await
    }

    /// Fetch the devices assigned to one room
    pub async fn devices_in_room(&self, room: &str) -> Result<Vec<Device>, ApiError> {
        let pending = PendingRequest::get(DEVICES_PATH)
            .segment("location")
            .segment(room);
        let devices: Vec<Device> = self.send_json(pending).await?;
        debug!(room, count = devices.len(), "Room devices received");
        Ok(devices)
    }

    pub async fn add_device(&self, device: &NewDevice) -> Result<AddDeviceResponse, ApiError> {
        let pending = PendingRequest::post(DEVICES_PATH).json(device)?;
        self.send_json(pending).await
    }

    /// Apply a partial update, returning the device as stored.
    pub async fn update_device(&self, id: i64, update: &DeviceUpdate) -> Result<Device, ApiError> {
        let pending = PendingRequest::put(DEVICES_PATH).segment(id).json(update)?;
        let response: UpdateDeviceResponse = self.send_json(pending).await?;
        Ok(response.device)
    }

    pub async fn delete_device(&self, id: i64) -> Result<(), ApiError> {
        self.send_empty(PendingRequest::delete(DEVICES_PATH).segment(id))
            .await
    }

    pub async fn control_device(
        &self,
        id: i64,
        action: &DeviceAction,
    ) -> Result<ControlResponse, ApiError> {
        let pending = PendingRequest::post(DEVICES_PATH)
            .segment(id)
            .segment("control")
            .json(action)?;
        debug!(device_id = id, action = action.name(), "Controlling device");
        self.send_json(pending).await
    }

    /// Flip a device on or off and update the local copy to match.
    pub async fn toggle_device(&self, device: &mut Device) -> Result<ControlResponse, ApiError> {
        let response = self
            .control_device(device.id, &device.toggle_action())
            .await?;
        device.apply(&response);
        Ok(response)
    }

    /// Current state plus the device's action history
    pub async fn device_status(&self, id: i64) -> Result<DeviceStatus, ApiError> {
        let pending = PendingRequest::get(DEVICES_PATH).segment(id).segment("status");
        self.send_json(pending).await
    }
}

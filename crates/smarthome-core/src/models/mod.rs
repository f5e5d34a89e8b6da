//! Data models for the smart-home backend's JSON payloads.
//!
//! - `Device`, `DeviceAction`, `DeviceStatus`: mock IoT devices and control
//! - `DeviceLog`: the global device action log
//! - `ParentalControls`: per-user parental-control preferences
//! - `UserProfile`, `Credentials`, `UserUpdate`: account data
//! - `TemperatureReading`: simulated sensor output

pub mod device;
pub mod log;
pub mod parental;
pub mod sensor;
pub mod user;

pub use device::{
    AddDeviceResponse, ControlResponse, Device, DeviceAction, DeviceStatus, DeviceUpdate,
    NewDevice, PowerState, StatusLogEntry,
};
pub use log::DeviceLog;
pub use parental::{ContentFilter, HourRange, ParentalControls, KNOWN_APPS};
pub use sensor::TemperatureReading;
pub use user::{Credentials, MessageResponse, UserProfile, UserUpdate};

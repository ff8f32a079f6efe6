use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::fmt;

/// Device control endpoints, relative to the optional API prefix
pub const TOGGLE_ENDPOINT: &str = "/toggle";
pub const CONNECT_ENDPOINT: &str = "/connect";
pub const SETUP_ENDPOINT: &str = "/setup";
pub const SET_TIME_ENDPOINT: &str = "/setTime";

/// Acknowledgment body returned by the device for submissions.
///
/// The device answers with JSON but the shape is not fixed, so it is only
/// checked to be valid JSON.
pub type DeviceAck = serde_json::Value;

/// Power state of the light as last reported by the device
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PowerState {
    #[default]
    Off,
    On,
}

impl PowerState {
    pub fn label(self) -> &'static str {
        match self {
            PowerState::On => "ON",
            PowerState::Off => "OFF",
        }
    }
}

impl From<bool> for PowerState {
    fn from(is_on: bool) -> Self {
        if is_on {
            PowerState::On
        } else {
            PowerState::Off
        }
    }
}

/// Response of the toggle endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToggleStatus {
    pub is_on: bool,
}

/// Daily on/off schedule in epoch seconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub on_time: i64,
    pub off_time: i64,
}

/// Device clock setting in epoch seconds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceClockPayload {
    pub current_time: i64,
}

/// Wi-Fi credentials sent to the connect endpoint
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct WifiCredentials {
    #[validate(min_length = 1)]
    #[validate(max_length = 32)]
    pub ssid: String,
    pub password: String,
}

impl WifiCredentials {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }
}

// the password must never end up in a log line
impl fmt::Debug for WifiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WifiCredentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

use serde::{Deserialize, Serialize};

use crate::commands::timer::TimerOutput;
use crate::types::*;

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    // Configuration
    Configure(PanelConfig),

    // View lifecycle
    Mount,
    Unmount,
    Tick(LocalTimestamp),

    // Power
    Toggle,

    // Navigation and form editing
    SelectTab(SettingsTab),
    EditField {
        field: FormField,
        value: String,
    },

    // Submissions (values read from the form when it was submitted)
    SubmitActiveForm {
        now: LocalTimestamp,
    },
    SubmitSchedule {
        on_time: String,
        off_time: String,
        now: LocalTimestamp,
    },
    SubmitWifi(WifiCredentials),
    SubmitDeviceClock {
        current_time: String,
        now: LocalTimestamp,
    },

    // HTTP responses (internal events, skipped from serialization)
    #[serde(skip)]
    ToggleResponse(DeviceReply<ToggleStatus>),
    #[serde(skip)]
    ScheduleResponse(DeviceReply<SchedulePayload>),
    #[serde(skip)]
    WifiResponse(DeviceReply<String>),
    #[serde(skip)]
    DeviceClockResponse(DeviceReply<i64>),

    // Timer acknowledgments from the shell
    #[serde(skip)]
    TimerResponse(TimerOutput),

    // UI actions
    ClearError,
    ClearSuccess,
}

/// Outcome of a device request, tagged with the view generation it was sent in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReply<T> {
    pub generation: u32,
    pub result: Result<T, String>,
}

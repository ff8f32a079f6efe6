use crux_core::Command;
use serde_valid::Validate;

use crate::events::Event;
use crate::model::Model;
use crate::types::{
    DeviceClockPayload, FormState, LocalTimestamp, SchedulePayload, SettingsTab,
    WifiCredentials, CONNECT_ENDPOINT, SET_TIME_ENDPOINT, SETUP_ENDPOINT,
};
use crate::{device_post, handle_response, Effect};

const SCHEDULE_ACTION: &str = "Save schedule";
const WIFI_ACTION: &str = "Connect Wi-Fi";
const DEVICE_CLOCK_ACTION: &str = "Set device time";

const SCHEDULE_ERROR_ALERT: &str = "Error saving general settings";
const WIFI_ERROR_ALERT: &str = "Error connecting to Wi-Fi";
const DEVICE_CLOCK_ERROR_ALERT: &str = "Error setting time";

/// Handle device settings submissions (schedule, Wi-Fi, device clock)
pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::SubmitActiveForm { now } => {
            let form = std::mem::take(&mut model.form);
            match model.active_tab {
                SettingsTab::General => submit_schedule(model, &form.on_time, &form.off_time, now),
                SettingsTab::WiFi => {
                    let FormState { ssid, password, .. } = form;
                    submit_wifi(model, WifiCredentials { ssid, password })
                }
                SettingsTab::SetTime => submit_device_clock(model, &form.current_time, now),
            }
        }

        Event::SubmitSchedule {
            on_time,
            off_time,
            now,
        } => {
            model.form = FormState::default();
            submit_schedule(model, &on_time, &off_time, now)
        }

        Event::ScheduleResponse(reply) => handle_response!(model, reply, {
            on_success: |model, payload| {
                model.set_success(format!(
                    "General Settings: OnTime={} (Epoch Time), OffTime={} (Epoch Time)",
                    payload.on_time, payload.off_time
                ));
            },
            error_alert: SCHEDULE_ERROR_ALERT,
        }),

        Event::SubmitWifi(credentials) => {
            model.form = FormState::default();
            submit_wifi(model, credentials)
        }

        Event::WifiResponse(reply) => handle_response!(model, reply, {
            on_success: |model, ssid| {
                model.set_success(format!("Wi-Fi Configuration: SSID={ssid}"));
            },
            error_alert: WIFI_ERROR_ALERT,
        }),

        Event::SubmitDeviceClock { current_time, now } => {
            model.form = FormState::default();
            submit_device_clock(model, &current_time, now)
        }

        Event::DeviceClockResponse(reply) => handle_response!(model, reply, {
            on_success: |model, epoch| {
                model.set_success(format!("Set Time: {epoch} (Epoch Time)"));
            },
            error_alert: DEVICE_CLOCK_ERROR_ALERT,
        }),

        _ => unreachable!("Non-settings event passed to settings handler"),
    }
}

fn submit_schedule(
    model: &mut Model,
    on_time: &str,
    off_time: &str,
    now: LocalTimestamp,
) -> Command<Effect, Event> {
    let time_input = model.config.time_input;

    let on_time = match time_input.to_epoch_seconds(on_time, &now) {
        Ok(epoch) => epoch,
        Err(e) => return model.set_error_and_render(format!("Invalid light on time: {e}")),
    };
    let off_time = match time_input.to_epoch_seconds(off_time, &now) {
        Ok(epoch) => epoch,
        Err(e) => return model.set_error_and_render(format!("Invalid light off time: {e}")),
    };

    let payload = SchedulePayload { on_time, off_time };
    log::info!("saving schedule: {payload:?}");

    device_post!(model, SETUP_ENDPOINT, ScheduleResponse, SCHEDULE_ACTION,
        body_json: &payload,
        map: move |_| payload
    )
}

fn submit_wifi(model: &mut Model, credentials: WifiCredentials) -> Command<Effect, Event> {
    if let Err(e) = credentials.validate() {
        return model.set_error_and_render(format!("Invalid Wi-Fi settings: {e}"));
    }

    let ssid = credentials.ssid.clone();
    log::info!("connecting device to Wi-Fi network {ssid}");

    device_post!(model, CONNECT_ENDPOINT, WifiResponse, WIFI_ACTION,
        body_json: &credentials,
        map: move |_| ssid
    )
}

fn submit_device_clock(
    model: &mut Model,
    current_time: &str,
    now: LocalTimestamp,
) -> Command<Effect, Event> {
    let current_time = match model.config.time_input.to_epoch_seconds(current_time, &now) {
        Ok(epoch) => epoch,
        Err(e) => return model.set_error_and_render(format!("Invalid time: {e}")),
    };

    let payload = DeviceClockPayload { current_time };
    log::info!("setting device time: {payload:?}");

    device_post!(model, SET_TIME_ENDPOINT, DeviceClockResponse, DEVICE_CLOCK_ACTION,
        body_json: &payload,
        map: move |_| current_time
    )
}

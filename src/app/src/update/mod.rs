mod clock;
mod power;
mod settings;
mod ui;

use crux_core::{render::render, Command};

use crate::events::Event;
use crate::model::Model;
use crate::Effect;

pub use clock::CLOCK_INTERVAL_MS;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Configure(config) => {
            log::info!(
                "configured: api prefix {:?}, time input {:?}",
                config.api_prefix,
                config.time_input
            );
            model.config = config;
            render()
        }

        // Clock domain
        Event::Mount | Event::Unmount | Event::Tick(_) | Event::TimerResponse(_) => {
            clock::handle(event, model)
        }

        // Power domain
        Event::Toggle | Event::ToggleResponse(_) => power::handle(event, model),

        // Device settings domain
        Event::SubmitActiveForm { .. }
        | Event::SubmitSchedule { .. }
        | Event::ScheduleResponse(_)
        | Event::SubmitWifi(_)
        | Event::WifiResponse(_)
        | Event::SubmitDeviceClock { .. }
        | Event::DeviceClockResponse(_) => settings::handle(event, model),

        // UI actions domain
        Event::SelectTab(_) | Event::EditField { .. } | Event::ClearError | Event::ClearSuccess => {
            ui::handle(event, model)
        }
    }
}

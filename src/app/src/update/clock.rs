use crux_core::{render::render, Command};

use crate::events::Event;
use crate::model::{Model, ViewLifecycle};
use crate::types::format_clock;
use crate::{update_field, Effect, TimerCmd};

/// Refresh period of the displayed clock
pub const CLOCK_INTERVAL_MS: u64 = 1000;

/// Handle view lifecycle and clock ticks
pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Mount => {
            if model.is_mounted() {
                return Command::done();
            }
            model.lifecycle = ViewLifecycle::Mounted;
            Command::all([
                render(),
                TimerCmd::start(CLOCK_INTERVAL_MS)
                    .build()
                    .then_send(Event::TimerResponse),
            ])
        }

        Event::Unmount => {
            if !model.is_mounted() {
                return Command::done();
            }
            model.lifecycle = ViewLifecycle::Unmounted;
            model.view_generation = model.view_generation.wrapping_add(1);
            TimerCmd::stop().build().then_send(Event::TimerResponse)
        }

        Event::Tick(now) => {
            if !model.is_mounted() {
                log::debug!("ignoring clock tick while not mounted");
                return Command::done();
            }
            match now.local_date_time() {
                Ok(local) => update_field!(model.clock, format_clock(&local)),
                Err(e) => {
                    log::error!("clock tick: {e}");
                    Command::done()
                }
            }
        }

        Event::TimerResponse(output) => {
            log::debug!("clock timer: {output:?}");
            Command::done()
        }

        _ => unreachable!("Non-clock event passed to clock handler"),
    }
}

use crux_core::{render::render, Command};

use crate::events::{DeviceReply, Event};
use crate::handle_response;
use crate::model::Model;
use crate::types::{PowerState, ToggleStatus, TOGGLE_ENDPOINT};
use crate::{process_json_response, Effect, HttpCmd};

const TOGGLE_ACTION: &str = "Toggle light";
const TOGGLE_ERROR_ALERT: &str = "Error fetching light state";

/// Handle the power toggle
pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Toggle => {
            let url = model.config.endpoint(TOGGLE_ENDPOINT);
            log::debug!("GET {url}");
            model.start_request();
            let generation = model.view_generation;
            Command::all([
                render(),
                HttpCmd::get(url)
                    .header("Content-Type", "application/json")
                    .build()
                    .then_send(move |result| {
                        Event::ToggleResponse(DeviceReply {
                            generation,
                            result: process_json_response::<ToggleStatus>(TOGGLE_ACTION, result),
                        })
                    }),
            ])
        }

        Event::ToggleResponse(reply) => handle_response!(model, reply, {
            on_success: |model, status| {
                model.power = PowerState::from(status.is_on);
            },
            error_alert: TOGGLE_ERROR_ALERT,
        }),

        _ => unreachable!("Non-power event passed to power handler"),
    }
}

use crux_core::{render::render, Command};

use crate::events::Event;
use crate::model::Model;
use crate::types::FormState;
use crate::update_field;
use crate::Effect;

/// Handle UI-related events (tab navigation, form editing, clear messages)
pub fn handle(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::SelectTab(tab) => {
            if model.active_tab == tab {
                return Command::done();
            }
            update_field!(
                model.active_tab, tab;
                model.form, FormState::default()
            )
        }

        Event::EditField { field, value } => {
            if field.tab() != model.active_tab {
                log::debug!("ignoring edit of {field:?} outside its tab");
                return Command::done();
            }
            model.form.set(field, value);
            render()
        }

        Event::ClearError => update_field!(model.error_message, None),
        Event::ClearSuccess => update_field!(model.success_message, None),
        _ => unreachable!("Non-UI event passed to UI handler"),
    }
}

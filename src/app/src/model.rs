use serde::{Deserialize, Serialize};

use crate::types::*;

/// Trait for types that can handle error messages
///
/// This allows HTTP helper functions to work with Model without directly depending on it.
pub trait ModelErrorHandler {
    fn set_error(&mut self, error: String);
}

/// Mount state of the view owning the model
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ViewLifecycle {
    #[default]
    Initial,
    Mounted,
    Unmounted,
}

/// Application Model - the complete state
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Model {
    // Device state
    pub power: PowerState,

    // Clock state
    pub clock: String,
    pub lifecycle: ViewLifecycle,
    /// Bumped on every unmount; replies from older generations are stale
    pub view_generation: u32,

    // Settings state
    pub active_tab: SettingsTab,
    pub form: FormState,
    pub config: PanelConfig,

    // Request state
    pub pending_requests: u32,

    // Alerts
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl Model {
    pub fn is_mounted(&self) -> bool {
        self.lifecycle == ViewLifecycle::Mounted
    }

    pub fn is_unmounted(&self) -> bool {
        self.lifecycle == ViewLifecycle::Unmounted
    }

    pub fn is_loading(&self) -> bool {
        self.pending_requests > 0
    }

    /// Track a request sent to the device and clear stale alerts
    pub fn start_request(&mut self) {
        self.pending_requests += 1;
        self.error_message = None;
        self.success_message = None;
    }

    /// Track the end of a device request, successful or not
    pub fn finish_request(&mut self) {
        self.pending_requests = self.pending_requests.saturating_sub(1);
    }

    /// Set an error message
    pub fn set_error(&mut self, error: String) {
        self.success_message = None;
        self.error_message = Some(error);
    }

    /// Set an error message and return a render command
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }

    pub fn set_success(&mut self, message: String) {
        self.error_message = None;
        self.success_message = Some(message);
    }
}

impl ModelErrorHandler for Model {
    fn set_error(&mut self, error: String) {
        Model::set_error(self, error)
    }
}

/// A form field as presented to the user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldView {
    pub field: FormField,
    pub label: String,
    pub value: String,
    pub hint: Option<String>,
}

/// Everything the shell needs to draw the panel. Secrets are masked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub power: PowerState,
    pub power_label: String,
    pub clock: String,
    pub active_tab: SettingsTab,
    pub title: String,
    pub submit_label: String,
    pub fields: Vec<FieldView>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let time_input = model.config.time_input;
        let fields = model
            .active_tab
            .fields()
            .iter()
            .map(|&field| {
                let value = model.form.get(field);
                FieldView {
                    field,
                    label: field.label().to_string(),
                    value: if field.is_secret() {
                        "*".repeat(value.chars().count())
                    } else {
                        value.to_string()
                    },
                    hint: field.is_time().then(|| time_input.hint().to_string()),
                }
            })
            .collect();

        Self {
            power: model.power,
            power_label: model.power.label().to_string(),
            clock: model.clock.clone(),
            active_tab: model.active_tab,
            title: model.active_tab.title().to_string(),
            submit_label: model.active_tab.submit_label().to_string(),
            fields,
            is_loading: model.is_loading(),
            error_message: model.error_message.clone(),
            success_message: model.success_message.clone(),
        }
    }
}

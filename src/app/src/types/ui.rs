use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

use super::time::TimeInputMode;
use crate::http_helpers::build_url;

/// Settings panels, addressed by their zero-based index
#[derive(Debug, Clone, Copy, Default, Serialize_repr, Deserialize_repr, PartialEq, Eq)]
#[repr(u8)]
pub enum SettingsTab {
    #[default]
    General = 0,
    WiFi = 1,
    SetTime = 2,
}

impl SettingsTab {
    pub const ALL: [SettingsTab; 3] = [SettingsTab::General, SettingsTab::WiFi, SettingsTab::SetTime];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingsTab::General => "General",
            SettingsTab::WiFi => "Wi-Fi",
            SettingsTab::SetTime => "Set Time",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SettingsTab::General => "General Settings",
            SettingsTab::WiFi => "Wi-Fi Configuration",
            SettingsTab::SetTime => "Set Current Time",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            SettingsTab::General => "Save",
            SettingsTab::WiFi => "Connect",
            SettingsTab::SetTime => "Set Time",
        }
    }

    pub fn fields(self) -> &'static [FormField] {
        match self {
            SettingsTab::General => &[FormField::OnTime, FormField::OffTime],
            SettingsTab::WiFi => &[FormField::Ssid, FormField::Password],
            SettingsTab::SetTime => &[FormField::CurrentTime],
        }
    }
}

impl TryFrom<u8> for SettingsTab {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        SettingsTab::ALL
            .into_iter()
            .find(|tab| tab.index() == index)
            .ok_or_else(|| format!("no settings tab with index {index}"))
    }
}

/// Input fields of the settings forms
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    OnTime,
    OffTime,
    Ssid,
    Password,
    CurrentTime,
}

impl FormField {
    pub fn tab(self) -> SettingsTab {
        match self {
            FormField::OnTime | FormField::OffTime => SettingsTab::General,
            FormField::Ssid | FormField::Password => SettingsTab::WiFi,
            FormField::CurrentTime => SettingsTab::SetTime,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::OnTime => "Light On Time",
            FormField::OffTime => "Light Off Time",
            FormField::Ssid => "SSID",
            FormField::Password => "Password",
            FormField::CurrentTime => "Current Time",
        }
    }

    pub fn is_time(self) -> bool {
        matches!(
            self,
            FormField::OnTime | FormField::OffTime | FormField::CurrentTime
        )
    }

    pub fn is_secret(self) -> bool {
        self == FormField::Password
    }
}

/// Draft values of the form fields.
///
/// Only the active tab's fields are meaningful; switching tabs resets them.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub on_time: String,
    pub off_time: String,
    pub ssid: String,
    pub password: String,
    pub current_time: String,
}

impl FormState {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::OnTime => &self.on_time,
            FormField::OffTime => &self.off_time,
            FormField::Ssid => &self.ssid,
            FormField::Password => &self.password,
            FormField::CurrentTime => &self.current_time,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        let slot = match field {
            FormField::OnTime => &mut self.on_time,
            FormField::OffTime => &mut self.off_time,
            FormField::Ssid => &mut self.ssid,
            FormField::Password => &mut self.password,
            FormField::CurrentTime => &mut self.current_time,
        };
        *slot = value;
    }
}

impl fmt::Debug for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormState")
            .field("on_time", &self.on_time)
            .field("off_time", &self.off_time)
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .field("current_time", &self.current_time)
            .finish()
    }
}

/// Panel configuration chosen by the shell at startup
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PanelConfig {
    /// Path prefix when the device is reached through a reverse proxy, e.g. `/api`
    pub api_prefix: Option<String>,
    pub time_input: TimeInputMode,
}

impl PanelConfig {
    /// Full request URL of a device endpoint, honoring the API prefix
    pub fn endpoint(&self, path: &str) -> String {
        let prefix = self
            .api_prefix
            .as_deref()
            .map(|prefix| prefix.trim_matches('/'))
            .filter(|prefix| !prefix.is_empty());

        match prefix {
            Some(prefix) => build_url(&format!("/{prefix}{path}")),
            None => build_url(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_index_round_trips_through_numbers() {
        assert_eq!(serde_json::to_string(&SettingsTab::SetTime).unwrap(), "2");
        assert_eq!(
            serde_json::from_str::<SettingsTab>("1").unwrap(),
            SettingsTab::WiFi
        );
        assert!(serde_json::from_str::<SettingsTab>("3").is_err());
        assert!(SettingsTab::try_from(3).is_err());
    }

    #[test]
    fn every_field_belongs_to_its_tab() {
        for tab in SettingsTab::ALL {
            for field in tab.fields() {
                assert_eq!(field.tab(), tab);
            }
        }
    }

    #[test]
    fn form_debug_redacts_password() {
        let mut form = FormState::default();
        form.set(FormField::Password, "secret".to_string());

        assert_eq!(form.get(FormField::Password), "secret");
        assert!(!format!("{form:?}").contains("secret"));
    }

    #[test]
    fn endpoint_without_prefix() {
        let config = PanelConfig::default();
        assert_eq!(config.endpoint("/toggle"), "https://relative/toggle");
    }

    #[test]
    fn endpoint_with_prefix_normalizes_slashes() {
        for prefix in ["/api", "api", "/api/", "api/"] {
            let config = PanelConfig {
                api_prefix: Some(prefix.to_string()),
                ..Default::default()
            };
            assert_eq!(config.endpoint("/setTime"), "https://relative/api/setTime");
        }
    }

    #[test]
    fn empty_prefix_is_ignored() {
        let config = PanelConfig {
            api_prefix: Some("/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.endpoint("/setup"), "https://relative/setup");
    }
}

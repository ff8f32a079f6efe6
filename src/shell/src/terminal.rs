use crate::shell::View;
use anyhow::{Context, Error, Result, bail};
use light_panel_core::{Event, FormField, LocalTimestamp, SettingsTab, ViewModel, WifiCredentials};
use std::{io::Write, str::FromStr};

pub const HELP: &str = "\
commands:
  toggle                      flip the light
  tab <0|1|2|general|wifi|time>
                              switch the settings tab
  set <field> <value>         edit a field of the active tab
                              (on, off, ssid, password, time)
  save                        submit the active tab
  schedule <on> <off>         submit on/off times directly
  wifi <ssid> <password>      submit Wi-Fi credentials directly
  time <value>                submit the device clock directly
  help                        show this text
  quit                        leave the panel";

/// A line typed by the user
#[derive(Debug, PartialEq, Eq)]
pub enum UserCommand {
    Toggle,
    Tab(SettingsTab),
    Set { field: FormField, value: String },
    Save,
    Schedule { on_time: String, off_time: String },
    Wifi { ssid: String, password: String },
    Time(String),
    Help,
    Quit,
}

impl UserCommand {
    /// The core event for this command, if it has one
    pub fn into_event(self, now: LocalTimestamp) -> Option<Event> {
        match self {
            UserCommand::Toggle => Some(Event::Toggle),
            UserCommand::Tab(tab) => Some(Event::SelectTab(tab)),
            UserCommand::Set { field, value } => Some(Event::EditField { field, value }),
            UserCommand::Save => Some(Event::SubmitActiveForm { now }),
            UserCommand::Schedule { on_time, off_time } => Some(Event::SubmitSchedule {
                on_time,
                off_time,
                now,
            }),
            UserCommand::Wifi { ssid, password } => {
                Some(Event::SubmitWifi(WifiCredentials::new(ssid, password)))
            }
            UserCommand::Time(current_time) => Some(Event::SubmitDeviceClock { current_time, now }),
            UserCommand::Help | UserCommand::Quit => None,
        }
    }
}

impl FromStr for UserCommand {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map(|(command, rest)| (command, rest.trim()))
            .unwrap_or((line, ""));

        let command = match command.to_ascii_lowercase().as_str() {
            "toggle" | "t" => UserCommand::Toggle,
            "tab" => UserCommand::Tab(parse_tab(rest)?),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                UserCommand::Set {
                    field: parse_field(field)?,
                    value: value.trim().to_string(),
                }
            }
            "save" | "submit" => UserCommand::Save,
            "schedule" => {
                let mut times = rest.split_whitespace();
                match (times.next(), times.next(), times.next()) {
                    (Some(on_time), Some(off_time), None) => UserCommand::Schedule {
                        on_time: on_time.to_string(),
                        off_time: off_time.to_string(),
                    },
                    _ => bail!("usage: schedule <on> <off>"),
                }
            }
            "wifi" => {
                let (ssid, password) = rest
                    .split_once(char::is_whitespace)
                    .context("usage: wifi <ssid> <password>")?;
                UserCommand::Wifi {
                    ssid: ssid.to_string(),
                    password: password.trim_start().to_string(),
                }
            }
            "time" if !rest.is_empty() => UserCommand::Time(rest.to_string()),
            "time" => bail!("usage: time <value>"),
            "help" | "?" => UserCommand::Help,
            "quit" | "exit" | "q" => UserCommand::Quit,
            "" => bail!("empty command"),
            other => bail!("unknown command: {other}"),
        };

        Ok(command)
    }
}

fn parse_tab(value: &str) -> Result<SettingsTab> {
    if let Ok(index) = value.parse::<u8>() {
        return SettingsTab::try_from(index).map_err(Error::msg);
    }

    match value.to_ascii_lowercase().as_str() {
        "general" => Ok(SettingsTab::General),
        "wifi" | "wi-fi" => Ok(SettingsTab::WiFi),
        "time" | "settime" | "set-time" => Ok(SettingsTab::SetTime),
        other => bail!("unknown tab: {other}"),
    }
}

fn parse_field(value: &str) -> Result<FormField> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "ontime" => Ok(FormField::OnTime),
        "off" | "offtime" => Ok(FormField::OffTime),
        "ssid" => Ok(FormField::Ssid),
        "password" | "pass" => Ok(FormField::Password),
        "time" | "current" => Ok(FormField::CurrentTime),
        other => bail!("unknown field: {other}"),
    }
}

/// Draws the panel as plain text
pub struct TerminalView<W: Write> {
    out: W,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> View for TerminalView<W> {
    fn render(&mut self, view: &ViewModel) -> Result<()> {
        let out = &mut self.out;

        writeln!(out, "Light: {}    {}", view.power_label, view.clock)?;

        let tabs: Vec<String> = SettingsTab::ALL
            .iter()
            .map(|tab| {
                if *tab == view.active_tab {
                    format!("[{}]", tab.label())
                } else {
                    format!(" {} ", tab.label())
                }
            })
            .collect();
        writeln!(out, "{}", tabs.join(" "))?;

        writeln!(out, "{}", view.title)?;
        for field in &view.fields {
            match &field.hint {
                Some(hint) => writeln!(out, "  {} ({hint}): {}", field.label, field.value)?,
                None => writeln!(out, "  {}: {}", field.label, field.value)?,
            }
        }
        writeln!(out, "  <{}>", view.submit_label)?;

        if view.is_loading {
            writeln!(out, "...waiting for device")?;
        }
        if let Some(error) = &view.error_message {
            writeln!(out, "error: {error}")?;
        }
        if let Some(success) = &view.success_message {
            writeln!(out, "ok: {success}")?;
        }

        out.flush().context("failed to flush terminal output")
    }

    fn message(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush().context("failed to flush terminal output")
    }
}

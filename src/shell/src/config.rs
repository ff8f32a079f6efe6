use anyhow::{Context, Result, bail};
use light_panel_core::{PanelConfig, TimeInputMode, Tz};
use reqwest::Url;
use std::env;

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Where the device (or the proxy in front of it) is reached
    pub device: DeviceConfig,

    /// How the panel talks to the device and reads time fields
    pub panel: PanelConfig,

    /// Zone entered times are resolved in; the system zone when unset
    pub time_zone: Option<Tz>,
}

#[derive(Clone, Debug)]
pub struct DeviceConfig {
    pub base_url: Url,
}

impl AppConfig {
    /// Load the configuration from environment variables
    pub fn load() -> Result<Self> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load the configuration from an arbitrary variable lookup
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let device = DeviceConfig::load(&lookup)?;
        let panel = load_panel(&lookup)?;
        let time_zone = load_time_zone(&lookup)?;

        Ok(Self {
            device,
            panel,
            time_zone,
        })
    }
}

impl DeviceConfig {
    const DEFAULT_URL: &str = "http://light.local";

    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = lookup("DEVICE_URL").unwrap_or_else(|| Self::DEFAULT_URL.to_string());
        let base_url =
            Url::parse(&raw).with_context(|| format!("failed to parse DEVICE_URL: {raw}"))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            bail!("DEVICE_URL must use http or https: {raw}");
        }

        Ok(Self { base_url })
    }
}

fn load_panel(lookup: &impl Fn(&str) -> Option<String>) -> Result<PanelConfig> {
    let api_prefix = lookup("API_PREFIX")
        .map(|prefix| prefix.trim().to_string())
        .filter(|prefix| !prefix.is_empty());

    let time_input = match lookup("TIME_INPUT").as_deref().map(str::trim) {
        None | Some("") | Some("picker") => TimeInputMode::Picker,
        Some("text") => TimeInputMode::RawText,
        Some(other) => bail!("failed to parse TIME_INPUT: expected picker or text, got {other}"),
    };

    Ok(PanelConfig {
        api_prefix,
        time_input,
    })
}

fn load_time_zone(lookup: &impl Fn(&str) -> Option<String>) -> Result<Option<Tz>> {
    match lookup("TIME_ZONE").as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => name
            .parse::<Tz>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("failed to parse TIME_ZONE: {e}")),
    }
}

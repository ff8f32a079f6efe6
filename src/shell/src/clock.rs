use chrono::{Local, Offset, Utc};
use light_panel_core::{LocalTimestamp, Tz};
use log::{debug, warn};

/// Reads the wall clock in the panel's time zone
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock {
    time_zone: Option<Tz>,
}

impl LocalClock {
    /// Without a zone, readings carry only the current system UTC offset
    pub fn new(time_zone: Option<Tz>) -> Self {
        Self { time_zone }
    }

    /// Clock in the zone the operating system is configured for
    pub fn system() -> Self {
        let time_zone = match iana_time_zone::get_timezone() {
            Ok(name) => match name.parse::<Tz>() {
                Ok(zone) => Some(zone),
                Err(e) => {
                    warn!("unknown system time zone {name}: {e}");
                    None
                }
            },
            Err(e) => {
                warn!("failed to detect system time zone: {e}");
                None
            }
        };
        debug!("system time zone: {time_zone:?}");

        Self::new(time_zone)
    }

    pub fn time_zone(&self) -> Option<Tz> {
        self.time_zone
    }

    pub fn now(&self) -> LocalTimestamp {
        let now = Utc::now();

        match self.time_zone {
            Some(zone) => {
                let offset = now.with_timezone(&zone).offset().fix().local_minus_utc();
                LocalTimestamp::new(now.timestamp(), offset).with_time_zone(zone)
            }
            None => {
                let offset = now.with_timezone(&Local).offset().local_minus_utc();
                LocalTimestamp::new(now.timestamp(), offset)
            }
        }
    }
}

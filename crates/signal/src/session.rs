use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Trading-hours and weekday windowing for signal emission.
///
/// The reference instant is always injected by the caller; the policy never
/// reads a clock of its own.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// First UTC hour (inclusive) in which signals may fire.
    pub open_hour: u32,
    /// Last UTC hour (inclusive) in which signals may fire.
    pub close_hour: u32,
    /// Veto evaluation entirely on Saturday and Sunday.
    pub weekends_closed: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            open_hour: 6,
            close_hour: 20,
            weekends_closed: true,
        }
    }
}

impl SessionConfig {
    pub fn allows(&self, now: DateTime<Utc>) -> bool {
        if self.weekends_closed && matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let hour = now.hour();
        hour >= self.open_hour && hour <= self.close_hour
    }
}

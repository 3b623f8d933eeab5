use chrono::{DateTime, Utc};
use tracing::debug;

use crate::series::BarSeries;

/// Structural bias derived from the higher timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trend {
    Bull,
    Bear,
    #[default]
    Neutral,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Bull => write!(f, "BULL"),
            Trend::Bear => write!(f, "BEAR"),
            Trend::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Holds the last confirmed higher-timeframe trend.
///
/// Re-evaluated only when the newest higher-timeframe bar carries a closing
/// timestamp we have not seen before; intrabar updates of the same bar never
/// retrigger it. This keeps the fast gate from flip-flopping direction faster
/// than the structural trend actually changes.
#[derive(Debug, Default)]
pub struct TrendLock {
    trend: Trend,
    last_close_ts: Option<DateTime<Utc>>,
}

impl TrendLock {
    pub fn trend(&self) -> Trend {
        self.trend
    }

    pub fn update(&mut self, higher: &BarSeries) {
        let Some(last) = higher.last() else {
            return;
        };
        if self.last_close_ts == Some(last.timestamp) {
            return; // same higher-timeframe bar, lock holds
        }
        self.last_close_ts = Some(last.timestamp);

        let fast = higher.ema_fast.last().copied();
        let slow = higher.ema_slow.last().copied();
        let rsi = higher.rsi.last().copied().flatten();

        self.trend = match (fast, slow, rsi) {
            (Some(f), Some(s), Some(r)) if f > s && r > 50.0 => Trend::Bull,
            (Some(f), Some(s), Some(r)) if f < s && r < 50.0 => Trend::Bear,
            _ => Trend::Neutral,
        };
        debug!(trend = %self.trend, ts = %last.timestamp, "Higher-timeframe trend locked");
    }
}

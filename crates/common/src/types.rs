use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLC price bar as retrieved from the market-data provider.
///
/// Timestamps are expected to be strictly increasing within a series.
/// The engine does not enforce the OHLC shape (high ≥ max(open, close),
/// low ≤ min(open, close)); it computes arithmetic on whatever the
/// provider returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    /// True when the bar closed above its open.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// True when the bar closed below its open.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}

/// Direction of an emitted trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// A trade recommendation emitted by the signal engine.
///
/// This is the only output of the core. It is handed to the Telegram
/// formatter as-is; there is no wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub direction: Direction,
    pub entry_price: f64,
    /// Swing low (buy) or swing high (sell) over the trailing window.
    pub stop_loss: f64,
    /// `entry ± (entry − stop_loss) × risk_reward`.
    pub take_profit: f64,
    pub risk_reward: f64,
    /// Count after this signal, for the "N/M today" line in notifications.
    pub signals_today: u32,
    pub max_signals_per_day: u32,
}

/// Current state of the evaluation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    #[default]
    Stopped,
    Running,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineState::Stopped => write!(f, "stopped"),
            EngineState::Running => write!(f, "running"),
        }
    }
}

/// Commands sent to the evaluation loop via the command channel.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    Start,
    Stop,
    /// Run one evaluation cycle immediately, regardless of the poll timer.
    CheckNow,
}

/// One day's signal tally, emitted once per day by the evaluation loop.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub date: chrono::NaiveDate,
    pub total_signals: u32,
    /// Sum of the risk-reward multiples of the day's signals.
    pub net_rr: f64,
}

/// Events the evaluation loop pushes to the notification forwarder.
#[derive(Debug, Clone)]
pub enum BotEvent {
    SignalFired(SignalRecord),
    DailySummary(SummaryReport),
}

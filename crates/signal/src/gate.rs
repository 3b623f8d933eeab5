use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use common::{Direction, SignalRecord};

use crate::patterns::Zone;
use crate::series::IndicatorParams;
use crate::session::SessionConfig;
use crate::trend::Trend;

/// All gate thresholds as named configuration (TOML).
///
/// Defaults are the strict variant of the signal family: RSI bands 50–65
/// (buy) / 35–50 (sell), ADX floor 20, ten signals per day, reward twice the
/// stop distance. Relaxed variants are reachable purely through
/// `config/gate.toml`:
///
/// ```toml
/// rsi_buy_min = 45.0
/// rsi_buy_max = 70.0
/// adx_min = 12.0
/// max_signals_per_day = 10
///
/// [indicators]
/// ema_fast = 20
/// ema_slow = 50
///
/// [session]
/// open_hour = 6
/// close_hour = 20
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    pub rsi_buy_min: f64,
    pub rsi_buy_max: f64,
    pub rsi_sell_min: f64,
    pub rsi_sell_max: f64,
    /// Minimum trend strength; the candidate is vetoed unless ADX exceeds it.
    pub adx_min: f64,
    pub max_signals_per_day: u32,
    /// Reward multiple applied to the stop distance for the take profit.
    pub rr_ratio: f64,
    /// Entry-timeframe bars required before any evaluation.
    pub min_history: usize,
    pub sweep_lookback: usize,
    pub swing_lookback: usize,
    /// Clear `last_signal` on day roll, allowing a same-direction signal on
    /// a new trading day. Off by default: suppression holds until the
    /// opposite direction fires.
    pub reset_direction_daily: bool,
    pub indicators: IndicatorParams,
    pub session: SessionConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            rsi_buy_min: 50.0,
            rsi_buy_max: 65.0,
            rsi_sell_min: 35.0,
            rsi_sell_max: 50.0,
            adx_min: 20.0,
            max_signals_per_day: 10,
            rr_ratio: 2.0,
            min_history: 50,
            sweep_lookback: 20,
            swing_lookback: 20,
            reset_direction_daily: false,
            indicators: IndicatorParams::default(),
            session: SessionConfig::default(),
        }
    }
}

impl GateConfig {
    /// Load from a TOML file. Exits process on error.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read gate config at '{path}': {e}"));
        toml::from_str(&content)
            .unwrap_or_else(|e| panic!("Failed to parse gate config at '{path}': {e}"))
    }
}

/// Mutable emission state. Lives for the process; nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalState {
    /// Direction of the most recent emission; a candidate matching it is
    /// suppressed until the opposite direction fires (or a daily reset,
    /// when configured).
    pub last_signal: Option<Direction>,
    pub signals_today: u32,
    pub signals_date: Option<NaiveDate>,
}

/// Everything the gate reads from the latest entry-timeframe bar.
#[derive(Debug, Clone, Copy)]
pub struct MarketSnapshot {
    pub price: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    /// `None` = indicator not ready; vetoes any band check.
    pub rsi: Option<f64>,
    pub adx: f64,
    pub trend: Trend,
}

/// One direction's pattern evidence, assembled by the engine per cycle.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub direction: Direction,
    pub trend_required: Trend,
    pub sweep: bool,
    pub zone: Option<Zone>,
    /// Swing low (buy) / swing high (sell) anchoring the stop loss.
    pub swing_bound: Option<f64>,
}

/// The decision gatekeeper: indicator values, pattern flags and the trend
/// lock go in, at most one `SignalRecord` comes out.
///
/// Preconditions short-circuit in a fixed order; the first failure vetoes
/// with no side effects. Only a full pass mutates `SignalState`.
#[derive(Debug)]
pub struct SignalGate {
    pub config: GateConfig,
    pub state: SignalState,
}

impl SignalGate {
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            state: SignalState::default(),
        }
    }

    /// Reset the daily counter when the observed trading day changes.
    /// Runs before every quota check.
    pub fn roll_day(&mut self, today: NaiveDate) {
        if self.state.signals_date != Some(today) {
            self.state.signals_date = Some(today);
            self.state.signals_today = 0;
            if self.config.reset_direction_daily {
                self.state.last_signal = None;
            }
        }
    }

    pub fn quota_exhausted(&self) -> bool {
        self.state.signals_today >= self.config.max_signals_per_day
    }

    /// Run one candidate through the precondition chain.
    pub fn evaluate(&mut self, snap: &MarketSnapshot, candidate: &Candidate) -> Option<SignalRecord> {
        if snap.trend != candidate.trend_required {
            return None;
        }
        if !candidate.sweep {
            return None;
        }
        // Absent zone is a hard veto, not a wildcard match.
        let zone = candidate.zone?;
        if !zone.contains(snap.price) {
            return None;
        }
        if !self.ema_aligned(snap, candidate.direction) {
            return None;
        }
        let rsi = snap.rsi?;
        let (band_min, band_max) = self.rsi_band(candidate.direction);
        if rsi <= band_min || rsi >= band_max {
            return None;
        }
        if snap.adx <= self.config.adx_min {
            return None;
        }
        if self.state.last_signal == Some(candidate.direction) {
            return None;
        }
        let swing = candidate.swing_bound?;

        self.state.last_signal = Some(candidate.direction);
        self.state.signals_today += 1;

        let entry = snap.price;
        let take_profit = match candidate.direction {
            Direction::Buy => entry + (entry - swing) * self.config.rr_ratio,
            Direction::Sell => entry - (swing - entry) * self.config.rr_ratio,
        };
        let record = SignalRecord {
            direction: candidate.direction,
            entry_price: entry,
            stop_loss: swing,
            take_profit,
            risk_reward: self.config.rr_ratio,
            signals_today: self.state.signals_today,
            max_signals_per_day: self.config.max_signals_per_day,
        };
        info!(
            direction = %record.direction,
            entry = record.entry_price,
            stop = record.stop_loss,
            target = record.take_profit,
            today = record.signals_today,
            "Signal emitted"
        );
        Some(record)
    }

    fn rsi_band(&self, direction: Direction) -> (f64, f64) {
        match direction {
            Direction::Buy => (self.config.rsi_buy_min, self.config.rsi_buy_max),
            Direction::Sell => (self.config.rsi_sell_min, self.config.rsi_sell_max),
        }
    }

    fn ema_aligned(&self, snap: &MarketSnapshot, direction: Direction) -> bool {
        match direction {
            Direction::Buy => snap.ema_fast > snap.ema_slow && snap.price > snap.ema_fast,
            Direction::Sell => snap.ema_fast < snap.ema_slow && snap.price < snap.ema_fast,
        }
    }
}

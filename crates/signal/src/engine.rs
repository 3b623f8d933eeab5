use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use common::{Bar, Direction, SignalRecord};

use crate::gate::{Candidate, GateConfig, MarketSnapshot, SignalGate};
use crate::patterns::{
    bearish_order_block, bullish_order_block, liquidity_sweep_buy, liquidity_sweep_sell,
    swing_high, swing_low,
};
use crate::series::{strictly_increasing, BarSeries};
use crate::trend::{Trend, TrendLock};

/// The signal decision engine: one instance per bot, exclusively owned by
/// the evaluation loop. Holds the trend lock and emission state for the
/// life of the process.
#[derive(Debug)]
pub struct SignalEngine {
    pub gate: SignalGate,
    pub trend: TrendLock,
}

impl SignalEngine {
    pub fn new(config: GateConfig) -> Self {
        Self {
            gate: SignalGate::new(config),
            trend: TrendLock::default(),
        }
    }

    /// Run one evaluation cycle against fresh series snapshots.
    ///
    /// Pure up to the engine's own state: a veto anywhere returns `None`
    /// with nothing mutated except the trend lock (which follows the
    /// higher timeframe regardless of gating) and the daily counter roll.
    /// Insufficient or malformed data degrades to `None`, never an error.
    pub fn evaluate(
        &mut self,
        entry_bars: &[Bar],
        trend_bars: &[Bar],
        now: DateTime<Utc>,
    ) -> Option<SignalRecord> {
        if !self.gate.config.session.allows(now) {
            return None;
        }

        self.gate.roll_day(now.date_naive());
        if self.gate.quota_exhausted() {
            return None;
        }

        if entry_bars.len() < self.gate.config.min_history || trend_bars.is_empty() {
            debug!(
                entry_len = entry_bars.len(),
                trend_len = trend_bars.len(),
                "Insufficient history, skipping cycle"
            );
            return None;
        }
        if !strictly_increasing(entry_bars) || !strictly_increasing(trend_bars) {
            warn!("Bar series has non-monotonic timestamps, skipping cycle");
            return None;
        }

        // Full recompute of both series on every cycle.
        let params = self.gate.config.indicators.clone();
        let entry = BarSeries::compute(entry_bars.to_vec(), &params);
        let higher = BarSeries::compute(trend_bars.to_vec(), &params);

        self.trend.update(&higher);

        let last = entry.last()?;
        let snapshot = MarketSnapshot {
            price: last.close,
            ema_fast: *entry.ema_fast.last()?,
            ema_slow: *entry.ema_slow.last()?,
            rsi: entry.rsi.last().copied().flatten(),
            adx: entry.adx.last().copied().unwrap_or(0.0),
            trend: self.trend.trend(),
        };

        let sweep_lookback = self.gate.config.sweep_lookback;
        let swing_lookback = self.gate.config.swing_lookback;

        // BUY is evaluated to completion first; SELL is only considered if
        // BUY did not fire.
        let buy = Candidate {
            direction: Direction::Buy,
            trend_required: Trend::Bull,
            sweep: liquidity_sweep_buy(entry.bars(), sweep_lookback),
            zone: bullish_order_block(entry.bars()),
            swing_bound: swing_low(entry.bars(), swing_lookback),
        };
        if let Some(record) = self.gate.evaluate(&snapshot, &buy) {
            return Some(record);
        }

        let sell = Candidate {
            direction: Direction::Sell,
            trend_required: Trend::Bear,
            sweep: liquidity_sweep_sell(entry.bars(), sweep_lookback),
            zone: bearish_order_block(entry.bars()),
            swing_bound: swing_high(entry.bars(), swing_lookback),
        };
        self.gate.evaluate(&snapshot, &sell)
    }
}

use common::Bar;
use serde::{Deserialize, Serialize};

use crate::indicators::{adx, ema, rsi};

/// Spans/periods for the derived indicator columns.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi_period: usize,
    pub adx_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ema_fast: 20,
            ema_slow: 50,
            rsi_period: 14,
            adx_period: 14,
        }
    }
}

/// An ordered bar sequence (oldest first) with indicator columns attached.
///
/// Columns are computed once at construction over the full series — every
/// refresh recomputes the whole rolling window from the retrieved history,
/// there is no incremental update.
#[derive(Debug, Clone)]
pub struct BarSeries {
    bars: Vec<Bar>,
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub rsi: Vec<Option<f64>>,
    pub adx: Vec<f64>,
}

impl BarSeries {
    pub fn compute(bars: Vec<Bar>, params: &IndicatorParams) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        Self {
            ema_fast: ema(&closes, params.ema_fast),
            ema_slow: ema(&closes, params.ema_slow),
            rsi: rsi(&closes, params.rsi_period),
            adx: adx(&bars, params.adx_period),
            bars,
        }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

/// True when every timestamp is strictly greater than its predecessor.
/// A series that fails this is malformed input; the engine logs it and
/// degrades the cycle to "no signal".
pub fn strictly_increasing(bars: &[Bar]) -> bool {
    bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp)
}

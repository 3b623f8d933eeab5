use common::Bar;

/// Price zone reported by the order-block detectors, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Zone {
    pub low: f64,
    pub high: f64,
}

impl Zone {
    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }
}

/// Liquidity sweep on the buy side: the latest bar's low breaks below the
/// lowest low of the *preceding* `lookback` bars (support) while its close
/// recovers back above that level.
pub fn liquidity_sweep_buy(bars: &[Bar], lookback: usize) -> bool {
    if bars.len() < lookback + 1 {
        return false;
    }
    let Some((last, prior)) = bars.split_last() else {
        return false;
    };
    let support = lowest_low(&prior[prior.len() - lookback..]);
    last.low < support && last.close > support
}

/// Mirror of [`liquidity_sweep_buy`]: high breaks above the preceding
/// `lookback`-bar resistance, close falls back below it.
pub fn liquidity_sweep_sell(bars: &[Bar], lookback: usize) -> bool {
    if bars.len() < lookback + 1 {
        return false;
    }
    let Some((last, prior)) = bars.split_last() else {
        return false;
    };
    let resistance = highest_high(&prior[prior.len() - lookback..]);
    last.high > resistance && last.close < resistance
}

/// Most recent bearish→bullish adjacent pair, scanning backwards and
/// skipping the final two bars (the last one may still be forming).
/// The zone is the bearish bar's full range. `None` means no such pair
/// exists in the window — callers must treat that as a hard veto.
pub fn bullish_order_block(bars: &[Bar]) -> Option<Zone> {
    if bars.len() < 4 {
        return None;
    }
    for i in (1..=bars.len() - 3).rev() {
        let (first, second) = (&bars[i], &bars[i + 1]);
        if first.is_bearish() && second.is_bullish() {
            return Some(Zone {
                low: first.low,
                high: first.high,
            });
        }
    }
    None
}

/// Mirror of [`bullish_order_block`]: bullish bar followed by a bearish one.
pub fn bearish_order_block(bars: &[Bar]) -> Option<Zone> {
    if bars.len() < 4 {
        return None;
    }
    for i in (1..=bars.len() - 3).rev() {
        let (first, second) = (&bars[i], &bars[i + 1]);
        if first.is_bullish() && second.is_bearish() {
            return Some(Zone {
                low: first.low,
                high: first.high,
            });
        }
    }
    None
}

/// Lowest low over the trailing `lookback` bars, latest bar included.
/// Anchors the stop loss on the buy side.
pub fn swing_low(bars: &[Bar], lookback: usize) -> Option<f64> {
    if bars.is_empty() {
        return None;
    }
    let start = bars.len().saturating_sub(lookback);
    Some(lowest_low(&bars[start..]))
}

/// Highest high over the trailing `lookback` bars, latest bar included.
pub fn swing_high(bars: &[Bar], lookback: usize) -> Option<f64> {
    if bars.is_empty() {
        return None;
    }
    let start = bars.len().saturating_sub(lookback);
    Some(highest_high(&bars[start..]))
}

fn lowest_low(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min)
}

fn highest_high(bars: &[Bar]) -> f64 {
    bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max)
}

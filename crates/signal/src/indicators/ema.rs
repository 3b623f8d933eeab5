/// Exponential moving average over a close series, one value per bar.
///
/// Uses the *adjusted* exponentially weighted mean with α = 2/(span+1):
/// each output is a weighted average over all prior closes,
/// `y[i] = Σ (1−α)^j · x[i−j] / Σ (1−α)^j`, converging to the fixed-α
/// recurrence as the window fills. This is the same convention as
/// `pandas.Series.ewm(span=n).mean()`; results differ materially from the
/// seeded recurrence over short windows, so the choice is deliberate and
/// applied to every EMA in the engine.
pub fn ema(closes: &[f64], span: usize) -> Vec<f64> {
    assert!(span >= 1, "EMA span must be >= 1");

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut out = Vec::with_capacity(closes.len());
    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for &close in closes {
        numerator = close + decay * numerator;
        denominator = 1.0 + decay * denominator;
        out.push(numerator / denominator);
    }
    out
}

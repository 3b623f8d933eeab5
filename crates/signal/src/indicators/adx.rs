use common::Bar;

/// ADX (Average Directional Index) over a bar series, one value per bar.
///
/// True range, ±DM, their `period`-bar rolling means, ±DI, DX, and finally a
/// `period`-bar rolling mean of DX. Every undefined intermediate — unfilled
/// rolling window, zero ATR, zero DI sum — coerces the final value to 0.0,
/// so the gate reads "not enough history" as "weak trend" rather than
/// "unknown".
pub fn adx(bars: &[Bar], period: usize) -> Vec<f64> {
    assert!(period >= 1, "ADX period must be >= 1");

    let n = bars.len();
    if n < 2 {
        return vec![0.0; n];
    }

    // Components are undefined at bar 0 (no previous close); NaN entries
    // poison any rolling window that includes them, exactly like the
    // unfilled leading windows.
    let mut tr = vec![f64::NAN; n];
    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];
    for i in 1..n {
        let prev = &bars[i - 1];
        let bar = &bars[i];
        tr[i] = (bar.high - bar.low)
            .max((bar.high - prev.close).abs())
            .max((bar.low - prev.close).abs());
        plus_dm[i] = (bar.high - prev.high).max(0.0);
        minus_dm[i] = (prev.low - bar.low).max(0.0);
    }

    let atr = rolling_mean(&tr, period);
    let plus_dm_avg = rolling_mean(&plus_dm, period);
    let minus_dm_avg = rolling_mean(&minus_dm, period);

    let mut dx = vec![f64::NAN; n];
    for i in 0..n {
        let (Some(atr_i), Some(plus), Some(minus)) = (atr[i], plus_dm_avg[i], minus_dm_avg[i])
        else {
            continue;
        };
        if atr_i == 0.0 {
            continue;
        }
        let plus_di = 100.0 * plus / atr_i;
        let minus_di = 100.0 * minus / atr_i;
        let di_sum = plus_di + minus_di;
        if di_sum == 0.0 {
            continue;
        }
        dx[i] = 100.0 * (plus_di - minus_di).abs() / di_sum;
    }

    rolling_mean(&dx, period)
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect()
}

/// Rolling mean over a fixed window; `None` until the window fills, and for
/// any window containing an undefined (NaN) entry.
fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    for i in 0..n {
        if i + 1 < period {
            continue;
        }
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = Some(window.iter().sum::<f64>() / period as f64);
    }
    out
}

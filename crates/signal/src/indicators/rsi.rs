/// RSI (Relative Strength Index) over a close series, one value per bar.
///
/// Per-bar delta split into gain/loss, simple rolling mean of each over
/// `period` bars, then `RSI = 100 − 100/(1 + avgGain/avgLoss)`.
///
/// `None` marks "indicator not ready": the leading bars before the rolling
/// window fills, and any bar where `avgLoss == 0` (RS is undefined there —
/// a window of pure gains does not read as RSI 100, it reads as no value,
/// and the gate treats it as a veto).
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    assert!(period >= 1, "RSI period must be >= 1");

    let n = closes.len();
    let mut out = vec![None; n];
    if n < period + 1 {
        return out;
    }

    // The delta at bar i is closes[i] − closes[i−1]; the value at bar i
    // averages the trailing `period` deltas ending at i.
    for i in period..n {
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        for j in (i - period + 1)..=i {
            let delta = closes[j] - closes[j - 1];
            if delta > 0.0 {
                gain_sum += delta;
            } else {
                loss_sum += -delta;
            }
        }

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;
        if avg_loss == 0.0 {
            continue; // RS undefined, bar stays None
        }

        let rs = avg_gain / avg_loss;
        out[i] = Some(100.0 - 100.0 / (1.0 + rs));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsi_not_ready_with_insufficient_data() {
        let values = rsi(&[100.0; 14], 14);
        assert!(values.iter().all(Option::is_none));
    }

    #[test]
    fn rsi_defined_once_window_fills() {
        // Alternating gains and losses so avg_loss is never zero.
        let closes: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let values = rsi(&closes, 14);
        assert!(values[13].is_none());
        assert!(values[14].is_some());
        assert!(values.last().unwrap().is_some());
    }

    #[test]
    fn rsi_undefined_when_window_has_no_losses() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let values = rsi(&closes, 14);
        assert!(
            values.iter().all(Option::is_none),
            "pure-gain windows must stay undefined"
        );
    }

    #[test]
    fn rsi_zero_when_window_has_no_gains() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
        let values = rsi(&closes, 14);
        let last = values.last().unwrap().unwrap();
        assert!((last - 0.0).abs() < 1e-9, "Expected 0, got {last}");
    }

    #[test]
    fn rsi_bounded_zero_to_hundred() {
        let closes = vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.15, 43.61, 44.33, 44.83, 45.10,
            45.15, 44.34, 44.09, 44.50, 43.90, 44.20,
        ];
        for value in rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value), "RSI out of range: {value}");
        }
    }

    #[test]
    fn rsi_known_value_from_trailing_window() {
        // 14 deltas: ten gains of 1.5 and four losses of 1.0.
        // avgGain/avgLoss = 15/4 → RSI = 100 − 100/(1+3.75) = 78.947…
        let mut closes = vec![100.0];
        for i in 0..14 {
            let prev = *closes.last().unwrap();
            closes.push(if i % 3 == 2 { prev - 1.0 } else { prev + 1.5 });
        }
        let last = rsi(&closes, 14).last().unwrap().unwrap();
        assert!((last - 100.0 * 15.0 / 19.0).abs() < 1e-9, "got {last}");
    }
}

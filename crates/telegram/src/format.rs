//! Text rendering of engine events for Telegram (HTML parse mode).

use common::{Direction, SignalRecord, SummaryReport};

pub fn signal_message(record: &SignalRecord, pair: &str) -> String {
    let icon = match record.direction {
        Direction::Buy => "\u{1F7E2}",  // green circle
        Direction::Sell => "\u{1F534}", // red circle
    };
    format!(
        "{icon} <b>{} {pair}</b>\n\
         Entry: {:.2}\n\
         SL: {:.2}\n\
         TP: {:.2}\n\
         RR: 1:{}\n\
         Signals Today: {}/{}",
        record.direction,
        record.entry_price,
        record.stop_loss,
        record.take_profit,
        record.risk_reward,
        record.signals_today,
        record.max_signals_per_day,
    )
}

pub fn summary_message(report: &SummaryReport, pair: &str) -> String {
    format!(
        "\u{1F4CA} <b>DAILY SUMMARY</b>\n\n\
         Pair: {pair}\n\
         Total Signals: {}\n\
         Net RR: {}",
        report.total_signals, report.net_rr,
    )
}

pub fn startup_message(pair: &str, open_hour: u32, close_hour: u32) -> String {
    format!(
        "\u{2705} {pair} signal bot LIVE | session {open_hour:02}\u{2013}{close_hour:02} UTC"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn buy_signal_renders_levels_and_quota() {
        let record = SignalRecord {
            direction: Direction::Buy,
            entry_price: 2151.237,
            stop_loss: 2144.5,
            take_profit: 2164.711,
            risk_reward: 2.0,
            signals_today: 3,
            max_signals_per_day: 10,
        };
        let text = signal_message(&record, "GOLD");
        assert!(text.contains("BUY GOLD"));
        assert!(text.contains("Entry: 2151.24"));
        assert!(text.contains("SL: 2144.50"));
        assert!(text.contains("TP: 2164.71"));
        assert!(text.contains("RR: 1:2"));
        assert!(text.contains("Signals Today: 3/10"));
    }

    #[test]
    fn sell_signal_uses_the_red_marker() {
        let record = SignalRecord {
            direction: Direction::Sell,
            entry_price: 2100.0,
            stop_loss: 2110.0,
            take_profit: 2080.0,
            risk_reward: 2.0,
            signals_today: 1,
            max_signals_per_day: 10,
        };
        let text = signal_message(&record, "GOLD");
        assert!(text.contains("SELL GOLD"));
        assert!(text.starts_with('\u{1F534}'));
    }

    #[test]
    fn summary_renders_totals() {
        let report = SummaryReport {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            total_signals: 4,
            net_rr: 8.0,
        };
        let text = summary_message(&report, "GOLD");
        assert!(text.contains("Total Signals: 4"));
        assert!(text.contains("Net RR: 8"));
    }

    #[test]
    fn startup_names_the_session_window() {
        let text = startup_message("GOLD", 6, 20);
        assert!(text.contains("GOLD"));
        assert!(text.contains("06\u{2013}20 UTC"));
    }
}

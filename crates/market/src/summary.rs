use chrono::{DateTime, NaiveDate, Timelike, Utc};

use common::{SignalRecord, SummaryReport};

/// In-memory ledger of the day's emitted signals, reported once per day.
/// Dies with the process; nothing is persisted.
#[derive(Debug, Default)]
pub struct SummaryLedger {
    rr_multiples: Vec<f64>,
    last_sent_date: Option<NaiveDate>,
}

impl SummaryLedger {
    pub fn record(&mut self, record: &SignalRecord) {
        self.rr_multiples.push(record.risk_reward);
    }

    /// Produce the daily report on the first call inside the summary hour
    /// each day, clearing the ledger. Quiet days produce no report.
    pub fn due(&mut self, now: DateTime<Utc>, summary_hour: u32) -> Option<SummaryReport> {
        if now.hour() != summary_hour {
            return None;
        }
        let today = now.date_naive();
        if self.last_sent_date == Some(today) {
            return None;
        }
        self.last_sent_date = Some(today);

        if self.rr_multiples.is_empty() {
            return None;
        }
        let report = SummaryReport {
            date: today,
            total_signals: self.rr_multiples.len() as u32,
            net_rr: self.rr_multiples.iter().sum(),
        };
        self.rr_multiples.clear();
        Some(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use common::Direction;

    fn record() -> SignalRecord {
        SignalRecord {
            direction: Direction::Buy,
            entry_price: 2150.0,
            stop_loss: 2140.0,
            take_profit: 2170.0,
            risk_reward: 2.0,
            signals_today: 1,
            max_signals_per_day: 10,
        }
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, minute, 0).unwrap()
    }

    #[test]
    fn reports_once_inside_the_summary_hour() {
        let mut ledger = SummaryLedger::default();
        ledger.record(&record());
        ledger.record(&record());

        assert!(ledger.due(at(17, 55), 18).is_none(), "too early");

        let report = ledger.due(at(18, 0), 18).expect("due at the summary hour");
        assert_eq!(report.total_signals, 2);
        assert!((report.net_rr - 4.0).abs() < 1e-9);

        assert!(ledger.due(at(18, 5), 18).is_none(), "already sent today");
    }

    #[test]
    fn quiet_day_produces_no_report() {
        let mut ledger = SummaryLedger::default();
        assert!(ledger.due(at(18, 0), 18).is_none());
    }

    #[test]
    fn ledger_clears_after_reporting() {
        let mut ledger = SummaryLedger::default();
        ledger.record(&record());
        assert!(ledger.due(at(18, 0), 18).is_some());

        let next_day = Utc.with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap();
        assert!(
            ledger.due(next_day, 18).is_none(),
            "previous day's signals must not leak into the next report"
        );
    }
}

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

use common::{BotEvent, EngineCommand, EngineState};
use signal::SignalEngine;

use crate::provider::MarketData;
use crate::summary::SummaryLedger;

/// Instrument and scheduling settings for the evaluation loop.
#[derive(Debug, Clone)]
pub struct LoopSettings {
    pub symbol: String,
    pub entry_interval: String,
    pub trend_interval: String,
    pub entry_range: String,
    pub trend_range: String,
    pub poll_secs: u64,
    pub summary_hour_utc: u32,
}

/// Cloneable handle passed to other crates (Telegram).
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<EngineCommand>,
    state: Arc<RwLock<EngineState>>,
}

impl EngineHandle {
    pub async fn send(&self, cmd: EngineCommand) {
        let _ = self.command_tx.send(cmd).await;
    }

    pub async fn state(&self) -> EngineState {
        *self.state.read().await
    }

    pub fn command_sender(&self) -> mpsc::Sender<EngineCommand> {
        self.command_tx.clone()
    }

    pub fn state_handle(&self) -> Arc<RwLock<EngineState>> {
        self.state.clone()
    }
}

/// The evaluation loop: one timer, one command channel, one decision engine.
///
/// A cycle (retrieve → evaluate → notify) always runs to completion before
/// the next one starts; the signal engine is owned here and touched from no
/// other task.
pub struct Engine {
    settings: LoopSettings,
    provider: Arc<dyn MarketData>,
    signal_engine: SignalEngine,
    summary: SummaryLedger,
    state: Arc<RwLock<EngineState>>,
    command_rx: mpsc::Receiver<EngineCommand>,
    #[allow(dead_code)] // kept to prevent channel close
    command_tx: mpsc::Sender<EngineCommand>,
    event_tx: mpsc::Sender<BotEvent>,
}

impl Engine {
    pub fn new(
        settings: LoopSettings,
        provider: Arc<dyn MarketData>,
        signal_engine: SignalEngine,
        event_tx: mpsc::Sender<BotEvent>,
    ) -> (Self, EngineHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let state = Arc::new(RwLock::new(EngineState::Stopped));

        let handle = EngineHandle {
            command_tx: command_tx.clone(),
            state: state.clone(),
        };

        let engine = Engine {
            settings,
            provider,
            signal_engine,
            summary: SummaryLedger::default(),
            state,
            command_rx,
            command_tx,
            event_tx,
        };

        (engine, handle)
    }

    /// Run the loop. Call from `tokio::spawn`.
    pub async fn run(mut self) {
        info!("Engine initialized in Stopped state. Waiting for Start command.");

        let mut ticker = tokio::time::interval(Duration::from_secs(self.settings.poll_secs));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if *self.state.read().await != EngineState::Running {
                        continue;
                    }
                    self.run_cycle().await;
                }

                cmd = self.command_rx.recv() => match cmd {
                    Some(EngineCommand::Start) => {
                        let current = *self.state.read().await;
                        if current == EngineState::Running {
                            info!("Engine already running");
                            continue;
                        }
                        info!(symbol = %self.settings.symbol, "Engine started");
                        *self.state.write().await = EngineState::Running;
                    }

                    Some(EngineCommand::Stop) => {
                        info!("Engine stopped — evaluation suspended");
                        *self.state.write().await = EngineState::Stopped;
                    }

                    Some(EngineCommand::CheckNow) => {
                        info!("Manual check requested");
                        self.run_cycle().await;
                    }

                    None => {
                        warn!("Engine command channel closed — shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// One evaluation cycle: fetch both timeframes, run the decision engine,
    /// forward whatever it emits. Any failure skips the cycle; the next tick
    /// retries naturally.
    async fn run_cycle(&mut self) {
        let now = Utc::now();
        let s = &self.settings;

        let entry = match self
            .provider
            .fetch_bars(&s.symbol, &s.entry_interval, &s.entry_range)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                warn!(error = %e, "Entry-timeframe retrieval failed, skipping cycle");
                return;
            }
        };
        let trend = match self
            .provider
            .fetch_bars(&s.symbol, &s.trend_interval, &s.trend_range)
            .await
        {
            Ok(bars) => bars,
            Err(e) => {
                warn!(error = %e, "Trend-timeframe retrieval failed, skipping cycle");
                return;
            }
        };

        if entry.is_empty() || trend.is_empty() {
            debug!("Provider returned no bars, skipping cycle");
            return;
        }

        if let Some(record) = self.signal_engine.evaluate(&entry, &trend, now) {
            self.summary.record(&record);
            if self.event_tx.send(BotEvent::SignalFired(record)).await.is_err() {
                warn!("Event channel closed — dropping signal");
            }
        }

        if let Some(report) = self.summary.due(now, self.settings.summary_hour_utc) {
            let _ = self.event_tx.send(BotEvent::DailySummary(report)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone};
    use common::{Bar, Direction, Result};
    use signal::{GateConfig, SessionConfig};

    /// Stub provider serving fixed series per interval.
    struct StubProvider {
        entry: Vec<Bar>,
        trend: Vec<Bar>,
    }

    #[async_trait]
    impl MarketData for StubProvider {
        async fn fetch_bars(&self, _symbol: &str, interval: &str, _range: &str) -> Result<Vec<Bar>> {
            if interval == "5m" {
                Ok(self.entry.clone())
            } else {
                Ok(self.trend.clone())
            }
        }
    }

    fn bars_from_closes(closes: &[f64], start: DateTime<Utc>, step_mins: i64) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar {
                    timestamp: start + ChronoDuration::minutes(step_mins * i as i64),
                    open,
                    high: open.max(close) + 0.1,
                    low: open.min(close) - 0.1,
                    close,
                }
            })
            .collect()
    }

    /// Entry series with a full bullish confluence on the last bar (same
    /// construction as the gate scenario fixtures).
    fn bullish_entry_bars() -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap();
        let mut closes: Vec<f64> = (0..52)
            .map(|i| {
                let base = 90.0 + 0.2 * i as f64;
                if i % 7 == 6 {
                    base - 0.3
                } else {
                    base
                }
            })
            .collect();
        closes[50] = 99.3;
        closes.push(99.3);
        closes.push(99.8);
        closes.push(99.5);

        let mut bars = bars_from_closes(&closes, start, 5);
        bars.last_mut().unwrap().low = 96.0;
        bars
    }

    fn bullish_trend_bars() -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 3, 3, 18, 0, 0).unwrap();
        let closes: Vec<f64> = (0..60)
            .map(|i| {
                let base = 2000.0 + 0.5 * i as f64;
                if i % 7 == 6 {
                    base - 0.9
                } else {
                    base
                }
            })
            .collect();
        bars_from_closes(&closes, start, 15)
    }

    fn settings() -> LoopSettings {
        LoopSettings {
            symbol: "XAUUSD=X".into(),
            entry_interval: "5m".into(),
            trend_interval: "15m".into(),
            entry_range: "2d".into(),
            trend_range: "4d".into(),
            poll_secs: 3600, // ticker must not fire during the test
            summary_hour_utc: 18,
        }
    }

    /// Session open around the clock so the test passes at any wall time.
    fn permissive_config() -> GateConfig {
        GateConfig {
            session: SessionConfig {
                open_hour: 0,
                close_hour: 23,
                weekends_closed: false,
            },
            ..GateConfig::default()
        }
    }

    #[tokio::test]
    async fn start_and_stop_flip_engine_state() {
        let provider = Arc::new(StubProvider {
            entry: Vec::new(),
            trend: Vec::new(),
        });
        let (event_tx, _event_rx) = mpsc::channel(8);
        let (engine, handle) = Engine::new(
            settings(),
            provider,
            SignalEngine::new(GateConfig::default()),
            event_tx,
        );
        tokio::spawn(engine.run());

        assert_eq!(handle.state().await, EngineState::Stopped);
        handle.send(EngineCommand::Start).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(handle.state().await, EngineState::Running);

        handle.send(EngineCommand::Stop).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(handle.state().await, EngineState::Stopped);
    }

    #[tokio::test]
    async fn manual_check_runs_a_cycle_and_forwards_the_signal() {
        let provider = Arc::new(StubProvider {
            entry: bullish_entry_bars(),
            trend: bullish_trend_bars(),
        });
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let (engine, handle) = Engine::new(
            settings(),
            provider,
            SignalEngine::new(permissive_config()),
            event_tx,
        );
        tokio::spawn(engine.run());

        handle.send(EngineCommand::CheckNow).await;

        let event = tokio::time::timeout(Duration::from_secs(1), event_rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");
        match event {
            BotEvent::SignalFired(record) => assert_eq!(record.direction, Direction::Buy),
            other => panic!("Expected SignalFired, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_provider_data_skips_the_cycle() {
        let provider = Arc::new(StubProvider {
            entry: Vec::new(),
            trend: Vec::new(),
        });
        let (event_tx, mut event_rx) = mpsc::channel(8);
        let (engine, handle) = Engine::new(
            settings(),
            provider,
            SignalEngine::new(permissive_config()),
            event_tx,
        );
        tokio::spawn(engine.run());

        handle.send(EngineCommand::CheckNow).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(event_rx.try_recv().is_err(), "no event expected");
    }
}

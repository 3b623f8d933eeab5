use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{BotEvent, Config};
use market::{Engine, LoopSettings, YahooClient};
use signal::{GateConfig, SignalEngine};
use telegram_ctrl::{start_bot, BotDeps};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let gate_cfg = GateConfig::load(&cfg.gate_config_path);
    info!(symbol = %cfg.symbol, pair = %cfg.pair_name, "GoldBot starting");

    // ── Channels ──────────────────────────────────────────────────────────────
    let (event_tx, mut event_rx) = mpsc::channel::<BotEvent>(64);

    // ── Evaluation loop ───────────────────────────────────────────────────────
    let settings = LoopSettings {
        symbol: cfg.symbol.clone(),
        entry_interval: cfg.entry_interval.clone(),
        trend_interval: cfg.trend_interval.clone(),
        entry_range: cfg.entry_range.clone(),
        trend_range: cfg.trend_range.clone(),
        poll_secs: cfg.poll_secs,
        summary_hour_utc: cfg.summary_hour_utc,
    };
    let provider = Arc::new(YahooClient::new());
    let session = gate_cfg.session.clone();
    let signal_engine = SignalEngine::new(gate_cfg);
    let (engine, engine_handle) = Engine::new(settings, provider, signal_engine, event_tx);

    // ── Telegram C2 ───────────────────────────────────────────────────────────
    let bot_deps = BotDeps {
        command_tx: engine_handle.command_sender(),
        engine_state: engine_handle.state_handle(),
        pair_name: cfg.pair_name.clone(),
        allowed_user_ids: Arc::new(cfg.telegram_allowed_user_ids.clone()),
    };

    // ── Event forwarder (sends signals and summaries to Telegram) ─────────────
    let telegram_token = cfg.telegram_token.clone();
    let alert_user_ids = cfg.telegram_allowed_user_ids.clone();
    let pair_name = cfg.pair_name.clone();
    tokio::spawn(async move {
        let bot = teloxide::Bot::new(telegram_token);
        let chat_ids: Vec<teloxide::types::ChatId> = alert_user_ids
            .iter()
            .map(|&id| teloxide::types::ChatId(id))
            .collect();

        let live = telegram_ctrl::format::startup_message(
            &pair_name,
            session.open_hour,
            session.close_hour,
        );
        telegram_ctrl::send_alert(&bot, &chat_ids, &live).await;

        while let Some(event) = event_rx.recv().await {
            let msg = match event {
                BotEvent::SignalFired(record) => {
                    telegram_ctrl::format::signal_message(&record, &pair_name)
                }
                BotEvent::DailySummary(report) => {
                    telegram_ctrl::format::summary_message(&report, &pair_name)
                }
            };
            telegram_ctrl::send_alert(&bot, &chat_ids, &msg).await;
        }
    });

    // ── Spawn all tasks ───────────────────────────────────────────────────────
    tokio::spawn(engine.run());
    tokio::spawn(start_bot(cfg.telegram_token.clone(), bot_deps));

    // Keep main alive
    info!("All subsystems started. Waiting for shutdown signal.");
    tokio::signal::ctrl_c().await.unwrap();
    info!("Shutdown signal received. Exiting.");
}

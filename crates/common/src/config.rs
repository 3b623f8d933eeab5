/// All configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
///
/// Gate thresholds live in a separate TOML file (see `GATE_CONFIG_PATH` and
/// the `signal` crate); this struct covers process-level settings only.
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub telegram_token: String,
    pub telegram_allowed_user_ids: Vec<i64>,

    // Instrument
    /// Provider symbol, e.g. "XAUUSD=X".
    pub symbol: String,
    /// Display name used in notifications, e.g. "GOLD".
    pub pair_name: String,

    // Timeframes
    pub entry_interval: String,
    pub trend_interval: String,
    pub entry_range: String,
    pub trend_range: String,

    // Scheduling
    pub poll_secs: u64,
    /// UTC hour at which the daily summary is sent.
    pub summary_hour_utc: u32,

    // Gate config file path
    pub gate_config_path: String,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        let telegram_allowed_user_ids = required_env("TELEGRAM_ALLOWED_USER_IDS")
            .split(',')
            .map(|s| {
                s.trim()
                    .parse::<i64>()
                    .unwrap_or_else(|_| {
                        panic!(
                            "TELEGRAM_ALLOWED_USER_IDS contains non-numeric ID: '{}'",
                            s.trim()
                        )
                    })
            })
            .collect();

        Config {
            telegram_token: required_env("TELEGRAM_TOKEN"),
            telegram_allowed_user_ids,
            symbol: optional_env("SYMBOL").unwrap_or_else(|| "XAUUSD=X".to_string()),
            pair_name: optional_env("PAIR_NAME").unwrap_or_else(|| "GOLD".to_string()),
            entry_interval: optional_env("ENTRY_INTERVAL").unwrap_or_else(|| "5m".to_string()),
            trend_interval: optional_env("TREND_INTERVAL").unwrap_or_else(|| "15m".to_string()),
            entry_range: optional_env("ENTRY_RANGE").unwrap_or_else(|| "2d".to_string()),
            trend_range: optional_env("TREND_RANGE").unwrap_or_else(|| "4d".to_string()),
            poll_secs: optional_env("POLL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            summary_hour_utc: optional_env("SUMMARY_HOUR_UTC")
                .and_then(|v| v.parse().ok())
                .unwrap_or(18),
            gate_config_path: optional_env("GATE_CONFIG_PATH")
                .unwrap_or_else(|| "config/gate.toml".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

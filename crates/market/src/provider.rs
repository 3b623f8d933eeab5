use async_trait::async_trait;

use common::{Bar, Result};

/// Abstraction over the market-data source.
///
/// `YahooClient` implements this for live polling. The evaluation loop is
/// the only caller; it treats the returned series as a synchronous input
/// snapshot for one cycle.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch the bar history for `symbol` at `interval` covering `range`
    /// (provider notation, e.g. "5m" / "2d"), oldest bar first.
    ///
    /// An empty vector means "temporarily unavailable" — the cycle is
    /// skipped, not failed.
    async fn fetch_bars(&self, symbol: &str, interval: &str, range: &str) -> Result<Vec<Bar>>;
}

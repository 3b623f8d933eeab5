//! The signal decision engine.
//!
//! Data flows one way: bar series → indicators → pattern detectors →
//! signal gate, with the higher-timeframe trend lock feeding the gate from
//! the side. [`SignalEngine::evaluate`] is the single entry point; it never
//! performs I/O and takes the reference instant as a parameter.

pub mod engine;
pub mod gate;
pub mod indicators;
pub mod patterns;
pub mod series;
pub mod session;
pub mod trend;

pub use engine::SignalEngine;
pub use gate::{Candidate, GateConfig, MarketSnapshot, SignalGate, SignalState};
pub use patterns::Zone;
pub use series::{BarSeries, IndicatorParams};
pub use session::SessionConfig;
pub use trend::{Trend, TrendLock};

//! Pure indicator functions over bar/close series.
//!
//! Each returns one value per input bar; leading bars hold "not ready"
//! values until the rolling window fills. All are deterministic functions
//! of their input slice.

pub mod adx;
pub mod ema;
pub mod rsi;

pub use adx::adx;
pub use ema::ema;
pub use rsi::rsi;

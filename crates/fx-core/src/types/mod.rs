//! 도메인 타입.

pub mod currency;
pub mod rate;
pub mod window;

pub use currency::CurrencyCode;
pub use rate::{FilteredSeries, LatestRate, RateRecord, RateSeries};
pub use window::TrailingWindow;

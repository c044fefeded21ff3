//! 갱신 작업 모듈.

pub mod refresh;

pub use refresh::{refresh_bulk, refresh_daily, RefreshMode};

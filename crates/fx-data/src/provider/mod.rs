//! 외부 환율 데이터 Provider.
//!
//! - `frankfurter`: Frankfurter API (ECB 기준 환율, 영업일 단위)

pub mod frankfurter;

pub use frankfurter::FrankfurterClient;

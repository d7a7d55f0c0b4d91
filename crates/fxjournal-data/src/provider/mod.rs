//! CSV 데이터 소스.
//!
//! - `trade_log`: 브로커 트레이드 로그
//! - `price_csv`: 타임프레임별 OHLC 가격 파일

pub mod price_csv;
pub mod trade_log;

pub use price_csv::PriceSeriesLoader;
pub use trade_log::TradeLogLoader;

//! 트레이드 저널 분석을 위한 도메인 모델.

mod market_data;
mod trade;

pub use market_data::*;
pub use trade::*;

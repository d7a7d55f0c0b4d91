//! 데이터 로딩.
//!
//! 이 crate는 분석 파이프라인의 입력을 CSV 파일에서 읽어옵니다:
//! - 트레이드 로그 로더 (두 가지 시각 형식, 고정 시각 오프셋)
//! - 타임프레임별 가격 시계열 로더 (고정 DST 보정)

pub mod error;
pub mod provider;
pub mod timestamp;

pub use error::{DataError, Result};
pub use provider::{PriceSeriesLoader, TradeLogLoader};

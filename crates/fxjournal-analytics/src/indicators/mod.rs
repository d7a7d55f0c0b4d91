//! 차트 보조 지표.
//!
//! # 지원 지표
//!
//! - **RSI**: 단순 이동평균 기반 상대강도지수
//! - **Bollinger Bands**: 표본 표준편차 기반 볼린저 밴드
//!
//! 두 지표 모두 입력과 같은 길이의 결과를 반환하며, 계산에 필요한 데이터가 모이기 전의
//! 위치는 `None`입니다.
//!
//! # 사용 예시
//!
//! ```rust
//! use fxjournal_analytics::indicators::{bollinger_bands, rolling_rsi, BollingerParams};
//! use rust_decimal_macros::dec;
//!
//! let closes = vec![dec!(1.2650), dec!(1.2660), dec!(1.2655), dec!(1.2670)];
//! let rsi = rolling_rsi(&closes, 2).unwrap();
//! assert_eq!(rsi.len(), closes.len());
//!
//! let bands = bollinger_bands(&closes, BollingerParams::new(3, dec!(2))).unwrap();
//! assert!(bands[2].upper.is_some());
//! ```

pub mod momentum;
pub mod volatility;

use thiserror::Error;

pub use momentum::rolling_rsi;
pub use volatility::{bollinger_bands, BollingerParams, BollingerPoint};

/// 지표 계산 오류.
#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

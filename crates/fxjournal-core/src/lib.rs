//! # FX Journal Core
//!
//! 트레이드 저널 분석의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 분석 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 거래 기록과 거래 방향
//! - 캔들 및 가격 시계열 구간 조회
//! - 타임프레임 정의
//! - 시계 보정과 캔들 경계 정렬
//! - 설정 관리
//! - 로깅 인프라

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;

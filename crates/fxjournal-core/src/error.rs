//! 트레이드 저널 분석의 에러 타입.
//!
//! 이 모듈은 분석 파이프라인 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 분석 에러.
#[derive(Debug, Error)]
pub enum JournalError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 사용자 입력 검증 실패 (거래 번호 범위, 분석 옵션 등)
    #[error("잘못된 입력: {0}")]
    Validation(String),

    /// 선택된 거래가 없음
    #[error("데이터 없음: {0}")]
    NoData(String),

    /// 데이터 소스 에러
    #[error("데이터 에러: {0}")]
    Data(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 분석 작업을 위한 Result 타입.
pub type JournalResult<T> = Result<T, JournalError>;

impl JournalError {
    /// 사용자 입력을 고치면 해결되는 에러인지 확인합니다.
    pub fn is_user_error(&self) -> bool {
        matches!(self, JournalError::Validation(_) | JournalError::NoData(_))
    }
}

impl From<config::ConfigError> for JournalError {
    fn from(err: config::ConfigError) -> Self {
        JournalError::Config(err.to_string())
    }
}

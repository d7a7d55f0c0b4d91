//! 데이터 모듈 오류 타입.

use fxjournal_core::JournalError;
use std::path::Path;
use thiserror::Error;

/// 데이터 로딩 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 파일 입출력 오류
    #[error("I/O error: {0}")]
    Io(String),

    /// CSV 형식 오류
    #[error("CSV error: {0}")]
    Csv(String),

    /// 필드 파싱 오류
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// 파싱은 되었지만 도메인 규칙을 어기는 데이터
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 파일을 찾을 수 없음
    #[error("File not found: {0}")]
    NotFound(String),
}

impl DataError {
    pub(crate) fn parse(row: usize, message: impl Into<String>) -> Self {
        DataError::Parse {
            row,
            message: message.into(),
        }
    }

    /// 입출력 오류 메시지에 파일 경로를 붙입니다.
    pub(crate) fn with_path_context(self, path: &Path) -> Self {
        match self {
            DataError::NotFound(_) => DataError::NotFound(path.display().to_string()),
            DataError::Io(msg) => DataError::Io(format!("{}: {}", path.display(), msg)),
            other => other,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => DataError::NotFound(err.to_string()),
            _ => DataError::Io(err.to_string()),
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Csv(err.to_string())
    }
}

impl From<DataError> for JournalError {
    fn from(err: DataError) -> Self {
        JournalError::Data(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

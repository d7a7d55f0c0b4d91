//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 거래 선택 분석 및 결과 출력
//! - 지원 타임프레임 확인

pub mod commands;

pub use commands::analyze::{render_report, run_analyze, AnalyzeCliConfig, SettingsOverrides};
pub use commands::timeframes::print_timeframes;

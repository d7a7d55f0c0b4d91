//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정과 분석 옵션을 정의하고 관리합니다.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::clock::{DstCalibration, DEFAULT_TRADE_OFFSET_HOURS};
use crate::error::{JournalError, JournalResult};
use crate::types::Timeframe;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 데이터 파일 설정
    #[serde(default)]
    pub data: DataConfig,
    /// 시계 보정 설정
    #[serde(default)]
    pub clock: ClockConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 분석 옵션 기본값
    #[serde(default)]
    pub analysis: AnalysisSettings,
}

/// 데이터 파일 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// 트레이드 로그 CSV 경로
    pub trades_path: PathBuf,
    /// 가격 CSV 파일 디렉토리
    pub prices_dir: PathBuf,
    /// 타임프레임 라벨별 가격 파일 이름 재정의 (예: "1H" = "h1.csv")
    pub price_files: HashMap<String, String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            trades_path: PathBuf::from("trades/trade_0.csv"),
            prices_dir: PathBuf::from("."),
            price_files: HashMap::new(),
        }
    }
}

impl DataConfig {
    /// 타임프레임의 가격 파일 경로를 반환합니다.
    ///
    /// 재정의 키는 `Timeframe::from_label`이 받는 모든 표기(대소문자 무관)를 허용합니다.
    pub fn price_path(&self, timeframe: Timeframe) -> PathBuf {
        let file = self
            .price_files
            .iter()
            .find(|(label, _)| Timeframe::from_label(label) == Some(timeframe))
            .map(|(_, file)| file.as_str())
            .unwrap_or_else(|| timeframe.default_file_name());
        self.prices_dir.join(file)
    }
}

/// 시계 보정 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClockConfig {
    /// 트레이드 로그 시각 오프셋 (시간)
    pub trade_offset_hours: i64,
    /// 가격 시계열 DST 보정 시작 시각
    pub price_dst_cutover: NaiveDateTime,
    /// 가격 시계열 DST 보정 시간
    pub price_dst_shift_hours: i64,
}

impl Default for ClockConfig {
    fn default() -> Self {
        let dst = DstCalibration::default();
        Self {
            trade_offset_hours: DEFAULT_TRADE_OFFSET_HOURS,
            price_dst_cutover: dst.cutover,
            price_dst_shift_hours: dst.shift_hours,
        }
    }
}

impl ClockConfig {
    /// 가격 시계열 DST 보정값.
    pub fn price_calibration(&self) -> DstCalibration {
        DstCalibration {
            cutover: self.price_dst_cutover,
            shift_hours: self.price_dst_shift_hours,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 한 번의 분석 요청에 적용되는 표시/지표 옵션.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// 첫 거래 앞에 보여줄 캔들 수
    pub candles_before: u32,
    /// 마지막 거래 뒤에 보여줄 캔들 수
    pub candles_after: u32,
    /// 포지션 랏 수량 표시
    pub show_lot_size: bool,
    /// 헤지 거래 표시 (false면 청산 시각별 첫 거래만 남김)
    pub show_hedges: bool,
    /// RSI 표시
    pub show_rsi: bool,
    /// RSI 기간
    pub rsi_length: usize,
    /// 볼린저 밴드 표시
    pub show_bollinger: bool,
    /// 볼린저 밴드 기간
    pub bollinger_period: usize,
    /// 볼린저 밴드 표준편차 배수
    pub bollinger_std_dev: Decimal,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            candles_before: 5,
            candles_after: 5,
            show_lot_size: false,
            show_hedges: true,
            show_rsi: false,
            rsi_length: 21,
            show_bollinger: false,
            bollinger_period: 20,
            bollinger_std_dev: Decimal::TWO,
        }
    }
}

impl AnalysisSettings {
    /// 옵션 범위를 검증합니다.
    pub fn validate(&self) -> JournalResult<()> {
        if self.rsi_length < 1 {
            return Err(JournalError::Validation(
                "RSI length must be at least 1".to_string(),
            ));
        }
        if self.bollinger_period < 1 {
            return Err(JournalError::Validation(
                "Bollinger Bands period must be at least 1".to_string(),
            ));
        }
        if self.bollinger_std_dev.is_sign_negative() {
            return Err(JournalError::Validation(format!(
                "Bollinger Bands std. dev must not be negative: {}",
                self.bollinger_std_dev
            )));
        }
        Ok(())
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("FXJOURNAL")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_analysis_defaults() {
        let settings = AnalysisSettings::default();
        assert_eq!(settings.candles_before, 5);
        assert_eq!(settings.candles_after, 5);
        assert!(settings.show_hedges);
        assert!(!settings.show_lot_size);
        assert_eq!(settings.rsi_length, 21);
        assert_eq!(settings.bollinger_period, 20);
        assert_eq!(settings.bollinger_std_dev, dec!(2));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_analysis_validation() {
        let settings = AnalysisSettings {
            rsi_length: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(JournalError::Validation(_))));

        let settings = AnalysisSettings {
            bollinger_std_dev: dec!(-1),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_price_path_override() {
        let mut data = DataConfig {
            prices_dir: PathBuf::from("prices"),
            ..Default::default()
        };
        assert_eq!(
            data.price_path(Timeframe::H1),
            PathBuf::from("prices/GUH1_OHLC_dropnaCSV.csv")
        );

        data.price_files.insert("1H".to_string(), "hourly.csv".to_string());
        assert_eq!(data.price_path(Timeframe::H1), PathBuf::from("prices/hourly.csv"));
    }

    #[test]
    fn test_clock_defaults() {
        let clock = ClockConfig::default();
        assert_eq!(clock.trade_offset_hours, -2);
        assert_eq!(clock.price_calibration(), DstCalibration::default());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.clock.trade_offset_hours, -2);
        assert_eq!(config.analysis, AnalysisSettings::default());
    }
}

//! 가격 시계열 파일의 타임프레임 정의.
//!
//! 분석 도구는 1분봉부터 일봉까지 여섯 개의 타임프레임만 다룹니다.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 캔들스틱 타임프레임.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    /// 1분봉
    #[serde(rename = "1M")]
    M1,
    /// 5분봉
    #[serde(rename = "5M")]
    M5,
    /// 15분봉
    #[serde(rename = "15M")]
    M15,
    /// 1시간봉
    #[serde(rename = "1H")]
    H1,
    /// 4시간봉
    #[serde(rename = "4H")]
    H4,
    /// 일봉
    #[serde(rename = "1D")]
    D1,
}

impl Timeframe {
    /// 지원하는 모든 타임프레임 (짧은 순).
    pub const ALL: [Timeframe; 6] = [
        Timeframe::M1,
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
    ];

    /// 이 타임프레임의 분 단위 값을 반환합니다.
    pub fn as_minutes(&self) -> u32 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
            Timeframe::D1 => 1440,
        }
    }

    /// 이 타임프레임의 초 단위 값을 반환합니다.
    pub fn as_secs(&self) -> u32 {
        self.as_minutes() * 60
    }

    /// 캔들 한 개의 기간을 반환합니다.
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.as_minutes()))
    }

    /// 화면/설정에서 사용하는 라벨 ("1M", "4H" 등).
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1M",
            Timeframe::M5 => "5M",
            Timeframe::M15 => "15M",
            Timeframe::H1 => "1H",
            Timeframe::H4 => "4H",
            Timeframe::D1 => "1D",
        }
    }

    /// 기본 가격 파일 이름.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Timeframe::M1 => "GUM1_OHLC_dropnaCSV.csv",
            Timeframe::M5 => "GUM5_OHLC_dropnaCSV.csv",
            Timeframe::M15 => "GUM15_OHLC_dropnaCSV.csv",
            Timeframe::H1 => "GUH1_OHLC_dropnaCSV.csv",
            Timeframe::H4 => "GUH4_OHLC_dropnaCSV.csv",
            Timeframe::D1 => "GUD1_OHLC_dropnaCSV.csv",
        }
    }

    /// 라벨 또는 분 단위 숫자에서 파싱합니다.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "1M" | "M1" | "1" => Some(Timeframe::M1),
            "5M" | "M5" | "5" => Some(Timeframe::M5),
            "15M" | "M15" | "15" => Some(Timeframe::M15),
            "1H" | "H1" | "60" => Some(Timeframe::H1),
            "4H" | "H4" | "240" => Some(Timeframe::H4),
            "1D" | "D1" | "1440" => Some(Timeframe::D1),
            _ => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("Invalid timeframe: {}", s))
    }
}

//! 시장 데이터 타입 및 가격 시계열 조회.
//!
//! 이 모듈은 시장 데이터 관련 타입을 정의합니다:
//! - `Candle` - OHLC 캔들스틱 한 개
//! - `CandleField` / `Extreme` - 구간 조회 대상 필드와 방향
//! - `PriceSeries` - 하나의 타임프레임에 대한 시간 정렬 캔들 시계열

use crate::error::{JournalError, JournalResult};
use crate::types::{Price, Timeframe};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// OHLC 캔들스틱 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시각
    pub timestamp: NaiveDateTime,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(timestamp: NaiveDateTime, open: Price, high: Price, low: Price, close: Price) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }
}

/// 캔들의 OHLC 필드 선택자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandleField {
    Open,
    High,
    Low,
    Close,
}

impl CandleField {
    /// 캔들에서 해당 필드 값을 꺼냅니다.
    #[inline]
    pub fn of(&self, candle: &Candle) -> Price {
        match self {
            CandleField::Open => candle.open,
            CandleField::High => candle.high,
            CandleField::Low => candle.low,
            CandleField::Close => candle.close,
        }
    }
}

/// 구간 극값의 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extreme {
    Min,
    Max,
}

/// 한 타임프레임의 가격 시계열.
///
/// 캔들은 시작 시각 기준으로 엄격하게 증가합니다. 세션 공백은 채우지 않습니다.
/// 한 번 로드되면 분석 요청 동안 변경되지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

#[derive(Deserialize)]
struct RawPriceSeries {
    timeframe: Timeframe,
    candles: Vec<Candle>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = JournalError;

    fn try_from(raw: RawPriceSeries) -> JournalResult<Self> {
        Self::new(raw.timeframe, raw.candles)
    }
}

impl PriceSeries {
    /// 정렬된 캔들 목록으로 시계열을 생성합니다.
    ///
    /// 시각이 엄격하게 증가하지 않으면 `JournalError::Data`를 반환합니다.
    pub fn new(timeframe: Timeframe, candles: Vec<Candle>) -> JournalResult<Self> {
        if let Some(pos) = candles
            .windows(2)
            .position(|pair| pair[0].timestamp >= pair[1].timestamp)
        {
            return Err(JournalError::Data(format!(
                "{} 시계열의 캔들 시각이 증가하지 않습니다: {} -> {}",
                timeframe,
                candles[pos].timestamp,
                candles[pos + 1].timestamp
            )));
        }

        Ok(Self { timeframe, candles })
    }

    /// 시계열의 타임프레임.
    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// 전체 캔들.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// 캔들 수.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 캔들이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 첫 캔들의 시각.
    pub fn first_time(&self) -> Option<NaiveDateTime> {
        self.candles.first().map(|c| c.timestamp)
    }

    /// 마지막 캔들의 시각.
    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.candles.last().map(|c| c.timestamp)
    }

    /// `time` 이상인 첫 캔들의 인덱스 (없으면 `len()`).
    pub fn index_at_or_after(&self, time: NaiveDateTime) -> usize {
        self.candles.partition_point(|c| c.timestamp < time)
    }

    /// `[start, end]` 닫힌 구간에 시작 시각이 포함된 캔들 슬라이스.
    ///
    /// 경계가 캔들 시작 시각과 일치하지 않아도 됩니다. `start > end`이면 빈 슬라이스입니다.
    pub fn window(&self, start: NaiveDateTime, end: NaiveDateTime) -> &[Candle] {
        let lo = self.index_at_or_after(start);
        let hi = self.candles.partition_point(|c| c.timestamp <= end);
        if lo >= hi {
            return &[];
        }
        &self.candles[lo..hi]
    }

    /// 닫힌 구간 `[start, end]`에서 지정 필드의 최소/최대값.
    ///
    /// 구간에 캔들이 없으면 `None` (정의되지 않은 값)을 반환합니다.
    pub fn window_extremes(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        field: CandleField,
        extreme: Extreme,
    ) -> Option<Price> {
        let values = self.window(start, end).iter().map(|c| field.of(c));
        match extreme {
            Extreme::Min => values.min(),
            Extreme::Max => values.max(),
        }
    }
}

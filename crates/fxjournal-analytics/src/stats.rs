//! 요약 통계와 평균 가격.
//!
//! 정의되지 않은 값(`None`)은 집계에서 건너뜁니다.

use rust_decimal::Decimal;
use serde::Serialize;

use fxjournal_core::{Price, Trade};

/// 평균. 값이 없으면 `None`.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len()))
}

/// 중앙값. 짝수 개면 가운데 두 값의 평균입니다.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / Decimal::TWO)
    } else {
        Some(sorted[mid])
    }
}

/// 지표 계열 하나의 요약 통계.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SummaryStats {
    /// 정의된 값의 수
    pub count: usize,
    pub mean: Option<Decimal>,
    pub median: Option<Decimal>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl SummaryStats {
    /// 값 목록에서 요약 통계를 계산합니다.
    pub fn from_values(values: &[Decimal]) -> Self {
        Self {
            count: values.len(),
            mean: mean(values),
            median: median(values),
            min: values.iter().min().copied(),
            max: values.iter().max().copied(),
        }
    }

    /// 정의되지 않은 값을 건너뛰고 요약 통계를 계산합니다.
    pub fn from_optional<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<Decimal>>,
    {
        let defined: Vec<Decimal> = values.into_iter().flatten().collect();
        Self::from_values(&defined)
    }
}

/// 선택된 거래의 평균 진입/청산 가격.
///
/// 랏 가중 평균은 총 랏이 0이면 정의되지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceAverages {
    pub unweighted_open: Option<Price>,
    pub unweighted_close: Option<Price>,
    pub unweighted_difference: Option<Price>,
    pub weighted_open: Option<Price>,
    pub weighted_close: Option<Price>,
    pub weighted_difference: Option<Price>,
}

impl PriceAverages {
    /// 거래 목록에서 평균 가격을 계산합니다.
    pub fn from_trades<'a, I>(trades: I) -> Self
    where
        I: IntoIterator<Item = &'a Trade>,
    {
        let trades: Vec<&Trade> = trades.into_iter().collect();
        let opens: Vec<Price> = trades.iter().map(|t| t.open_price).collect();
        let closes: Vec<Price> = trades.iter().map(|t| t.close_price).collect();

        let total_volume: Decimal = trades.iter().map(|t| t.volume).sum();
        let weighted = |price: fn(&Trade) -> Price| -> Option<Price> {
            if total_volume.is_zero() {
                return None;
            }
            let sum: Decimal = trades.iter().map(|t| price(t) * t.volume).sum();
            Some(sum / total_volume)
        };

        let unweighted_open = mean(&opens);
        let unweighted_close = mean(&closes);
        let weighted_open = weighted(|t| t.open_price);
        let weighted_close = weighted(|t| t.close_price);

        Self {
            unweighted_open,
            unweighted_close,
            unweighted_difference: difference(unweighted_open, unweighted_close),
            weighted_open,
            weighted_close,
            weighted_difference: difference(weighted_open, weighted_close),
        }
    }
}

fn difference(open: Option<Price>, close: Option<Price>) -> Option<Price> {
    Some(close? - open?)
}

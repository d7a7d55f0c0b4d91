//! 차트 구간 데이터.
//!
//! 렌더링은 하지 않고, 표시 계층이 그릴 캔들 구간과 거래 마커, 보조 지표 값을 계산합니다.
//! 구간은 첫 진입부터 마지막 청산까지를 캔들 경계에 맞춘 뒤 앞뒤로 캔들 수만큼 넓힙니다.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use fxjournal_core::clock::align;
use fxjournal_core::{
    AnalysisSettings, Candle, JournalError, JournalResult, Price, PriceSeries, Side, Timeframe,
    Volume,
};

use crate::indicators::{bollinger_bands, rolling_rsi, BollingerParams, BollingerPoint};
use crate::signal::SignalBook;

/// 차트 위의 거래 표시.
///
/// 시각은 캔들 경계에 맞추고 시계열 범위로 제한한 값입니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeMarker {
    pub trade_id: u32,
    pub signal_id: u32,
    pub side: Side,
    pub open_time: NaiveDateTime,
    pub open_price: Price,
    pub close_time: NaiveDateTime,
    pub close_price: Price,
    /// 랏 수량 표시를 켠 경우에만 채워집니다.
    pub lot_size: Option<Volume>,
}

/// 표시할 차트 구간.
#[derive(Debug, Clone, Serialize)]
pub struct ChartWindow {
    pub timeframe: Timeframe,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub candles: Vec<Candle>,
    pub markers: Vec<TradeMarker>,
    /// `candles`와 같은 길이
    pub rsi: Option<Vec<Option<Decimal>>>,
    /// `candles`와 같은 길이
    pub bollinger: Option<Vec<BollingerPoint>>,
}

impl ChartWindow {
    /// 그룹화된 거래와 가격 시계열로 차트 구간을 만듭니다.
    ///
    /// 거래나 캔들이 없으면 `None`을 반환합니다.
    pub fn build(
        book: &SignalBook,
        series: &PriceSeries,
        settings: &AnalysisSettings,
    ) -> JournalResult<Option<Self>> {
        let (Some(first), Some(last)) = (series.first_time(), series.last_time()) else {
            return Ok(None);
        };
        let Some(first_open) = book.trades().iter().map(|g| g.trade.open_time).min() else {
            return Ok(None);
        };
        let last_close = book
            .trades()
            .iter()
            .map(|g| g.trade.close_time)
            .max()
            .unwrap_or(first_open);

        let timeframe = series.timeframe();
        // 진입은 시계열 시작 아래로, 청산은 시계열 끝 위로만 넘지 않게 합니다.
        let bound_open = |ts: NaiveDateTime| align(ts, timeframe).max(first);
        let bound_close = |ts: NaiveDateTime| align(ts, timeframe).min(last);

        let start = shift(bound_open(first_open), timeframe, -i64::from(settings.candles_before));
        let end = shift(bound_close(last_close), timeframe, i64::from(settings.candles_after));

        let lo = series.index_at_or_after(start);
        let candles = series.window(start, end);
        let hi = lo + candles.len();

        let markers = book
            .trades()
            .iter()
            .map(|g| TradeMarker {
                trade_id: g.trade.id,
                signal_id: g.signal_id,
                side: g.trade.side,
                open_time: bound_open(g.trade.open_time),
                open_price: g.trade.open_price,
                close_time: bound_close(g.trade.close_time),
                close_price: g.trade.close_price,
                lot_size: settings.show_lot_size.then_some(g.trade.volume),
            })
            .collect();

        let rsi = if settings.show_rsi {
            let closes = closes_with_warmup(series, lo, hi, settings.rsi_length);
            let values = rolling_rsi(&closes, settings.rsi_length)
                .map_err(|e| JournalError::Validation(e.to_string()))?;
            Some(tail(values, hi - lo))
        } else {
            None
        };

        let bollinger = if settings.show_bollinger {
            let params = BollingerParams::new(settings.bollinger_period, settings.bollinger_std_dev);
            let closes = closes_with_warmup(series, lo, hi, settings.bollinger_period);
            let values = bollinger_bands(&closes, params)
                .map_err(|e| JournalError::Validation(e.to_string()))?;
            Some(tail(values, hi - lo))
        } else {
            None
        };

        debug!(
            timeframe = %timeframe,
            start = %start,
            end = %end,
            candles = candles.len(),
            "Built chart window"
        );

        Ok(Some(Self {
            timeframe,
            start,
            end,
            candles: candles.to_vec(),
            markers,
            rsi,
            bollinger,
        }))
    }
}

/// 캔들 `count`개만큼 시각을 이동합니다.
fn shift(ts: NaiveDateTime, timeframe: Timeframe, count: i64) -> NaiveDateTime {
    let span = Duration::minutes(i64::from(timeframe.as_minutes()) * count);
    ts.checked_add_signed(span).unwrap_or(if count < 0 {
        NaiveDateTime::MIN
    } else {
        NaiveDateTime::MAX
    })
}

/// 구간 `[lo, hi)` 앞에 최대 `warmup`개 캔들을 더한 종가.
fn closes_with_warmup(series: &PriceSeries, lo: usize, hi: usize, warmup: usize) -> Vec<Decimal> {
    let from = lo.saturating_sub(warmup);
    series.candles()[from..hi].iter().map(|c| c.close).collect()
}

fn tail<T>(mut values: Vec<T>, len: usize) -> Vec<T> {
    let skip = values.len().saturating_sub(len);
    values.drain(..skip);
    values
}

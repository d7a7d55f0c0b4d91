//! 시그널 및 일별 집계 지표.
//!
//! 모든 시그널 단위 결과는 `signal_id`를 조인 키로 유지하며 시그널 ID 순으로 반환됩니다.
//! 기준 거래와 기준 가격은 [`SignalBook`]이 계산한 값을 그대로 사용합니다.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use fxjournal_core::{to_pips, CandleField, Extreme, Pips, PriceSeries, Side, Trade, Volume};

use crate::signal::SignalBook;
use crate::stats::{mean, median};

/// 시그널 기준 가격으로부터의 핍 거리.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipDistance {
    pub signal_id: u32,
    pub trade_count: usize,
    pub mean_pips: Pips,
    pub median_pips: Pips,
}

/// 날짜별 실현 손익 합계.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProfit {
    pub date: NaiveDate,
    pub profit: Decimal,
}

/// 시그널별 랏 수량.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalVolume {
    pub signal_id: u32,
    pub volume: Volume,
}

/// 시그널별 거래 수.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalTradeCount {
    pub signal_id: u32,
    pub trade_count: usize,
}

/// 시그널 기준 거래의 최대 역행 폭.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalDrawdown {
    pub signal_id: u32,
    pub side: Side,
    pub open_time: NaiveDateTime,
    pub close_time: NaiveDateTime,
    /// 구간에 캔들이 없으면 `None`
    pub max_pip_drawdown: Option<Pips>,
}

/// 시그널 단위 지표를 한 행으로 모은 표.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalRow {
    pub signal_id: u32,
    pub side: Side,
    pub open_time: NaiveDateTime,
    pub close_time: NaiveDateTime,
    pub anchor_price: Decimal,
    pub trade_count: usize,
    pub volume: Volume,
    pub initial_volume: Volume,
    pub mean_pips: Pips,
    pub median_pips: Pips,
    pub max_pip_drawdown: Option<Pips>,
}

/// 시그널마다 구성 거래의 기준 가격 대비 핍 거리 평균/중앙값.
pub fn pip_distances(book: &SignalBook) -> Vec<PipDistance> {
    book.signals()
        .iter()
        .map(|signal| {
            let pips: Vec<Pips> = book
                .members(signal)
                .iter()
                .map(|m| to_pips(m.trade.open_price - signal.anchor_price()))
                .collect();

            PipDistance {
                signal_id: signal.id,
                trade_count: pips.len(),
                mean_pips: mean(&pips).unwrap_or_default(),
                median_pips: median(&pips).unwrap_or_default(),
            }
        })
        .collect()
}

/// 청산 날짜별 손익 합계 (날짜 순).
pub fn daily_profit<'a, I>(trades: I) -> Vec<DailyProfit>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut by_date: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for trade in trades {
        *by_date.entry(trade.close_time.date()).or_default() += trade.profit;
    }

    by_date
        .into_iter()
        .map(|(date, profit)| DailyProfit { date, profit })
        .collect()
}

/// 시그널별 누적 랏 수량.
pub fn cumulative_volumes(book: &SignalBook) -> Vec<SignalVolume> {
    book.signals()
        .iter()
        .map(|signal| SignalVolume {
            signal_id: signal.id,
            volume: book.members(signal).iter().map(|m| m.trade.volume).sum(),
        })
        .collect()
}

/// 시그널별 거래 수.
pub fn trade_counts(book: &SignalBook) -> Vec<SignalTradeCount> {
    book.signals()
        .iter()
        .map(|signal| SignalTradeCount {
            signal_id: signal.id,
            trade_count: signal.trade_count(),
        })
        .collect()
}

/// 시그널별 첫 거래의 랏 수량.
pub fn initial_volumes(book: &SignalBook) -> Vec<SignalVolume> {
    book.signals()
        .iter()
        .map(|signal| SignalVolume {
            signal_id: signal.id,
            volume: signal.initial_volume(),
        })
        .collect()
}

/// 거래 보유 구간 `[open_time, close_time]` 동안의 최대 역행 폭 (핍).
///
/// - 매수: (구간 최저가 - 진입가) × 10000
/// - 매도: (진입가 - 구간 최고가) × 10000
///
/// 구간에 캔들이 없으면 `None`.
pub fn drawdown_pips(trade: &Trade, series: &PriceSeries) -> Option<Pips> {
    match trade.side {
        Side::Buy => series
            .window_extremes(trade.open_time, trade.close_time, CandleField::Low, Extreme::Min)
            .map(|low| to_pips(low - trade.open_price)),
        Side::Sell => series
            .window_extremes(trade.open_time, trade.close_time, CandleField::High, Extreme::Max)
            .map(|high| to_pips(trade.open_price - high)),
    }
}

/// 시그널마다 기준 거래의 최대 역행 폭.
///
/// 빈 구간은 배치를 중단하지 않고 `None`으로 기록합니다.
pub fn max_drawdowns(book: &SignalBook, series: &PriceSeries) -> Vec<SignalDrawdown> {
    book.signals()
        .iter()
        .map(|signal| {
            let anchor = &signal.anchor;
            let max_pip_drawdown = drawdown_pips(anchor, series);
            if max_pip_drawdown.is_none() {
                warn!(
                    signal_id = signal.id,
                    trade_id = anchor.id,
                    open_time = %anchor.open_time,
                    close_time = %anchor.close_time,
                    timeframe = %series.timeframe(),
                    "No candles inside trade window, drawdown undefined"
                );
            }

            SignalDrawdown {
                signal_id: signal.id,
                side: signal.side,
                open_time: anchor.open_time,
                close_time: anchor.close_time,
                max_pip_drawdown,
            }
        })
        .collect()
}

/// 시그널 단위 지표를 시그널 ID로 조인합니다.
pub fn signal_table(book: &SignalBook, series: &PriceSeries) -> Vec<SignalRow> {
    let pips = pip_distances(book);
    let volumes = cumulative_volumes(book);
    let drawdowns = max_drawdowns(book, series);

    book.signals()
        .iter()
        .zip(pips)
        .zip(volumes)
        .zip(drawdowns)
        .map(|(((signal, pips), volume), drawdown)| SignalRow {
            signal_id: signal.id,
            side: signal.side,
            open_time: signal.anchor.open_time,
            close_time: signal.close_time,
            anchor_price: signal.anchor_price(),
            trade_count: signal.trade_count(),
            volume: volume.volume,
            initial_volume: signal.initial_volume(),
            mean_pips: pips.mean_pips,
            median_pips: pips.median_pips,
            max_pip_drawdown: drawdown.max_pip_drawdown,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxjournal_core::{Candle, Timeframe};
    use rust_decimal_macros::dec;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn candle(t: NaiveDateTime, high: Decimal, low: Decimal) -> Candle {
        Candle::new(t, dec!(1.2650), high, low, dec!(1.2650))
    }

    fn series() -> PriceSeries {
        PriceSeries::new(
            Timeframe::H1,
            vec![
                candle(at(2, 9, 0), dec!(1.2660), dec!(1.2640)),
                candle(at(2, 10, 0), dec!(1.2690), dec!(1.2630)),
                candle(at(2, 11, 0), dec!(1.2700), dec!(1.2645)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_long_drawdown_uses_window_low() {
        let trade = Trade::new(1, Side::Buy, at(2, 9, 0), dec!(1.2650), at(2, 10, 30), dec!(1.2670), dec!(1));
        assert_eq!(drawdown_pips(&trade, &series()), Some(dec!(-20)));
    }

    #[test]
    fn test_short_drawdown_uses_window_high() {
        let trade = Trade::new(1, Side::Sell, at(2, 9, 0), dec!(1.2650), at(2, 11, 0), dec!(1.2640), dec!(1));
        assert_eq!(drawdown_pips(&trade, &series()), Some(dec!(-50)));
    }

    #[test]
    fn test_empty_window_is_undefined() {
        let trade = Trade::new(1, Side::Buy, at(2, 9, 10), dec!(1.2650), at(2, 9, 40), dec!(1.2655), dec!(1));
        assert_eq!(drawdown_pips(&trade, &series()), None);

        let book = SignalBook::group(&[trade]);
        let rows = max_drawdowns(&book, &series());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].max_pip_drawdown, None);
    }

    #[test]
    fn test_daily_profit_sums_by_close_date() {
        let trades = vec![
            Trade::new(1, Side::Buy, at(2, 9, 0), dec!(1.2650), at(2, 10, 0), dec!(1.2700), dec!(1))
                .with_profit(dec!(50)),
            Trade::new(2, Side::Sell, at(2, 11, 0), dec!(1.2700), at(2, 15, 0), dec!(1.2720), dec!(1))
                .with_profit(dec!(-20)),
            Trade::new(3, Side::Buy, at(2, 23, 0), dec!(1.2650), at(3, 1, 0), dec!(1.2660), dec!(1))
                .with_profit(dec!(10)),
        ];

        let daily = daily_profit(&trades);
        assert_eq!(
            daily,
            vec![
                DailyProfit {
                    date: NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
                    profit: dec!(30),
                },
                DailyProfit {
                    date: NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
                    profit: dec!(10),
                },
            ]
        );
    }

    #[test]
    fn test_signal_level_metrics() {
        let trades = vec![
            Trade::new(1, Side::Buy, at(2, 9, 0), dec!(1.2650), at(2, 11, 0), dec!(1.2700), dec!(0.10)),
            Trade::new(2, Side::Buy, at(2, 9, 30), dec!(1.2630), at(2, 11, 0), dec!(1.2700), dec!(0.20)),
            Trade::new(3, Side::Buy, at(2, 10, 0), dec!(1.2620), at(2, 11, 0), dec!(1.2700), dec!(0.40)),
            Trade::new(4, Side::Sell, at(2, 10, 30), dec!(1.2660), at(2, 10, 45), dec!(1.2655), dec!(0.10)),
        ];
        let book = SignalBook::group(&trades);

        let pips = pip_distances(&book);
        assert_eq!(pips.len(), 2);
        assert_eq!(pips[0].trade_count, 3);
        // 0, -20, -30
        assert_eq!(pips[0].mean_pips.round_dp(4), dec!(-16.6667));
        assert_eq!(pips[0].median_pips, dec!(-20));
        assert_eq!(pips[1].mean_pips, Decimal::ZERO);
        assert_eq!(pips[1].median_pips, Decimal::ZERO);

        let volumes = cumulative_volumes(&book);
        assert_eq!(volumes[0].volume, dec!(0.70));
        assert_eq!(initial_volumes(&book)[0].volume, dec!(0.10));
        assert_eq!(trade_counts(&book)[0].trade_count, 3);

        let table = signal_table(&book, &series());
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].signal_id, 1);
        assert_eq!(table[0].max_pip_drawdown, Some(dec!(-20)));
        assert_eq!(table[1].signal_id, 2);
        assert_eq!(table[1].side, Side::Sell);
        assert_eq!(table[1].max_pip_drawdown, None);
    }
}

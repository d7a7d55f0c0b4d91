//! 분석 파이프라인 진입점.
//!
//! 한 번의 요청(거래 선택 + 타임프레임 + 표시 옵션)에 대해 전체 결과를 계산합니다.
//! 입력 데이터는 읽기만 하며 요청 간 공유 상태는 없습니다.
//!
//! 처리 순서:
//! 1. 옵션 검증
//! 2. 번호로 거래 선택 (없으면 `NoData`)
//! 3. 헤지 숨김이면 청산 시각별 첫 거래만 유지
//! 4. 시그널 그룹화
//! 5. 시그널/일별 지표와 요약 통계
//! 6. 평균 가격 (헤지 표시인 경우)
//! 7. 차트 구간

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use fxjournal_core::{AnalysisSettings, JournalError, JournalResult, PriceSeries, Timeframe, Trade};

use crate::chart::ChartWindow;
use crate::metrics::{
    cumulative_volumes, daily_profit, initial_volumes, max_drawdowns, pip_distances,
    signal_table, trade_counts, DailyProfit, PipDistance, SignalDrawdown, SignalRow,
    SignalTradeCount, SignalVolume,
};
use crate::selection::{collapse_hedges, parse_trade_ids, select_by_ids};
use crate::signal::{GroupedTrade, SignalBook};
use crate::stats::{PriceAverages, SummaryStats};

/// 분석 요청.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// 요청한 트레이드 번호
    pub trade_ids: Vec<u32>,
    /// 차트 및 낙폭 계산에 사용할 타임프레임
    pub timeframe: Timeframe,
    /// 표시/지표 옵션
    pub settings: AnalysisSettings,
}

impl AnalysisRequest {
    /// 기본 옵션으로 요청을 생성합니다.
    pub fn new(trade_ids: Vec<u32>, timeframe: Timeframe) -> Self {
        Self {
            trade_ids,
            timeframe,
            settings: AnalysisSettings::default(),
        }
    }

    /// "0-19, 24-25, 98" 형식의 입력으로 요청을 생성합니다.
    pub fn parse(input: &str, timeframe: Timeframe) -> JournalResult<Self> {
        Ok(Self::new(parse_trade_ids(input)?, timeframe))
    }

    /// 옵션을 설정합니다.
    pub fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// 지표 계열별 요약 통계.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub daily_profit: SummaryStats,
    pub cumulative_volume: SummaryStats,
    pub trades_per_signal: SummaryStats,
    pub initial_volume: SummaryStats,
    pub max_pip_drawdown: SummaryStats,
    pub mean_pips: SummaryStats,
    pub median_pips: SummaryStats,
}

/// 분석 결과 전체.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub timeframe: Timeframe,
    pub requested_ids: Vec<u32>,
    /// 로그에서 찾지 못한 번호
    pub missing_ids: Vec<u32>,
    pub hedges_collapsed: bool,
    /// 시그널 정보가 붙은 거래 (진입 시각 순)
    pub trades: Vec<GroupedTrade>,
    pub signals: Vec<SignalRow>,
    pub pip_distances: Vec<PipDistance>,
    pub daily_profits: Vec<DailyProfit>,
    pub cumulative_volumes: Vec<SignalVolume>,
    pub trade_counts: Vec<SignalTradeCount>,
    pub initial_volumes: Vec<SignalVolume>,
    pub drawdowns: Vec<SignalDrawdown>,
    pub summary: ReportSummary,
    /// 헤지를 표시할 때만 계산
    pub average_prices: Option<PriceAverages>,
    pub chart: Option<ChartWindow>,
}

impl AnalysisReport {
    /// 시그널 수.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// 들여쓰기된 JSON 문자열로 직렬화합니다.
    pub fn to_json_pretty(&self) -> JournalResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| JournalError::Internal(e.to_string()))
    }
}

/// 분석 파이프라인을 실행합니다.
///
/// # 에러
///
/// - `Validation`: 옵션 범위 오류, 빈 번호 목록, 시계열과 요청의 타임프레임 불일치
/// - `NoData`: 요청한 번호와 일치하는 거래가 없음
pub fn run_analysis(
    trades: &[Trade],
    series: &PriceSeries,
    request: &AnalysisRequest,
) -> JournalResult<AnalysisReport> {
    let settings = &request.settings;
    settings.validate()?;

    if request.trade_ids.is_empty() {
        return Err(JournalError::Validation("Enter trade number(s)".to_string()));
    }
    if series.timeframe() != request.timeframe {
        return Err(JournalError::Validation(format!(
            "price series is {} but {} was requested",
            series.timeframe(),
            request.timeframe
        )));
    }

    let selection = select_by_ids(trades, &request.trade_ids);
    if selection.is_empty() {
        return Err(JournalError::NoData("No valid trades selected.".to_string()));
    }
    if !selection.is_complete() {
        warn!(
            requested = selection.requested,
            matched = selection.matched(),
            missing = ?selection.missing_ids,
            "Some trade numbers were not found"
        );
    }

    let hedges_collapsed = !settings.show_hedges;
    let selected = if hedges_collapsed {
        collapse_hedges(&selection.trades)
    } else {
        selection.trades.clone()
    };

    let book = SignalBook::group(&selected);

    let pip_distances = pip_distances(&book);
    let daily_profits = daily_profit(book.trades().iter().map(|g| &g.trade));
    let cumulative_volumes = cumulative_volumes(&book);
    let trade_counts = trade_counts(&book);
    let initial_volumes = initial_volumes(&book);
    let drawdowns = max_drawdowns(&book, series);
    let signals = signal_table(&book, series);

    let summary = ReportSummary {
        daily_profit: SummaryStats::from_values(
            &daily_profits.iter().map(|d| d.profit).collect::<Vec<_>>(),
        ),
        cumulative_volume: SummaryStats::from_values(
            &cumulative_volumes.iter().map(|v| v.volume).collect::<Vec<_>>(),
        ),
        trades_per_signal: SummaryStats::from_values(
            &trade_counts
                .iter()
                .map(|c| Decimal::from(c.trade_count))
                .collect::<Vec<_>>(),
        ),
        initial_volume: SummaryStats::from_values(
            &initial_volumes.iter().map(|v| v.volume).collect::<Vec<_>>(),
        ),
        max_pip_drawdown: SummaryStats::from_optional(drawdowns.iter().map(|d| d.max_pip_drawdown)),
        mean_pips: SummaryStats::from_values(
            &pip_distances.iter().map(|p| p.mean_pips).collect::<Vec<_>>(),
        ),
        median_pips: SummaryStats::from_values(
            &pip_distances.iter().map(|p| p.median_pips).collect::<Vec<_>>(),
        ),
    };

    let average_prices = settings
        .show_hedges
        .then(|| PriceAverages::from_trades(book.trades().iter().map(|g| &g.trade)));

    let chart = ChartWindow::build(&book, series, settings)?;
    debug!(has_chart = chart.is_some(), "Chart window prepared");

    info!(
        timeframe = %request.timeframe,
        trades = book.trades().len(),
        signals = book.signals().len(),
        days = daily_profits.len(),
        hedges_collapsed,
        "Analysis completed"
    );

    Ok(AnalysisReport {
        timeframe: request.timeframe,
        requested_ids: request.trade_ids.clone(),
        missing_ids: selection.missing_ids,
        hedges_collapsed,
        trades: book.trades().to_vec(),
        signals,
        pip_distances,
        daily_profits,
        cumulative_volumes,
        trade_counts,
        initial_volumes,
        drawdowns,
        summary,
        average_prices,
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use fxjournal_core::{Candle, Side};
    use rust_decimal_macros::dec;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 4, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn series(timeframe: Timeframe) -> PriceSeries {
        let candles = (8..16)
            .map(|h| Candle::new(at(h, 0), dec!(1.2650), dec!(1.2680), dec!(1.2630), dec!(1.2655)))
            .collect();
        PriceSeries::new(timeframe, candles).unwrap()
    }

    fn trades() -> Vec<Trade> {
        vec![
            Trade::new(0, Side::Buy, at(9, 0), dec!(1.2650), at(11, 0), dec!(1.2670), dec!(0.10))
                .with_profit(dec!(20)),
            Trade::new(0, Side::Sell, at(9, 0), dec!(1.2648), at(11, 0), dec!(1.2668), dec!(0.10))
                .with_profit(dec!(-20)),
            Trade::new(1, Side::Buy, at(12, 0), dec!(1.2640), at(13, 0), dec!(1.2660), dec!(0.20))
                .with_profit(dec!(40)),
        ]
    }

    #[test]
    fn test_rejects_invalid_requests() {
        let mut request = AnalysisRequest::new(vec![], Timeframe::H1);
        let err = run_analysis(&trades(), &series(Timeframe::H1), &request).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));

        request.trade_ids = vec![0];
        let err = run_analysis(&trades(), &series(Timeframe::M15), &request).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));

        request.settings.rsi_length = 0;
        let err = run_analysis(&trades(), &series(Timeframe::H1), &request).unwrap_err();
        assert!(matches!(err, JournalError::Validation(_)));
    }

    #[test]
    fn test_no_matching_trades_is_no_data() {
        let request = AnalysisRequest::new(vec![42], Timeframe::H1);
        let err = run_analysis(&trades(), &series(Timeframe::H1), &request).unwrap_err();
        assert!(matches!(err, JournalError::NoData(_)));
        assert!(err.is_user_error());
    }

    #[test]
    fn test_hedges_shown() {
        let request = AnalysisRequest::parse("0-1, 7", Timeframe::H1).unwrap();
        let report = run_analysis(&trades(), &series(Timeframe::H1), &request).unwrap();

        assert_eq!(report.requested_ids, vec![0, 1, 7]);
        assert_eq!(report.missing_ids, vec![7]);
        assert!(!report.hedges_collapsed);
        assert_eq!(report.trades.len(), 3);
        // buy, sell(같은 시각, 입력 순서 유지), buy
        assert_eq!(report.signal_count(), 3);
        assert!(report.average_prices.is_some());
        assert_eq!(report.daily_profits.len(), 1);
        assert_eq!(report.daily_profits[0].profit, dec!(40));
        assert!(report.chart.is_some());
    }

    #[test]
    fn test_hedges_hidden() {
        let settings = AnalysisSettings {
            show_hedges: false,
            ..Default::default()
        };
        let request = AnalysisRequest::new(vec![0, 1], Timeframe::H1).with_settings(settings);
        let report = run_analysis(&trades(), &series(Timeframe::H1), &request).unwrap();

        assert!(report.hedges_collapsed);
        assert_eq!(report.trades.len(), 2);
        assert!(report.trades.iter().all(|g| g.trade.side == Side::Buy));
        assert_eq!(report.signal_count(), 1);
        assert_eq!(report.signals[0].trade_count, 2);
        assert_eq!(report.signals[0].volume, dec!(0.30));
        assert_eq!(report.signals[0].max_pip_drawdown, Some(dec!(-20)));
        assert_eq!(report.signals[0].mean_pips, dec!(-5));
        assert!(report.average_prices.is_none());

        assert_eq!(report.summary.trades_per_signal.max, Some(dec!(2)));
        assert_eq!(report.summary.daily_profit.mean, Some(dec!(60)));
    }
}

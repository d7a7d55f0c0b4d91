//! 트레이드 저널 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 거래 번호 파싱 및 선택, 헤지 정리
//! - 같은 방향 거래의 시그널 그룹화
//! - 시그널/일별 집계 지표 (핍 거리, 랏 수량, 거래 수, 최대 역행 폭, 일별 손익)
//! - 요약 통계와 평균 가격
//! - 차트 구간과 보조 지표 (RSI, 볼린저 밴드)
//! - 전체 파이프라인 진입점 [`run_analysis`]
//!
//! # 사용 예시
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fxjournal_analytics::{run_analysis, AnalysisRequest};
//! use fxjournal_core::{Candle, PriceSeries, Side, Timeframe, Trade};
//! use rust_decimal_macros::dec;
//!
//! let t = |h| NaiveDate::from_ymd_opt(2024, 4, 2).unwrap().and_hms_opt(h, 0, 0).unwrap();
//! let trades = vec![Trade::new(0, Side::Buy, t(9), dec!(1.2650), t(10), dec!(1.2670), dec!(0.1))];
//! let series = PriceSeries::new(
//!     Timeframe::H1,
//!     vec![Candle::new(t(9), dec!(1.2650), dec!(1.2660), dec!(1.2630), dec!(1.2655))],
//! )
//! .unwrap();
//!
//! let request = AnalysisRequest::parse("0", Timeframe::H1).unwrap();
//! let report = run_analysis(&trades, &series, &request).unwrap();
//! assert_eq!(report.signals[0].max_pip_drawdown, Some(dec!(-20)));
//! ```

pub mod chart;
pub mod indicators;
pub mod metrics;
pub mod pipeline;
pub mod selection;
pub mod signal;
pub mod stats;

pub use chart::{ChartWindow, TradeMarker};
pub use indicators::{IndicatorError, IndicatorResult};
pub use metrics::{
    cumulative_volumes, daily_profit, drawdown_pips, initial_volumes, max_drawdowns,
    pip_distances, signal_table, trade_counts, DailyProfit, PipDistance, SignalDrawdown,
    SignalRow, SignalTradeCount, SignalVolume,
};
pub use pipeline::{run_analysis, AnalysisReport, AnalysisRequest, ReportSummary};
pub use selection::{collapse_hedges, parse_trade_ids, select_by_ids, TradeSelection};
pub use signal::{GroupedTrade, Signal, SignalBook};
pub use stats::{PriceAverages, SummaryStats};

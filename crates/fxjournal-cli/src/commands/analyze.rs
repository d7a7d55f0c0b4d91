//! 분석 명령어.
//!
//! 트레이드 로그와 선택한 타임프레임의 가격 파일을 읽어 시그널 분석 결과를 출력합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 0~19번, 24~25번, 98번 거래를 1시간봉으로 분석
//! fxjournal analyze --ids "0-19, 24-25, 98" --timeframe 1H
//!
//! # 헤지 숨김, RSI(14) 포함, JSON 출력
//! fxjournal analyze --ids 3-7 --timeframe 15M --hide-hedges --rsi 14 --json
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use tracing::{debug, info};

use fxjournal_analytics::{run_analysis, AnalysisReport, AnalysisRequest};
use fxjournal_core::{AnalysisSettings, AppConfig, DecimalExt, Timeframe};
use fxjournal_data::{PriceSeriesLoader, TradeLogLoader};

/// 명령행에서 지정한 분석 옵션. 지정하지 않은 값은 설정 파일 값을 따릅니다.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub hide_hedges: bool,
    pub show_lot_size: bool,
    pub candles_before: Option<u32>,
    pub candles_after: Option<u32>,
    pub rsi_length: Option<usize>,
    pub bollinger_period: Option<usize>,
    pub bollinger_std_dev: Option<String>,
}

impl SettingsOverrides {
    /// 기본 옵션 위에 명령행 옵션을 덮어씁니다.
    pub fn apply(&self, mut settings: AnalysisSettings) -> Result<AnalysisSettings> {
        if self.hide_hedges {
            settings.show_hedges = false;
        }
        if self.show_lot_size {
            settings.show_lot_size = true;
        }
        if let Some(n) = self.candles_before {
            settings.candles_before = n;
        }
        if let Some(n) = self.candles_after {
            settings.candles_after = n;
        }
        if let Some(length) = self.rsi_length {
            settings.show_rsi = true;
            settings.rsi_length = length;
        }
        if let Some(period) = self.bollinger_period {
            settings.show_bollinger = true;
            settings.bollinger_period = period;
        }
        if let Some(raw) = &self.bollinger_std_dev {
            settings.bollinger_std_dev = Decimal::from_str(raw.trim())
                .map_err(|e| anyhow!("Invalid std. dev '{}': {}", raw, e))?;
        }
        Ok(settings)
    }
}

/// 분석 CLI 설정.
#[derive(Debug, Clone)]
pub struct AnalyzeCliConfig {
    /// 트레이드 번호 입력 (예: "0-19, 24-25, 98")
    pub trade_ids: String,
    /// 타임프레임 라벨 (예: "1H")
    pub timeframe: String,
    /// 트레이드 로그 경로 (설정 파일 값 재정의)
    pub trades_path: Option<PathBuf>,
    /// 가격 파일 디렉토리 (설정 파일 값 재정의)
    pub prices_dir: Option<PathBuf>,
    pub overrides: SettingsOverrides,
    /// JSON으로 출력
    pub json: bool,
}

/// 분석 실행.
pub fn run_analyze(app: &AppConfig, config: &AnalyzeCliConfig) -> Result<AnalysisReport> {
    let timeframe = Timeframe::from_str(&config.timeframe).map_err(|e| anyhow!(e))?;
    let settings = config.overrides.apply(app.analysis.clone())?;
    let request = AnalysisRequest::parse(&config.trade_ids, timeframe)?.with_settings(settings);

    let mut data = app.data.clone();
    if let Some(path) = &config.trades_path {
        data.trades_path = path.clone();
    }
    if let Some(dir) = &config.prices_dir {
        data.prices_dir = dir.clone();
    }
    debug!(?data, "Resolved data paths");

    // 1. 트레이드 로그 로드
    let trades = TradeLogLoader::from_clock(&app.clock)
        .load_path(&data.trades_path)
        .with_context(|| format!("Failed to load trade log {}", data.trades_path.display()))?;

    // 2. 가격 시계열 로드
    let series = PriceSeriesLoader::from_clock(&app.clock)
        .load_timeframe(&data, timeframe)
        .with_context(|| format!("Failed to load {} prices", timeframe))?;

    // 3. 분석
    info!(
        ids = request.trade_ids.len(),
        timeframe = %timeframe,
        "Running analysis"
    );
    let report = run_analysis(&trades, &series, &request)?;
    Ok(report)
}

fn opt(value: Option<Decimal>) -> String {
    value.map(|v| v.to_fixed2_string()).unwrap_or_else(|| "n/a".to_string())
}

fn opt_currency(value: Option<Decimal>) -> String {
    value.map(|v| v.to_currency_string()).unwrap_or_else(|| "n/a".to_string())
}

/// 분석 결과를 표 형식으로 출력합니다.
pub fn render_report<W: Write>(report: &AnalysisReport, out: &mut W) -> std::io::Result<()> {
    let line = "═══════════════════════════════════════════════════════════════════════════════";

    writeln!(out, "\n📊 거래 분석 결과 ({})", report.timeframe)?;
    writeln!(out, "{}", line)?;
    if !report.missing_ids.is_empty() {
        let missing: Vec<String> = report.missing_ids.iter().map(u32::to_string).collect();
        writeln!(out, "⚠️  찾지 못한 거래 번호: {}", missing.join(", "))?;
    }
    writeln!(
        out,
        "거래 {}건, 시그널 {}개{}",
        report.trades.len(),
        report.signal_count(),
        if report.hedges_collapsed { " (헤지 숨김)" } else { "" }
    )?;

    writeln!(out, "\n시그널")?;
    writeln!(
        out,
        "  {:>6} | {:<4} | {:<19} | {:<19} | {:>6} | {:>6} | {:>7} | {:>9} | {:>11} | {:>14}",
        "Signal", "Side", "Open Time", "Close Time", "Trades", "Volume", "Initial",
        "Mean Pips", "Median Pips", "Max Pip DD"
    )?;
    for row in &report.signals {
        writeln!(
            out,
            "  {:>6} | {:<4} | {:<19} | {:<19} | {:>6} | {:>6} | {:>7} | {:>9} | {:>11} | {:>14}",
            row.signal_id,
            row.side.to_string(),
            row.open_time.format("%Y-%m-%d %H:%M:%S"),
            row.close_time.format("%Y-%m-%d %H:%M:%S"),
            row.trade_count,
            row.volume.to_fixed2_string(),
            row.initial_volume.to_fixed2_string(),
            row.mean_pips.to_fixed2_string(),
            row.median_pips.to_fixed2_string(),
            opt(row.max_pip_drawdown),
        )?;
    }

    writeln!(out, "\n일별 손익")?;
    for day in &report.daily_profits {
        writeln!(out, "  {} | {:>12}", day.date, day.profit.to_currency_string())?;
    }

    let s = &report.summary;
    writeln!(out, "\n요약 통계")?;
    writeln!(out, "  Mean Daily Profit: {}", opt_currency(s.daily_profit.mean))?;
    writeln!(out, "  Median Daily Profit: {}", opt_currency(s.daily_profit.median))?;
    for (label, stats) in [
        ("Volume", &s.cumulative_volume),
        ("Trades per Signal", &s.trades_per_signal),
        ("Initial Trade Volume", &s.initial_volume),
        ("Max Pip Drawdown", &s.max_pip_drawdown),
        ("Pips Away", &s.mean_pips),
        ("Median Pips Away", &s.median_pips),
    ] {
        writeln!(out, "  Mean {}: {}", label, opt(stats.mean))?;
        writeln!(out, "  Median {}: {}", label, opt(stats.median))?;
        writeln!(out, "  Maximum {}: {}", label, opt(stats.max))?;
        writeln!(out, "  Minimum {}: {}", label, opt(stats.min))?;
    }

    if let Some(avg) = &report.average_prices {
        writeln!(out, "\n평균 가격")?;
        writeln!(
            out,
            "  {:<16} | {:>10} | {:>13} | {:>10}",
            "", "Open Price", "Closing Price", "Difference"
        )?;
        for (label, open, close, diff) in [
            ("Unweighted", avg.unweighted_open, avg.unweighted_close, avg.unweighted_difference),
            ("Lotsize-weighted", avg.weighted_open, avg.weighted_close, avg.weighted_difference),
        ] {
            writeln!(
                out,
                "  {:<16} | {:>10} | {:>13} | {:>10}",
                label,
                price(open),
                price(close),
                price(diff)
            )?;
        }
    }

    writeln!(out, "\n거래 목록")?;
    for g in &report.trades {
        let t = &g.trade;
        writeln!(
            out,
            "  #{:<5} sig {:<3} {:<4} {} @ {} -> {} @ {}  lot {}  {}",
            t.id,
            g.signal_id,
            t.side.to_string(),
            t.open_time.format("%Y-%m-%d %H:%M:%S"),
            t.open_price,
            t.close_time.format("%Y-%m-%d %H:%M:%S"),
            t.close_price,
            t.volume,
            t.profit.to_currency_string()
        )?;
    }

    if let Some(chart) = &report.chart {
        writeln!(
            out,
            "\n차트 구간: {} ~ {} ({} 캔들)",
            chart.start,
            chart.end,
            chart.candles.len()
        )?;
    }
    writeln!(out, "{}", line)?;
    Ok(())
}

fn price(value: Option<Decimal>) -> String {
    value
        .map(|v| v.round_dp(5).to_string())
        .unwrap_or_else(|| "n/a".to_string())
}

//! 트레이드 저널 분석 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 0~19번, 24~25번, 98번 거래를 1시간봉으로 분석
//! fxjournal analyze --ids "0-19, 24-25, 98" --timeframe 1H
//!
//! # 다른 설정 파일과 데이터 위치 사용
//! fxjournal --config config/local.toml analyze --ids 5 --prices-dir data/prices
//!
//! # 볼린저 밴드(20, 2.5) 포함, JSON 출력
//! fxjournal analyze --ids 0-9 --bollinger 20 --std-dev 2.5 --json
//!
//! # 지원 타임프레임 목록
//! fxjournal timeframes
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use fxjournal_cli::commands::analyze::{render_report, run_analyze, AnalyzeCliConfig, SettingsOverrides};
use fxjournal_cli::commands::timeframes::print_timeframes;
use fxjournal_core::{init_logging, AppConfig, LogConfig};

#[derive(Parser)]
#[command(name = "fxjournal")]
#[command(about = "FX trade journal analyzer - 거래 기록 시그널 분석", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (없으면 기본값과 FXJOURNAL__* 환경 변수 사용)
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    /// 디버그 로그 출력
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 선택한 거래를 시그널로 묶어 분석
    Analyze {
        /// 트레이드 번호 (예: "0-19, 24-25, 98")
        #[arg(short, long)]
        ids: String,

        /// 타임프레임 (1M, 5M, 15M, 1H, 4H, 1D)
        #[arg(short, long, default_value = "1H")]
        timeframe: String,

        /// 트레이드 로그 CSV 경로
        #[arg(long)]
        trades: Option<PathBuf>,

        /// 가격 CSV 디렉토리
        #[arg(long)]
        prices_dir: Option<PathBuf>,

        /// 같은 시각에 청산된 헤지 거래 숨김
        #[arg(long)]
        hide_hedges: bool,

        /// 포지션 랏 수량 표시
        #[arg(long)]
        lot_size: bool,

        /// 첫 거래 앞 캔들 수
        #[arg(long)]
        candles_before: Option<u32>,

        /// 마지막 거래 뒤 캔들 수
        #[arg(long)]
        candles_after: Option<u32>,

        /// RSI 표시 (기간)
        #[arg(long)]
        rsi: Option<usize>,

        /// 볼린저 밴드 표시 (기간)
        #[arg(long)]
        bollinger: Option<usize>,

        /// 볼린저 밴드 표준편차 배수
        #[arg(long)]
        std_dev: Option<String>,

        /// 결과를 JSON으로 출력
        #[arg(long)]
        json: bool,
    },

    /// 지원 타임프레임과 가격 파일 경로 보기
    Timeframes,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let app = AppConfig::load(&cli.config)?;

    let mut log_config = LogConfig::try_from(&app.logging)?;
    if cli.verbose {
        log_config.level = "debug".to_string();
    }
    init_logging(log_config).map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Analyze {
            ids,
            timeframe,
            trades,
            prices_dir,
            hide_hedges,
            lot_size,
            candles_before,
            candles_after,
            rsi,
            bollinger,
            std_dev,
            json,
        } => {
            let config = AnalyzeCliConfig {
                trade_ids: ids,
                timeframe,
                trades_path: trades,
                prices_dir,
                overrides: SettingsOverrides {
                    hide_hedges,
                    show_lot_size: lot_size,
                    candles_before,
                    candles_after,
                    rsi_length: rsi,
                    bollinger_period: bollinger,
                    bollinger_std_dev: std_dev,
                },
                json,
            };

            let report = match run_analyze(&app, &config) {
                Ok(report) => report,
                Err(e) => {
                    error!("Analysis failed: {:#}", e);
                    return Err(e);
                }
            };
            info!(
                "✅ Analyzed {} trades in {} signals",
                report.trades.len(),
                report.signal_count()
            );

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            if config.json {
                writeln!(out, "{}", report.to_json_pretty()?)?;
            } else {
                render_report(&report, &mut out)?;
            }
        }

        Commands::Timeframes => {
            let stdout = std::io::stdout();
            print_timeframes(&app.data, &mut stdout.lock())?;
        }
    }

    Ok(())
}

//! 설정 파일 로드 통합 테스트.

use std::fs;

use chrono::NaiveDate;
use fxjournal_core::{AppConfig, Timeframe};
use rust_decimal_macros::dec;

const TOML: &str = r#"
[data]
trades_path = "journal/trades.csv"
prices_dir = "prices"

[data.price_files]
"4H" = "gbpusd_h4.csv"

[clock]
trade_offset_hours = 0
price_dst_cutover = "2025-03-30T00:00:00"

[logging]
level = "debug"
format = "json"

[analysis]
candles_after = 12
show_hedges = false
bollinger_std_dev = "2.5"
"#;

#[test]
fn test_load_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fxjournal.toml");
    fs::write(&path, TOML).unwrap();

    let config = AppConfig::load(&path).unwrap();

    assert_eq!(config.data.trades_path.to_str(), Some("journal/trades.csv"));
    assert!(config.data.price_path(Timeframe::H4).ends_with("gbpusd_h4.csv"));
    assert!(config
        .data
        .price_path(Timeframe::M5)
        .ends_with("GUM5_OHLC_dropnaCSV.csv"));

    assert_eq!(config.clock.trade_offset_hours, 0);
    assert_eq!(
        config.clock.price_dst_cutover,
        NaiveDate::from_ymd_opt(2025, 3, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );
    // 지정하지 않은 값은 기본값
    assert_eq!(config.clock.price_dst_shift_hours, 1);

    assert_eq!(config.logging.format, "json");

    assert_eq!(config.analysis.candles_before, 5);
    assert_eq!(config.analysis.candles_after, 12);
    assert!(!config.analysis.show_hedges);
    assert_eq!(config.analysis.rsi_length, 21);
    assert_eq!(config.analysis.bollinger_std_dev, dec!(2.5));
    assert!(config.analysis.validate().is_ok());
}

#[test]
fn test_invalid_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[analysis]\nrsi_length = \"long\"\n").unwrap();

    let err = fxjournal_core::JournalError::from(AppConfig::load(&path).unwrap_err());
    assert!(matches!(err, fxjournal_core::JournalError::Config(_)));
}

#[test]
fn test_single_key_sections_fill_remaining_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(
        &path,
        "[data]\nprices_dir = \"prices\"\n\n[logging]\nlevel = \"debug\"\n\n[clock]\nprice_dst_shift_hours = 0\n",
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();

    assert_eq!(config.data.prices_dir.to_str(), Some("prices"));
    assert_eq!(config.data.trades_path.to_str(), Some("trades/trade_0.csv"));
    assert!(config.data.price_files.is_empty());

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "pretty");

    assert_eq!(config.clock.price_dst_shift_hours, 0);
    assert_eq!(config.clock.trade_offset_hours, -2);
}

//! 트레이드 로그 CSV 로더.
//!
//! 예상 헤더 (순서 무관, 추가 컬럼은 무시):
//! `Trade Number, Open Time, Type, Volume, Opening Price, S / L, T / P, Close Time, Closing Price, Profit`
//!
//! 시각은 `YYYY-MM-DD HH:MM` 또는 `YYYY-MM-DD HH:MM:SS` 형식을 모두 받으며,
//! 로드 시 하나의 고정 오프셋으로 가격 시계열 시계에 맞춥니다.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use fxjournal_core::clock::normalize;
use fxjournal_core::{ClockConfig, Side, Trade};

use crate::error::{DataError, Result};
use crate::timestamp::parse_timestamp;

/// CSV 한 행. 값 검증은 `TradeLogLoader`에서 행 번호와 함께 수행합니다.
#[derive(Debug, Deserialize)]
struct TradeRow {
    #[serde(rename = "Trade Number")]
    trade_number: String,
    #[serde(rename = "Open Time")]
    open_time: String,
    #[serde(rename = "Type")]
    side: String,
    #[serde(rename = "Volume")]
    volume: String,
    #[serde(rename = "Opening Price")]
    open_price: String,
    #[serde(rename = "S / L", default)]
    stop_loss: String,
    #[serde(rename = "T / P", default)]
    take_profit: String,
    #[serde(rename = "Close Time")]
    close_time: String,
    #[serde(rename = "Closing Price")]
    close_price: String,
    #[serde(rename = "Profit")]
    profit: String,
}

/// 트레이드 로그 로더.
#[derive(Debug, Clone, Copy)]
pub struct TradeLogLoader {
    offset_hours: i64,
}

impl Default for TradeLogLoader {
    fn default() -> Self {
        Self::from_clock(&ClockConfig::default())
    }
}

impl TradeLogLoader {
    /// 지정한 시각 오프셋을 적용하는 로더를 생성합니다.
    pub fn new(offset_hours: i64) -> Self {
        Self { offset_hours }
    }

    /// 시계 설정에서 로더를 생성합니다.
    pub fn from_clock(clock: &ClockConfig) -> Self {
        Self::new(clock.trade_offset_hours)
    }

    /// 적용되는 오프셋 (시간).
    pub fn offset_hours(&self) -> i64 {
        self.offset_hours
    }

    /// CSV 파일에서 거래 기록을 로드합니다.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Vec<Trade>> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| DataError::from(e).with_path_context(path))?;
        let trades = self.load_reader(file)?;

        info!(
            path = %path.display(),
            count = trades.len(),
            offset_hours = self.offset_hours,
            "Loaded trade log"
        );
        Ok(trades)
    }

    /// 임의의 reader에서 거래 기록을 로드합니다. 파일 순서를 그대로 유지합니다.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Vec<Trade>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut trades = Vec::new();
        for (idx, record) in csv_reader.deserialize::<TradeRow>().enumerate() {
            // 헤더가 1행이므로 데이터는 2행부터
            let row_no = idx + 2;
            let row = record?;
            trades.push(self.convert(row_no, row)?);
        }

        debug!(count = trades.len(), "Parsed trade rows");
        Ok(trades)
    }

    fn convert(&self, row_no: usize, row: TradeRow) -> Result<Trade> {
        let id = row
            .trade_number
            .parse::<u32>()
            .map_err(|e| DataError::parse(row_no, format!("Trade Number '{}': {}", row.trade_number, e)))?;

        let side = Side::from_str(&row.side).map_err(|e| DataError::parse(row_no, e))?;

        let open_time = normalize(timestamp(row_no, "Open Time", &row.open_time)?, self.offset_hours);
        let close_time = normalize(timestamp(row_no, "Close Time", &row.close_time)?, self.offset_hours);
        let trade = Trade {
            id,
            open_time,
            close_time,
            open_price: decimal(row_no, "Opening Price", &row.open_price)?,
            close_price: decimal(row_no, "Closing Price", &row.close_price)?,
            side,
            volume: decimal(row_no, "Volume", &row.volume)?,
            stop_loss: optional_decimal(row_no, "S / L", &row.stop_loss)?,
            take_profit: optional_decimal(row_no, "T / P", &row.take_profit)?,
            profit: decimal(row_no, "Profit", &row.profit)?,
        };
        if !trade.is_well_ordered() {
            return Err(DataError::InvalidData(format!(
                "row {}: trade {} closes ({}) before it opens ({})",
                row_no, trade.id, trade.close_time, trade.open_time
            )));
        }

        Ok(trade)
    }
}

fn timestamp(row_no: usize, column: &str, raw: &str) -> Result<NaiveDateTime> {
    parse_timestamp(raw)
        .ok_or_else(|| DataError::parse(row_no, format!("{} '{}' is not a timestamp", column, raw)))
}

pub(crate) fn decimal(row_no: usize, column: &str, raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| DataError::parse(row_no, format!("{} '{}': {}", column, raw, e)))
}

/// 빈 손절/익절 칸은 0으로 취급합니다.
fn optional_decimal(row_no: usize, column: &str, raw: &str) -> Result<Decimal> {
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    decimal(row_no, column, raw)
}

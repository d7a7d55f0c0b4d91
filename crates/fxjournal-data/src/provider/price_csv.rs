//! 타임프레임별 가격(OHLC) CSV 로더.
//!
//! 예상 헤더: `DateTime, Open, High, Low, Close` (추가 컬럼은 무시).
//! 로드 시 DST 보정을 적용한 뒤 시각순으로 정렬합니다.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use fxjournal_core::clock::DstCalibration;
use fxjournal_core::{Candle, ClockConfig, DataConfig, PriceSeries, Timeframe};

use crate::error::{DataError, Result};
use crate::provider::trade_log::decimal;
use crate::timestamp::parse_timestamp_or_date;

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "DateTime")]
    timestamp: String,
    #[serde(rename = "Open")]
    open: String,
    #[serde(rename = "High")]
    high: String,
    #[serde(rename = "Low")]
    low: String,
    #[serde(rename = "Close")]
    close: String,
}

/// 가격 시계열 로더.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceSeriesLoader {
    calibration: DstCalibration,
}

impl PriceSeriesLoader {
    /// 지정한 DST 보정을 적용하는 로더를 생성합니다.
    pub fn new(calibration: DstCalibration) -> Self {
        Self { calibration }
    }

    /// 시계 설정에서 로더를 생성합니다.
    pub fn from_clock(clock: &ClockConfig) -> Self {
        Self::new(clock.price_calibration())
    }

    /// 데이터 설정에 따라 타임프레임의 가격 파일을 로드합니다.
    pub fn load_timeframe(&self, data: &DataConfig, timeframe: Timeframe) -> Result<PriceSeries> {
        self.load_path(data.price_path(timeframe), timeframe)
    }

    /// CSV 파일에서 가격 시계열을 로드합니다.
    pub fn load_path(&self, path: impl AsRef<Path>, timeframe: Timeframe) -> Result<PriceSeries> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DataError::from(e).with_path_context(path))?;
        let series = self.load_reader(file, timeframe)?;

        info!(
            path = %path.display(),
            timeframe = %timeframe,
            candles = series.len(),
            "Loaded price series"
        );
        Ok(series)
    }

    /// 임의의 reader에서 가격 시계열을 로드합니다.
    pub fn load_reader<R: Read>(&self, reader: R, timeframe: Timeframe) -> Result<PriceSeries> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut candles = Vec::new();
        for (idx, record) in csv_reader.deserialize::<PriceRow>().enumerate() {
            let row_no = idx + 2;
            let row = record?;

            let raw_time = parse_timestamp_or_date(&row.timestamp).ok_or_else(|| {
                DataError::parse(row_no, format!("DateTime '{}' is not a timestamp", row.timestamp))
            })?;

            candles.push(Candle {
                timestamp: self.calibration.apply(raw_time),
                open: decimal(row_no, "Open", &row.open)?,
                high: decimal(row_no, "High", &row.high)?,
                low: decimal(row_no, "Low", &row.low)?,
                close: decimal(row_no, "Close", &row.close)?,
            });
        }

        // 보정 경계 부근에서 순서가 뒤바뀔 수 있으므로 안정 정렬
        candles.sort_by_key(|c| c.timestamp);
        debug!(count = candles.len(), timeframe = %timeframe, "Parsed price rows");

        PriceSeries::new(timeframe, candles).map_err(|e| DataError::InvalidData(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const H1: &str = "\
DateTime,Open,High,Low,Close,Volume
2024-03-30 22:00:00,1.2600,1.2610,1.2590,1.2605,120
2024-03-30 23:00:00,1.2605,1.2615,1.2600,1.2610,80
2024-03-31 01:00:00,1.2610,1.2620,1.2601,1.2612,95
";

    #[test]
    fn test_dst_shift_applies_after_cutover() {
        let series = PriceSeriesLoader::default()
            .load_reader(H1.as_bytes(), Timeframe::H1)
            .unwrap();

        let times: Vec<String> = series.candles().iter().map(|c| c.timestamp.to_string()).collect();
        assert_eq!(
            times,
            vec!["2024-03-30 22:00:00", "2024-03-30 23:00:00", "2024-03-31 02:00:00"]
        );
        assert_eq!(series.candles()[2].low, dec!(1.2601));
    }

    #[test]
    fn test_without_calibration() {
        let series = PriceSeriesLoader::new(DstCalibration::disabled())
            .load_reader(H1.as_bytes(), Timeframe::H1)
            .unwrap();
        assert_eq!(series.last_time().unwrap().to_string(), "2024-03-31 01:00:00");
    }

    #[test]
    fn test_unsorted_rows_are_sorted() {
        let csv = "\
DateTime,Open,High,Low,Close
2024-01-02,1.30,1.31,1.29,1.30
2024-01-01,1.28,1.30,1.27,1.29
";
        let series = PriceSeriesLoader::default()
            .load_reader(csv.as_bytes(), Timeframe::D1)
            .unwrap();
        assert_eq!(series.first_time().unwrap().to_string(), "2024-01-01 00:00:00");
    }

    #[test]
    fn test_duplicate_timestamps_are_invalid() {
        let csv = "\
DateTime,Open,High,Low,Close
2024-01-01 10:00,1.28,1.30,1.27,1.29
2024-01-01 10:00,1.28,1.30,1.27,1.29
";
        let err = PriceSeriesLoader::default()
            .load_reader(csv.as_bytes(), Timeframe::H1)
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidData(_)));
    }
}

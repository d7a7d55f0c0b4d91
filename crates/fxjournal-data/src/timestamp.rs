//! CSV 타임스탬프 파싱.

use chrono::{NaiveDate, NaiveDateTime};

/// 시각을 포함한 허용 형식. 초가 있는 형식을 먼저 시도합니다.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y.%m.%d %H:%M:%S",
];

/// `YYYY-MM-DD HH:MM` 또는 `YYYY-MM-DD HH:MM:SS` 형식의 시각을 파싱합니다.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// 일봉 파일처럼 날짜만 있는 값도 허용하는 파싱.
pub fn parse_timestamp_or_date(raw: &str) -> Option<NaiveDateTime> {
    parse_timestamp(raw).or_else(|| {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_trade_formats() {
        let with_secs = parse_timestamp("2024-04-02 09:15:30").unwrap();
        assert_eq!(with_secs.to_string(), "2024-04-02 09:15:30");

        let without_secs = parse_timestamp(" 2024-04-02 09:15 ").unwrap();
        assert_eq!(without_secs.to_string(), "2024-04-02 09:15:00");

        assert!(parse_timestamp("02/04/2024 09:15").is_none());
        assert!(parse_timestamp("2024-04-02").is_none());
    }

    #[test]
    fn test_date_only() {
        let day = parse_timestamp_or_date("2024-04-02").unwrap();
        assert_eq!(day.to_string(), "2024-04-02 00:00:00");
    }
}

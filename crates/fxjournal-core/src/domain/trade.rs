//! 거래 체결 기록.
//!
//! 이 모듈은 트레이드 로그의 한 행에 해당하는 타입을 정의합니다:
//! - `Side` - 거래 방향 (매수/매도)
//! - `Trade` - 완료된 개별 체결 기록

use crate::types::{Price, Volume};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 거래 방향 (매수 또는 매도).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수 (롱)
    Buy,
    /// 매도 (숏)
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" | "long" => Ok(Side::Buy),
            "sell" | "short" => Ok(Side::Sell),
            _ => Err(format!("Unknown trade type: {}", s)),
        }
    }
}

/// 완료된 거래 한 건.
///
/// 시간 필드는 브로커 서버 시계를 가격 시계열 시계에 맞춘 뒤의 값입니다.
/// 헤지 포지션이 있으면 같은 `id`를 가진 행이 여러 개일 수 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// 트레이드 번호
    pub id: u32,
    /// 진입 시각
    pub open_time: NaiveDateTime,
    /// 청산 시각
    pub close_time: NaiveDateTime,
    /// 진입 가격
    pub open_price: Price,
    /// 청산 가격
    pub close_price: Price,
    /// 거래 방향
    pub side: Side,
    /// 랏 수량
    pub volume: Volume,
    /// 손절가 (S / L)
    pub stop_loss: Price,
    /// 익절가 (T / P)
    pub take_profit: Price,
    /// 실현 손익
    pub profit: Decimal,
}

impl Trade {
    /// 새 거래 기록을 생성합니다. 손절/익절/손익은 0으로 시작합니다.
    pub fn new(
        id: u32,
        side: Side,
        open_time: NaiveDateTime,
        open_price: Price,
        close_time: NaiveDateTime,
        close_price: Price,
        volume: Volume,
    ) -> Self {
        Self {
            id,
            open_time,
            close_time,
            open_price,
            close_price,
            side,
            volume,
            stop_loss: Decimal::ZERO,
            take_profit: Decimal::ZERO,
            profit: Decimal::ZERO,
        }
    }

    /// 실현 손익을 설정합니다.
    pub fn with_profit(mut self, profit: Decimal) -> Self {
        self.profit = profit;
        self
    }

    /// 진입 시각이 청산 시각보다 늦지 않은지 확인합니다.
    pub fn is_well_ordered(&self) -> bool {
        self.open_time <= self.close_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_side_parsing() {
        assert_eq!("buy".parse::<Side>(), Ok(Side::Buy));
        assert_eq!(" Sell ".parse::<Side>(), Ok(Side::Sell));
        assert!("balance".parse::<Side>().is_err());
    }

    #[test]
    fn test_trade_builder() {
        let trade = Trade::new(7, Side::Buy, at(9, 0), dec!(1.2650), at(10, 30), dec!(1.2670), dec!(0.10))
            .with_profit(dec!(20));

        assert!(trade.is_well_ordered());
        assert_eq!(trade.take_profit, dec!(0));
        assert_eq!(trade.profit, dec!(20));

        let reversed = Trade::new(8, Side::Sell, at(11, 0), dec!(1.2650), at(10, 0), dec!(1.2640), dec!(0.10));
        assert!(!reversed.is_well_ordered());
    }
}

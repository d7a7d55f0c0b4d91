//! 정밀한 가격 계산을 위한 Decimal 유틸리티.
//!
//! 가격, 랏 수량, 손익, 핍 값은 모두 `Decimal`로 표현합니다.

use rust_decimal::Decimal;

/// 가격 타입.
pub type Price = Decimal;

/// 랏(lot) 단위 수량 타입.
pub type Volume = Decimal;

/// 핍 단위 가격 변화량.
pub type Pips = Decimal;

/// 가격 차이 1.0 당 핍 수 (소수점 넷째 자리 호가 통화쌍 기준).
pub const PIP_FACTOR: Decimal = Decimal::from_parts(10000, 0, 0, false, 0);

/// 가격 차이를 핍으로 변환합니다.
#[inline]
pub fn to_pips(price_diff: Decimal) -> Pips {
    price_diff * PIP_FACTOR
}

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 금액 형식 문자열 (예: "$30.00", "$-5.50").
    fn to_currency_string(&self) -> String;

    /// 소수점 둘째 자리 문자열 (예: "1.25").
    fn to_fixed2_string(&self) -> String;
}

impl DecimalExt for Decimal {
    fn to_currency_string(&self) -> String {
        format!("${}", self.to_fixed2_string())
    }

    fn to_fixed2_string(&self) -> String {
        let rounded =
            self.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointNearestEven);
        format!("{:.2}", rounded)
    }
}

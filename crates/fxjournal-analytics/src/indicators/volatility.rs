//! 변동성 지표.
//!
//! - Bollinger Bands (볼린저 밴드)

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{IndicatorError, IndicatorResult};

/// Bollinger Bands 파라미터.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerParams {
    /// 이동평균 기간
    pub period: usize,
    /// 표준편차 배수
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: Decimal::TWO,
        }
    }
}

impl BollingerParams {
    pub fn new(period: usize, std_dev_multiplier: Decimal) -> Self {
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

/// 한 위치의 밴드 값.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BollingerPoint {
    pub upper: Option<Decimal>,
    pub middle: Option<Decimal>,
    pub lower: Option<Decimal>,
}

/// 종가 기준 Bollinger Bands.
///
/// 중간 밴드는 `period` 이동평균, 폭은 표본 표준편차(n - 1)에 배수를 곱한 값입니다.
/// 기간이 1이면 표준편차가 정의되지 않으므로 상/하단은 `None`입니다.
pub fn bollinger_bands(
    closes: &[Decimal],
    params: BollingerParams,
) -> IndicatorResult<Vec<BollingerPoint>> {
    let period = params.period;
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    if params.std_dev_multiplier.is_sign_negative() && !params.std_dev_multiplier.is_zero() {
        return Err(IndicatorError::InvalidParameter(format!(
            "표준편차 배수는 음수일 수 없습니다: {}",
            params.std_dev_multiplier
        )));
    }

    let period_decimal = Decimal::from(period);
    let mut result = vec![BollingerPoint::default(); closes.len()];

    for (i, point) in result.iter_mut().enumerate().skip(period - 1) {
        let window = &closes[i + 1 - period..=i];

        let sum: Decimal = window.iter().sum();
        let ma = sum / period_decimal;
        point.middle = Some(ma);

        if period < 2 {
            continue;
        }

        let variance = window
            .iter()
            .map(|&p| {
                let diff = p - ma;
                diff * diff
            })
            .sum::<Decimal>()
            / Decimal::from(period - 1);

        let deviation = params.std_dev_multiplier * sqrt_decimal(variance);
        point.upper = Some(ma + deviation);
        point.lower = Some(ma - deviation);
    }

    Ok(result)
}

/// Decimal 제곱근.
///
/// f64 근사값에서 출발해 Newton-Raphson으로 보정합니다.
fn sqrt_decimal(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut x = value
        .to_f64()
        .map(f64::sqrt)
        .and_then(Decimal::from_f64)
        .filter(|guess| *guess > Decimal::ZERO)
        .unwrap_or(value);

    for _ in 0..8 {
        let next = (x + value / x) / Decimal::TWO;
        if next == x {
            break;
        }
        x = next;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sqrt_decimal() {
        assert_eq!(sqrt_decimal(dec!(4)).round_dp(10), dec!(2));
        assert_eq!(sqrt_decimal(dec!(0.0001)).round_dp(10), dec!(0.01));
        assert_eq!(sqrt_decimal(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_bands_use_sample_std_dev() {
        // 평균 4, 표본분산 ((−2)² + 0² + 2²) / 2 = 4, 표준편차 2
        let closes = vec![dec!(2), dec!(4), dec!(6)];
        let bands = bollinger_bands(&closes, BollingerParams::new(3, dec!(2))).unwrap();

        assert_eq!(bands[0], BollingerPoint::default());
        assert_eq!(bands[1], BollingerPoint::default());
        assert_eq!(bands[2].middle, Some(dec!(4)));
        assert_eq!(bands[2].upper.map(|v| v.round_dp(8)), Some(dec!(8)));
        assert_eq!(bands[2].lower.map(|v| v.round_dp(8)), Some(dec!(0)));
    }

    #[test]
    fn test_period_one_has_no_width() {
        let bands = bollinger_bands(&[dec!(1.25), dec!(1.26)], BollingerParams::new(1, dec!(2))).unwrap();
        assert_eq!(bands[1].middle, Some(dec!(1.26)));
        assert_eq!(bands[1].upper, None);
    }

    #[test]
    fn test_invalid_params() {
        assert!(bollinger_bands(&[dec!(1)], BollingerParams::new(0, dec!(2))).is_err());
        assert!(bollinger_bands(&[dec!(1)], BollingerParams::new(2, dec!(-1))).is_err());
    }
}

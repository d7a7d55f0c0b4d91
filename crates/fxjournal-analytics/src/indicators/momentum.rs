//! 모멘텀 지표.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{IndicatorError, IndicatorResult};

/// 단순 이동평균 RSI.
///
/// 위치 `i`의 값은 직전 `period`개 가격 변화(`i - period + 1 ..= i`)의
/// 평균 상승폭과 평균 하락폭으로 계산합니다.
///
/// - 평균 하락폭이 0이고 평균 상승폭이 양수면 100
/// - 둘 다 0이면 정의되지 않음 (`None`)
/// - 앞쪽 `period`개 위치는 `None`
pub fn rolling_rsi(closes: &[Decimal], period: usize) -> IndicatorResult<Vec<Option<Decimal>>> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }

    let mut result = vec![None; closes.len()];
    if closes.len() <= period {
        return Ok(result);
    }

    // deltas[k]는 closes[k+1] - closes[k]
    let deltas: Vec<Decimal> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let period_decimal = Decimal::from(period);

    for (i, slot) in result.iter_mut().enumerate().skip(period) {
        let window = &deltas[i - period..i];
        let gain: Decimal = window.iter().filter(|d| d.is_sign_positive()).sum();
        let loss: Decimal = window
            .iter()
            .filter(|d| d.is_sign_negative())
            .map(|d| d.abs())
            .sum();

        let avg_gain = gain / period_decimal;
        let avg_loss = loss / period_decimal;

        *slot = if avg_loss.is_zero() {
            if avg_gain.is_zero() {
                None
            } else {
                Some(dec!(100))
            }
        } else {
            let rs = avg_gain / avg_loss;
            Some(dec!(100) - dec!(100) / (Decimal::ONE + rs))
        };
    }

    Ok(result)
}

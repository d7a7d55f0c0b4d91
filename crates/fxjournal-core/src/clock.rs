//! 시계 보정 및 캔들 경계 정렬.
//!
//! 트레이드 로그와 가격 시계열은 서로 다른 서버 시계로 기록됩니다.
//! 두 소스 모두 고정 오프셋으로만 보정하며 타임존 데이터베이스는 사용하지 않습니다.
//!
//! # 예시
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fxjournal_core::clock::{align, normalize};
//! use fxjournal_core::Timeframe;
//!
//! let t = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(14, 37, 12).unwrap();
//! let shifted = normalize(t, -2);
//! assert_eq!(shifted.to_string(), "2024-05-02 12:37:12");
//! assert_eq!(align(shifted, Timeframe::H4).to_string(), "2024-05-02 12:00:00");
//! ```

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::Timeframe;

/// 트레이드 로그 시각에 적용하는 기본 오프셋 (시간).
pub const DEFAULT_TRADE_OFFSET_HOURS: i64 = -2;

/// 가격 시계열 DST 보정 기본 시작 시각 (2024-03-31 00:00:00).
pub fn default_dst_cutover() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 31)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// 타임스탬프를 고정된 시간만큼 이동합니다.
#[inline]
pub fn normalize(raw: NaiveDateTime, offset_hours: i64) -> NaiveDateTime {
    raw + Duration::hours(offset_hours)
}

/// 타임스탬프를 해당 타임프레임 캔들의 시작 시각으로 내립니다.
///
/// 4시간봉은 시(hour)를 4의 배수로, 일봉은 자정으로 내립니다.
/// 이미 정렬된 시각에 다시 적용해도 값이 바뀌지 않습니다.
pub fn align(ts: NaiveDateTime, timeframe: Timeframe) -> NaiveDateTime {
    let period = timeframe.as_secs();
    let secs = ts.num_seconds_from_midnight();
    let floored = secs - secs % period;

    let time = NaiveTime::from_num_seconds_from_midnight_opt(floored, 0).unwrap_or(NaiveTime::MIN);
    ts.date().and_time(time)
}

/// 특정 시각 이후의 가격 데이터에만 적용되는 고정 DST 보정.
///
/// 한 지역의 한 시기에 맞춘 보정 상수입니다. 다른 연도/시장 데이터에는 다시 검토해야 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstCalibration {
    /// 보정 시작 시각 (이 시각 이상에 적용)
    pub cutover: NaiveDateTime,
    /// 이동할 시간
    pub shift_hours: i64,
}

impl Default for DstCalibration {
    fn default() -> Self {
        Self {
            cutover: default_dst_cutover(),
            shift_hours: 1,
        }
    }
}

impl DstCalibration {
    /// 보정이 없는 설정.
    pub fn disabled() -> Self {
        Self {
            cutover: NaiveDateTime::MAX,
            shift_hours: 0,
        }
    }

    /// 타임스탬프에 보정을 적용합니다.
    pub fn apply(&self, ts: NaiveDateTime) -> NaiveDateTime {
        if ts >= self.cutover {
            normalize(ts, self.shift_hours)
        } else {
            ts
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_normalize_crosses_midnight() {
        assert_eq!(normalize(at(5, 1, 30, 0), -2), at(4, 23, 30, 0));
        assert_eq!(normalize(at(5, 1, 30, 0), 0), at(5, 1, 30, 0));
    }

    #[test]
    fn test_align_each_timeframe() {
        let t = at(12, 17, 43, 29);
        assert_eq!(align(t, Timeframe::M1), at(12, 17, 43, 0));
        assert_eq!(align(t, Timeframe::M5), at(12, 17, 40, 0));
        assert_eq!(align(t, Timeframe::M15), at(12, 17, 30, 0));
        assert_eq!(align(t, Timeframe::H1), at(12, 17, 0, 0));
        assert_eq!(align(t, Timeframe::H4), at(12, 16, 0, 0));
        assert_eq!(align(t, Timeframe::D1), at(12, 0, 0, 0));
    }

    #[test]
    fn test_align_drops_subsecond() {
        let t = at(12, 9, 0, 0) + Duration::milliseconds(250);
        assert_eq!(align(t, Timeframe::M1), at(12, 9, 0, 0));
    }

    #[test]
    fn test_dst_calibration() {
        let dst = DstCalibration::default();
        assert_eq!(dst.apply(at(30, 23, 0, 0)), at(30, 23, 0, 0));
        assert_eq!(dst.apply(at(31, 0, 0, 0)), at(31, 1, 0, 0));
        assert_eq!(DstCalibration::disabled().apply(at(31, 5, 0, 0)), at(31, 5, 0, 0));
    }

    proptest! {
        #[test]
        fn prop_align_is_idempotent(secs in 0i64..(366 * 24 * 3600), tf_idx in 0usize..6) {
            let base = at(1, 0, 0, 0);
            let t = base + Duration::seconds(secs);
            let tf = Timeframe::ALL[tf_idx];
            let once = align(t, tf);
            prop_assert_eq!(align(once, tf), once);
            prop_assert!(once <= t);
            prop_assert!(t - once < tf.duration());
        }
    }
}

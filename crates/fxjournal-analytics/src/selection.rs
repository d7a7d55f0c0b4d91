//! 거래 선택 및 헤지 정리.
//!
//! - `parse_trade_ids`: "0-19, 24-25, 98" 형식의 사용자 입력 파싱
//! - `select_by_ids`: 요청한 트레이드 번호의 거래만 추출
//! - `collapse_hedges`: 같은 시각에 청산된 거래 중 첫 거래만 유지

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use fxjournal_core::{JournalError, JournalResult, Trade};

/// 트레이드 번호 입력을 파싱합니다.
///
/// 쉼표로 구분된 단일 번호와 양 끝을 포함하는 범위(`a-b`)를 받습니다.
/// 결과는 정렬되고 중복이 제거된 번호 목록입니다.
///
/// # 에러
///
/// - 빈 입력
/// - 숫자가 아닌 토큰
/// - 시작이 끝보다 큰 범위 (`5-2`)
pub fn parse_trade_ids(input: &str) -> JournalResult<Vec<u32>> {
    if input.trim().is_empty() {
        return Err(JournalError::Validation("Enter trade number(s)".to_string()));
    }

    let mut ids = std::collections::BTreeSet::new();
    for part in input.split(',') {
        let part = part.trim();
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_id(start)?;
                let end = parse_id(end)?;
                if start > end {
                    return Err(JournalError::Validation(format!(
                        "Invalid range: {}-{}. Start must be less than end.",
                        start, end
                    )));
                }
                ids.extend(start..=end);
            }
            None => {
                ids.insert(parse_id(part)?);
            }
        }
    }

    Ok(ids.into_iter().collect())
}

fn parse_id(token: &str) -> JournalResult<u32> {
    let token = token.trim();
    token.parse::<u32>().map_err(|_| {
        JournalError::Validation(format!("'{}' is not a valid trade number", token))
    })
}

/// 번호로 추출한 거래 목록.
///
/// 로그에 없는 번호는 에러가 아니라 `missing_ids`로 보고합니다.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TradeSelection {
    /// 요청 순서대로 모은 거래 (같은 번호의 헤지 행 포함)
    pub trades: Vec<Trade>,
    /// 중복 제거 후 요청한 번호 수
    pub requested: usize,
    /// 로그에서 찾지 못한 번호
    pub missing_ids: Vec<u32>,
}

impl TradeSelection {
    /// 실제로 찾은 번호 수.
    pub fn matched(&self) -> usize {
        self.requested - self.missing_ids.len()
    }

    /// 요청한 번호를 모두 찾았는지 확인합니다.
    pub fn is_complete(&self) -> bool {
        self.missing_ids.is_empty()
    }

    /// 선택된 거래가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

/// 요청한 번호 순서대로 일치하는 거래를 모두 모읍니다.
///
/// 같은 번호를 여러 번 요청해도 한 번만 모읍니다. 번호 안에서는 로그 순서를 유지합니다.
pub fn select_by_ids(trades: &[Trade], ids: &[u32]) -> TradeSelection {
    let mut by_id: HashMap<u32, Vec<&Trade>> = HashMap::new();
    for trade in trades {
        by_id.entry(trade.id).or_default().push(trade);
    }

    let mut seen = HashSet::new();
    let mut selection = TradeSelection::default();
    for &id in ids {
        if !seen.insert(id) {
            continue;
        }
        selection.requested += 1;
        match by_id.get(&id) {
            Some(matches) => selection.trades.extend(matches.iter().map(|t| (*t).clone())),
            None => selection.missing_ids.push(id),
        }
    }

    debug!(
        requested = selection.requested,
        matched = selection.matched(),
        trades = selection.trades.len(),
        "Selected trades by id"
    );
    selection
}

/// 청산 시각별로 첫 거래(입력 순서 기준)만 남깁니다.
///
/// 같은 순간에 청산된 거래들은 하나의 헤지 포지션으로 보고 먼저 나온 거래만 유지합니다.
/// 결과는 청산 시각 순으로 정렬됩니다.
pub fn collapse_hedges(trades: &[Trade]) -> Vec<Trade> {
    let mut first_by_close: BTreeMap<NaiveDateTime, &Trade> = BTreeMap::new();
    for trade in trades {
        first_by_close.entry(trade.close_time).or_insert(trade);
    }

    let collapsed: Vec<Trade> = first_by_close.into_values().cloned().collect();
    debug!(
        before = trades.len(),
        after = collapsed.len(),
        "Collapsed hedged trades"
    );
    collapsed
}

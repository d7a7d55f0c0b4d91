//! 시그널 그룹화.
//!
//! 진입 시각 순으로 정렬된 거래를 같은 방향의 연속 구간(시그널)으로 나눕니다.
//!
//! - 방향이 직전 거래와 다르면 새 시그널이 시작됩니다 (이전 시그널과 방향이 같아도).
//! - 시그널 ID는 1부터 증가합니다.
//! - 시그널 청산 시각은 구성 거래 청산 시각의 최댓값입니다.
//! - 각 시그널의 기준 거래(첫 거래)와 기준 가격은 한 번만 계산해 모든 지표가 공유합니다.

use std::ops::Range;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use fxjournal_core::{Price, Side, Trade, Volume};

/// 시그널 정보가 붙은 거래.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedTrade {
    /// 소속 시그널 ID
    pub signal_id: u32,
    /// 소속 시그널의 청산 시각
    pub signal_close_time: NaiveDateTime,
    #[serde(flatten)]
    pub trade: Trade,
}

/// 같은 방향 거래의 최대 연속 구간.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    /// 시그널 ID (1부터)
    pub id: u32,
    /// 시그널 방향
    pub side: Side,
    /// 기준 거래 (가장 먼저 진입한 거래)
    pub anchor: Trade,
    /// 구성 거래 중 가장 늦은 청산 시각
    pub close_time: NaiveDateTime,
    #[serde(skip)]
    members: Range<usize>,
}

impl Signal {
    /// 기준 가격 (기준 거래의 진입 가격).
    pub fn anchor_price(&self) -> Price {
        self.anchor.open_price
    }

    /// 기준 거래의 랏 수량.
    pub fn initial_volume(&self) -> Volume {
        self.anchor.volume
    }

    /// 구성 거래 수.
    pub fn trade_count(&self) -> usize {
        self.members.len()
    }
}

/// 그룹화 결과. 생성 후 변경되지 않습니다.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignalBook {
    trades: Vec<GroupedTrade>,
    signals: Vec<Signal>,
}

impl SignalBook {
    /// 거래를 진입 시각 순으로 안정 정렬한 뒤 시그널로 나눕니다.
    ///
    /// 한 번의 순회로 경계와 청산 시각 최댓값을 구하고,
    /// 두 번째 순회에서 각 거래에 시그널 청산 시각을 기록합니다.
    pub fn group(trades: &[Trade]) -> Self {
        let mut sorted = trades.to_vec();
        sorted.sort_by_key(|t| t.open_time);

        let mut signals: Vec<Signal> = Vec::new();
        let mut grouped = Vec::with_capacity(sorted.len());

        for (idx, trade) in sorted.into_iter().enumerate() {
            let continues = signals.last().is_some_and(|s| s.side == trade.side);
            let signal_id = match signals.last_mut() {
                Some(current) if continues => {
                    current.members.end = idx + 1;
                    current.close_time = current.close_time.max(trade.close_time);
                    current.id
                }
                _ => {
                    let id = signals.len() as u32 + 1;
                    signals.push(Signal {
                        id,
                        side: trade.side,
                        anchor: trade.clone(),
                        close_time: trade.close_time,
                        members: idx..idx + 1,
                    });
                    id
                }
            };

            grouped.push(GroupedTrade {
                signal_id,
                signal_close_time: trade.close_time,
                trade,
            });
        }

        for signal in &signals {
            for member in &mut grouped[signal.members.clone()] {
                member.signal_close_time = signal.close_time;
            }
        }

        debug!(
            trades = grouped.len(),
            signals = signals.len(),
            "Grouped trades into signals"
        );

        Self {
            trades: grouped,
            signals,
        }
    }

    /// 진입 시각 순의 주석된 거래 목록.
    pub fn trades(&self) -> &[GroupedTrade] {
        &self.trades
    }

    /// 시그널 목록 (ID 순).
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// 시그널의 구성 거래.
    pub fn members(&self, signal: &Signal) -> &[GroupedTrade] {
        self.trades.get(signal.members.clone()).unwrap_or(&[])
    }

    /// 시그널 주석을 뗀 거래 목록 (진입 시각 순).
    pub fn plain_trades(&self) -> Vec<Trade> {
        self.trades.iter().map(|g| g.trade.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

use crate::{
    dice::DicePair,
    game::{
        Choice,
        RoundOutcome,
        Verdict,
    },
};
use chrono::{
    DateTime,
    Utc,
};
use std::collections::VecDeque;

pub const HISTORY_LIMIT: usize = 50;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundRecord {
    pub round: u64,
    pub choice: Choice,
    pub stake: u64,
    pub dice: DicePair,
    pub verdict: Verdict,
    pub winnings: u64,
    pub balance_after: u64,
    pub resolved_at: DateTime<Utc>,
}

impl RoundRecord {
    pub fn new(
        round: u64,
        outcome: &RoundOutcome,
        balance_after: u64,
        resolved_at: DateTime<Utc>,
    ) -> Self {
        Self {
            round,
            choice: outcome.choice,
            stake: outcome.stake,
            dice: outcome.dice,
            verdict: outcome.verdict,
            winnings: outcome.winnings,
            balance_after,
            resolved_at,
        }
    }

    /// Winnings minus stake.
    pub fn net(&self) -> i128 {
        i128::from(self.winnings) - i128::from(self.stake)
    }
}

/// In-memory log of resolved rounds, oldest dropped first.
#[derive(Clone, Debug, Default)]
pub struct RoundHistory {
    records: VecDeque<RoundRecord>,
}

impl RoundHistory {
    pub fn push(&mut self, record: RoundRecord) {
        if self.records.len() == HISTORY_LIMIT {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&RoundRecord> {
        self.records.back()
    }

    /// Up to `n` records, newest first.
    pub fn recent(&self, n: usize) -> Vec<RoundRecord> {
        self.records.iter().rev().take(n).cloned().collect()
    }
}

//! Pure game core: a [`GameState`] plus the [`Action`]s that move it.
//!
//! Nothing here does I/O. A rejected action returns a [`GameError`] and
//! leaves the state untouched; an accepted one returns the [`Event`] that
//! describes what changed.

use crate::{
    config::GameRules,
    dice::DicePair,
    error::GameError,
};
use std::{
    fmt,
    str::FromStr,
};

/// The sum every choice is measured against.
pub const TARGET_SUM: u8 = 7;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Choice {
    Under,
    Equal,
    Over,
}

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Under, Choice::Equal, Choice::Over];

    /// A sum of exactly seven only pays `Equal`.
    pub fn wins(self, total: u8) -> bool {
        match self {
            Choice::Under => total < TARGET_SUM,
            Choice::Equal => total == TARGET_SUM,
            Choice::Over => total > TARGET_SUM,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Choice::Under => "under",
            Choice::Equal => "equal",
            Choice::Over => "over",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Choice {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "under" => Ok(Choice::Under),
            "equal" => Ok(Choice::Equal),
            "over" => Ok(Choice::Over),
            _ => Err(GameError::invalid_input(s)),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BetSelection {
    Min,
    Max,
    Amount(u64),
}

impl FromStr for BetSelection {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(BetSelection::Min),
            "max" => Ok(BetSelection::Max),
            _ => match parse_leading_integer(s) {
                Some(LeadingInteger {
                    negative: false,
                    value,
                }) => Ok(BetSelection::Amount(value)),
                Some(LeadingInteger { value: 0, .. }) => Ok(BetSelection::Amount(0)),
                _ => Err(GameError::invalid_input(s)),
            },
        }
    }
}

struct LeadingInteger {
    negative: bool,
    value: u64,
}

/// Lenient integer read of a text field: skips leading whitespace, takes an
/// optional sign and the longest run of digits, ignores whatever follows.
fn parse_leading_integer(raw: &str) -> Option<LeadingInteger> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let value = rest[..end].parse::<u64>().ok()?;
    Some(LeadingInteger { negative, value })
}

/// Parses a deposit or withdrawal amount. Only positive integers pass.
pub fn parse_amount(raw: &str) -> Result<u64, GameError> {
    match parse_leading_integer(raw) {
        Some(LeadingInteger {
            negative: false,
            value,
        }) if value > 0 => Ok(value),
        _ => Err(GameError::invalid_input(raw)),
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
    Win,
    Lose,
}

/// A round whose stake has been debited and whose dice are still rolling.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PendingRound {
    pub choice: Choice,
    pub stake: u64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RoundOutcome {
    pub choice: Choice,
    pub stake: u64,
    pub dice: DicePair,
    pub verdict: Verdict,
    pub winnings: u64,
}

impl RoundOutcome {
    pub fn is_win(&self) -> bool {
        self.verdict == Verdict::Win
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Rolling(PendingRound),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Action {
    Deposit(u64),
    Withdraw(u64),
    SelectBet(BetSelection),
    Play(Choice),
    Resolve(DicePair),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Event {
    Deposited { amount: u64, balance: u64 },
    Withdrew { amount: u64, balance: u64 },
    BetSelected { bet: u64 },
    RoundStarted { round: PendingRound, balance: u64 },
    RoundResolved { outcome: RoundOutcome, balance: u64 },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameState {
    rules: GameRules,
    balance: u64,
    current_bet: u64,
    dice: DicePair,
    phase: Phase,
    last_outcome: Option<RoundOutcome>,
    rounds_played: u64,
}

impl GameState {
    pub fn new(rules: GameRules) -> Self {
        Self::with_balance(rules, 0)
    }

    pub fn with_balance(rules: GameRules, balance: u64) -> Self {
        Self {
            rules,
            balance,
            current_bet: 0,
            dice: DicePair::default(),
            phase: Phase::Idle,
            last_outcome: None,
            rounds_played: 0,
        }
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn dice(&self) -> DicePair {
        self.dice
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_rolling(&self) -> bool {
        matches!(self.phase, Phase::Rolling(_))
    }

    /// Result of the most recent round, cleared when the next one starts.
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    pub fn apply(&mut self, action: Action) -> Result<Event, GameError> {
        if let Phase::Rolling(pending) = self.phase {
            return match action {
                Action::Resolve(dice) => Ok(self.resolve(pending, dice)),
                _ => Err(GameError::RoundInProgress),
            };
        }
        match action {
            Action::Deposit(amount) => self.deposit(amount),
            Action::Withdraw(amount) => self.withdraw(amount),
            Action::SelectBet(selection) => self.select_bet(selection),
            Action::Play(choice) => self.start_round(choice),
            Action::Resolve(_) => Err(GameError::NoRoundInProgress),
        }
    }

    fn deposit(&mut self, amount: u64) -> Result<Event, GameError> {
        if amount == 0 {
            return Err(GameError::invalid_input(amount.to_string()));
        }
        let balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| GameError::invalid_input(amount.to_string()))?;
        self.balance = balance;
        Ok(Event::Deposited { amount, balance })
    }

    fn withdraw(&mut self, amount: u64) -> Result<Event, GameError> {
        if amount == 0 {
            return Err(GameError::invalid_input(amount.to_string()));
        }
        self.ensure_covered(amount)?;
        self.balance -= amount;
        Ok(Event::Withdrew {
            amount,
            balance: self.balance,
        })
    }

    fn select_bet(&mut self, selection: BetSelection) -> Result<Event, GameError> {
        let strict = self.rules.strict_limits;
        let bet = match selection {
            BetSelection::Min => {
                if strict {
                    self.ensure_covered(self.rules.min_bet)?;
                }
                self.rules.min_bet
            }
            BetSelection::Max if strict => self.balance.min(self.rules.max_bet),
            BetSelection::Max => self.balance,
            BetSelection::Amount(amount) => {
                self.ensure_covered(amount)?;
                if strict {
                    self.ensure_in_range(amount)?;
                }
                amount
            }
        };
        self.current_bet = bet;
        Ok(Event::BetSelected { bet })
    }

    fn start_round(&mut self, choice: Choice) -> Result<Event, GameError> {
        let stake = self.current_bet;
        if stake == 0 {
            return Err(GameError::NoBetSet);
        }
        // The balance may have moved since the bet was chosen.
        self.ensure_covered(stake)?;
        if self.rules.strict_limits {
            self.ensure_in_range(stake)?;
        }
        self.balance -= stake;
        self.last_outcome = None;
        let round = PendingRound { choice, stake };
        self.phase = Phase::Rolling(round);
        Ok(Event::RoundStarted {
            round,
            balance: self.balance,
        })
    }

    fn resolve(&mut self, round: PendingRound, dice: DicePair) -> Event {
        let PendingRound { choice, stake } = round;
        let (verdict, winnings) = if choice.wins(dice.total()) {
            (Verdict::Win, self.rules.payouts.multiplier(choice).apply(stake))
        } else {
            (Verdict::Lose, 0)
        };
        self.balance = self.balance.saturating_add(winnings);
        self.dice = dice;
        self.phase = Phase::Idle;
        self.rounds_played += 1;
        let outcome = RoundOutcome {
            choice,
            stake,
            dice,
            verdict,
            winnings,
        };
        self.last_outcome = Some(outcome);
        Event::RoundResolved {
            outcome,
            balance: self.balance,
        }
    }

    fn ensure_covered(&self, amount: u64) -> Result<(), GameError> {
        if amount > self.balance {
            return Err(GameError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        Ok(())
    }

    fn ensure_in_range(&self, amount: u64) -> Result<(), GameError> {
        let GameRules {
            min_bet, max_bet, ..
        } = self.rules;
        if amount < min_bet || amount > max_bet {
            return Err(GameError::BetOutOfRange {
                amount,
                min: min_bet,
                max: max_bet,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    fn pair(a: u8, b: u8) -> DicePair {
        DicePair::from_faces(a, b).unwrap()
    }

    fn strict_rules() -> GameRules {
        GameRules {
            strict_limits: true,
            ..GameRules::default()
        }
    }

    #[test]
    fn choice_wins__seven_only_pays_equal() {
        assert!(Choice::Equal.wins(7));
        assert!(!Choice::Under.wins(7));
        assert!(!Choice::Over.wins(7));
    }

    #[test]
    fn choice_wins__each_total_has_exactly_one_winner() {
        for total in 2..=12u8 {
            let winners = Choice::ALL.iter().filter(|c| c.wins(total)).count();
            assert_eq!(winners, 1, "total {total}");
        }
    }

    #[test]
    fn parse_amount__accepts_leading_digits_like_a_form_field() {
        assert_eq!(parse_amount("1000"), Ok(1000));
        assert_eq!(parse_amount("  42"), Ok(42));
        assert_eq!(parse_amount("+7"), Ok(7));
        assert_eq!(parse_amount("12abc"), Ok(12));
        assert_eq!(parse_amount("3.9"), Ok(3));
    }

    #[test]
    fn parse_amount__rejects_non_positive_or_garbage() {
        for raw in ["", "abc", "0", "-5", "-", " ", "99999999999999999999999"] {
            assert_eq!(
                parse_amount(raw),
                Err(GameError::invalid_input(raw)),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn bet_selection_from_str__parses_sentinels_and_literals() {
        assert_eq!("min".parse(), Ok(BetSelection::Min));
        assert_eq!("MAX".parse(), Ok(BetSelection::Max));
        assert_eq!("2500".parse(), Ok(BetSelection::Amount(2500)));
        assert_eq!("0".parse(), Ok(BetSelection::Amount(0)));
        assert!("-10".parse::<BetSelection>().is_err());
        assert!("lots".parse::<BetSelection>().is_err());
    }

    #[test]
    fn apply__deposit_zero_is_invalid() {
        let mut state = GameState::new(GameRules::default());
        let before = state.clone();
        assert!(matches!(
            state.apply(Action::Deposit(0)),
            Err(GameError::InvalidInput { .. })
        ));
        assert_eq!(state, before);
    }

    #[test]
    fn apply__deposit_overflow_is_invalid() {
        let mut state = GameState::with_balance(GameRules::default(), u64::MAX);
        assert!(matches!(
            state.apply(Action::Deposit(1)),
            Err(GameError::InvalidInput { .. })
        ));
        assert_eq!(state.balance(), u64::MAX);
    }

    #[test]
    fn apply__play_debits_before_the_dice_land() {
        // given
        let mut state = GameState::with_balance(GameRules::default(), 1_000);
        state.apply(Action::SelectBet(BetSelection::Amount(400))).unwrap();

        // when
        let event = state.apply(Action::Play(Choice::Over)).unwrap();

        // then
        let round = PendingRound {
            choice: Choice::Over,
            stake: 400,
        };
        assert_eq!(event, Event::RoundStarted { round, balance: 600 });
        assert_eq!(state.phase(), Phase::Rolling(round));
        assert_eq!(state.balance(), 600);
    }

    #[test]
    fn apply__rolling_refuses_everything_but_resolve() {
        // given
        let mut state = GameState::with_balance(GameRules::default(), 1_000);
        state.apply(Action::SelectBet(BetSelection::Max)).unwrap();
        state.apply(Action::Play(Choice::Under)).unwrap();
        let before = state.clone();

        // when
        let attempts = [
            Action::Deposit(10),
            Action::Withdraw(10),
            Action::SelectBet(BetSelection::Min),
            Action::Play(Choice::Equal),
        ];

        // then
        for action in attempts {
            assert_eq!(state.apply(action), Err(GameError::RoundInProgress));
            assert_eq!(state, before);
        }
    }

    #[test]
    fn apply__resolve_when_idle_is_refused() {
        let mut state = GameState::new(GameRules::default());
        assert_eq!(
            state.apply(Action::Resolve(pair(3, 4))),
            Err(GameError::NoRoundInProgress)
        );
    }

    #[test]
    fn apply__resolve_clears_previous_result_on_next_round() {
        // given
        let mut state = GameState::with_balance(GameRules::default(), 2_000);
        state.apply(Action::SelectBet(BetSelection::Amount(500))).unwrap();
        state.apply(Action::Play(Choice::Under)).unwrap();
        state.apply(Action::Resolve(pair(1, 2))).unwrap();
        assert!(state.last_outcome().is_some());

        // when
        state.apply(Action::Play(Choice::Under)).unwrap();

        // then
        assert_eq!(state.last_outcome(), None);
        assert_eq!(state.current_bet(), 500);
    }

    #[test]
    fn apply__winnings_use_the_stake_captured_at_start() {
        // given
        let mut state = GameState::with_balance(GameRules::default(), 1_000);
        state.apply(Action::SelectBet(BetSelection::Amount(1_000))).unwrap();
        state.apply(Action::Play(Choice::Equal)).unwrap();

        // when
        let event = state.apply(Action::Resolve(pair(3, 4))).unwrap();

        // then
        let Event::RoundResolved { outcome, balance } = event else {
            panic!("expected a resolved round, got {event:?}");
        };
        assert_eq!(outcome.verdict, Verdict::Win);
        assert_eq!(outcome.winnings, 5_800);
        assert_eq!(balance, 5_800);
        assert_eq!(state.dice(), pair(3, 4));
        assert_eq!(state.rounds_played(), 1);
    }

    #[test]
    fn apply__strict_min_requires_balance_to_cover_it() {
        let mut state = GameState::with_balance(strict_rules(), 400);
        assert_eq!(
            state.apply(Action::SelectBet(BetSelection::Min)),
            Err(GameError::InsufficientFunds {
                requested: 500,
                available: 400
            })
        );
        assert_eq!(state.current_bet(), 0);
    }

    #[test]
    fn apply__strict_max_is_capped_by_max_bet() {
        let mut state = GameState::with_balance(strict_rules(), 50_000);
        state.apply(Action::SelectBet(BetSelection::Max)).unwrap();
        assert_eq!(state.current_bet(), 10_000);
    }

    #[test]
    fn apply__strict_literal_outside_limits_is_out_of_range() {
        let mut state = GameState::with_balance(strict_rules(), 50_000);
        assert_eq!(
            state.apply(Action::SelectBet(BetSelection::Amount(100))),
            Err(GameError::BetOutOfRange {
                amount: 100,
                min: 500,
                max: 10_000
            })
        );
        assert_eq!(
            state.apply(Action::SelectBet(BetSelection::Amount(20_000))),
            Err(GameError::BetOutOfRange {
                amount: 20_000,
                min: 500,
                max: 10_000
            })
        );
    }

    #[test]
    fn apply__strict_play_rechecks_range_after_max_shrinks() {
        // given
        let mut state = GameState::with_balance(strict_rules(), 300);
        state.apply(Action::SelectBet(BetSelection::Max)).unwrap();

        // when
        let result = state.apply(Action::Play(Choice::Over));

        // then
        assert_eq!(
            result,
            Err(GameError::BetOutOfRange {
                amount: 300,
                min: 500,
                max: 10_000
            })
        );
        assert_eq!(state.balance(), 300);
    }
}

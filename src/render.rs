//! What the player sees, derived from game state and nothing else.

use crate::{
    dice::{
        DicePair,
        Die,
    },
    game::{
        GameState,
        Verdict,
    },
    history::RoundRecord,
};
use color_eyre::eyre::Result;

pub const WIN_TEXT: &str = "You Win!";
pub const LOSE_TEXT: &str = "You Lose!";
pub const PIP: char = '●';

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ResultStyle {
    Win,
    Lose,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultBanner {
    pub text: &'static str,
    pub style: ResultStyle,
    /// Signed winnings, only present on a win.
    pub amount: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GameView {
    pub balance: u64,
    pub current_bet: u64,
    pub dice: DicePair,
    pub total: Option<u8>,
    pub rolling: bool,
    pub result: Option<ResultBanner>,
    pub currency: String,
    pub history: Vec<RoundRecord>,
    pub status: String,
}

impl GameView {
    pub fn project(state: &GameState, currency: &str, history: Vec<RoundRecord>) -> Self {
        let result = state.last_outcome().map(|outcome| match outcome.verdict {
            Verdict::Win => ResultBanner {
                text: WIN_TEXT,
                style: ResultStyle::Win,
                amount: Some(format_winnings(outcome.winnings, currency)),
            },
            Verdict::Lose => ResultBanner {
                text: LOSE_TEXT,
                style: ResultStyle::Lose,
                amount: None,
            },
        });
        Self {
            balance: state.balance(),
            current_bet: state.current_bet(),
            dice: state.dice(),
            total: (state.rounds_played() > 0).then(|| state.dice().total()),
            rolling: state.is_rolling(),
            result,
            currency: currency.to_string(),
            history,
            status: String::new(),
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }
}

/// Subscriber for state changes. The controller calls `render` after every
/// accepted action and `alert` for every refused one.
pub trait Renderer {
    fn render(&mut self, view: &GameView) -> Result<()>;

    fn alert(&mut self, message: &str) -> Result<()>;
}

pub fn format_winnings(winnings: u64, currency: &str) -> String {
    format!("+{winnings} {currency}")
}

/// One pip per point of the face.
pub fn pips(die: Die) -> String {
    std::iter::repeat_n(PIP, usize::from(die.face())).collect()
}

/// Pips laid out on a 3x3 grid the way they sit on a real die.
pub fn pip_rows(die: Die) -> [&'static str; 3] {
    const EMPTY: &str = "       ";
    const LEFT: &str = " ●     ";
    const MIDDLE: &str = "   ●   ";
    const RIGHT: &str = "     ● ";
    const BOTH: &str = " ●   ● ";
    match die.face() {
        1 => [EMPTY, MIDDLE, EMPTY],
        2 => [LEFT, EMPTY, RIGHT],
        3 => [LEFT, MIDDLE, RIGHT],
        4 => [BOTH, EMPTY, BOTH],
        5 => [BOTH, MIDDLE, BOTH],
        _ => [BOTH, BOTH, BOTH],
    }
}

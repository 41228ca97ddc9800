use thiserror::Error;

/// Reasons an action is refused. Every variant is detected before any state
/// is touched, so a rejected action leaves the game exactly as it was.
///
/// The `Display` text is what the player sees in the alert.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Please enter a valid amount")]
    InvalidInput { input: String },
    #[error("Insufficient balance")]
    InsufficientFunds { requested: u64, available: u64 },
    #[error("Please set a bet amount")]
    NoBetSet,
    #[error("Bet must be between {min} and {max}")]
    BetOutOfRange { amount: u64, min: u64, max: u64 },
    #[error("Dice are still rolling")]
    RoundInProgress,
    #[error("No roll in progress")]
    NoRoundInProgress,
}

impl GameError {
    pub fn invalid_input(input: impl Into<String>) -> Self {
        GameError::InvalidInput {
            input: input.into(),
        }
    }
}

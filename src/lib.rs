pub mod config;

pub mod controller;

pub mod delay;

pub mod dice;

pub mod error;

pub mod game;

pub mod history;

pub mod render;

pub mod test_helpers;

pub use config::{
    GameConfig,
    GameRules,
    MAX_BET,
    MIN_BET,
    Multiplier,
    PayoutTable,
};
pub use controller::GameController;
pub use delay::{
    RollDelay,
    TokioDelay,
};
pub use dice::{
    DicePair,
    DiceSource,
    Die,
    RandomDice,
};
pub use error::GameError;
pub use game::{
    Action,
    BetSelection,
    Choice,
    Event,
    GameState,
    Phase,
    RoundOutcome,
    Verdict,
};
pub use render::{
    GameView,
    Renderer,
};

use crate::game::Choice;
use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use serde::Deserialize;
use std::{
    fmt,
    fs,
    path::Path,
    time::Duration,
};

pub const MIN_BET: u64 = 500;
pub const MAX_BET: u64 = 10_000;
pub const DEFAULT_ROLL_DELAY_MS: u64 = 600;
pub const DEFAULT_CURRENCY: &str = "MMK";
pub const MAX_BET_PRESETS: usize = 9;

const BASIS_POINTS_PER_UNIT: u32 = 10_000;

/// Payout factor stored as basis points so that `floor(stake * factor)` is
/// exact integer arithmetic.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(try_from = "f64")]
pub struct Multiplier {
    basis_points: u32,
}

impl Multiplier {
    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self { basis_points }
    }

    pub fn basis_points(self) -> u32 {
        self.basis_points
    }

    /// Winnings for `stake`, floored. Saturates rather than wrapping.
    pub fn apply(self, stake: u64) -> u64 {
        let scaled = u128::from(stake) * u128::from(self.basis_points)
            / u128::from(BASIS_POINTS_PER_UNIT);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

impl TryFrom<f64> for Multiplier {
    type Error = String;

    fn try_from(value: f64) -> std::result::Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("multiplier must be a non-negative number, got {value}"));
        }
        let scaled = (value * f64::from(BASIS_POINTS_PER_UNIT)).round();
        if scaled > f64::from(u32::MAX) {
            return Err(format!("multiplier {value} is too large"));
        }
        Ok(Self::from_basis_points(scaled as u32))
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.basis_points / BASIS_POINTS_PER_UNIT;
        let frac = self.basis_points % BASIS_POINTS_PER_UNIT;
        if frac == 0 {
            return write!(f, "x{whole}");
        }
        let digits = format!("{frac:04}");
        write!(f, "x{whole}.{}", digits.trim_end_matches('0'))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayoutTable {
    pub under: Multiplier,
    pub equal: Multiplier,
    pub over: Multiplier,
}

impl PayoutTable {
    pub fn multiplier(&self, choice: Choice) -> Multiplier {
        match choice {
            Choice::Under => self.under,
            Choice::Equal => self.equal,
            Choice::Over => self.over,
        }
    }
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self {
            under: Multiplier::from_basis_points(23_000),
            equal: Multiplier::from_basis_points(58_000),
            over: Multiplier::from_basis_points(23_000),
        }
    }
}

/// Betting rules the core enforces.
///
/// With `strict_limits` off (the default) `min_bet` only feeds the "min"
/// shortcut and `max_bet` is informational; the balance is the only ceiling.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameRules {
    pub min_bet: u64,
    pub max_bet: u64,
    pub strict_limits: bool,
    pub payouts: PayoutTable,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            min_bet: MIN_BET,
            max_bet: MAX_BET,
            strict_limits: false,
            payouts: PayoutTable::default(),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub rules: GameRules,
    pub roll_delay_ms: u64,
    pub starting_balance: u64,
    pub currency: String,
    pub bet_presets: Vec<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rules: GameRules::default(),
            roll_delay_ms: DEFAULT_ROLL_DELAY_MS,
            starting_balance: 0,
            currency: DEFAULT_CURRENCY.to_string(),
            bet_presets: vec![1_000, 2_000, 5_000, 10_000],
        }
    }
}

impl GameConfig {
    /// Reads a JSON config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .wrap_err_with(|| format!("reading config {}", path.display()))?;
                Self::from_json(&raw)
                    .wrap_err_with(|| format!("parsing config {}", path.display()))?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rules.min_bet > self.rules.max_bet {
            return Err(eyre!(
                "min_bet ({}) exceeds max_bet ({})",
                self.rules.min_bet,
                self.rules.max_bet
            ));
        }
        if self.bet_presets.len() > MAX_BET_PRESETS {
            return Err(eyre!(
                "at most {MAX_BET_PRESETS} bet presets are supported, got {}",
                self.bet_presets.len()
            ));
        }
        Ok(())
    }

    pub fn roll_delay(&self) -> Duration {
        Duration::from_millis(self.roll_delay_ms)
    }
}

use crate::{
    config::GameConfig,
    delay::RollDelay,
    dice::DiceSource,
    error::GameError,
    game::{
        Action,
        BetSelection,
        Choice,
        Event,
        GameState,
        PendingRound,
        Phase,
        RoundOutcome,
        parse_amount,
    },
    history::{
        RoundHistory,
        RoundRecord,
    },
    render::{
        GameView,
        Renderer,
        format_winnings,
    },
};
use chrono::Utc;
use tracing::{
    debug,
    error,
    info,
    warn,
};

/// Number of resolved rounds handed to the renderer.
const VIEW_HISTORY: usize = 10;

/// Owns one game: its state, where its dice come from and who draws it.
///
/// Every entry point validates through [`GameState::apply`], then either
/// re-renders or raises an alert. Nothing is mutated on the alert path.
pub struct GameController<D, R> {
    state: GameState,
    dice: D,
    renderer: R,
    currency: String,
    history: RoundHistory,
    status: String,
}

impl<D: DiceSource, R: Renderer> GameController<D, R> {
    pub fn new(config: &GameConfig, dice: D, renderer: R) -> Self {
        let state = GameState::with_balance(config.rules, config.starting_balance);
        Self::from_state(state, &config.currency, dice, renderer)
    }

    pub fn from_state(state: GameState, currency: &str, dice: D, renderer: R) -> Self {
        let mut controller = Self {
            state,
            dice,
            renderer,
            currency: currency.to_string(),
            history: RoundHistory::default(),
            status: String::from("Ready"),
        };
        controller.refresh();
        controller
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn view(&self) -> GameView {
        GameView::project(&self.state, &self.currency, self.history.recent(VIEW_HISTORY))
            .with_status(&self.status)
    }

    /// Pushes the current view to the renderer. Draw failures are logged and
    /// otherwise ignored; they never touch the game.
    pub fn refresh(&mut self) {
        let view = self.view();
        if let Err(err) = self.renderer.render(&view) {
            error!(error = %err, "render failed");
        }
    }

    pub fn deposit(&mut self, raw: &str) -> Result<u64, GameError> {
        let amount = parse_amount(raw).inspect_err(|err| self.reject("deposit", err))?;
        self.dispatch("deposit", Action::Deposit(amount))?;
        Ok(self.state.balance())
    }

    pub fn withdraw(&mut self, raw: &str) -> Result<u64, GameError> {
        let amount = parse_amount(raw).inspect_err(|err| self.reject("withdraw", err))?;
        self.dispatch("withdraw", Action::Withdraw(amount))?;
        Ok(self.state.balance())
    }

    pub fn select_bet(&mut self, selection: BetSelection) -> Result<u64, GameError> {
        self.dispatch("select_bet", Action::SelectBet(selection))?;
        Ok(self.state.current_bet())
    }

    /// Bet selection from free text: `min`, `max` or an amount.
    pub fn select_bet_input(&mut self, raw: &str) -> Result<u64, GameError> {
        let selection = raw
            .parse::<BetSelection>()
            .inspect_err(|err| self.reject("select_bet", err))?;
        self.select_bet(selection)
    }

    /// Validates the bet, debits it and leaves the dice rolling.
    pub fn begin_round(&mut self, choice: Choice) -> Result<PendingRound, GameError> {
        self.dispatch("play", Action::Play(choice))?;
        match self.state.phase() {
            Phase::Rolling(round) => Ok(round),
            Phase::Idle => Err(GameError::NoRoundInProgress),
        }
    }

    /// Lands the dice for the pending round and pays out.
    pub fn complete_round(&mut self) -> Result<RoundOutcome, GameError> {
        if !self.state.is_rolling() {
            let err = GameError::NoRoundInProgress;
            self.reject("resolve", &err);
            return Err(err);
        }
        let dice = self.dice.roll_pair();
        self.dispatch("resolve", Action::Resolve(dice))?;
        self.state
            .last_outcome()
            .copied()
            .ok_or(GameError::NoRoundInProgress)
    }

    /// One full round: debit, wait out the roll, resolve.
    pub async fn play<T: RollDelay>(
        &mut self,
        choice: Choice,
        delay: &T,
    ) -> Result<RoundOutcome, GameError> {
        self.begin_round(choice)?;
        delay.wait().await;
        self.complete_round()
    }

    fn dispatch(&mut self, op: &'static str, action: Action) -> Result<Event, GameError> {
        match self.state.apply(action) {
            Ok(event) => {
                self.record(&event);
                self.refresh();
                Ok(event)
            }
            Err(err) => {
                self.reject(op, &err);
                Err(err)
            }
        }
    }

    fn record(&mut self, event: &Event) {
        match *event {
            Event::Deposited { amount, balance } => {
                info!(amount, balance, "deposit accepted");
                self.status = format!("Deposited {amount} {}", self.currency);
            }
            Event::Withdrew { amount, balance } => {
                info!(amount, balance, "withdrawal accepted");
                self.status = format!("Withdrew {amount} {}", self.currency);
            }
            Event::BetSelected { bet } => {
                info!(bet, "bet selected");
                self.status = format!("Bet set to {bet} {}", self.currency);
            }
            Event::RoundStarted { round, balance } => {
                debug!(choice = %round.choice, stake = round.stake, balance, "dice rolling");
                self.status = format!("Rolling... {} on {}", round.stake, round.choice);
            }
            Event::RoundResolved { outcome, balance } => {
                let round = self.state.rounds_played();
                info!(
                    round,
                    choice = %outcome.choice,
                    stake = outcome.stake,
                    first = outcome.dice.first.face(),
                    second = outcome.dice.second.face(),
                    verdict = ?outcome.verdict,
                    winnings = outcome.winnings,
                    balance,
                    "round resolved"
                );
                self.history
                    .push(RoundRecord::new(round, &outcome, balance, Utc::now()));
                let total = outcome.dice.total();
                self.status = if outcome.is_win() {
                    format!(
                        "Rolled {total} | You Win! {}",
                        format_winnings(outcome.winnings, &self.currency)
                    )
                } else {
                    format!("Rolled {total} | You Lose!")
                };
            }
        }
    }

    fn reject(&mut self, op: &'static str, err: &GameError) {
        warn!(op, error = %err, detail = ?err, "action rejected");
        if let Err(render_err) = self.renderer.alert(&err.to_string()) {
            error!(error = %render_err, "alert failed");
        }
    }
}

use crate::ui;
use color_eyre::eyre::Result;
use crossterm::event::EventStream;
use seven_dice::{
    GameConfig,
    GameController,
    RandomDice,
    RollDelay,
    TokioDelay,
};
use std::{
    future::Future,
    pin::Pin,
};
use tokio::time::{
    self,
    Duration,
};

type Controller = GameController<RandomDice, ui::UiState>;
type PendingRoll = Pin<Box<dyn Future<Output = ()> + Send>>;

const SPINNER_TICK: Duration = Duration::from_millis(100);

pub async fn run_app(config: GameConfig) -> Result<()> {
    let ui_state = ui::UiState::new(&config);
    let mut controller = GameController::new(&config, RandomDice::new(), ui_state);
    let delay = TokioDelay::new(config.roll_delay());
    let mut input = EventStream::new();

    // UI bootstrap
    ui::terminal_enter(controller.renderer_mut())?;
    tracing::info!(
        balance = controller.state().balance(),
        roll_delay_ms = config.roll_delay_ms,
        "game started"
    );
    let res = run_loop(&mut controller, &delay, &mut input).await;
    ui::terminal_exit()?;
    tracing::info!(
        balance = controller.state().balance(),
        rounds = controller.state().rounds_played(),
        "game finished"
    );
    res
}

async fn run_loop<T: RollDelay>(
    controller: &mut Controller,
    delay: &T,
    input: &mut EventStream,
) -> Result<()> {
    let mut ticker = time::interval(SPINNER_TICK);
    let mut pending_roll: Option<PendingRoll> = None;
    controller.refresh();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            () = wait_for_roll(&mut pending_roll) => {
                pending_roll = None;
                let _ = controller.complete_round();
            }
            _ = ticker.tick(), if pending_roll.is_some() => {
                controller.renderer_mut().advance_spinner();
                controller.refresh();
            }
            ev = ui::next_event(controller.renderer_mut(), input) => {
                match ev? {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::Redraw => controller.refresh(),
                    ui::UserEvent::Deposit(raw) => { let _ = controller.deposit(&raw); },
                    ui::UserEvent::Withdraw(raw) => { let _ = controller.withdraw(&raw); },
                    ui::UserEvent::SelectBet(selection) => { let _ = controller.select_bet(selection); },
                    ui::UserEvent::CustomBet(raw) => { let _ = controller.select_bet_input(&raw); },
                    ui::UserEvent::Play(choice) => {
                        if controller.begin_round(choice).is_ok() {
                            pending_roll = Some(Box::pin(delay.wait()));
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// Completes when the queued roll delay elapses; never, if nothing is queued.
async fn wait_for_roll(pending: &mut Option<PendingRoll>) {
    match pending.as_mut() {
        Some(roll) => roll.await,
        None => std::future::pending().await,
    }
}

use crate::{
    config::GameConfig,
    controller::GameController,
    delay::RollDelay,
    dice::{
        DicePair,
        DiceSource,
        Die,
    },
    error::GameError,
    game::{
        Choice,
        RoundOutcome,
    },
    render::{
        GameView,
        Renderer,
    },
};
use color_eyre::eyre::Result;
use std::{
    collections::VecDeque,
    future::Future,
    sync::{
        Arc,
        Mutex,
    },
};

/// Dice that land on whatever the test queued, in order.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    faces: Arc<Mutex<VecDeque<Die>>>,
}

impl ScriptedDice {
    pub fn push_pair(&self, first: u8, second: u8) {
        let pair = DicePair::from_faces(first, second)
            .unwrap_or_else(|| panic!("({first}, {second}) is not a dice roll"));
        let mut faces = self.faces.lock().unwrap();
        faces.push_back(pair.first);
        faces.push_back(pair.second);
    }

    pub fn remaining(&self) -> usize {
        self.faces.lock().unwrap().len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self) -> Die {
        self.faces
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted dice ran out of faces")
    }
}

/// Renderer that keeps every frame and alert for later inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    frames: Arc<Mutex<Vec<GameView>>>,
    alerts: Arc<Mutex<Vec<String>>>,
}

impl RecordingRenderer {
    pub fn frames(&self) -> Vec<GameView> {
        self.frames.lock().unwrap().clone()
    }

    pub fn last_frame(&self) -> Option<GameView> {
        self.frames.lock().unwrap().last().cloned()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &GameView) -> Result<()> {
        self.frames.lock().unwrap().push(view.clone());
        Ok(())
    }

    fn alert(&mut self, message: &str) -> Result<()> {
        self.alerts.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

/// Resolves immediately.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoDelay;

impl RollDelay for NoDelay {
    fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        std::future::ready(())
    }
}

pub type TestController = GameController<ScriptedDice, RecordingRenderer>;

pub struct TestContext {
    controller: TestController,
    dice: ScriptedDice,
    renderer: RecordingRenderer,
}

impl TestContext {
    pub fn new() -> Self {
        Self::new_with_config(GameConfig::default())
    }

    pub fn new_with_balance(balance: u64) -> Self {
        Self::new_with_config(GameConfig {
            starting_balance: balance,
            ..GameConfig::default()
        })
    }

    pub fn new_with_config(config: GameConfig) -> Self {
        let dice = ScriptedDice::default();
        let renderer = RecordingRenderer::default();
        let controller = GameController::new(&config, dice.clone(), renderer.clone());
        Self {
            controller,
            dice,
            renderer,
        }
    }

    pub fn controller(&mut self) -> &mut TestController {
        &mut self.controller
    }

    pub fn dice(&self) -> &ScriptedDice {
        &self.dice
    }

    pub fn renderer(&self) -> &RecordingRenderer {
        &self.renderer
    }

    pub fn balance(&self) -> u64 {
        self.controller.state().balance()
    }

    pub fn current_bet(&self) -> u64 {
        self.controller.state().current_bet()
    }

    /// Queues the next roll and plays it out with no delay.
    pub async fn play_with_dice(
        &mut self,
        choice: Choice,
        first: u8,
        second: u8,
    ) -> std::result::Result<RoundOutcome, GameError> {
        self.dice.push_pair(first, second);
        self.controller.play(choice, &NoDelay).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

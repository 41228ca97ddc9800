use std::{
    future::Future,
    time::Duration,
};

/// The pause between debiting a stake and landing the dice.
///
/// The returned future owns everything it needs so a caller can park it
/// next to other work while the round is pending.
pub trait RollDelay {
    fn wait(&self) -> impl Future<Output = ()> + Send + 'static;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TokioDelay {
    duration: Duration,
}

impl TokioDelay {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl RollDelay for TokioDelay {
    fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        tokio::time::sleep(self.duration)
    }
}

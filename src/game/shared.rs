use std::sync::{Arc, Mutex, MutexGuard};

use rand::{Rng, rngs::StdRng};

use super::{Command, GameEngine, Snapshot, TickOutcome};

/// A [`GameEngine`] that input handling and the tick driver can share across threads.
///
/// Every operation takes the same lock, RNG included, so ticks and intents
/// never interleave halfway.
pub struct SharedEngine<R = StdRng> {
    inner: Arc<Mutex<GameEngine<R>>>,
}

impl<R> Clone for SharedEngine<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Rng> SharedEngine<R> {
    pub fn new(engine: GameEngine<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine
    pub fn with<T>(&self, f: impl FnOnce(&mut GameEngine<R>) -> T) -> T {
        f(&mut self.lock())
    }

    pub fn apply(&self, command: Command) {
        self.lock().apply(command);
    }

    pub fn advance_tick(&self) -> TickOutcome {
        self.lock().advance_tick()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }

    // Engine methods never panic halfway through a mutation, so a poisoned
    // lock still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, GameEngine<R>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

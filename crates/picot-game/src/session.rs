//! Shared game session.
//!
//! One root owns the [`GuessGame`] through a [`GameSession`]; menu, field,
//! and result views each receive a [`GameHandle`]. A handle used after the
//! session is gone (or a [`GameHandle::detached`] placeholder) reports
//! [`ContextError`] at the point of use instead of acting on stale state.

use picot_core::{ContextError, ContextHandle, Provider};

use crate::engine::{GameStatus, GuessGame};

pub struct GameSession {
    provider: Provider<GuessGame>,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            provider: Provider::new(GuessGame::new()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            provider: Provider::new(GuessGame::from_seed(seed)),
        }
    }

    pub fn handle(&self) -> GameHandle {
        GameHandle {
            game: self.provider.handle(),
        }
    }

    pub fn with_game<R>(&self, f: impl FnOnce(&mut GuessGame) -> R) -> R {
        self.provider.with_mut(f)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

/// What a result view needs: attempts, score, and the secret once the
/// round is over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameView {
    pub status: GameStatus,
    pub attempts: u8,
    pub score: u32,
    pub secret: Option<i64>,
}

/// Injected accessor to a [`GameSession`]'s state.
#[derive(Clone)]
pub struct GameHandle {
    game: ContextHandle<GuessGame>,
}

impl GameHandle {
    /// A handle bound to no session; every call fails with
    /// [`ContextError::Unprovided`].
    pub fn detached() -> Self {
        Self {
            game: ContextHandle::detached(),
        }
    }

    pub fn start_new_game(&self) -> Result<(), ContextError> {
        self.game.with_mut(|g| g.start_new_game())
    }

    pub fn guess(&self, n: i64) -> Result<GameStatus, ContextError> {
        self.game.with_mut(|g| g.guess(n))
    }

    pub fn status(&self) -> Result<GameStatus, ContextError> {
        self.game.with(|g| g.status())
    }

    pub fn score(&self) -> Result<u32, ContextError> {
        self.game.with(|g| g.score())
    }

    pub fn view(&self) -> Result<GameView, ContextError> {
        self.game.with(|g| GameView {
            status: g.status(),
            attempts: g.attempts(),
            score: g.score(),
            secret: g.secret(),
        })
    }
}

//! # Guess-the-number
//!
//! A pure state machine ([`GuessGame`]): `Idle → Playing → (Won | Lost)`,
//! with `Higher`/`Lower` feedback along the way. Five attempts per round;
//! a win at attempt `k` is worth `6 - k` points. The machine knows nothing
//! about rendering or input parsing; [`GameSession`]/[`GameHandle`] add the
//! shared-state layer a tree of views hangs off.

pub mod engine;
pub mod session;
pub mod tests;

pub use engine::{GameStatus, GuessGame, MAX_ATTEMPTS, MAX_SECRET, MIN_SECRET};
pub use session::{GameHandle, GameSession, GameView};

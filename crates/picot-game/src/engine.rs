use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MIN_SECRET: i64 = 1;
pub const MAX_SECRET: i64 = 10;
pub const MAX_ATTEMPTS: u8 = 5;

/// `Higher` and `Lower` are transient feedback while a round is still
/// running; `Won` and `Lost` are terminal until the next
/// [`start_new_game`](GuessGame::start_new_game).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Idle,
    Playing,
    Higher,
    Lower,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }

    /// A round is running and guesses are accepted.
    pub fn in_round(self) -> bool {
        matches!(self, GameStatus::Playing | GameStatus::Higher | GameStatus::Lower)
    }
}

/// Pure guess-the-number state machine.
///
/// The secret is drawn uniformly from `1..=10` when a game starts and is
/// immutable until the next start. Out-of-range guesses (and guesses
/// outside a running round) are ignored without any state change.
pub struct GuessGame {
    secret: i64,
    attempts: u8,
    status: GameStatus,
    score: u32,
    rng: StdRng,
}

impl GuessGame {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic secrets for tests and replays.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            secret: 0,
            attempts: 0,
            status: GameStatus::Idle,
            score: 0,
            rng,
        }
    }

    /// Starts a fresh round from any state.
    pub fn start_new_game(&mut self) {
        self.secret = self.rng.random_range(MIN_SECRET..=MAX_SECRET);
        self.attempts = 0;
        self.status = GameStatus::Playing;
        log::debug!("new game started");
    }

    /// Applies one guess and returns the resulting status.
    ///
    /// Guesses outside `1..=10`, or made while no round is running, leave
    /// the machine untouched.
    pub fn guess(&mut self, n: i64) -> GameStatus {
        if !self.status.in_round() {
            return self.status;
        }
        if !(MIN_SECRET..=MAX_SECRET).contains(&n) {
            return self.status;
        }

        self.attempts += 1;
        self.status = if n == self.secret {
            self.score += u32::from(MAX_ATTEMPTS + 1 - self.attempts);
            GameStatus::Won
        } else if self.attempts >= MAX_ATTEMPTS {
            GameStatus::Lost
        } else if n < self.secret {
            GameStatus::Higher
        } else {
            GameStatus::Lower
        };
        self.status
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// The secret is revealed only once the round is over.
    pub fn secret(&self) -> Option<i64> {
        self.status.is_terminal().then_some(self.secret)
    }

    #[cfg(test)]
    pub(crate) fn rig_secret(&mut self, secret: i64) {
        debug_assert!((MIN_SECRET..=MAX_SECRET).contains(&secret));
        self.secret = secret;
    }
}

impl Default for GuessGame {
    fn default() -> Self {
        Self::new()
    }
}

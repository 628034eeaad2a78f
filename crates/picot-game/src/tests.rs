#[cfg(test)]
mod tests {
    use crate::engine::*;
    use crate::session::*;
    use picot_core::ContextError;

    fn rigged_game(secret: i64) -> GuessGame {
        let mut game = GuessGame::from_seed(0);
        game.start_new_game();
        game.rig_secret(secret);
        game
    }

    #[test]
    fn idle_until_first_game() {
        let mut game = GuessGame::from_seed(0);
        assert_eq!(game.status(), GameStatus::Idle);
        assert_eq!(game.secret(), None);

        // guessing before a game starts changes nothing
        assert_eq!(game.guess(5), GameStatus::Idle);
        assert_eq!(game.attempts(), 0);
    }

    #[test]
    fn secret_is_always_in_range() {
        for seed in 0..50 {
            let mut game = GuessGame::from_seed(seed);
            game.start_new_game();
            // either wins outright or loses after five misses; both reveal
            for _ in 0..5 {
                game.guess(MIN_SECRET);
            }
            let secret = game.secret().expect("round must be terminal");
            assert!(
                (MIN_SECRET..=MAX_SECRET).contains(&secret),
                "seed {seed}: secret {secret} out of range"
            );
        }
    }

    #[test]
    fn out_of_range_guesses_are_ignored() {
        let mut game = rigged_game(7);
        for n in [0, 11, -3, 100, i64::MIN, i64::MAX] {
            let status = game.guess(n);
            assert_eq!(status, GameStatus::Playing);
            assert_eq!(game.attempts(), 0);
            assert_eq!(game.score(), 0);
        }
    }

    #[test]
    fn five_misses_lose_the_round() {
        let mut game = rigged_game(7);
        for (i, n) in [1, 2, 3, 4, 5].iter().enumerate() {
            let status = game.guess(*n);
            assert_eq!(game.attempts() as usize, i + 1);
            if i < 4 {
                assert_eq!(status, GameStatus::Higher);
            } else {
                assert_eq!(status, GameStatus::Lost);
            }
        }
        assert_eq!(game.secret(), Some(7));

        // terminal: further guesses are ignored until a new game
        assert_eq!(game.guess(7), GameStatus::Lost);
        assert_eq!(game.attempts(), 5);
        assert_eq!(game.score(), 0);

        game.start_new_game();
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.attempts(), 0);
    }

    #[test]
    fn win_scores_six_minus_attempts() {
        for k in 1..=5u8 {
            let mut game = rigged_game(7);
            for _ in 1..k {
                game.guess(1); // miss
            }
            assert_eq!(game.guess(7), GameStatus::Won);
            assert_eq!(game.attempts(), k);
            assert_eq!(game.score(), u32::from(6 - k));
        }
    }

    #[test]
    fn score_accumulates_across_rounds() {
        let mut game = rigged_game(7);
        assert_eq!(game.guess(7), GameStatus::Won);
        assert_eq!(game.score(), 5);

        game.start_new_game();
        game.rig_secret(3);
        game.guess(5);
        assert_eq!(game.guess(3), GameStatus::Won);
        assert_eq!(game.score(), 5 + 4);
    }

    #[test]
    fn feedback_scenario_with_secret_seven() {
        let mut game = rigged_game(7);

        assert_eq!(game.guess(5), GameStatus::Higher);
        assert_eq!(game.attempts(), 1);
        assert_eq!(game.secret(), None); // not revealed mid-round

        assert_eq!(game.guess(9), GameStatus::Lower);
        assert_eq!(game.attempts(), 2);

        assert_eq!(game.guess(7), GameStatus::Won);
        assert_eq!(game.attempts(), 3);
        assert_eq!(game.score(), 3);
        assert_eq!(game.secret(), Some(7));
    }

    #[test]
    fn session_handles_share_one_game() {
        let session = GameSession::seeded(42);
        session.with_game(|g| {
            g.start_new_game();
            g.rig_secret(4);
        });

        let field = session.handle();
        let result = session.handle();

        assert_eq!(field.guess(2), Ok(GameStatus::Higher));
        assert_eq!(field.guess(4), Ok(GameStatus::Won));

        let view = result.view().expect("session is live");
        assert_eq!(view.status, GameStatus::Won);
        assert_eq!(view.attempts, 2);
        assert_eq!(view.score, 4);
        assert_eq!(view.secret, Some(4));
    }

    #[test]
    fn handle_outliving_session_fails_loudly() {
        let handle = {
            let session = GameSession::new();
            session.handle()
        };
        assert!(matches!(
            handle.start_new_game(),
            Err(ContextError::Dropped { .. })
        ));
    }

    #[test]
    fn detached_handle_is_a_misuse_error() {
        let handle = GameHandle::detached();
        assert!(matches!(
            handle.status(),
            Err(ContextError::Unprovided { .. })
        ));
    }
}

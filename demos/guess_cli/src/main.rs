//! Terminal guess-the-number: the game session, persistent player profile,
//! and abortable fetch demo wired together.

use std::io::{BufRead, Write};
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use picot_game::{GameSession, GameStatus};
use picot_hooks::{Fetcher, HttpTransport, JsonFileStore, StoredValue};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let store = Rc::new(JsonFileStore::new("guess_cli_state.json"));
    let name = StoredValue::new(store.clone(), "name", String::from("Guest"));
    let best = StoredValue::new(store, "best-score", 0u32);

    let session = GameSession::new();
    let game = session.handle();

    println!("Guess the number 1-10 (player: {})", name.get());
    println!("commands: new | <number> | name <you> | fetch <url> | quit");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line {
            "" => {}
            "quit" => break,
            "new" => {
                game.start_new_game()?;
                println!("new round: 5 attempts");
            }
            _ if line.starts_with("name ") => {
                name.set(line[5..].trim().to_string());
                println!("hello, {}", name.get());
            }
            _ if line.starts_with("fetch ") => {
                fetch_once(line[6..].trim())?;
            }
            _ => match line.parse::<i64>() {
                Ok(n) => {
                    let status = game.guess(n)?;
                    let view = game.view()?;
                    match status {
                        GameStatus::Higher => println!("higher (attempt {})", view.attempts),
                        GameStatus::Lower => println!("lower (attempt {})", view.attempts),
                        GameStatus::Won => {
                            println!("won in {} attempts, score {}", view.attempts, view.score);
                            if view.score > best.get() {
                                best.set(view.score);
                                println!("new best score!");
                            }
                        }
                        GameStatus::Lost => {
                            let secret = view.secret.context("terminal round reveals the secret")?;
                            println!("lost; the number was {secret}");
                        }
                        GameStatus::Idle => println!("start a round first ('new')"),
                        GameStatus::Playing => {}
                    }
                }
                Err(_) => println!("unknown command"),
            },
        }
    }

    println!("bye, {} (best score {})", name.get(), best.get());
    Ok(())
}

/// Issues one request and pumps until it settles.
fn fetch_once(url: &str) -> anyhow::Result<()> {
    let fetcher = Fetcher::new(HttpTransport::new());
    fetcher.set_url(Some(url.to_string()));

    while fetcher.loading() {
        fetcher.pump();
        std::thread::sleep(Duration::from_millis(25));
    }
    fetcher.pump();

    if let Some(err) = fetcher.error().get() {
        println!("fetch failed: {err}");
    } else if let Some(data) = fetcher.data().get() {
        println!("{}", serde_json::to_string_pretty(&data)?);
    }
    Ok(())
}

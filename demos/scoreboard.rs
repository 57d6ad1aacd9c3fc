//! # Command-line scoreboard
//!
//! A small presentation layer over the engine: reads pin counts as text,
//! validates them as non-negative integers, rolls them and prints the board
//! after every roll. Rejected input is reported and the game carries on.
//!
//! Run with:
//! `cargo run --example scoreboard -- 10 7 3 9 0`
//! or without rolls to type them one per line.

// Allow example-specific patterns
#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::expect_used
)]

use std::io::BufRead;
use std::sync::Arc;

use clap::Parser;
use tenpin::telemetry::TracingObserver;
use tenpin::{BowlingGame, GameBuilder, ScoreboardFormat};

#[derive(Parser)]
#[command(about = "Score a ten-pin bowling game roll by roll")]
struct Opt {
    /// Pin counts to roll; read from standard input when none are given
    rolls: Vec<String>,
    /// Separate rolls with a single space instead of " | "
    #[arg(short, long)]
    compact: bool,
    /// Log engine decisions
    #[arg(short, long)]
    verbose: bool,
}

/// Parses one pin count the way a form field would: trimmed, digits only.
fn parse_pins(text: &str) -> Result<i32, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("enter a number of pins".to_owned());
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{}' is not a non-negative whole number", text));
    }
    text.parse::<i32>()
        .map_err(|err| format!("'{}' is not a usable pin count: {}", text, err))
}

/// Returns `true` once the game is over.
fn submit(game: &mut BowlingGame, text: &str) -> bool {
    let pins = match parse_pins(text) {
        Ok(pins) => pins,
        Err(message) => {
            eprintln!("{}", message);
            return false;
        },
    };
    if let Err(err) = game.roll(pins) {
        eprintln!("{}", err);
        return game.is_game_over();
    }

    print!("{}", game.scoreboard());
    if game.is_game_over() {
        println!("Game over! Final score: {}", game.score());
        return true;
    }
    println!("(best still possible: {})\n", game.max_possible_score());
    false
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::parse();

    // configure logging: engine decisions go to standard error
    let level = if opt.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .expect("setting up tracing subscriber failed");

    let format = if opt.compact {
        ScoreboardFormat::compact()
    } else {
        ScoreboardFormat::classic()
    };
    let mut game = GameBuilder::new()
        .with_scoreboard_format(format)
        .with_violation_observer(Arc::new(TracingObserver::new()))
        .build()?;
    game.reset();

    if !opt.rolls.is_empty() {
        for text in &opt.rolls {
            if submit(&mut game, text) {
                break;
            }
        }
        return Ok(());
    }

    println!("Enter pins knocked down, one roll per line.");
    for line in std::io::stdin().lock().lines() {
        if submit(&mut game, &line?) {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_pins_explains_refused_text() {
        assert_eq!(parse_pins(" 7 "), Ok(7));
        assert_eq!(parse_pins("10"), Ok(10));
        assert!(parse_pins("  ").unwrap_err().contains("enter a number"));
        assert!(parse_pins("-3").unwrap_err().contains("non-negative"));

        let err = parse_pins("99999999999").unwrap_err();
        assert!(err.contains("not a usable pin count"), "{}", err);
        assert!(err.contains("too large"), "{}", err);
    }
}

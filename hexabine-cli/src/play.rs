//! Play command - interactive game on stdin/stdout
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_session() - the read/apply/draw loop
//! - Level 3: apply_command() - one line of input
//! - Level 4: parsing and help text

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;
use hexabine_core::{Direction, EngineConfig, HexMergeEngine, SpawnPolicy, WeightedSpawn};

use crate::render;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Print the board as JSON after every move instead of text
    #[arg(long)]
    pub json: bool,
}

/// One parsed line of input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Shift(Direction),
    New,
    Help,
    Quit,
}

/// What the session should do after a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Redraw,
    GameOver,
    Quit,
}

const HELP: &str = "\
Combine tiles by sliding them together. Equal tiles merge.
Directions:  ul  ur        (up-left, up-right)
            l      r       (left, right)
             dl  dr        (down-left, down-right)
Other commands: new, help, quit";

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, config: EngineConfig, seed: Option<u64>) -> Result<()> {
    let policy = match seed {
        Some(s) => WeightedSpawn::with_seed(config.two_probability, s),
        None => WeightedSpawn::from_entropy(config.two_probability),
    };
    let mut engine = HexMergeEngine::new(config, policy).context("Invalid engine config")?;

    tracing::info!("Starting game on a {}x{} board", engine.height(), engine.width());

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    play_session(&mut engine, stdin.lock(), stdout.lock(), args.json)
}

// ============================================================================
// LEVEL 2 - SESSION LOOP
// ============================================================================

/// Read commands until quit or end of input
pub fn play_session<P, R, W>(
    engine: &mut HexMergeEngine<P>,
    input: R,
    mut out: W,
    json: bool,
) -> Result<()>
where
    P: SpawnPolicy,
    R: BufRead,
    W: Write,
{
    writeln!(out, "{HELP}")?;
    draw(engine, &mut out, json)?;

    for line in input.lines() {
        let line = line.context("Failed to read input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        match apply_command(engine, command) {
            Step::Continue => {}
            Step::Redraw => draw(engine, &mut out, json)?,
            Step::GameOver => {
                draw(engine, &mut out, json)?;
                writeln!(out, "Game over! Final score: {}. Type 'new' to play again.", engine.score())?;
            }
            Step::Quit => break,
        }
        if command == Command::Help {
            writeln!(out, "{HELP}")?;
        }
    }

    writeln!(out, "Final score: {}", engine.score())?;
    Ok(())
}

// ============================================================================
// LEVEL 3 - COMMANDS
// ============================================================================

/// Apply one command; a shift is settled immediately since there is no animation
pub fn apply_command<P: SpawnPolicy>(engine: &mut HexMergeEngine<P>, command: Command) -> Step {
    match command {
        Command::Shift(dir) => {
            if engine.is_game_over() || !engine.shift(dir) {
                return Step::Continue;
            }
            match engine.settle() {
                Some(settled) if settled.game_over => Step::GameOver,
                _ => Step::Redraw,
            }
        }
        Command::New => {
            engine.reset();
            Step::Redraw
        }
        Command::Help => Step::Continue,
        Command::Quit => Step::Quit,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

pub fn parse_command(line: &str) -> Result<Command, String> {
    match line.to_ascii_lowercase().as_str() {
        "new" | "restart" => Ok(Command::New),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => other
            .parse::<Direction>()
            .map(Command::Shift)
            .map_err(|err| err.to_string()),
    }
}

fn draw<P: SpawnPolicy, W: Write>(engine: &HexMergeEngine<P>, out: &mut W, json: bool) -> Result<()> {
    let snapshot = engine.snapshot();
    if json {
        writeln!(out, "{}", serde_json::to_string(&snapshot)?)?;
    } else {
        write!(out, "{}", render::board(&snapshot))?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexabine_core::{Cell, ScriptedSpawn};

    fn engine() -> HexMergeEngine<ScriptedSpawn> {
        HexMergeEngine::from_layout(
            EngineConfig::with_size(1, 3),
            ScriptedSpawn::default(),
            &[(Cell::new(0, 1), 2), (Cell::new(0, 2), 2)],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("UL"), Ok(Command::Shift(Direction::UL)));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert_eq!(parse_command("new"), Ok(Command::New));
        assert!(parse_command("up").is_err());
    }

    #[test]
    fn test_shift_settles_and_redraws() {
        let mut game = engine();
        assert_eq!(apply_command(&mut game, Command::Shift(Direction::L)), Step::Redraw);
        assert!(!game.is_settling());
        assert_eq!(game.value_at(Cell::new(0, 0)), Some(4));
        // Scripted spawn fills the first empty cell
        assert_eq!(game.value_at(Cell::new(0, 1)), Some(2));
    }

    #[test]
    fn test_blocked_shift_continues() {
        let mut game = HexMergeEngine::from_layout(
            EngineConfig::with_size(1, 3),
            ScriptedSpawn::default(),
            &[(Cell::new(0, 0), 2), (Cell::new(0, 1), 4)],
        )
        .unwrap();
        assert_eq!(apply_command(&mut game, Command::Shift(Direction::L)), Step::Continue);
        assert_eq!(game.moves_made(), 0);
    }

    #[test]
    fn test_session_transcript() {
        let mut game = engine();
        let input = "l\nbogus\nquit\nr\n";
        let mut out = Vec::new();
        play_session(&mut game, input.as_bytes(), &mut out, false).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Score: 4"));
        assert!(text.contains("unknown direction 'bogus'"));
        assert!(text.ends_with("Final score: 4\n"));
    }
}

use std::io::{BufRead, Write};

use anyhow::{Context, bail};
use sapper_core::{Coord, Coord2, GameError, GameSession, GameStatus, MineLayout, MoveResult};
use sapper_protocol::GameId;
use sapper_store::{GameService, GameStore};

use crate::render;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let words: Vec<_> = line.split_whitespace().collect();
        Ok(match words.as_slice() {
            ["q" | "quit"] => Self::Quit,
            ["h" | "help" | "?"] => Self::Help,
            ["f" | "flag", row, col] => Self::Flag(parse_coords(row, col)?),
            ["r" | "reveal", row, col] | [row, col] => Self::Reveal(parse_coords(row, col)?),
            _ => bail!("Unknown command {:?}", line.trim()),
        })
    }
}

fn parse_coords(row: &str, col: &str) -> anyhow::Result<Coord2> {
    let row: Coord = row.parse().with_context(|| format!("Bad row {row:?}"))?;
    let col: Coord = col.parse().with_context(|| format!("Bad column {col:?}"))?;
    Ok((row, col))
}

const HELP: &str = "\
Commands:
  <row> <col>        reveal a cell (also: r <row> <col>)
  f <row> <col>      toggle a flag
  q                  leave the game
";

/// Runs one live game: every accepted reveal is computed by the session and
/// then recorded through the service. Flags stay local.
pub fn run<S: GameStore>(
    service: &mut GameService<S>,
    id: GameId,
    layout: MineLayout,
    input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<GameStatus> {
    let mut session = GameSession::new(layout);
    writeln!(output, "Game #{id}, type ? for help")?;
    writeln!(output, "{}", render::board(&session))?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{err}")?;
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                write!(output, "{HELP}")?;
                continue;
            }
            Command::Flag(coords) => match session.toggle_flag(coords) {
                Ok(_) => {}
                Err(GameError::InvalidCoords) => {
                    writeln!(output, "{coords:?} is outside the board")?;
                    continue;
                }
                Err(err) => return Err(err.into()),
            },
            Command::Reveal(coords) => match session.reveal(coords) {
                Ok(step) => {
                    service
                        .record_step(id, step.record.into())
                        .context("Could not record move")?;
                    match step.result() {
                        MoveResult::Exploded => {
                            writeln!(output, "BOOM! You stepped on a mine.")?
                        }
                        MoveResult::Won => writeln!(output, "You won!")?,
                        MoveResult::Ok => {}
                    }
                }
                Err(err) if err.is_illegal_move() => {
                    log::debug!("Ignoring reveal at {:?}: {}", coords, err);
                    continue;
                }
                Err(GameError::InvalidCoords) => {
                    writeln!(output, "{coords:?} is outside the board")?;
                    continue;
                }
                Err(err) => return Err(err.into()),
            },
        }

        writeln!(output, "{}", render::board(&session))?;
        if session.is_finished() {
            break;
        }
        writeln!(
            output,
            "Step {}, mines left: {}",
            session.step_count(),
            session.mines_left()
        )?;
    }

    Ok(session.state())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::{Move, MoveResult};
    use sapper_protocol::CreateGameRequest;
    use sapper_store::MemoryStore;
    use std::io::Cursor;

    fn service_with_game(mines: &[u32]) -> (GameService<MemoryStore>, GameId, MineLayout) {
        let layout = MineLayout::from_mine_indices(3, 3, mines).unwrap();
        let mut service = GameService::new(MemoryStore::new());
        let id = service
            .create_game(CreateGameRequest {
                player_name: "ann".to_string(),
                width: 3,
                height: 3,
                mines_count: layout.mine_count(),
                mine_locations: layout.mine_indices(),
            })
            .unwrap()
            .id;
        (service, id, layout)
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("2 3").unwrap(), Command::Reveal((2, 3)));
        assert_eq!(Command::parse("r 0 1").unwrap(), Command::Reveal((0, 1)));
        assert_eq!(Command::parse(" f 1 1 ").unwrap(), Command::Flag((1, 1)));
        assert_eq!(Command::parse("q").unwrap(), Command::Quit);
        assert!(Command::parse("r -1 0").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[test]
    fn losing_game_records_reveals_but_not_flags() {
        let (mut service, id, layout) = service_with_game(&[4]);
        let input = Cursor::new("f 0 0\n0 0\n0 0\n1 1\n2 2\n");
        let mut output = Vec::new();

        let status = run(&mut service, id, layout, input, &mut output).unwrap();

        assert_eq!(status, GameStatus::Lost);
        let details = service.fetch_game(id).unwrap();
        assert_eq!(details.summary.status, GameStatus::Lost);
        assert_eq!(
            details.moves,
            vec![
                Move::new(1, (0, 0), MoveResult::Ok),
                Move::new(2, (1, 1), MoveResult::Exploded),
            ]
        );
        assert!(String::from_utf8(output).unwrap().contains("BOOM"));
    }

    #[test]
    fn quitting_leaves_game_playing() {
        let (mut service, id, layout) = service_with_game(&[4]);
        let input = Cursor::new("9 9\nq\n");
        let mut output = Vec::new();

        let status = run(&mut service, id, layout, input, &mut output).unwrap();

        assert_eq!(status, GameStatus::Playing);
        assert!(service.fetch_game(id).unwrap().moves.is_empty());
        assert!(String::from_utf8(output).unwrap().contains("outside the board"));
    }
}

use std::io::{BufRead, Write};

use sapper_core::{Replay, ReplayStep};

use crate::render;

fn describe(step: &ReplayStep) -> String {
    let mv = &step.record;
    let mut line = format!(
        "#{} reveal ({}, {}) -> {}",
        mv.step_number, mv.row, mv.col, mv.result
    );
    match step.result {
        None => line.push_str(" [skipped]"),
        Some(result) if result != mv.result => {
            line.push_str(&format!(" [plays out as {result}]"))
        }
        Some(_) => line.push_str(&format!(", {} cells changed", step.delta.len())),
    }
    line
}

/// Shows the empty board, then one move per line of input; `q` stops early.
/// With `all` set every move is played without waiting.
pub fn run(
    replay: &mut Replay,
    all: bool,
    mut input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    writeln!(output, "{}", render::board(replay.session()))?;
    writeln!(output, "{}", replay.banner())?;

    while !replay.is_finished() {
        if !all {
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 || line.trim() == "q" {
                break;
            }
        }
        let step = replay.advance()?;
        writeln!(output, "{}", describe(&step))?;
        writeln!(output, "{}", render::board(replay.session()))?;
        writeln!(output, "{}", replay.banner())?;
    }
    Ok(())
}

use std::io::{BufRead, Write};

use indoc::indoc;

use crate::prelude::*;

const SLOTS_PER_ROW: usize = 10;

const INSTRUCTIONS: &str = indoc! {"
    === Number Game ===
    Numbers from 1 to 1000 arrive one at a time. Place each one in a slot so
    the board always reads in ascending order. Fill every slot to win.
    Enter a slot number to place the current number, or q to quit."};

/// Plays rounds until the player declines another. Finished rounds are added
/// to the session statistics, quitting mid round records nothing.
pub fn play<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>) -> Result<(), TermError> {
    arcade.console.say(INSTRUCTIONS)?;
    loop {
        let mut round = NumberRound::new(&mut arcade.rng);
        if !play_round(arcade, &mut round)? {
            log::info!("Number round abandoned after {} placements", round.placements());
            return Ok(());
        }
        round.record_into(&mut arcade.statistics);
        let summary = arcade.statistics.summary_message();
        arcade.console.say(summary)?;
        match arcade.console.ask("Play again? (y/n): ")? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => continue,
            _ => return Ok(()),
        }
    }
}

/// Returns whether the round reached an end, rather than being quit.
fn play_round<R: BufRead, W: Write>(
    arcade: &mut Arcade<R, W>,
    round: &mut NumberRound,
) -> Result<bool, TermError> {
    while let (RoundStatus::InProgress, Some(value)) = (round.status(), round.current_value()) {
        arcade.console.say(render_board(round.board()))?;
        arcade.console.say(format!("Next number: {value}"))?;
        if arcade.config.number_game.show_valid_positions {
            let open = round
                .board()
                .valid_positions(value)
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            arcade.console.say(format!("Open slots: {open}"))?;
        }
        let prompt = format!("Place at (0-{}): ", round.board().size() - 1);
        let Some(line) = arcade.console.ask(&prompt)? else {
            return Ok(false);
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Ok(false);
        }
        match line.parse::<usize>() {
            Ok(position) => {
                if let Err(err) = round.place(position) {
                    arcade.console.say(format!("Cannot place {value} there: {err}"))?;
                }
            },
            Err(_) => arcade.console.say("Please enter a slot number.")?,
        }
    }
    arcade.console.say(render_board(round.board()))?;
    match (round.status(), round.current_value()) {
        (RoundStatus::Lost, Some(value)) => arcade
            .console
            .say(format!("There is nowhere to place {value}. You lose!"))?,
        _ => arcade.console.say("Every slot is filled. You win!")?,
    }
    Ok(true)
}

pub fn render_board(board: &PlacementBoard) -> String {
    board
        .slots()
        .iter()
        .enumerate()
        .map(|(position, slot)| match slot {
            Some(value) => format!("{position:>2}:[{value:>4}]"),
            None => format!("{position:>2}:[    ]"),
        })
        .collect::<Vec<_>>()
        .chunks(SLOTS_PER_ROW)
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

use std::io::{BufRead, Write};
use std::time::Instant;

use arcade_core::drill::TIME_LIMIT;
use arcade_core::player::MASTERY_THRESHOLD_PERCENT;
use chrono::{Local, NaiveDateTime, Timelike};
use indoc::indoc;
use rand::seq::SliceRandom;

use crate::handshapes::handshape;
use crate::prelude::*;

const REVIEW_QUESTIONS: usize = 10;

const LADDER_MENU: &str = indoc! {"

    === ASL Learning Ladder ===
    D - Speed drill on your unlocked letters
    R - Review your weakest letters (two tries each)
    U - Unlock the next tier
    P - Show progress
    L - Leaderboard
    H - Review score history
    B - Back to the main menu"};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LadderChoice {
    Drill,
    Review,
    Unlock,
    Progress,
    Leaderboard,
    History,
    Back,
}

impl LadderChoice {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "d" => Some(LadderChoice::Drill),
            "r" => Some(LadderChoice::Review),
            "u" => Some(LadderChoice::Unlock),
            "p" => Some(LadderChoice::Progress),
            "l" => Some(LadderChoice::Leaderboard),
            "h" => Some(LadderChoice::History),
            "b" | "q" => Some(LadderChoice::Back),
            _ => None,
        }
    }
}

pub fn play<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>) -> Result<(), TermError> {
    let Some(mut player) = sign_in(arcade)? else {
        return Ok(());
    };
    loop {
        arcade.console.say(LADDER_MENU)?;
        let Some(line) = arcade.console.ask("> ")? else {
            break;
        };
        match LadderChoice::parse(&line) {
            Some(LadderChoice::Drill) => drill(arcade, &mut player)?,
            Some(LadderChoice::Review) => review(arcade, &mut player)?,
            Some(LadderChoice::Unlock) => unlock(arcade, &mut player)?,
            Some(LadderChoice::Progress) => progress(arcade, &player)?,
            Some(LadderChoice::Leaderboard) => leaderboard(arcade, &player)?,
            Some(LadderChoice::History) => history(arcade)?,
            Some(LadderChoice::Back) => break,
            None => arcade
                .console
                .say(format!("Invalid choice [{}], please try again.", line.trim()))?,
        }
    }
    save(arcade, &player)
}

fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Loads the named player, or creates them. `None` if input ends first.
fn sign_in<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>) -> Result<Option<Player>, TermError> {
    loop {
        let Some(name) = arcade.console.ask("Player name: ")? else {
            return Ok(None);
        };
        let name = name.trim();
        if arcade.store.exists(name) {
            match arcade.store.load(name) {
                Ok(player) => {
                    arcade
                        .console
                        .say(format!("Welcome back, {}! {}", player.name(), player.statistics()))?;
                    return Ok(Some(player));
                },
                Err(err) => {
                    log::warn!("Could not load player [{name}]: {err}");
                    arcade
                        .console
                        .say(format!("Could not load {name}: {err}. Try another name."))?;
                    continue;
                },
            }
        }
        match Player::new(name, now()) {
            Ok(player) => {
                arcade
                    .console
                    .say(format!("Welcome, {}! Letters A to E are unlocked.", player.name()))?;
                return Ok(Some(player));
            },
            Err(err) => arcade.console.say(format!("{err}, please try again."))?,
        }
    }
}

fn drill<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>, player: &mut Player) -> Result<(), TermError> {
    let letters: Vec<char> = player.unlocked_letters().into_iter().collect();
    let mut session = match DrillSession::new(&letters, &mut arcade.rng) {
        Ok(session) => session,
        Err(err) => return Ok(arcade.console.say(err.to_string())?),
    };
    arcade.console.say(format!(
        "Type the letter for each handshape. You have {} seconds per question.",
        TIME_LIMIT.as_secs()
    ))?;
    while let Some(letter) = session.current_letter() {
        arcade.console.say(format!(
            "Question {}/{}: {}",
            session.question_number(),
            session.total_questions(),
            handshape(letter).unwrap_or("?")
        ))?;
        let asked_at = Instant::now();
        let Some(line) = arcade.console.ask("Letter: ")? else {
            break;
        };
        let answer = if arcade.config.ladder.enforce_time_limit && asked_at.elapsed() > TIME_LIMIT {
            arcade.console.say("Too slow!")?;
            None
        } else {
            single_letter(&line)
        };
        match session.answer(answer, player.mastery_mut()) {
            Some(true) => arcade.console.say("Correct!")?,
            _ => arcade.console.say(format!("Incorrect, that was {letter}."))?,
        }
    }
    if session.has_more_questions() {
        arcade.console.say("Drill abandoned.")?;
        return Ok(());
    }

    let result = session.result();
    player.record_test_completion(result.correct_answers() as u32);
    arcade.console.say(result.to_string())?;
    report_weak_letters(arcade, player)?;
    if player.can_unlock_next_tier() {
        arcade
            .console
            .say("You have mastered this tier! Press U to unlock the next one.")?;
    }
    autosave(arcade, player)
}

/// Two tries per question. The first try is what counts towards mastery.
fn review<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>, player: &mut Player) -> Result<(), TermError> {
    let unlocked = player.unlocked_letters();
    let weak: Vec<char> = player
        .mastery()
        .weak_keys(MASTERY_THRESHOLD_PERCENT)
        .unwrap_or_default()
        .into_iter()
        .filter(|letter| unlocked.contains(letter))
        .collect();
    let mut letters = if weak.is_empty() {
        unlocked.into_iter().collect()
    } else {
        weak
    };
    letters.shuffle(&mut arcade.rng);

    let mut score = ScoreRecord::new(now());
    score.increment_games_played();
    for letter in letters.iter().cycle().take(REVIEW_QUESTIONS).copied() {
        arcade
            .console
            .say(format!("Which letter? {}", handshape(letter).unwrap_or("?")))?;
        let Some(first) = arcade.console.ask("First try: ")? else {
            arcade.console.say("Review abandoned.")?;
            return Ok(());
        };
        let first_correct = single_letter(&first).is_some_and(|answer| answer == letter);
        player.mastery_mut().record_attempt(letter, first_correct);
        if first_correct {
            score.increment_correct_first_attempts();
            arcade.console.say("Correct!")?;
            continue;
        }
        let Some(second) = arcade.console.ask("Second try: ")? else {
            arcade.console.say("Review abandoned.")?;
            return Ok(());
        };
        if single_letter(&second).is_some_and(|answer| answer == letter) {
            score.increment_correct_second_attempts();
            arcade.console.say("Correct on the second try.")?;
        } else {
            score.increment_incorrect_attempts();
            arcade.console.say(format!("Incorrect, that was {letter}."))?;
        }
    }

    arcade.console.say(format!("Review score: {} points", score.score()))?;
    if let Err(err) = score.append_to_file(&arcade.score_file) {
        log::warn!("Could not append score to {:?}: {err}", arcade.score_file);
        arcade.console.say(format!("Could not save the score: {err}"))?;
    }
    autosave(arcade, player)
}

fn unlock<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>, player: &mut Player) -> Result<(), TermError> {
    match player.unlock_next_tier() {
        Ok(()) => {
            let letters: String = player.unlocked_letters().into_iter().collect();
            arcade.console.say(format!(
                "Tier {} unlocked! Your letters: {letters}",
                player.current_tier()
            ))?;
            autosave(arcade, player)
        },
        Err(err) => Ok(arcade.console.say(format!("{err}."))?),
    }
}

fn progress<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>, player: &Player) -> Result<(), TermError> {
    arcade
        .console
        .say(format!("{} - tier {}", player.name(), player.current_tier()))?;
    arcade.console.say(player.statistics().to_string())?;
    let mastery: Vec<String> = player
        .unlocked_letters()
        .into_iter()
        .map(|letter| format!("{letter}: {:.0}%", player.mastery().mastery_percent(&letter)))
        .collect();
    arcade.console.say(mastery.join("  "))?;
    report_weak_letters(arcade, player)
}

fn leaderboard<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>, player: &Player) -> Result<(), TermError> {
    let mut players = match arcade.store.load_all() {
        Ok(players) => players,
        Err(err) => {
            log::warn!("Could not read saved players: {err}");
            Vec::new()
        },
    };
    // The in-memory player is more current than their saved record
    players.retain(|saved| saved.name() != player.name());
    players.push(player.clone());
    let ranking = Ranking::new(&players);
    arcade.console.say("=== Leaderboard ===")?;
    for (rank, ranked) in ranking.players().iter().enumerate() {
        arcade.console.say(format!(
            "{}. {} {:.1}%",
            rank + 1,
            ranked.name(),
            ranked.total_mastery_percent()
        ))?;
    }
    Ok(())
}

fn history<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>) -> Result<(), TermError> {
    let scores = match ScoreRecord::read_scores(&arcade.score_file) {
        Ok(scores) => scores,
        Err(err) => {
            log::warn!("Could not read scores from {:?}: {err}", arcade.score_file);
            Vec::new()
        },
    };
    if scores.is_empty() {
        return Ok(arcade.console.say("No scores yet.")?);
    }
    for score in scores {
        arcade.console.say(format!(
            "{}: {} points ({} first try, {} second try, {} missed)",
            score.played_at().format(DATE_TIME_FORMAT),
            score.score(),
            score.correct_first_attempts(),
            score.correct_second_attempts(),
            score.incorrect_attempts()
        ))?;
    }
    Ok(())
}

fn report_weak_letters<R: BufRead, W: Write>(
    arcade: &mut Arcade<R, W>,
    player: &Player,
) -> Result<(), TermError> {
    let weak = player
        .mastery()
        .weak_keys(MASTERY_THRESHOLD_PERCENT)
        .unwrap_or_default();
    if !weak.is_empty() {
        let weak: String = weak.into_iter().collect();
        arcade.console.say(format!("Letters to practice: {weak}"))?;
    }
    Ok(())
}

fn autosave<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>, player: &Player) -> Result<(), TermError> {
    if arcade.config.ladder.autosave {
        save(arcade, player)
    } else {
        Ok(())
    }
}

/// Save failures are reported and then ignored.
fn save<R: BufRead, W: Write>(arcade: &mut Arcade<R, W>, player: &Player) -> Result<(), TermError> {
    if let Err(err) = arcade.store.save(player) {
        log::warn!("Could not save player {}: {err}", player.name());
        arcade.console.say(format!("Could not save your progress: {err}"))?;
    }
    Ok(())
}

fn single_letter(input: &str) -> Option<char> {
    let mut chars = input.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Some(letter.to_ascii_uppercase()),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::test_support::*;

    #[test]
    fn choices_parse() {
        assert_eq!(Some(LadderChoice::Drill), LadderChoice::parse("D"));
        assert_eq!(Some(LadderChoice::Back), LadderChoice::parse("q"));
        assert_eq!(None, LadderChoice::parse("z"));
    }

    #[test]
    fn single_letter_answers() {
        assert_eq!(Some('A'), single_letter(" a "));
        assert_eq!(None, single_letter(""));
        assert_eq!(None, single_letter("ab"));
    }

    #[test]
    fn blank_name_reprompts_and_new_player_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut arcade = arcade("  \nAda\nb\n", dir.path());
        play(&mut arcade).unwrap();
        assert!(arcade.store.exists("Ada"));
        let output = output(arcade.console);
        assert!(output.contains("player name cannot be blank"));
        assert!(output.contains("Welcome, Ada!"));
    }

    #[test]
    fn unlock_without_mastery_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut arcade = arcade("Ada\nu\nb\n", dir.path());
        play(&mut arcade).unwrap();
        let loaded = arcade.store.load("Ada").unwrap();
        assert_eq!(5, loaded.unlocked_letters().len());
        let output = output(arcade.console);
        assert!(output.contains("insufficient mastery of tier [1]"));
    }

    #[test]
    fn wrong_answers_drill_records_every_question() {
        let dir = tempfile::tempdir().unwrap();
        let answers = "?\n".repeat(20);
        let mut arcade = arcade(&format!("Ada\nd\n{answers}b\n"), dir.path());
        play(&mut arcade).unwrap();

        let loaded = arcade.store.load("Ada").unwrap();
        assert_eq!(1, loaded.total_tests());
        assert_eq!(0, loaded.total_correct());
        let attempts: u32 = loaded
            .mastery()
            .records()
            .map(|(_, record)| record.total_attempts())
            .sum();
        assert_eq!(20, attempts);
        let output = output(arcade.console);
        assert!(output.contains("Test Result: 0/20 correct (0.0%) - FAILED"));
        assert!(output.contains("Letters to practice: "));
    }

    #[test]
    fn unlock_after_mastery_and_welcome_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlayerStore::new(dir.path().join("players"));
        let mut player = Player::new("Ada", now()).unwrap();
        for letter in ['A', 'B', 'C', 'D'] {
            player.record_attempt(letter, true).unwrap();
        }
        store.save(&player).unwrap();

        let mut arcade = arcade("Ada\nu\np\nb\n", dir.path());
        play(&mut arcade).unwrap();
        assert_eq!(10, arcade.store.load("Ada").unwrap().unlocked_letters().len());
        let output = output(arcade.console);
        assert!(output.contains("Welcome back, Ada!"));
        assert!(output.contains("Tier 2 unlocked! Your letters: ABCDEFGHIJ"));
        assert!(output.contains("Ada - tier 2"));
    }

    #[test]
    fn review_appends_score_and_history_reads_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlayerStore::new(dir.path().join("players"));
        let mut player = Player::new("Ada", now()).unwrap();
        // Only A is weak, so every review question asks for A
        player.record_attempt('A', false).unwrap();
        store.save(&player).unwrap();

        let mut tries = String::new();
        for i in 0..REVIEW_QUESTIONS {
            match i % 3 {
                0 => tries.push_str("a\n"),
                1 => tries.push_str("x\na\n"),
                _ => tries.push_str("x\ny\n"),
            }
        }
        let mut arcade = arcade(&format!("Ada\nr\n{tries}h\nb\n"), dir.path());
        play(&mut arcade).unwrap();

        let scores = ScoreRecord::read_scores(dir.path().join("scores.txt")).unwrap();
        assert_eq!(1, scores.len());
        assert_eq!(4, scores[0].correct_first_attempts());
        assert_eq!(3, scores[0].correct_second_attempts());
        assert_eq!(3, scores[0].incorrect_attempts());
        assert_eq!(11, scores[0].score());
        let record = arcade.store.load("Ada").unwrap().mastery().record(&'A').unwrap();
        assert_eq!(11, record.total_attempts());
        assert_eq!(4, record.successful_attempts());
        let output = output(arcade.console);
        assert!(output.contains("Review score: 11 points"));
        assert!(output.contains("11 points (4 first try, 3 second try, 3 missed)"));
    }

    #[test]
    fn leaderboard_ranks_saved_players() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlayerStore::new(dir.path().join("players"));
        let mut rival = Player::new("Rival", now()).unwrap();
        rival.record_attempt('A', true).unwrap();
        store.save(&rival).unwrap();

        let mut arcade = arcade("Ada\nl\nb\n", dir.path());
        play(&mut arcade).unwrap();
        let output = output(arcade.console);
        assert!(output.contains("1. Rival 100.0%"));
        assert!(output.contains("2. Ada 0.0%"));
    }
}

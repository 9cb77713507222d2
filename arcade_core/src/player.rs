use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;
use getset::{CopyGetters, Getters};
use thiserror::Error;

use crate::common::{letter_index, LETTERS};
use crate::mastery::MasteryTracker;

pub const LETTERS_PER_TIER: usize = 5;
/// How many letters of the current tier must be mastered to unlock the next.
pub const REQUIRED_MASTERED_COUNT: usize = 4;
/// A letter at or above this percentage counts as mastered.
pub const MASTERY_THRESHOLD_PERCENT: f64 = 80.0;

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ProgressError {
    #[error("player name cannot be blank")]
    BlankName,
    #[error("letter must be between A and Z, was [{0}]")]
    InvalidLetter(char),
    #[error("cannot unlock next tier, insufficient mastery of tier [{0}]")]
    InsufficientMastery(usize),
    #[error("no more tiers to unlock")]
    NoMoreTiers,
    #[error("unlocked letters [{0}] are not whole tiers starting from A")]
    BrokenTiers(String),
}

/// A learner on the ASL ladder: which letters they can drill, and how well
/// they know each one.
#[derive(Clone, Debug)]
pub struct Player {
    name: String,
    creation_date: NaiveDateTime,
    unlocked_letters: BTreeSet<char>,
    mastery: MasteryTracker<char>,
    total_tests: u32,
    total_correct: u32,
}

/// Lifetime totals for a player.
#[derive(Clone, Copy, CopyGetters, Debug, PartialEq)]
#[getset(get_copy = "pub")]
pub struct Statistics {
    total_tests: u32,
    total_correct: u32,
    average_mastery_percent: f64,
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tests: {}, Correct: {}, Avg Mastery: {:.1}%",
            self.total_tests, self.total_correct, self.average_mastery_percent
        )
    }
}

impl Player {
    /// Creates a player with the first tier unlocked.
    pub fn new<S: Into<String>>(name: S, creation_date: NaiveDateTime) -> Result<Self, ProgressError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProgressError::BlankName);
        }
        Ok(Player {
            name,
            creation_date,
            unlocked_letters: LETTERS[..LETTERS_PER_TIER].iter().copied().collect(),
            mastery: MasteryTracker::new(),
            total_tests: 0,
            total_correct: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn creation_date(&self) -> NaiveDateTime {
        self.creation_date
    }

    pub fn mastery(&self) -> &MasteryTracker<char> {
        &self.mastery
    }

    /// Direct access for drills that record attempts themselves.
    pub fn mastery_mut(&mut self) -> &mut MasteryTracker<char> {
        &mut self.mastery
    }

    pub fn record_attempt(&mut self, letter: char, success: bool) -> Result<(), ProgressError> {
        check_letter(letter)?;
        self.mastery.record_attempt(letter, success);
        Ok(())
    }

    pub fn letter_mastery(&self, letter: char) -> Result<f64, ProgressError> {
        check_letter(letter)?;
        Ok(self.mastery.mastery_percent(&letter))
    }

    /// Mean mastery over letters that have been attempted at least once.
    pub fn total_mastery_percent(&self) -> f64 {
        if self.mastery.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.mastery.snapshot().values().sum();
        sum / self.mastery.len() as f64
    }

    /// A copy of the unlocked letters, in alphabet order.
    pub fn unlocked_letters(&self) -> BTreeSet<char> {
        self.unlocked_letters.clone()
    }

    pub fn current_tier(&self) -> usize {
        self.unlocked_letters.len().div_ceil(LETTERS_PER_TIER).max(1)
    }

    /// Only the letters of the current tier are looked at. Letters from
    /// earlier tiers slipping below the threshold do not matter.
    pub fn can_unlock_next_tier(&self) -> bool {
        let start = (self.current_tier() - 1) * LETTERS_PER_TIER;
        let mastered = LETTERS
            .iter()
            .skip(start)
            .take(LETTERS_PER_TIER)
            .filter(|letter| self.mastery.mastery_percent(letter) >= MASTERY_THRESHOLD_PERCENT)
            .count();
        mastered >= REQUIRED_MASTERED_COUNT
    }

    /// Unlocks the next five letters, or whatever remains of the alphabet.
    ///
    /// The end of the alphabet is checked before the mastery gate, so a
    /// player on the last tier gets `NoMoreTiers` whatever their mastery.
    pub fn unlock_next_tier(&mut self) -> Result<(), ProgressError> {
        let next_start = self.current_tier() * LETTERS_PER_TIER;
        if next_start >= LETTERS.len() {
            return Err(ProgressError::NoMoreTiers);
        }
        if !self.can_unlock_next_tier() {
            return Err(ProgressError::InsufficientMastery(self.current_tier()));
        }
        self.unlocked_letters.extend(
            LETTERS
                .iter()
                .skip(next_start)
                .take(LETTERS_PER_TIER)
                .copied(),
        );
        log::info!(
            "Player {} unlocked tier {} ({} letters)",
            self.name,
            self.current_tier(),
            self.unlocked_letters.len()
        );
        Ok(())
    }

    pub fn record_test_completion(&mut self, correct_answers: u32) {
        self.total_tests += 1;
        self.total_correct += correct_answers;
    }

    pub fn total_tests(&self) -> u32 {
        self.total_tests
    }

    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            total_tests: self.total_tests,
            total_correct: self.total_correct,
            average_mastery_percent: self.total_mastery_percent(),
        }
    }

    /// Orders players best first: higher total mastery ranks earlier.
    pub fn rank_cmp(&self, other: &Player) -> Ordering {
        other
            .total_mastery_percent()
            .total_cmp(&self.total_mastery_percent())
    }

    /// Rebuilds a player from stored fields. An empty unlocked set grants the
    /// first tier. Anything else must be whole tiers starting from A, and
    /// every mastery key must be a letter.
    pub(crate) fn restore(
        name: String,
        creation_date: NaiveDateTime,
        unlocked_letters: BTreeSet<char>,
        mastery: MasteryTracker<char>,
        total_tests: u32,
        total_correct: u32,
    ) -> Result<Self, ProgressError> {
        let mut player = Player::new(name, creation_date)?;
        if !unlocked_letters.is_empty() {
            check_tier_prefix(&unlocked_letters)?;
            player.unlocked_letters = unlocked_letters;
        }
        for (letter, _) in mastery.records() {
            check_letter(*letter)?;
        }
        player.mastery = mastery;
        player.total_tests = total_tests;
        player.total_correct = total_correct;
        Ok(player)
    }
}

fn check_tier_prefix(letters: &BTreeSet<char>) -> Result<(), ProgressError> {
    let count = letters.len();
    let whole_tiers = count % LETTERS_PER_TIER == 0 || count == LETTERS.len();
    let is_prefix = LETTERS
        .get(..count)
        .is_some_and(|prefix| letters.iter().eq(prefix.iter()));
    if whole_tiers && is_prefix {
        Ok(())
    } else {
        Err(ProgressError::BrokenTiers(letters.iter().collect()))
    }
}

fn check_letter(letter: char) -> Result<(), ProgressError> {
    letter_index(letter)
        .map(|_| ())
        .ok_or(ProgressError::InvalidLetter(letter))
}

#[derive(Clone, Debug, Getters)]
pub struct Ranking<'a> {
    #[getset(get = "pub")]
    players: Vec<&'a Player>,
}

impl<'a> Ranking<'a> {
    pub fn new<I: IntoIterator<Item = &'a Player>>(players: I) -> Self {
        let mut players: Vec<&Player> = players.into_iter().collect();
        players.sort_by(|a, b| a.rank_cmp(b));
        Ranking { players }
    }
}

use std::fmt;
use std::time::Duration;

use getset::CopyGetters;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::mastery::MasteryTracker;

pub const DRILL_QUESTIONS: usize = 20;
pub const TIME_LIMIT: Duration = Duration::from_secs(5);
/// A drill scoring at least this percentage is a pass.
pub const PASSING_PERCENT: f64 = 80.0;

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum DrillError {
    #[error("a drill needs at least one letter")]
    NoLetters,
}

/// A timed flashcard drill. Letters are shuffled once and then repeated in
/// that order until [DRILL_QUESTIONS] questions have been asked.
#[derive(Clone, Debug)]
pub struct DrillSession {
    questions: Vec<char>,
    current: usize,
    correct: usize,
}

#[derive(Clone, Copy, CopyGetters, Debug, PartialEq)]
#[getset(get_copy = "pub")]
pub struct DrillResult {
    total_questions: usize,
    correct_answers: usize,
    percentage_score: f64,
    passed: bool,
}

impl fmt::Display for DrillResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Test Result: {}/{} correct ({:.1}%) - {}",
            self.correct_answers,
            self.total_questions,
            self.percentage_score,
            if self.passed { "PASSED" } else { "FAILED" }
        )
    }
}

impl DrillSession {
    pub fn new<R: Rng + ?Sized>(letters: &[char], rng: &mut R) -> Result<Self, DrillError> {
        if letters.is_empty() {
            return Err(DrillError::NoLetters);
        }
        let mut shuffled = letters.to_vec();
        shuffled.shuffle(rng);
        let questions = shuffled.iter().copied().cycle().take(DRILL_QUESTIONS).collect();
        log::debug!("Starting drill over {} letters", letters.len());
        Ok(DrillSession {
            questions,
            current: 0,
            correct: 0,
        })
    }

    pub fn has_more_questions(&self) -> bool {
        self.current < self.questions.len()
    }

    /// The letter being asked about, `None` once the drill is over.
    pub fn current_letter(&self) -> Option<char> {
        self.questions.get(self.current).copied()
    }

    /// 1-based number of the current question.
    pub fn question_number(&self) -> usize {
        self.current + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Records the answer to the current question and moves on. `None` is a
    /// question that timed out. Returns whether the answer was right, or
    /// `None` if the drill was already over.
    pub fn answer(
        &mut self,
        answer: Option<char>,
        tracker: &mut MasteryTracker<char>,
    ) -> Option<bool> {
        let letter = self.current_letter()?;
        let correct = answer.is_some_and(|answer| answer.eq_ignore_ascii_case(&letter));
        if correct {
            self.correct += 1;
        }
        tracker.record_attempt(letter, correct);
        self.current += 1;
        Some(correct)
    }

    /// Results over the questions answered so far.
    pub fn result(&self) -> DrillResult {
        let percentage_score = if self.current == 0 {
            0.0
        } else {
            self.correct as f64 / self.current as f64 * 100.0
        };
        DrillResult {
            total_questions: self.current,
            correct_answers: self.correct,
            percentage_score,
            passed: percentage_score >= PASSING_PERCENT,
        }
    }
}

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use getset::CopyGetters;

use crate::common::DATE_TIME_FORMAT;

const POINTS_FOR_FIRST_ATTEMPT: u32 = 2;
const POINTS_FOR_SECOND_ATTEMPT: u32 = 1;

const DATE_LABEL: &str = "Date and Time: ";
const GAMES_LABEL: &str = "Games Played: ";
const FIRST_LABEL: &str = "Correct First Attempts: ";
const SECOND_LABEL: &str = "Correct Second Attempts: ";
const INCORRECT_LABEL: &str = "Incorrect Attempts: ";
const SCORE_LABELS: [&str; 2] = ["Score: ", "Total Score: "];

/// One session of a two-attempt quiz, as appended to the score file.
#[derive(Clone, Copy, CopyGetters, Debug, Eq, PartialEq)]
#[getset(get_copy = "pub")]
pub struct ScoreRecord {
    played_at: NaiveDateTime,
    games_played: u32,
    correct_first_attempts: u32,
    correct_second_attempts: u32,
    incorrect_attempts: u32,
}

impl ScoreRecord {
    pub fn new(played_at: NaiveDateTime) -> Self {
        ScoreRecord {
            played_at,
            games_played: 0,
            correct_first_attempts: 0,
            correct_second_attempts: 0,
            incorrect_attempts: 0,
        }
    }

    pub fn with_counts(
        played_at: NaiveDateTime,
        games_played: u32,
        correct_first_attempts: u32,
        correct_second_attempts: u32,
        incorrect_attempts: u32,
    ) -> Self {
        ScoreRecord {
            played_at,
            games_played,
            correct_first_attempts,
            correct_second_attempts,
            incorrect_attempts,
        }
    }

    pub fn increment_games_played(&mut self) {
        self.games_played += 1;
    }

    pub fn increment_correct_first_attempts(&mut self) {
        self.correct_first_attempts += 1;
    }

    pub fn increment_correct_second_attempts(&mut self) {
        self.correct_second_attempts += 1;
    }

    pub fn increment_incorrect_attempts(&mut self) {
        self.incorrect_attempts += 1;
    }

    /// Two points per first attempt success, one per second attempt success.
    pub fn score(&self) -> u32 {
        self.correct_first_attempts * POINTS_FOR_FIRST_ATTEMPT
            + self.correct_second_attempts * POINTS_FOR_SECOND_ATTEMPT
    }

    pub fn append_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        write!(file, "{self}")?;
        file.flush()?;
        log::debug!("Appended score to {path:?}");
        Ok(())
    }

    /// Reads every well formed score block in the file. A missing file is an
    /// empty list, and malformed blocks are skipped. Lines are decoded one at
    /// a time, so bytes that are not UTF-8 only spoil the block holding them.
    pub fn read_scores<P: AsRef<Path>>(path: P) -> io::Result<Vec<ScoreRecord>> {
        let path = path.as_ref();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let lines: Vec<String> = bytes
            .split(|byte| *byte == b'\n')
            .map(|line| {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                String::from_utf8_lossy(line).into_owned()
            })
            .collect();
        Ok(parse_scores(&lines))
    }
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{DATE_LABEL}{}", self.played_at.format(DATE_TIME_FORMAT))?;
        writeln!(f, "{GAMES_LABEL}{}", self.games_played)?;
        writeln!(f, "{FIRST_LABEL}{}", self.correct_first_attempts)?;
        writeln!(f, "{SECOND_LABEL}{}", self.correct_second_attempts)?;
        writeln!(f, "{INCORRECT_LABEL}{}", self.incorrect_attempts)?;
        writeln!(f, "{}{} points", SCORE_LABELS[0], self.score())
    }
}

fn parse_scores(lines: &[String]) -> Vec<ScoreRecord> {
    let mut scores = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        if !lines[index].starts_with(DATE_LABEL) {
            index += 1;
            continue;
        }
        match parse_block(&lines[index..]) {
            Some(score) => {
                scores.push(score);
                index += 6;
            },
            None => {
                log::warn!("Skipping malformed score block at line {}", index + 1);
                index += 1;
            },
        }
    }
    scores
}

fn parse_block(lines: &[String]) -> Option<ScoreRecord> {
    let field = |i: usize, label: &str| -> Option<u32> {
        lines.get(i)?.strip_prefix(label)?.trim().parse().ok()
    };
    let played_at = NaiveDateTime::parse_from_str(
        lines.first()?.strip_prefix(DATE_LABEL)?.trim(),
        DATE_TIME_FORMAT,
    )
    .ok()?;
    let score_line = lines.get(5)?;
    if !SCORE_LABELS.iter().any(|label| score_line.starts_with(label)) {
        return None;
    }
    Some(ScoreRecord {
        played_at,
        games_played: field(1, GAMES_LABEL)?,
        correct_first_attempts: field(2, FIRST_LABEL)?,
        correct_second_attempts: field(3, SECOND_LABEL)?,
        incorrect_attempts: field(4, INCORRECT_LABEL)?,
    })
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use test_log::test;

    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 12, 1)
            .and_then(|date| date.and_hms_opt(hour, 15, 42))
            .unwrap()
    }

    #[test]
    fn score_weights_attempts() {
        let mut score = ScoreRecord::new(at(10));
        score.increment_games_played();
        for _ in 0..3 {
            score.increment_correct_first_attempts();
        }
        score.increment_correct_second_attempts();
        score.increment_incorrect_attempts();
        assert_eq!(7, score.score());
        assert_eq!(1, score.games_played());
    }

    #[test]
    fn block_format() {
        let score = ScoreRecord::with_counts(at(9), 1, 6, 2, 2);
        assert_eq!(
            "Date and Time: 2024-12-01 09:15:42\n\
             Games Played: 1\n\
             Correct First Attempts: 6\n\
             Correct Second Attempts: 2\n\
             Incorrect Attempts: 2\n\
             Score: 14 points\n",
            score.to_string()
        );
    }

    #[test]
    fn missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let scores = ScoreRecord::read_scores(dir.path().join("nope.txt")).unwrap();
        assert!(scores.is_empty());
    }

    #[test]
    fn append_then_read_skips_malformed_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores").join("score.txt");
        let first = ScoreRecord::with_counts(at(8), 1, 5, 3, 2);
        let last = ScoreRecord::with_counts(at(11), 2, 10, 4, 6);
        first.append_to_file(&path).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            write!(
                file,
                "Date and Time: not a date\nGames Played: 1\n\n\
                 Date and Time: 2024-12-01 10:00:00\nGames Played: one\n\
                 Correct First Attempts: 1\nCorrect Second Attempts: 1\n\
                 Incorrect Attempts: 1\nScore: 3 points\n"
            )
            .unwrap();
        }
        last.append_to_file(&path).unwrap();

        let scores = ScoreRecord::read_scores(&path).unwrap();
        assert_eq!(vec![first, last], scores);
    }

    #[test]
    fn invalid_utf8_only_spoils_its_own_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let first = ScoreRecord::with_counts(at(8), 1, 5, 3, 2);
        let last = ScoreRecord::with_counts(at(11), 2, 10, 4, 6);
        first.append_to_file(&path).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(b"Date and Time: \xff\xfe garbage\r\nGames Played: \xc3\n")
                .unwrap();
        }
        last.append_to_file(&path).unwrap();

        let scores = ScoreRecord::read_scores(&path).unwrap();
        assert_eq!(vec![first, last], scores);
    }

    #[test]
    fn total_score_label_accepted() {
        let lines: Vec<String> = "Date and Time: 2024-12-01 10:00:00\nGames Played: 3\n\
             Correct First Attempts: 4\nCorrect Second Attempts: 5\n\
             Incorrect Attempts: 6\nTotal Score: 13 points"
            .lines()
            .map(str::to_string)
            .collect();
        let scores = parse_scores(&lines);
        assert_eq!(1, scores.len());
        assert_eq!(3, scores[0].games_played());
        assert_eq!(13, scores[0].score());
    }

    #[test]
    fn truncated_block_is_skipped() {
        let lines: Vec<String> = ["Date and Time: 2024-12-01 10:00:00", "Games Played: 3"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(parse_scores(&lines).is_empty());
    }
}

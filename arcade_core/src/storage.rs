//! Flat file persistence for player records.
//!
//! Each player is one file of `Key: value` lines:
//!
//! ```text
//! PlayerName: Ada
//! CreationDate: 2024-11-20 09:30:00
//! UnlockedLetters: A,B,C,D,E
//! LetterMastery: A:80.0,B:100.0
//! TotalTests: 3
//! TotalCorrect: 51
//! LetterAttempts: A:4/5,B:2/2
//! ```
//!
//! `LetterAttempts` holds the exact counts. Records written before it existed
//! only have the percentages, which are replayed as a history of
//! [REPLAYED_ATTEMPTS] attempts. That replay is lossy: 83.3% comes back as 80%.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use itertools::Itertools;
use thiserror::Error;

use crate::common::{is_letter, DATE_TIME_FORMAT};
use crate::mastery::{MasteryError, MasteryTracker};
use crate::player::{Player, ProgressError};

const FILE_EXTENSION: &str = "txt";
/// Length of the synthetic history used for records without exact counts.
pub const REPLAYED_ATTEMPTS: u32 = 10;

mod key {
    pub const NAME: &str = "PlayerName";
    pub const CREATION_DATE: &str = "CreationDate";
    pub const UNLOCKED: &str = "UnlockedLetters";
    pub const MASTERY: &str = "LetterMastery";
    pub const TOTAL_TESTS: &str = "TotalTests";
    pub const TOTAL_CORRECT: &str = "TotalCorrect";
    pub const ATTEMPTS: &str = "LetterAttempts";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no saved player named [{0}]")]
    NotFound(String),
    #[error("malformed player record, field [{field}]: {reason}")]
    Malformed { field: &'static str, reason: String },
    #[error("invalid player name for a record file [{0}]")]
    InvalidName(String),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Mastery(#[from] MasteryError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

type Result<T> = std::result::Result<T, StorageError>;

/// Saves and loads players, one file per player in `directory`.
#[derive(Clone, Debug)]
pub struct PlayerStore {
    directory: PathBuf,
}

impl PlayerStore {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        PlayerStore {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|path| path.is_file()).unwrap_or(false)
    }

    pub fn save(&self, player: &Player) -> Result<()> {
        let path = self.path_for(player.name())?;
        if !self.directory.exists() {
            log::info!("Creating players directory {:?}", self.directory);
            fs::create_dir_all(&self.directory)?;
        }
        fs::write(&path, format_record(player))?;
        log::info!("Saved player {} to {path:?}", player.name());
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Player> {
        let path = self.path_for(name)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(name.to_string()))
            },
            Err(err) => return Err(err.into()),
        };
        log::debug!("Loading player {name} from {path:?}");
        parse_record(&contents)
    }

    /// Names of every saved player, sorted. A missing directory has none.
    pub fn player_names(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Loads every saved player, skipping records that cannot be read.
    pub fn load_all(&self) -> Result<Vec<Player>> {
        Ok(self
            .player_names()?
            .iter()
            .filter_map(|name| match self.load(name) {
                Ok(player) => Some(player),
                Err(err) => {
                    log::warn!("Skipping unreadable player record [{name}]: {err}");
                    None
                },
            })
            .collect())
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let invalid = name.trim().is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\', '\n', '\r']);
        if invalid {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.directory.join(format!("{name}.{FILE_EXTENSION}")))
    }
}

fn format_record(player: &Player) -> String {
    let unlocked = player.unlocked_letters().iter().join(",");
    let mastery = player
        .mastery()
        .snapshot()
        .iter()
        .map(|(letter, percent)| format!("{letter}:{percent:?}"))
        .join(",");
    let attempts = player
        .mastery()
        .records()
        .map(|(letter, record)| {
            format!(
                "{letter}:{}/{}",
                record.successful_attempts(),
                record.total_attempts()
            )
        })
        .join(",");
    [
        (key::NAME, player.name().to_string()),
        (
            key::CREATION_DATE,
            player.creation_date().format(DATE_TIME_FORMAT).to_string(),
        ),
        (key::UNLOCKED, unlocked),
        (key::MASTERY, mastery),
        (key::TOTAL_TESTS, player.total_tests().to_string()),
        (key::TOTAL_CORRECT, player.total_correct().to_string()),
        (key::ATTEMPTS, attempts),
    ]
    .iter()
    .map(|(key, value)| format!("{key}: {value}\n"))
    .collect()
}

fn parse_record(contents: &str) -> Result<Player> {
    let fields: BTreeMap<&str, &str> = contents
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect();

    let name = required(&fields, key::NAME)?.to_string();
    let creation_date =
        NaiveDateTime::parse_from_str(required(&fields, key::CREATION_DATE)?, DATE_TIME_FORMAT)
            .map_err(|err| malformed(key::CREATION_DATE, err))?;
    let unlocked = parse_unlocked(required(&fields, key::UNLOCKED)?)?;
    let total_tests = required(&fields, key::TOTAL_TESTS)?
        .parse::<u32>()
        .map_err(|err| malformed(key::TOTAL_TESTS, err))?;
    let total_correct = required(&fields, key::TOTAL_CORRECT)?
        .parse::<u32>()
        .map_err(|err| malformed(key::TOTAL_CORRECT, err))?;
    let mastery = match fields.get(key::ATTEMPTS) {
        Some(attempts) => parse_attempts(attempts)?,
        None => replay_percentages(required(&fields, key::MASTERY)?)?,
    };

    Ok(Player::restore(
        name,
        creation_date,
        unlocked,
        mastery,
        total_tests,
        total_correct,
    )?)
}

fn required<'a>(fields: &BTreeMap<&str, &'a str>, field: &'static str) -> Result<&'a str> {
    fields
        .get(field)
        .copied()
        .ok_or_else(|| malformed(field, "missing"))
}

fn malformed<E: ToString>(field: &'static str, err: E) -> StorageError {
    StorageError::Malformed {
        field,
        reason: err.to_string(),
    }
}

fn entries(data: &str) -> impl Iterator<Item = &str> {
    data.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

fn parse_letter(field: &'static str, letter: &str) -> Result<char> {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if is_letter(letter) => Ok(letter),
        _ => Err(malformed(field, format!("not a letter from A to Z [{letter}]"))),
    }
}

fn parse_unlocked(data: &str) -> Result<BTreeSet<char>> {
    entries(data)
        .map(|letter| parse_letter(key::UNLOCKED, letter))
        .collect()
}

fn parse_attempts(data: &str) -> Result<MasteryTracker<char>> {
    let mut tracker = MasteryTracker::new();
    for entry in entries(data) {
        let (letter, counts) = entry
            .split_once(':')
            .ok_or_else(|| malformed(key::ATTEMPTS, format!("no counts in [{entry}]")))?;
        let (successful, total) = counts
            .split_once('/')
            .ok_or_else(|| malformed(key::ATTEMPTS, format!("no total in [{entry}]")))?;
        tracker.restore(
            parse_letter(key::ATTEMPTS, letter)?,
            successful.parse::<u32>().map_err(|err| malformed(key::ATTEMPTS, err))?,
            total.parse::<u32>().map_err(|err| malformed(key::ATTEMPTS, err))?,
        )?;
    }
    Ok(tracker)
}

fn replay_percentages(data: &str) -> Result<MasteryTracker<char>> {
    let mut tracker = MasteryTracker::new();
    for entry in entries(data) {
        let (letter, percent) = entry
            .split_once(':')
            .ok_or_else(|| malformed(key::MASTERY, format!("no percentage in [{entry}]")))?;
        let percent: f64 = percent.parse().map_err(|err| malformed(key::MASTERY, err))?;
        if !(0.0..=100.0).contains(&percent) {
            return Err(malformed(key::MASTERY, format!("out of range [{percent}]")));
        }
        let successful = (percent / 100.0 * REPLAYED_ATTEMPTS as f64).round() as u32;
        tracker.restore(
            parse_letter(key::MASTERY, letter)?,
            successful,
            REPLAYED_ATTEMPTS,
        )?;
    }
    Ok(tracker)
}

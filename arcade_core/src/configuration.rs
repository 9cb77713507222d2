use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIRECTORY: &str = "term_arcade";
pub const DEFAULT_CONFIG_FILE: &str = "arcade.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("no data directory could be determined, no home directory")]
    NoHomeDirectory,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ArcadeConfiguration {
    /// Where players and scores are kept. Defaults to the OS data directory.
    pub data_dir: Option<PathBuf>,
    pub number_game: NumberGameConfiguration,
    pub ladder: LadderConfiguration,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NumberGameConfiguration {
    #[serde(default = "bool_true")]
    pub show_valid_positions: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LadderConfiguration {
    #[serde(default = "bool_true")]
    pub enforce_time_limit: bool,
    #[serde(default = "bool_true")]
    pub autosave: bool,
}

impl Default for NumberGameConfiguration {
    fn default() -> Self {
        NumberGameConfiguration {
            show_valid_positions: true,
        }
    }
}

impl Default for LadderConfiguration {
    fn default() -> Self {
        LadderConfiguration {
            enforce_time_limit: true,
            autosave: true,
        }
    }
}

fn bool_true() -> bool {
    true
}

impl ArcadeConfiguration {
    pub fn from_toml(toml_def: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_def)?)
    }

    /// Reads the configuration at `path`. A missing file is the default
    /// configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(toml_def) => {
                log::info!("Loading configuration from {path:?}");
                Self::from_toml(&toml_def)
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No configuration at {path:?}, using defaults");
                Ok(Self::default())
            },
            Err(err) => Err(err.into()),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(data_dir) => Ok(data_dir.clone()),
            None => os_data_directory(),
        }
    }

    pub fn players_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join("players"))
    }

    pub fn score_file(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join("scores.txt"))
    }
}

fn os_data_directory() -> Result<PathBuf, ConfigError> {
    let mut path = match std::env::var("XDG_DATA_HOME") {
        Ok(data_home) if !data_home.is_empty() => PathBuf::from(data_home),
        _ => {
            let home = homedir::get_my_home()
                .map_err(|_| ConfigError::NoHomeDirectory)?
                .ok_or(ConfigError::NoHomeDirectory)?;
            home.join(".local").join("share")
        },
    };
    path.push(APP_DIRECTORY);
    Ok(path)
}

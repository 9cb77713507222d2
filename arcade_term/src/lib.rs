pub mod console;
mod handshapes;
pub mod ladder_ui;
pub mod menu;
pub mod number_ui;

pub mod prelude {
    pub use arcade_core::prelude::*;

    pub use super::console::Console;
    pub use super::menu::MenuChoice;
    pub use super::{Arcade, TermError};
}

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use self::menu::QUIT_MESSAGE;
use self::prelude::*;

pub const WORD_GAME_UNAVAILABLE: &str = "The Word game is not available in this build.";

#[derive(Debug, Error)]
pub enum TermError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("game ended without handing back the console: {0}")]
    GameAbandoned(#[from] Abandoned),
}

/// The menu shell and everything the games share between plays.
#[derive(Debug)]
pub struct Arcade<R, W> {
    pub(crate) console: Console<R, W>,
    pub(crate) config: ArcadeConfiguration,
    pub(crate) store: PlayerStore,
    pub(crate) score_file: PathBuf,
    pub(crate) statistics: SessionStatistics,
    pub(crate) rng: StdRng,
}

impl<R, W> Arcade<R, W>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    pub fn new(console: Console<R, W>, config: ArcadeConfiguration) -> Result<Self, TermError> {
        Ok(Arcade {
            store: PlayerStore::new(config.players_dir()?),
            score_file: config.score_file()?,
            console,
            config,
            statistics: SessionStatistics::default(),
            rng: StdRng::from_entropy(),
        })
    }

    /// Replaces the random source, for reproducible games.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn statistics(&self) -> &SessionStatistics {
        &self.statistics
    }

    /// Runs the menu until the player quits or input ends, then hands the
    /// console back.
    pub fn run(mut self) -> Result<Console<R, W>, TermError> {
        loop {
            let choice = menu::prompt_choice(&mut self.console)?;
            log::info!("Menu choice {choice:?}");
            self = match choice {
                MenuChoice::Quit => {
                    self.console.say(QUIT_MESSAGE)?;
                    return Ok(self.console);
                },
                MenuChoice::Word => {
                    self.console.say(WORD_GAME_UNAVAILABLE)?;
                    self
                },
                MenuChoice::Number => self.on_game_thread(number_ui::play)?,
                MenuChoice::Ladder => self.on_game_thread(ladder_ui::play)?,
            };
        }
    }

    /// Moves the arcade onto a game thread and blocks until the game hands
    /// it back.
    fn on_game_thread<F>(self, game: F) -> Result<Self, TermError>
    where
        F: FnOnce(&mut Self) -> Result<(), TermError> + Send + 'static,
    {
        let (completer, waiter) = completion_channel();
        let handle = thread::Builder::new()
            .name("game".to_string())
            .spawn(move || {
                let mut arcade = self;
                let result = game(&mut arcade);
                completer.complete((arcade, result));
            })?;
        let completion = waiter.wait();
        if handle.join().is_err() {
            log::error!("Game thread panicked");
        }
        let (arcade, result) = completion?;
        result?;
        Ok(arcade)
    }
}

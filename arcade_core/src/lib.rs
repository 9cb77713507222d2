pub mod board;
pub mod common;
pub mod configuration;
pub mod drill;
pub mod mastery;
pub mod number_game;
pub mod player;
pub mod prelude;
pub mod score;
pub mod session;
pub mod signal;
pub mod storage;

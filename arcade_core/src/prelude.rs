pub use crate::board::{BoardError, PlacementBoard, BOARD_SIZE};
pub use crate::common::{is_letter, DATE_TIME_FORMAT, LETTERS};
pub use crate::configuration::{ArcadeConfiguration, ConfigError};
pub use crate::drill::{DrillError, DrillResult, DrillSession};
pub use crate::mastery::{MasteryError, MasteryTracker, SkillRecord};
pub use crate::number_game::{NumberRound, RoundStatus};
pub use crate::player::{Player, ProgressError, Ranking, Statistics};
pub use crate::score::ScoreRecord;
pub use crate::session::SessionStatistics;
pub use crate::signal::{completion_channel, Abandoned, Completer, CompletionWaiter};
pub use crate::storage::{PlayerStore, StorageError};

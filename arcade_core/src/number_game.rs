use std::ops::RangeInclusive;

use rand::Rng;

use crate::board::{BoardError, PlacementBoard, BOARD_SIZE};
use crate::session::SessionStatistics;

/// Range random numbers are drawn from.
pub const NUMBER_RANGE: RangeInclusive<i32> = 1..=1000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoundStatus {
    InProgress,
    Won,
    /// The current value has nowhere to go.
    Lost,
}

impl RoundStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, RoundStatus::InProgress)
    }
}

/// One attempt at the number game: values arrive one at a time and each must
/// be placed on the board before the next is revealed.
#[derive(Debug)]
pub struct NumberRound {
    board: PlacementBoard,
    values: Vec<i32>,
    next_index: usize,
    status: RoundStatus,
    recorded: bool,
}

impl NumberRound {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let values = (0..BOARD_SIZE)
            .map(|_| rng.gen_range(NUMBER_RANGE))
            .collect();
        Self::with_values(values)
    }

    /// Builds a round that will deal exactly `values`, in order, onto a board
    /// with one slot per value.
    pub fn with_values(values: Vec<i32>) -> Self {
        let board = PlacementBoard::new(values.len().max(1)).unwrap_or_default();
        let mut round = NumberRound {
            board,
            values,
            next_index: 0,
            status: RoundStatus::InProgress,
            recorded: false,
        };
        round.update_status();
        round
    }

    pub fn board(&self) -> &PlacementBoard {
        &self.board
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    /// The value waiting to be placed. `None` once the round has been won.
    ///
    /// After a loss this is still the value that could not be placed.
    pub fn current_value(&self) -> Option<i32> {
        if self.status == RoundStatus::Won {
            None
        } else {
            self.values.get(self.next_index).copied()
        }
    }

    /// Count of successful placements so far.
    pub fn placements(&self) -> usize {
        self.board.filled_count()
    }

    /// Places the current value at `position` and reveals the next one.
    pub fn place(&mut self, position: usize) -> Result<RoundStatus, BoardError> {
        if self.status.is_finished() {
            log::warn!("Placement attempted on a finished round");
            return Ok(self.status);
        }
        let value = self.values[self.next_index];
        self.board.place(value, position)?;
        self.next_index += 1;
        self.update_status();
        Ok(self.status)
    }

    /// Adds the outcome of a finished round to `statistics`. Returns whether
    /// anything was recorded: unfinished rounds and rounds already recorded
    /// are skipped.
    pub fn record_into(&mut self, statistics: &mut SessionStatistics) -> bool {
        if self.recorded {
            return false;
        }
        let placements = self.placements() as u32;
        match self.status {
            RoundStatus::InProgress => return false,
            RoundStatus::Won => statistics.record_win(placements),
            RoundStatus::Lost => statistics.record_loss(placements),
        }
        self.recorded = true;
        true
    }

    fn update_status(&mut self) {
        self.status = match self.values.get(self.next_index) {
            _ if self.board.is_full() => RoundStatus::Won,
            None => RoundStatus::Won,
            Some(&value) if !self.board.has_any_valid_placement(value) => RoundStatus::Lost,
            Some(_) => RoundStatus::InProgress,
        };
        if self.status.is_finished() {
            log::debug!(
                "Number round finished {:?} after {} placements",
                self.status,
                self.placements()
            );
        }
    }
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_log::test;

    use super::*;

    #[test]
    fn random_round_draws_in_range() {
        let mut rng = StdRng::seed_from_u64(2522);
        let round = NumberRound::new(&mut rng);
        assert_eq!(BOARD_SIZE, round.values.len());
        assert!(round.values.iter().all(|v| NUMBER_RANGE.contains(v)));
        assert_eq!(RoundStatus::InProgress, round.status());
        assert_eq!(Some(round.values[0]), round.current_value());
    }

    #[test]
    fn ascending_values_win() {
        let values: Vec<i32> = (1..=BOARD_SIZE as i32).collect();
        let mut round = NumberRound::with_values(values);
        for position in 0..BOARD_SIZE - 1 {
            assert_eq!(Ok(RoundStatus::InProgress), round.place(position));
        }
        assert_eq!(Ok(RoundStatus::Won), round.place(BOARD_SIZE - 1));
        assert_eq!(None, round.current_value());
        assert_eq!(BOARD_SIZE, round.placements());

        let mut statistics = SessionStatistics::default();
        assert!(round.record_into(&mut statistics));
        assert!(!round.record_into(&mut statistics));
        assert_eq!(1, statistics.wins());
        assert_eq!(1, statistics.games_played());
        assert_eq!(20.0, statistics.average_placements());
    }

    #[test]
    fn boxed_in_value_loses() {
        let mut round = NumberRound::with_values(vec![10, 20, 15, 1]);
        round.place(0).unwrap();
        assert_eq!(Ok(RoundStatus::Lost), round.place(1));
        assert_eq!(Some(15), round.current_value());
        assert_eq!(2, round.placements());
        // Finished rounds ignore further moves
        assert_eq!(Ok(RoundStatus::Lost), round.place(2));
        assert_eq!(2, round.placements());

        let mut statistics = SessionStatistics::default();
        assert!(round.record_into(&mut statistics));
        assert_eq!(1, statistics.losses());
        assert_eq!(2.0, statistics.average_placements());
    }

    #[test]
    fn invalid_move_leaves_round_unchanged() {
        let mut round = NumberRound::with_values(vec![50, 40, 60]);
        round.place(1).unwrap();
        assert_eq!(
            Err(BoardError::OrderViolation {
                value: 40,
                position: 2
            }),
            round.place(2)
        );
        assert_eq!(Some(40), round.current_value());
        assert_eq!(RoundStatus::InProgress, round.status());

        let mut statistics = SessionStatistics::default();
        assert!(!round.record_into(&mut statistics));
        assert_eq!(0, statistics.games_played());
    }
}

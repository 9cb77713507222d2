use thiserror::Error;

/// Number of slots on a standard number game board.
pub const BOARD_SIZE: usize = 20;

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum BoardError {
    #[error("board size must be positive")]
    InvalidSize,
    #[error("position out of bounds [{0}]")]
    OutOfBounds(usize),
    #[error("slot at position [{0}] is already occupied")]
    Occupied(usize),
    #[error("placing [{value}] at position [{position}] violates ascending order")]
    OrderViolation { value: i32, position: usize },
}

/// A fixed row of slots that only ever reads in strictly ascending order
/// left to right, no matter what order values were placed in.
///
/// Slots are filled one at a time and never cleared except by [reset](Self::reset).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlacementBoard {
    slots: Vec<Option<i32>>,
    filled_count: usize,
}

impl Default for PlacementBoard {
    fn default() -> Self {
        PlacementBoard {
            slots: vec![None; BOARD_SIZE],
            filled_count: 0,
        }
    }
}

impl PlacementBoard {
    pub fn new(size: usize) -> Result<Self, BoardError> {
        if size == 0 {
            return Err(BoardError::InvalidSize);
        }
        Ok(PlacementBoard {
            slots: vec![None; size],
            filled_count: 0,
        })
    }

    /// Empties every slot.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.filled_count = 0;
    }

    /// Whether `value` may go into the slot at `position`.
    ///
    /// Never fails: out of range positions and occupied slots are simply `false`.
    pub fn can_place(&self, value: i32, position: usize) -> bool {
        match self.slots.get(position) {
            Some(None) => self.is_valid_placement(value, position),
            _ => false,
        }
    }

    /// Places `value` at `position`.
    ///
    /// Callers are expected to check [can_place](Self::can_place) first, an
    /// error here means the caller skipped that check.
    pub fn place(&mut self, value: i32, position: usize) -> Result<(), BoardError> {
        match self.slots.get(position) {
            None => return Err(BoardError::OutOfBounds(position)),
            Some(Some(_)) => return Err(BoardError::Occupied(position)),
            Some(None) => {},
        }
        if !self.is_valid_placement(value, position) {
            return Err(BoardError::OrderViolation { value, position });
        }
        self.slots[position] = Some(value);
        self.filled_count += 1;
        log::trace!("Placed {value} at {position}, {} filled", self.filled_count);
        Ok(())
    }

    /// True if at least one slot accepts `value`. When this is false for the
    /// next value to place, the game is lost.
    pub fn has_any_valid_placement(&self, value: i32) -> bool {
        (0..self.slots.len()).any(|position| self.can_place(value, position))
    }

    /// Every position that currently accepts `value`, in order.
    pub fn valid_positions(&self, value: i32) -> Vec<usize> {
        (0..self.slots.len())
            .filter(|position| self.can_place(value, *position))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.filled_count == self.slots.len()
    }

    pub fn filled_count(&self) -> usize {
        self.filled_count
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Returns the value at `position`, `None` if it is empty or out of bounds.
    pub fn value_at(&self, position: usize) -> Option<i32> {
        self.slots.get(position).copied().flatten()
    }

    /// A copy of the slots.
    pub fn slots(&self) -> Vec<Option<i32>> {
        self.slots.clone()
    }

    // Strict on both sides, so duplicates can never be placed.
    fn is_valid_placement(&self, value: i32, position: usize) -> bool {
        let (before, after) = self.slots.split_at(position);
        before.iter().flatten().all(|&filled| filled < value)
            && after.iter().skip(1).flatten().all(|&filled| filled > value)
    }
}

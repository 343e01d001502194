use bevy::prelude::*;
use pairs_helpers::restart::Restartable;
use thiserror::Error;

pub const SLOT_COUNT: usize = 16;
pub const PAIR_COUNT: usize = SLOT_COUNT / 2;

/// Identifies which two slots belong together, always in `0..PAIR_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairId(u8);

impl PairId {
    pub fn new(id: u8) -> Option<Self> {
        (usize::from(id) < PAIR_COUNT).then_some(Self(id))
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Unmatched(PairId),
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    AwaitingFirst,
    AwaitingSecond {
        first: usize,
    },
}

/// What a key press did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Matched slot, repeated first pick, or out of range.
    Ignored,
    FirstPick {
        slot: usize,
        pair: PairId,
    },
    /// `pair` is the pair of the second slot, the one whose sample plays.
    Mismatch {
        first: usize,
        second: usize,
        pair: PairId,
    },
    Match {
        first: usize,
        second: usize,
        pair: PairId,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("pair id {0} is out of range, expected 0..{max}", max = PAIR_COUNT)]
    PairOutOfRange(u8),
    #[error("pair id {id} is assigned to {count} slots, expected 2")]
    UnbalancedPair { id: u8, count: usize },
}

/// The 16 slot board: pairing assignment, selection, match history and score.
#[derive(Resource, Debug, Clone)]
pub struct Board {
    slots: [SlotState; SLOT_COUNT],
    selection: Selection,
    second_block: Option<usize>,
    /// Slots picked and awaiting evaluation
    selected: Vec<usize>,
    /// Matched slots in the order they were found, never shrinks
    matches: Vec<usize>,
    score: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::shuffled(&mut fastrand::Rng::new())
    }
}

impl Restartable for Board {
    fn reset(&mut self) {
        *self = Self::default();
        debug!("New pairing: {:?}", self.slots);
    }
}

impl Board {
    /// Shuffles the slot indices and gives the slot at shuffled position `p` the pair `p % 8`.
    pub fn shuffled(rng: &mut fastrand::Rng) -> Self {
        let mut order: [usize; SLOT_COUNT] = core::array::from_fn(|slot| slot);
        rng.shuffle(&mut order);

        let mut slots = [SlotState::Matched; SLOT_COUNT];
        for (position, &slot) in order.iter().enumerate() {
            if let Some(state) = slots.get_mut(slot) {
                *state = SlotState::Unmatched(PairId((position % PAIR_COUNT) as u8));
            }
        }

        Self::with_slots(slots)
    }

    /// Builds a board from an explicit slot to pair assignment.
    pub fn from_pairs(pairs: [u8; SLOT_COUNT]) -> Result<Self, BoardError> {
        let mut counts = [0usize; PAIR_COUNT];
        let mut slots = [SlotState::Matched; SLOT_COUNT];

        for (state, &id) in slots.iter_mut().zip(&pairs) {
            let pair = PairId::new(id).ok_or(BoardError::PairOutOfRange(id))?;
            if let Some(count) = counts.get_mut(pair.index()) {
                *count += 1;
            }
            *state = SlotState::Unmatched(pair);
        }

        if let Some((id, &count)) = counts.iter().enumerate().find(|&(_, &count)| count != 2) {
            return Err(BoardError::UnbalancedPair {
                id: id as u8,
                count,
            });
        }

        Ok(Self::with_slots(slots))
    }

    const fn with_slots(slots: [SlotState; SLOT_COUNT]) -> Self {
        Self {
            slots,
            selection: Selection::AwaitingFirst,
            second_block: None,
            selected: Vec::new(),
            matches: Vec::new(),
            score: 0,
        }
    }

    /// Runs one pick through the selection state machine.
    pub fn press(&mut self, slot: usize) -> PressOutcome {
        let Some(pair) = self.pair_id(slot) else {
            return PressOutcome::Ignored;
        };

        match self.selection {
            Selection::AwaitingFirst => {
                self.selected.push(slot);
                self.selection = Selection::AwaitingSecond { first: slot };
                PressOutcome::FirstPick { slot, pair }
            }
            Selection::AwaitingSecond { first } if first == slot => PressOutcome::Ignored,
            Selection::AwaitingSecond { first } => {
                self.second_block = Some(slot);
                self.selected.clear();
                self.selection = Selection::AwaitingFirst;

                if self.pair_id(first) == Some(pair) {
                    self.mark_matched(first, slot);
                    PressOutcome::Match {
                        first,
                        second: slot,
                        pair,
                    }
                } else {
                    PressOutcome::Mismatch {
                        first,
                        second: slot,
                        pair,
                    }
                }
            }
        }
    }

    fn mark_matched(&mut self, first: usize, second: usize) {
        for slot in [first, second] {
            if let Some(state) = self.slots.get_mut(slot) {
                *state = SlotState::Matched;
            }
            self.matches.push(slot);
        }
        self.score += 1;
    }

    /// `None` once the slot is matched (or out of range).
    pub fn pair_id(&self, slot: usize) -> Option<PairId> {
        match self.slots.get(slot)? {
            SlotState::Unmatched(pair) => Some(*pair),
            SlotState::Matched => None,
        }
    }

    pub fn is_matched(&self, slot: usize) -> bool {
        matches!(self.slots.get(slot), Some(SlotState::Matched))
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    pub const fn first_block(&self) -> Option<usize> {
        match self.selection {
            Selection::AwaitingFirst => None,
            Selection::AwaitingSecond { first } => Some(first),
        }
    }

    /// The most recent second pick, kept after the pair has been evaluated.
    pub const fn second_block(&self) -> Option<usize> {
        self.second_block
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    pub const fn is_won(&self) -> bool {
        self.score as usize >= PAIR_COUNT
    }
}

use bevy::prelude::*;

use crate::board::{Board, PressOutcome, SLOT_COUNT};

/// One key per slot, laid out like the board: four rows of four.
pub const SLOT_KEYS: [KeyCode; SLOT_COUNT] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::KeyQ,
    KeyCode::KeyW,
    KeyCode::KeyE,
    KeyCode::KeyR,
    KeyCode::KeyA,
    KeyCode::KeyS,
    KeyCode::KeyD,
    KeyCode::KeyF,
    KeyCode::KeyZ,
    KeyCode::KeyX,
    KeyCode::KeyC,
    KeyCode::KeyV,
];

// Node names in the blocks scene, in slot order
pub const BLOCK_NAMES: [&str; SLOT_COUNT] = [
    "block1", "block2", "block3", "block4", "blockQ", "blockW", "blockE", "blockR", "blockA",
    "blockS", "blockD", "blockF", "blockZ", "blockX", "blockC", "blockV",
];

pub const LETTER_NAMES: [&str; SLOT_COUNT] = [
    "letter1", "letter2", "letter3", "letter4", "letterQ", "letterW", "letterE", "letterR",
    "letterA", "letterS", "letterD", "letterF", "letterZ", "letterX", "letterC", "letterV",
];

pub fn slot_for_key(key: KeyCode) -> Option<usize> {
    SLOT_KEYS.iter().position(|&bound| bound == key)
}

/// Feeds a key press to the board. `None` means the key is not a slot key and
/// was not consumed; a consumed press may still be `PressOutcome::Ignored`.
pub fn handle_key(board: &mut Board, key: KeyCode) -> Option<PressOutcome> {
    slot_for_key(key).map(|slot| board.press(slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_slot_has_a_distinct_key() {
        for (slot, &key) in SLOT_KEYS.iter().enumerate() {
            assert_eq!(slot_for_key(key), Some(slot));
        }
        assert_eq!(slot_for_key(KeyCode::Space), None);
        assert_eq!(slot_for_key(KeyCode::Escape), None);
    }

    #[test]
    fn names_follow_key_labels() {
        assert_eq!(BLOCK_NAMES[4], "blockQ");
        assert_eq!(LETTER_NAMES[15], "letterV");
    }

    #[test]
    fn unbound_keys_are_not_consumed() {
        let mut board = Board::default();
        assert_eq!(handle_key(&mut board, KeyCode::KeyP), None);
        assert!(board.selected().is_empty());

        assert!(matches!(
            handle_key(&mut board, KeyCode::KeyW),
            Some(PressOutcome::FirstPick { slot: 5, .. })
        ));
        // Consumed even though the repeated pick changes nothing.
        assert_eq!(
            handle_key(&mut board, KeyCode::KeyW),
            Some(PressOutcome::Ignored)
        );
    }
}

use bevy::prelude::*;

use crate::bindings;
use crate::board::{Board, PairId, PressOutcome};
use crate::game::FrameSet;
use crate::scene::{SlotEntities, SpinVector};

/// A picked slot wants its pair's sample played.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSound {
    pub pair: PairId,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairMatched {
    pub first: usize,
    pub second: usize,
}

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SlotSound>()
            .add_event::<PairMatched>()
            .add_systems(Update, handle_slot_keys.in_set(FrameSet::Input));
    }
}

pub fn handle_slot_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut board: ResMut<Board>,
    slots: Res<SlotEntities>,
    mut spins: Query<(&mut SpinVector, &mut Transform)>,
    mut sounds: EventWriter<SlotSound>,
    mut matched: EventWriter<PairMatched>,
) {
    for &key in keys.get_just_pressed() {
        let Some(outcome) = bindings::handle_key(&mut board, key) else {
            continue;
        };

        match outcome {
            PressOutcome::Ignored => {}
            PressOutcome::FirstPick { pair, .. } => {
                sounds.send(SlotSound { pair });
            }
            PressOutcome::Mismatch {
                first,
                second,
                pair,
            } => {
                sounds.send(SlotSound { pair });
                reset_spin(&slots, &mut spins, [first, second]);
            }
            PressOutcome::Match {
                first,
                second,
                pair,
            } => {
                sounds.send(SlotSound { pair });
                reset_spin(&slots, &mut spins, [first, second]);
                info!("Pair found: {first} and {second}, score {}", board.score());
                matched.send(PairMatched { first, second });
            }
        }
    }
}

/// Stops the spin of both slots of an evaluated pick.
fn reset_spin(
    slots: &SlotEntities,
    spins: &mut Query<(&mut SpinVector, &mut Transform)>,
    picked: [usize; 2],
) {
    let nodes = picked
        .iter()
        .filter_map(|&slot| slots.get(slot))
        .flat_map(|visual| visual.nodes());

    for node in nodes {
        if let Ok((mut spin, mut transform)) = spins.get_mut(node.entity) {
            spin.0 = Vec3::ZERO;
            transform.rotation = Quat::IDENTITY;
        }
    }
}

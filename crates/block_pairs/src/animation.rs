use bevy::prelude::*;

use crate::board::Board;
use crate::game::{FrameSet, RoundTimer, Speed};
use crate::scene::{SlotEntities, SlotVisual, SpinVector};
use crate::settings::PairsSettings;

pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                advance_speed,
                (move_matched_out, spin_selected, tick_round_timer),
            )
                .chain()
                .in_set(FrameSet::Simulate),
        );
    }
}

fn advance_speed(time: Res<Time>, settings: Res<PairsSettings>, mut speed: ResMut<Speed>) {
    speed.0 += time.delta_secs() * settings.speed_gain;
}

/// Every frame, matched blocks and letters slide further along the exit axis.
/// The step is the current speed, so they accelerate out of view.
fn move_matched_out(
    board: Res<Board>,
    slots: Res<SlotEntities>,
    speed: Res<Speed>,
    settings: Res<PairsSettings>,
    mut transforms: Query<&mut Transform>,
) {
    let step = settings.exit_axis * speed.0;
    let nodes = board
        .matches()
        .iter()
        .filter_map(|&slot| slots.get(slot))
        .flat_map(SlotVisual::nodes);

    for node in nodes {
        if let Ok(mut transform) = transforms.get_mut(node.entity) {
            transform.translation += step;
        }
    }
}

// Scales the angle vector by (0, 0, speed) component-wise. x and y collapse to
// zero and z is rescaled each frame, it is not an accumulated spin.
fn spin_selected(
    board: Res<Board>,
    slots: Res<SlotEntities>,
    speed: Res<Speed>,
    mut spins: Query<(&mut SpinVector, &mut Transform)>,
) {
    let factor = Vec3::new(0.0, 0.0, speed.0);
    let nodes = board
        .selected()
        .iter()
        .filter_map(|&slot| slots.get(slot))
        .flat_map(SlotVisual::nodes);

    for node in nodes {
        if let Ok((mut spin, mut transform)) = spins.get_mut(node.entity) {
            spin.0 *= factor;
            transform.rotation = spin.to_rotation();
        }
    }
}

fn tick_round_timer(time: Res<Time>, mut timer: ResMut<RoundTimer>) {
    timer.tick(time.delta_secs());
}

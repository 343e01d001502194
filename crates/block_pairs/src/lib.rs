use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use pairs_helpers::restart::{reset_resource, restart_requested};

mod animation;
mod audio;
mod bindings;
mod board;
mod game;
mod input;
mod overlay;
mod scene;
mod settings;

use animation::AnimationPlugin;
use audio::GameAudioPlugin;
pub use board::{Board, BoardError, PairId, PressOutcome, Selection};
use game::{FrameSet, GamePlugin, GameState, RoundTimer, Speed};
use input::InputPlugin;
use overlay::OverlayPlugin;
pub use scene::ConfigurationError;
use scene::{ScenePlugin, restore_home_transforms};
pub use settings::PairsSettings;

pub fn run() {
    run_with(PairsSettings::default());
}

pub fn run_with(settings: PairsSettings) {
    pairs_helpers::get_default_app(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .insert_resource(settings)
        .init_resource::<Board>()
        .add_plugins(GamePlugin)
        .add_loading_state(
            LoadingState::new(GameState::Loading).continue_to_state(GameState::Resolving),
        )
        .add_plugins(ScenePlugin)
        .add_plugins(InputPlugin)
        .add_plugins(AnimationPlugin)
        .add_plugins(GameAudioPlugin)
        .add_plugins(OverlayPlugin)
        .add_plugins(RestartPlugin)
        .run();
}

/// Space starts the round over: new pairing, zero speed, full clock, every
/// node back home.
struct RestartPlugin;

impl Plugin for RestartPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                log_restart,
                reset_resource::<Board>,
                reset_resource::<Speed>,
                reset_resource::<RoundTimer>,
                restore_home_transforms,
            )
                .run_if(restart_requested)
                .in_set(FrameSet::Input)
                .before(input::handle_slot_keys),
        );
    }
}

fn log_restart() {
    info!("Restarting block pairs");
}

#[cfg(test)]
mod tests {
    use pairs_helpers::restart::RESTART_KEY;

    use super::*;
    use crate::scene::tests::spawn_fake_scene;

    #[test]
    fn space_restarts_a_played_round() {
        let mut board = Board::from_pairs([3, 1, 3, 0, 0, 1, 2, 2, 4, 4, 5, 5, 6, 6, 7, 7])
            .expect("balanced pairing");
        board.press(0);
        board.press(2);
        board.press(5);

        let mut timer = RoundTimer::new(Some(1.0));
        timer.tick(3.0);

        let mut app = App::new();
        let slots = spawn_fake_scene(app.world_mut());
        let matched = *slots.get(0).expect("slot 0");
        app.insert_resource(slots)
            .insert_resource(board)
            .insert_resource(Speed(4.5))
            .insert_resource(timer)
            .init_resource::<ButtonInput<KeyCode>>()
            .add_plugins(RestartPlugin);

        for node in matched.nodes() {
            app.world_mut()
                .entity_mut(node.entity)
                .insert(Transform::from_xyz(0.0, 50.0, 0.0));
        }

        app.update();
        assert_eq!(app.world().resource::<Board>().score(), 1, "no key yet");

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(RESTART_KEY);
        app.update();

        let world = app.world();
        let board = world.resource::<Board>();
        assert_eq!(board.score(), 0);
        assert!(board.matches().is_empty());
        assert!(board.selected().is_empty());
        assert_eq!(board.selection(), Selection::AwaitingFirst);
        assert!(world.resource::<Speed>().0.abs() < f32::EPSILON);
        assert!(!world.resource::<RoundTimer>().is_expired());
        assert!((world.resource::<RoundTimer>().remaining() - 1.0).abs() < 1e-6);

        for node in matched.nodes() {
            assert_eq!(world.entity(node.entity).get::<Transform>(), Some(&node.home));
        }
    }
}

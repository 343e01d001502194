use bevy::prelude::*;

/// Key that restarts a round at any time.
pub const RESTART_KEY: KeyCode = KeyCode::Space;

/// A resource that knows how to put itself back into its start-of-round state.
pub trait Restartable: Resource {
    fn reset(&mut self);
}

/// Run condition: true on the frame the restart key goes down.
pub fn restart_requested(keys: Res<ButtonInput<KeyCode>>) -> bool {
    keys.just_pressed(RESTART_KEY)
}

pub fn reset_resource<T: Restartable>(mut restartable: ResMut<T>) {
    restartable.reset();
}

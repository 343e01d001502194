use bevy::prelude::*;

/// Tunables for one round. Insert a custom value before `run_with` to override.
#[derive(Reflect, Resource, Debug, Clone)]
#[reflect(Resource)]
pub struct PairsSettings {
    /// Seconds on the clock, `None` plays without a time limit
    pub time_limit: Option<f32>,
    /// How fast the animation speed grows per second
    pub speed_gain: f32,
    /// Direction matched blocks leave the board
    pub exit_axis: Vec3,
    pub background_music: bool,
    /// Volume factor applied each time the background track restarts
    pub background_volume_growth: f64,
}

impl Default for PairsSettings {
    fn default() -> Self {
        Self {
            time_limit: Some(60.0),
            speed_gain: 2.0,
            // Blender's +Z, which is +Y once exported to glTF
            exit_axis: Vec3::Y,
            background_music: true,
            background_volume_growth: 2.0,
        }
    }
}

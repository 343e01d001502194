use bevy::prelude::*;
use pairs_helpers::restart::Restartable;

use crate::settings::PairsSettings;

#[derive(Clone, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum GameState {
    #[default]
    Loading,
    /// Assets are in, waiting for the scene to spawn and resolve
    Resolving,
    Playing,
}

/// Per-frame phases, run in order: input, then simulation, then presentation.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Simulate,
    Present,
}

/// Animation speed, grows for the whole round without bound.
#[derive(Resource, Debug, Default)]
pub struct Speed(pub f32);

impl Restartable for Speed {
    fn reset(&mut self) {
        self.0 = 0.0;
    }
}

#[derive(Resource, Debug)]
pub struct RoundTimer {
    limit: Option<f32>,
    remaining: f32,
}

impl RoundTimer {
    pub fn new(limit: Option<f32>) -> Self {
        Self {
            limit,
            remaining: limit.unwrap_or_default(),
        }
    }

    /// Counts down past zero; an untimed round never changes.
    pub fn tick(&mut self, elapsed: f32) {
        if self.limit.is_some() {
            self.remaining -= elapsed;
        }
    }

    pub const fn is_timed(&self) -> bool {
        self.limit.is_some()
    }

    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.is_timed() && self.remaining <= 0.0
    }
}

impl FromWorld for RoundTimer {
    fn from_world(world: &mut World) -> Self {
        let limit = world
            .get_resource::<PairsSettings>()
            .map_or_else(|| PairsSettings::default().time_limit, |s| s.time_limit);
        Self::new(limit)
    }
}

impl Restartable for RoundTimer {
    fn reset(&mut self) {
        self.remaining = self.limit.unwrap_or_default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    Won,
    Lost,
}

/// Winning takes precedence over running out of time.
pub fn round_result(score_won: bool, timer: &RoundTimer) -> Option<RoundResult> {
    if score_won {
        Some(RoundResult::Won)
    } else if timer.is_expired() {
        Some(RoundResult::Lost)
    } else {
        None
    }
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .register_type::<PairsSettings>()
            .init_resource::<PairsSettings>()
            .init_resource::<Speed>()
            .init_resource::<RoundTimer>()
            .configure_sets(
                Update,
                (FrameSet::Input, FrameSet::Simulate, FrameSet::Present)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

use bevy::prelude::*;
use bevy_asset_loader::prelude::*;
use bevy_kira_audio::prelude::*;
use pairs_helpers::restart::restart_requested;

use crate::board::{Board, PairId};
use crate::game::{FrameSet, GameState};
use crate::input::SlotSound;
use crate::settings::PairsSettings;

const DEFAULT_VOLUME: f64 = 1.0;

#[derive(AssetCollection, Resource)]
struct AudioAssets {
    /// One sample per pair id, in pair id order
    #[asset(
        paths(
            "audio/alien.ogg",
            "audio/beach.ogg",
            "audio/beep.ogg",
            "audio/blip.ogg",
            "audio/guns.ogg",
            "audio/phone.ogg",
            "audio/spring.ogg",
            "audio/static.ogg"
        ),
        collection(typed)
    )]
    pair_samples: Vec<Handle<bevy_kira_audio::prelude::AudioSource>>,
    #[asset(path = "audio/background.ogg")]
    background: Handle<bevy_kira_audio::prelude::AudioSource>,
}

impl AudioAssets {
    fn sample_for(&self, pair: PairId) -> Option<&Handle<bevy_kira_audio::prelude::AudioSource>> {
        self.pair_samples.get(pair.index())
    }
}

/// The looping background track and the volume it was last started at.
#[derive(Resource)]
struct BackgroundMusic {
    instance: Handle<AudioInstance>,
    volume: f64,
}

impl BackgroundMusic {
    /// Volume for the next restart of the track, each one louder than the last.
    fn restarted(&mut self, growth: f64) -> f64 {
        self.volume *= growth;
        self.volume
    }

    /// Back to the default volume. False when already there.
    fn calm(&mut self) -> bool {
        if (self.volume - DEFAULT_VOLUME).abs() <= f64::EPSILON {
            return false;
        }
        self.volume = DEFAULT_VOLUME;
        true
    }
}

pub struct GameAudioPlugin;

impl Plugin for GameAudioPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(AudioPlugin)
            .configure_loading_state(
                LoadingStateConfig::new(GameState::Loading).load_collection::<AudioAssets>(),
            )
            .add_systems(OnEnter(GameState::Playing), start_background)
            .add_systems(
                Update,
                (
                    play_slot_sounds,
                    restart_stopped_background,
                    calm_background.run_if(round_won.or(restart_requested)),
                )
                    .chain()
                    .in_set(FrameSet::Present),
            );
    }
}

fn round_won(board: Res<Board>) -> bool {
    board.is_won()
}

fn play_slot_sounds(
    mut sounds: EventReader<SlotSound>,
    assets: Res<AudioAssets>,
    audio: Res<Audio>,
) {
    for sound in sounds.read() {
        if let Some(sample) = assets.sample_for(sound.pair) {
            audio.play(sample.clone_weak());
        }
    }
}

fn start_background(
    mut commands: Commands,
    settings: Res<PairsSettings>,
    assets: Res<AudioAssets>,
    audio: Res<Audio>,
) {
    if !settings.background_music {
        return;
    }

    let instance = audio
        .play(assets.background.clone_weak())
        .with_volume(DEFAULT_VOLUME)
        .handle();
    commands.insert_resource(BackgroundMusic {
        instance,
        volume: DEFAULT_VOLUME,
    });
}

// Each restart plays louder than the last, with no upper bound.
fn restart_stopped_background(
    music: Option<ResMut<BackgroundMusic>>,
    settings: Res<PairsSettings>,
    assets: Res<AudioAssets>,
    audio: Res<Audio>,
) {
    let Some(mut music) = music else {
        return;
    };
    if !matches!(audio.state(&music.instance), PlaybackState::Stopped) {
        return;
    }

    let volume = music.restarted(settings.background_volume_growth);
    debug!("Background track stopped, restarting at volume {volume}");
    music.instance = audio
        .play(assets.background.clone_weak())
        .with_volume(volume)
        .handle();
}

/// Drops the live background track back to its default volume.
fn calm_background(
    music: Option<ResMut<BackgroundMusic>>,
    mut instances: ResMut<Assets<AudioInstance>>,
) {
    let Some(mut music) = music else {
        return;
    };
    if !music.calm() {
        return;
    }

    if let Some(instance) = instances.get_mut(&music.instance) {
        instance.set_volume(DEFAULT_VOLUME, AudioTween::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PAIR_COUNT;

    fn music() -> BackgroundMusic {
        BackgroundMusic {
            instance: Handle::default(),
            volume: DEFAULT_VOLUME,
        }
    }

    #[test]
    fn every_restart_multiplies_volume_without_cap() {
        let mut music = music();
        let growth = PairsSettings::default().background_volume_growth;

        let volumes: Vec<f64> = (0..3).map(|_| music.restarted(growth)).collect();
        assert_eq!(volumes, vec![2.0, 4.0, 8.0]);

        for _ in 0..20 {
            music.restarted(growth);
        }
        assert!((music.volume - 8.0 * 2f64.powi(20)).abs() < 1e-3);
    }

    #[test]
    fn calm_returns_to_default_volume_once() {
        let mut music = music();
        assert!(!music.calm(), "already at default volume");

        music.restarted(2.0);
        music.restarted(2.0);
        assert!(music.calm());
        assert!((music.volume - DEFAULT_VOLUME).abs() <= f64::EPSILON);
        assert!(!music.calm());

        assert!((music.restarted(2.0) - 2.0).abs() <= f64::EPSILON);
    }

    #[test]
    fn each_pair_id_picks_its_own_sample() {
        let pair_samples: Vec<Handle<bevy_kira_audio::prelude::AudioSource>> = (0..PAIR_COUNT)
            .map(|index| Handle::weak_from_u128(index as u128 + 1))
            .collect();
        let assets = AudioAssets {
            pair_samples: pair_samples.clone(),
            background: Handle::default(),
        };

        for (index, expected) in pair_samples.iter().enumerate() {
            let pair = PairId::new(index as u8).expect("index is a pair id");
            assert_eq!(assets.sample_for(pair), Some(expected), "pair {index}");
        }
    }
}

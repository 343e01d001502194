use std::collections::HashMap;

use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;
use bevy_asset_loader::prelude::*;
use thiserror::Error;

use crate::bindings::{BLOCK_NAMES, LETTER_NAMES};
use crate::game::GameState;

/// The loaded scene does not match what the mode was built for.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("scene has no transform named {0:?}")]
    MissingTransform(&'static str),
    #[error("expecting scene to have exactly one camera, but it has {0}")]
    CameraCount(usize),
}

#[derive(AssetCollection, Resource)]
struct SceneAssets {
    #[asset(path = "scenes/blocks.glb#Scene0")]
    blocks: Handle<Scene>,
}

/// Rotation stored as a plain angle vector so it can be scaled component-wise
/// each frame. Written back to `Transform::rotation` as XYZ Euler angles.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct SpinVector(pub Vec3);

impl SpinVector {
    pub fn from_rotation(rotation: Quat) -> Self {
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        Self(Vec3::new(x, y, z))
    }

    pub fn to_rotation(self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.0.x, self.0.y, self.0.z)
    }
}

/// A scene node the mode moves around but never owns.
#[derive(Debug, Clone, Copy)]
pub struct NodeHandle {
    pub entity: Entity,
    /// Transform as authored, restored on restart
    pub home: Transform,
}

#[derive(Debug, Clone, Copy)]
pub struct SlotVisual {
    pub block: NodeHandle,
    pub letter: NodeHandle,
}

impl SlotVisual {
    pub const fn nodes(&self) -> [NodeHandle; 2] {
        [self.block, self.letter]
    }
}

/// Handles into the spawned scene, resolved once by name.
#[derive(Resource, Debug)]
pub struct SlotEntities {
    slots: Vec<SlotVisual>,
    camera: Entity,
}

impl SlotEntities {
    /// Resolves every block and letter name, then checks for exactly one camera.
    pub fn resolve<'a>(
        nodes: impl IntoIterator<Item = (Entity, &'a str, Transform)>,
        cameras: &[Entity],
    ) -> Result<Self, ConfigurationError> {
        let by_name: HashMap<&str, NodeHandle> = nodes
            .into_iter()
            .map(|(entity, name, home)| (name, NodeHandle { entity, home }))
            .collect();

        let find = |name: &'static str| {
            by_name
                .get(name)
                .copied()
                .ok_or(ConfigurationError::MissingTransform(name))
        };

        let slots = BLOCK_NAMES
            .iter()
            .zip(LETTER_NAMES)
            .map(|(&block, letter)| -> Result<SlotVisual, ConfigurationError> {
                Ok(SlotVisual {
                    block: find(block)?,
                    letter: find(letter)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let [camera] = cameras else {
            return Err(ConfigurationError::CameraCount(cameras.len()));
        };

        Ok(Self {
            slots,
            camera: *camera,
        })
    }

    pub fn get(&self, slot: usize) -> Option<&SlotVisual> {
        self.slots.get(slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotVisual> {
        self.slots.iter()
    }

    pub const fn camera(&self) -> Entity {
        self.camera
    }
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.configure_loading_state(
            LoadingStateConfig::new(GameState::Loading).load_collection::<SceneAssets>(),
        )
        .add_systems(OnEnter(GameState::Resolving), spawn_scene);
    }
}

fn spawn_scene(mut commands: Commands, assets: Res<SceneAssets>) {
    // Light shines straight down the scene's vertical axis.
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(1.0, 1.0, 0.95),
            ..default()
        },
        Transform::default().looking_to(Vec3::NEG_Y, Vec3::Z),
    ));

    commands
        .spawn(SceneRoot(assets.blocks.clone()))
        .observe(resolve_scene);
}

fn resolve_scene(
    trigger: Trigger<SceneInstanceReady>,
    mut commands: Commands,
    children: Query<&Children>,
    named: Query<(&Name, &Transform)>,
    cameras: Query<(), With<Camera>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    let descendants: Vec<Entity> = children.iter_descendants(trigger.entity()).collect();

    let nodes = descendants.iter().filter_map(|&entity| {
        named
            .get(entity)
            .ok()
            .map(|(name, transform)| (entity, name.as_str(), *transform))
    });
    let scene_cameras: Vec<Entity> = descendants
        .iter()
        .copied()
        .filter(|&entity| cameras.contains(entity))
        .collect();

    match SlotEntities::resolve(nodes, &scene_cameras) {
        Ok(slots) => {
            for node in slots.iter().flat_map(SlotVisual::nodes) {
                commands
                    .entity(node.entity)
                    .insert(SpinVector::from_rotation(node.home.rotation));
            }
            info!(
                "Resolved {} slots and camera {:?}",
                slots.slots.len(),
                slots.camera()
            );
            commands.insert_resource(slots);
            next_state.set(GameState::Playing);
        }
        Err(err) => {
            error!("Cannot start block pairs: {err}");
            exit.send(AppExit::error());
        }
    }
}

/// Puts every block and letter back where the scene placed it.
pub fn restore_home_transforms(
    slots: Res<SlotEntities>,
    mut nodes: Query<(&mut Transform, &mut SpinVector)>,
) {
    for node in slots.iter().flat_map(SlotVisual::nodes) {
        if let Ok((mut transform, mut spin)) = nodes.get_mut(node.entity) {
            *transform = node.home;
            *spin = SpinVector::from_rotation(node.home.rotation);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Spawns one entity per block and letter plus a camera, the way the
    /// blocks scene lays them out, and resolves them.
    pub(crate) fn spawn_fake_scene(world: &mut World) -> SlotEntities {
        let mut nodes = Vec::new();
        for (slot, name) in BLOCK_NAMES.iter().chain(LETTER_NAMES.iter()).enumerate() {
            let home = Transform::from_xyz(slot as f32, 0.0, 0.0);
            let entity = world.spawn((home, SpinVector::default())).id();
            nodes.push((entity, *name, home));
        }
        let camera = world.spawn_empty().id();
        SlotEntities::resolve(nodes, &[camera]).expect("fake scene is complete")
    }

    fn named_nodes(skip: Option<&str>) -> Vec<(Entity, &'static str, Transform)> {
        BLOCK_NAMES
            .iter()
            .chain(LETTER_NAMES.iter())
            .filter(|name| Some(**name) != skip)
            .enumerate()
            .map(|(i, name)| (Entity::from_raw(i as u32), *name, Transform::IDENTITY))
            .collect()
    }

    #[test]
    fn resolves_every_slot_in_order() {
        let camera = Entity::from_raw(100);
        let mut nodes = named_nodes(None);
        nodes.push((Entity::from_raw(99), "Light", Transform::IDENTITY));

        let slots = SlotEntities::resolve(nodes, &[camera]).expect("scene is complete");
        assert_eq!(slots.iter().count(), 16);
        assert_eq!(slots.camera(), camera);

        let q = slots.get(4).expect("slot 4 exists");
        assert_eq!(q.block.entity, Entity::from_raw(4));
        assert_eq!(q.letter.entity, Entity::from_raw(20));
        assert!(slots.get(16).is_none());
    }

    #[test]
    fn missing_name_is_a_configuration_error() {
        let err = SlotEntities::resolve(named_nodes(Some("letterX")), &[Entity::from_raw(100)])
            .expect_err("letterX is missing");
        assert_eq!(err, ConfigurationError::MissingTransform("letterX"));
        assert_eq!(err.to_string(), "scene has no transform named \"letterX\"");
    }

    #[test]
    fn camera_count_must_be_one() {
        let err = SlotEntities::resolve(named_nodes(None), &[]).expect_err("no camera");
        assert_eq!(err, ConfigurationError::CameraCount(0));

        let two = [Entity::from_raw(100), Entity::from_raw(101)];
        let err = SlotEntities::resolve(named_nodes(None), &two).expect_err("two cameras");
        assert_eq!(
            err.to_string(),
            "expecting scene to have exactly one camera, but it has 2"
        );
    }

    #[test]
    fn spin_vector_round_trips_rotation() {
        let rotation = Quat::from_rotation_z(0.5);
        let spin = SpinVector::from_rotation(rotation);
        assert!((spin.0.z - 0.5).abs() < 1e-5);
        assert!(spin.to_rotation().abs_diff_eq(rotation, 1e-5));
    }

    #[test]
    fn restore_puts_nodes_home() {
        let mut app = App::new();
        let slots = spawn_fake_scene(app.world_mut());
        let block = slots.get(0).expect("slot 0").block;
        app.insert_resource(slots)
            .add_systems(Update, restore_home_transforms);

        {
            let mut entity = app.world_mut().entity_mut(block.entity);
            entity.get_mut::<Transform>().expect("has transform").translation.y = 40.0;
            entity.get_mut::<SpinVector>().expect("has spin").0 = Vec3::ONE;
        }
        app.update();

        let entity = app.world().entity(block.entity);
        assert_eq!(entity.get::<Transform>(), Some(&block.home));
        assert_eq!(entity.get::<SpinVector>(), Some(&SpinVector(Vec3::ZERO)));
    }
}

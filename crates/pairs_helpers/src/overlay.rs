//! Screen-space text with a one pixel drop shadow.
//!
//! Each label is a positioned parent node wrapping a box sized to its black
//! shadow text, with the colored foreground nudged one pixel up and to the
//! right on top. The texts and the parent carry the caller's marker component,
//! so a single `Query<&mut Text, With<M>>` updates the whole label.

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;

/// Tags the shadow half of a shadowed label.
#[derive(Component)]
pub struct TextShadow;

/// Spawns a shadowed label at `position` and returns the parent entity.
pub fn spawn_shadowed_text<M: Component + Clone>(
    commands: &mut Commands,
    marker: M,
    position: Node,
    font_size: f32,
    color: Color,
) -> Entity {
    let font = TextFont {
        font_size,
        ..default()
    };

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                ..position
            },
            marker.clone(),
        ))
        .with_children(|parent| {
            parent.spawn(Node::default()).with_children(|text_box| {
                text_box.spawn((
                    Text::default(),
                    font.clone(),
                    TextColor(Color::BLACK),
                    TextShadow,
                    marker.clone(),
                ));
                text_box.spawn((
                    Text::default(),
                    font,
                    TextColor(color),
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(1.0),
                        top: Val::Px(-1.0),
                        ..default()
                    },
                    marker,
                ));
            });
        })
        .id()
}

/// Writes `value` into every text of a label, touching only texts that differ.
pub fn set_shadowed_text<F: QueryFilter>(texts: &mut Query<&mut Text, F>, value: &str) {
    for mut text in texts.iter_mut() {
        if text.0 != value {
            value.clone_into(&mut text.0);
        }
    }
}

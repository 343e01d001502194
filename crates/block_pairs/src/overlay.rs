use bevy::prelude::*;
use pairs_helpers::overlay::{TextShadow, set_shadowed_text, spawn_shadowed_text};

use crate::board::Board;
use crate::game::{FrameSet, GameState, RoundResult, RoundTimer, round_result};

const TEXT_SIZE: f32 = 32.0;
const BANNER_SIZE: f32 = 96.0;
const MARGIN: Val = Val::Px(8.0);
const LOSE_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

#[derive(Component, Clone)]
struct ScoreText;

#[derive(Component, Clone)]
struct TimeText;

#[derive(Component, Clone)]
struct BannerText;

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), spawn_overlay)
            .add_systems(Update, update_overlay.in_set(FrameSet::Present));
    }
}

fn score_label(score: u32) -> String {
    format!("SCORE: {score}")
}

fn time_label(remaining: f32) -> String {
    format!("TIME: {remaining:.2}")
}

const fn banner(result: RoundResult) -> (&'static str, Color) {
    match result {
        RoundResult::Won => ("YOU WIN :)", Color::WHITE),
        RoundResult::Lost => ("YOU LOSE :(", LOSE_COLOR),
    }
}

fn spawn_overlay(mut commands: Commands) {
    spawn_shadowed_text(
        &mut commands,
        ScoreText,
        Node {
            left: MARGIN,
            bottom: MARGIN,
            ..default()
        },
        TEXT_SIZE,
        Color::WHITE,
    );

    spawn_shadowed_text(
        &mut commands,
        TimeText,
        Node {
            right: MARGIN,
            bottom: MARGIN,
            ..default()
        },
        TEXT_SIZE,
        Color::WHITE,
    );

    let banner = spawn_shadowed_text(
        &mut commands,
        BannerText,
        Node {
            top: Val::Percent(35.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        BANNER_SIZE,
        Color::WHITE,
    );
    commands.entity(banner).insert(Visibility::Hidden);
}

fn update_overlay(
    board: Res<Board>,
    timer: Res<RoundTimer>,
    mut score_texts: Query<&mut Text, (With<ScoreText>, Without<TimeText>, Without<BannerText>)>,
    mut time_texts: Query<&mut Text, (With<TimeText>, Without<BannerText>)>,
    mut banner_texts: Query<&mut Text, With<BannerText>>,
    mut banner_colors: Query<&mut TextColor, (With<BannerText>, Without<TextShadow>)>,
    mut time_visibility: Query<&mut Visibility, (With<TimeText>, Without<Text>)>,
    mut banner_visibility: Query<&mut Visibility, (With<BannerText>, Without<Text>, Without<TimeText>)>,
) {
    set_shadowed_text(&mut score_texts, &score_label(board.score()));

    if timer.is_timed() {
        set_shadowed_text(&mut time_texts, &time_label(timer.remaining()));
    }
    for mut visibility in &mut time_visibility {
        visibility.set_if_neq(if timer.is_timed() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }

    let result = round_result(board.is_won(), &timer);
    if let Some(result) = result {
        let (text, color) = banner(result);
        set_shadowed_text(&mut banner_texts, text);
        for mut banner_color in &mut banner_colors {
            if banner_color.0 != color {
                banner_color.0 = color;
            }
        }
    }
    for mut visibility in &mut banner_visibility {
        visibility.set_if_neq(if result.is_some() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }
}

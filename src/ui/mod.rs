//! Login portal surface
//!
//! The auth form itself is an external collaborator; this module only reacts
//! to the reveal signal with a placeholder panel and hides it again on dock
//! reset. Nothing here feeds back into the scene core.

use bevy::prelude::*;

use crate::camera::{DockReset, PortalReveal};

#[derive(Component)]
pub struct PortalPanel;

const PANEL_BACKGROUND: Color = Color::srgba(0.98, 0.97, 1.0, 0.92);
const PANEL_TITLE_COLOR: Color = Color::srgb(0.42, 0.16, 0.68);
const PANEL_BODY_COLOR: Color = Color::srgb(0.35, 0.3, 0.5);

pub struct PortalUiPlugin;

impl Plugin for PortalUiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (reveal_portal, hide_portal));
    }
}

fn reveal_portal(
    mut reveals: MessageReader<PortalReveal>,
    existing: Query<(), With<PortalPanel>>,
    mut commands: Commands,
) {
    if reveals.read().next().is_none() || !existing.is_empty() {
        return;
    }

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(70.0),
                top: Val::Percent(22.0),
                width: Val::Px(340.0),
                padding: UiRect::all(Val::Px(28.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(14.0),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            BorderRadius::all(Val::Px(24.0)),
            PortalPanel,
            Name::new("Portal Panel"),
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new("Access Portal"),
                TextFont {
                    font_size: 30.0,
                    ..default()
                },
                TextColor(PANEL_TITLE_COLOR),
            ));
            panel.spawn((
                Text::new("Docking complete. Sign in to continue."),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(PANEL_BODY_COLOR),
            ));
        });
}

fn hide_portal(
    mut resets: MessageReader<DockReset>,
    panels: Query<Entity, With<PortalPanel>>,
    mut commands: Commands,
) {
    if resets.read().next().is_none() {
        return;
    }
    for panel in panels.iter() {
        commands.entity(panel).despawn();
    }
}

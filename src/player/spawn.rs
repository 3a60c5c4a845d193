use bevy::prelude::*;
use crate::shared::*;

/// Starting grid position, on the farm a little south of the farmhouse.
const SPAWN_GRID_X: i32 = 16;
const SPAWN_GRID_Y: i32 = 30;

/// Spawn the player entity with all necessary components.
/// Runs once on `OnEnter(GameState::Playing)`.
pub fn spawn_player(
    mut commands: Commands,
    existing: Query<Entity, With<Player>>,
) {
    // Guard: don't double-spawn if returning to Playing state.
    if !existing.is_empty() {
        return;
    }

    let pos = grid_to_world_center(SPAWN_GRID_X, SPAWN_GRID_Y);

    commands.spawn((
        Player,
        // Placeholder sprite until character art lands.
        Sprite {
            color: Color::srgb(0.2, 0.5, 0.8),
            custom_size: Some(Vec2::new(12.0, 16.0)),
            ..default()
        },
        Transform::from_xyz(pos.x, pos.y, Z_ENTITY_BASE),
        LogicalPosition(pos),
        YSorted,
    ));

    info!("[Player] Spawned at ({}, {})", SPAWN_GRID_X, SPAWN_GRID_Y);
}

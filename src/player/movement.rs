use bevy::prelude::*;
use crate::shared::*;
use crate::world::TileMap;
use super::PLAYER_SPEED;

/// Core movement system. Reads WASD / arrow keys, moves the player's
/// `LogicalPosition`, updates the facing direction, and keeps the player
/// inside the map.
///
/// Movement is continuous (smooth pixel motion) while tile lookups derive
/// the grid cell from `LogicalPosition` on demand.
pub fn player_movement(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    map: Res<TileMap>,
    mut player_state: ResMut<PlayerState>,
    mut query: Query<&mut LogicalPosition, With<Player>>,
) {
    let Ok(mut pos) = query.get_single_mut() else {
        return;
    };

    let mut dir = Vec2::ZERO;

    if keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }

    if dir == Vec2::ZERO {
        return;
    }

    // Vertical wins diagonal ties.
    if dir.y.abs() >= dir.x.abs() {
        player_state.facing = if dir.y > 0.0 { Facing::Up } else { Facing::Down };
    } else {
        player_state.facing = if dir.x > 0.0 { Facing::Right } else { Facing::Left };
    }

    // Normalise so diagonal speed equals cardinal speed.
    let step = dir.normalize() * PLAYER_SPEED * time.delta_secs();

    let margin = TILE_SIZE * 0.5;
    let max_x = (map.width as f32 * TILE_SIZE - margin).max(margin);
    let max_y = (map.height as f32 * TILE_SIZE - margin).max(margin);

    pos.0.x = (pos.0.x + step.x).clamp(margin, max_x);
    pos.0.y = (pos.0.y + step.y).clamp(margin, max_y);
}

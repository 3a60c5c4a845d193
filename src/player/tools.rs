use bevy::prelude::*;
use crate::shared::*;
use super::{facing_offset, TOOL_ORDER};

/// Pick a tool directly with the digit keys, or cycle with Tab.
pub fn tool_select(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut player_state: ResMut<PlayerState>,
) {
    let picked = if keyboard.just_pressed(KeyCode::Digit1) {
        Some(ToolKind::Hand)
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        Some(ToolKind::Hoe)
    } else if keyboard.just_pressed(KeyCode::Digit3) {
        Some(ToolKind::Pickaxe)
    } else if keyboard.just_pressed(KeyCode::Tab) {
        let current_idx = TOOL_ORDER
            .iter()
            .position(|t| *t == player_state.tool)
            .unwrap_or(0);
        Some(TOOL_ORDER[(current_idx + 1) % TOOL_ORDER.len()])
    } else {
        None
    };

    if let Some(tool) = picked {
        if tool != player_state.tool {
            player_state.tool = tool;
            info!("[Player] Tool: {:?}", tool);
        }
    }
}

/// Use the current tool on the tile the player is facing.
/// Sends a `TileActionEvent` for the other domains to react to.
pub fn tool_use(
    keyboard: Res<ButtonInput<KeyCode>>,
    player_state: Res<PlayerState>,
    query: Query<&LogicalPosition, With<Player>>,
    mut actions: EventWriter<TileActionEvent>,
) {
    let use_pressed =
        keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::Enter);
    if !use_pressed {
        return;
    }

    let Ok(pos) = query.get_single() else {
        return;
    };

    // Target tile: player's current grid cell plus the facing offset.
    let (px, py) = world_to_grid(pos.0);
    let (dx, dy) = facing_offset(&player_state.facing);

    actions.send(TileActionEvent {
        tool: player_state.tool,
        tile_x: px + dx,
        tile_y: py + dy,
    });
}

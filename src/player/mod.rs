mod camera;
mod interaction;
mod movement;
mod spawn;
mod tools;

use bevy::prelude::*;
use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // -- Spawn player when we enter Playing --
        app.add_systems(OnEnter(GameState::Playing), spawn::spawn_player);

        // -- Systems that run every frame while Playing --
        app.add_systems(
            Update,
            (
                movement::player_movement,
                // tool_use reads the facing set by movement this frame
                tools::tool_use.after(movement::player_movement),
                tools::tool_select,
                interaction::add_items_to_inventory,
                camera::camera_follow_player.after(movement::player_movement),
            )
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Helpers shared across sub-modules
// ═══════════════════════════════════════════════════════════════════════════

/// Walk speed in world pixels per second.
pub const PLAYER_SPEED: f32 = 88.0;

/// The ordered list of tools for cycling with Tab.
pub const TOOL_ORDER: [ToolKind; 3] = [ToolKind::Hand, ToolKind::Hoe, ToolKind::Pickaxe];

/// Get the facing-direction offset as a grid delta.
pub fn facing_offset(facing: &Facing) -> (i32, i32) {
    match facing {
        Facing::Up => (0, 1),
        Facing::Down => (0, -1),
        Facing::Left => (-1, 0),
        Facing::Right => (1, 0),
    }
}

//! Wild flowers: spawn, harvest, fade.

use bevy::prelude::*;
use rand::prelude::*;

use crate::shared::*;

use super::{FloraStatus, FLORA_FADE_MS};

/// Flower species by item id, rolled uniformly at spawn.
pub const FLOWER_KINDS: &[&str] = &["daisy", "tulip", "chicory"];

#[derive(Component, Debug)]
pub struct Flower {
    pub tile_x: i32,
    pub tile_y: i32,
    pub item_id: ItemId,
    pub status: FloraStatus,
    pub fade_ms: f32,
}

impl Flower {
    pub fn is_active(&self) -> bool {
        self.status == FloraStatus::Active
    }

    /// Picks the flower. Yields its item exactly once; a fading flower
    /// yields nothing.
    pub fn harvest(&mut self) -> Option<ItemId> {
        if self.status != FloraStatus::Active {
            return None;
        }
        self.status = FloraStatus::FadingOut;
        self.fade_ms = FLORA_FADE_MS;
        Some(self.item_id.clone())
    }
}

fn flower_color(item_id: &str) -> Color {
    match item_id {
        "daisy" => Color::srgb(0.95, 0.95, 0.85),
        "tulip" => Color::srgb(0.88, 0.3, 0.4),
        _ => Color::srgb(0.45, 0.6, 0.95),
    }
}

pub fn spawn_flower(commands: &mut Commands, tile_x: i32, tile_y: i32, rng: &mut impl Rng) -> Entity {
    let item_id = FLOWER_KINDS[rng.gen_range(0..FLOWER_KINDS.len())].to_string();
    let color = flower_color(&item_id);
    let pos = grid_to_world_center(tile_x, tile_y);
    commands
        .spawn((
            Sprite::from_color(color, Vec2::new(8.0, 10.0)),
            Transform::from_xyz(pos.x, pos.y, Z_ENTITY_BASE),
            LogicalPosition(pos),
            YSorted,
            Flower {
                tile_x,
                tile_y,
                item_id,
                status: FloraStatus::Active,
                fade_ms: 0.0,
            },
        ))
        .id()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_flower() -> Flower {
        Flower {
            tile_x: 0,
            tile_y: 0,
            item_id: "daisy".to_string(),
            status: FloraStatus::Active,
            fade_ms: 0.0,
        }
    }

    #[test]
    fn harvest_yields_exactly_once() {
        let mut flower = test_flower();
        assert_eq!(flower.harvest(), Some("daisy".to_string()));
        assert_eq!(flower.status, FloraStatus::FadingOut);
        assert_eq!(flower.fade_ms, FLORA_FADE_MS);
        assert_eq!(flower.harvest(), None);
    }

    #[test]
    fn fading_flower_is_not_active() {
        let mut flower = test_flower();
        assert!(flower.is_active());
        flower.harvest();
        assert!(!flower.is_active());
    }
}

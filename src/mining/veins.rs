//! Ore vein state: a bounded resource counter with a visual stage derived
//! from it.

use bevy::prelude::*;

use crate::shared::*;

/// Fade duration for a vein that ran dry.
pub const VEIN_FADE_MS: f32 = 900.0;

/// Visual stage, a pure function of remaining/initial. The thresholds are
/// strictly greater-than: a vein at exactly three quarters reads Partial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VeinStage {
    Full,
    Partial,
    Depleted,
    Gone,
}

pub fn stage_of(remaining: u32, initial: u32) -> VeinStage {
    if remaining == 0 || initial == 0 {
        return VeinStage::Gone;
    }
    let ratio = remaining as f32 / initial as f32;
    if ratio > 0.75 {
        VeinStage::Full
    } else if ratio > 0.5 {
        VeinStage::Partial
    } else {
        VeinStage::Depleted
    }
}

/// What one swing of the pickaxe produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MineOutcome {
    pub ore: Option<ItemId>,
    pub stage_changed: bool,
    pub depleted: bool,
}

/// A 2x2 ore deposit anchored at its lower-left tile.
#[derive(Component, Debug)]
pub struct OreVein {
    pub tile_x: i32,
    pub tile_y: i32,
    pub resource_id: ItemId,
    pub remaining: u32,
    pub initial: u32,
    pub fade_ms: f32,
}

impl OreVein {
    pub fn new(tile_x: i32, tile_y: i32, resource_id: ItemId) -> Self {
        Self {
            tile_x,
            tile_y,
            resource_id,
            remaining: VEIN_INITIAL_RESOURCES,
            initial: VEIN_INITIAL_RESOURCES,
            fade_ms: 0.0,
        }
    }

    pub fn stage(&self) -> VeinStage {
        stage_of(self.remaining, self.initial)
    }

    /// One mining action. An exhausted vein is a no-op; otherwise exactly
    /// one unit of ore comes out, and hitting zero arms the fade timer.
    pub fn mine(&mut self) -> MineOutcome {
        if self.remaining == 0 {
            return MineOutcome::default();
        }
        let before = self.stage();
        self.remaining -= 1;
        let after = self.stage();
        let depleted = self.remaining == 0;
        if depleted {
            self.fade_ms = VEIN_FADE_MS;
        }
        MineOutcome {
            ore: Some(self.resource_id.clone()),
            stage_changed: before != after,
            depleted,
        }
    }
}

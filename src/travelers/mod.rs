//! Traveler domain plugin for Fernvale.
//!
//! Travelers are decorative economic agents: they spawn at a map edge, walk
//! the road, and sometimes detour to the roadside stand to buy what the
//! player has listed. Their movement runs through a strict phase machine;
//! the stand service loop in the economy domain steers it between slots via
//! the phase's external triggers.

use bevy::prelude::*;

use crate::shared::*;

pub mod movement;
pub mod preferences;
pub mod spawning;

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelDirection {
    East,
    West,
}

impl TravelDirection {
    /// Sign of horizontal travel: east is +x.
    pub fn sign(&self) -> f32 {
        match self {
            TravelDirection::East => 1.0,
            TravelDirection::West => -1.0,
        }
    }
}

#[derive(Component, Debug)]
pub struct Traveler {
    pub direction: TravelDirection,
    pub speed: f32,
    /// Fixed boundary computed at spawn; crossing it while walking despawns
    /// the traveler.
    pub despawn_x: f32,
    /// Road line the traveler walks on and returns to after a visit.
    pub path_y: f32,
}

/// Spawn-time taste profile. Liked and hated are disjoint by construction.
#[derive(Component, Debug, Clone)]
pub struct TravelerTastes {
    pub liked: Vec<ItemId>,
    pub hated: Vec<ItemId>,
    pub gold: u32,
}

/// The purchase itinerary for a stand visit: slot indices in buying order.
#[derive(Component, Debug, Clone)]
pub struct StandVisit {
    pub wanted: Vec<usize>,
    pub next: usize,
}

impl StandVisit {
    pub fn new(wanted: Vec<usize>) -> Self {
        Self { wanted, next: 0 }
    }

    pub fn current_slot(&self) -> Option<usize> {
        self.wanted.get(self.next).copied()
    }

    pub fn advance(&mut self) {
        self.next += 1;
    }
}

/// Movement phase machine. Transitions only run forward; the two external
/// triggers are honored solely while waiting at the counter.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum TravelerPhase {
    /// Constant horizontal march along the road.
    Walking,
    /// Horizontal leg toward the first purchase slot.
    ApproachX { target_x: f32 },
    /// Vertical leg down to the counter's front row.
    ApproachY { target_y: f32 },
    /// Stopped at the counter, waiting on the stand to act.
    Waiting,
    /// Horizontal shuffle to the next purchase slot.
    Reposition { target_x: f32 },
    /// Vertical leg back up to the road.
    ReturnToPath { target_y: f32 },
}

impl TravelerPhase {
    pub fn is_waiting(&self) -> bool {
        matches!(self, TravelerPhase::Waiting)
    }

    /// External trigger: shuffle sideways to another slot. Only honored
    /// while waiting.
    pub fn move_to_next_slot(&mut self, slot_x: f32) -> bool {
        if !self.is_waiting() {
            return false;
        }
        *self = TravelerPhase::Reposition { target_x: slot_x };
        true
    }

    /// External trigger: head back to the road. Only honored while waiting.
    pub fn resume_walking(&mut self, path_y: f32) -> bool {
        if !self.is_waiting() {
            return false;
        }
        *self = TravelerPhase::ReturnToPath { target_y: path_y };
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct TravelersPlugin;

impl Plugin for TravelersPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<spawning::TravelerSpawner>().add_systems(
            Update,
            (spawning::spawn_travelers, movement::advance_travelers)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

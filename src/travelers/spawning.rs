//! Traveler spawning: interval timing, taste rolls and the visit plan.

use bevy::prelude::*;
use rand::prelude::*;

use crate::shared::*;

use super::preferences;
use super::{StandVisit, TravelDirection, Traveler, TravelerPhase};

/// Distance past the visible edge where travelers appear and vanish.
pub const SPAWN_MARGIN: f32 = 48.0;
pub const TRAVELER_SPEED_MIN: f32 = 28.0;
pub const TRAVELER_SPEED_MAX: f32 = 46.0;

#[derive(Resource, Debug)]
pub struct TravelerSpawner {
    pub timer_ms: f32,
    pub next_in_ms: f32,
}

impl Default for TravelerSpawner {
    fn default() -> Self {
        Self {
            timer_ms: 0.0,
            next_in_ms: SpawnTuning::default().traveler_spawn_min_ms,
        }
    }
}

/// Spawns a traveler whenever the interval elapses and the road is not
/// already at capacity. Tastes, the visit decision and the purchase plan
/// are all rolled here, before the traveler takes its first step.
pub fn spawn_travelers(
    mut commands: Commands,
    time: Res<Time>,
    tuning: Res<SpawnTuning>,
    stand: Res<RoadsideStand>,
    registry: Res<ItemRegistry>,
    mut spawner: ResMut<TravelerSpawner>,
    travelers: Query<(), With<Traveler>>,
    camera: Query<&Transform, With<Camera2d>>,
) {
    spawner.timer_ms += time.delta_secs() * 1000.0;
    if spawner.timer_ms < spawner.next_in_ms {
        return;
    }
    spawner.timer_ms = 0.0;

    let mut rng = thread_rng();
    spawner.next_in_ms =
        rng.gen_range(tuning.traveler_spawn_min_ms..=tuning.traveler_spawn_max_ms);

    if travelers.iter().count() >= tuning.max_travelers {
        return;
    }

    // Spawn just off the visible edge; headless runs have no camera and
    // fall back to a window-sized span around the stand.
    let (center_x, half_width) = camera
        .get_single()
        .map(|transform| {
            (
                transform.translation.x,
                SCREEN_WIDTH * 0.5 * transform.scale.x,
            )
        })
        .unwrap_or((stand.slot_world_x(0), SCREEN_WIDTH * 0.5));

    let direction = if rng.gen_bool(0.5) {
        TravelDirection::East
    } else {
        TravelDirection::West
    };
    let (spawn_x, despawn_x) = match direction {
        TravelDirection::East => (
            center_x - half_width - SPAWN_MARGIN,
            center_x + half_width + SPAWN_MARGIN,
        ),
        TravelDirection::West => (
            center_x + half_width + SPAWN_MARGIN,
            center_x - half_width - SPAWN_MARGIN,
        ),
    };
    let path_y = grid_to_world_center(0, ROAD_TILE_Y).y;

    let tastes = preferences::roll_tastes(
        &mut rng,
        &registry.sellable_ids(),
        tuning.traveler_gold_min,
        tuning.traveler_gold_max,
    );
    let listed = stand.listed_resource_ids();
    let mut visit = preferences::decide_visit(&mut rng, &tastes, &listed, tuning.neutral_visit_chance);
    let mut wanted = Vec::new();
    if visit {
        wanted = preferences::plan_purchases(
            &mut rng,
            &tastes,
            &stand,
            &registry,
            tuning.neutral_buy_base,
            tuning.neutral_buy_decay,
        );
        // An empty plan cancels the detour outright.
        if wanted.is_empty() {
            visit = false;
        }
    }

    let phase = if visit {
        TravelerPhase::ApproachX {
            target_x: stand.slot_world_x(wanted[0]),
        }
    } else {
        TravelerPhase::Walking
    };
    let speed = rng.gen_range(TRAVELER_SPEED_MIN..TRAVELER_SPEED_MAX);
    let tint = Color::srgb(
        rng.gen_range(0.35..0.9),
        rng.gen_range(0.3..0.75),
        rng.gen_range(0.3..0.8),
    );
    let pos = Vec2::new(spawn_x, path_y);

    let mut traveler = commands.spawn((
        Sprite::from_color(tint, Vec2::new(11.0, 15.0)),
        Transform::from_xyz(pos.x, pos.y, Z_ENTITY_BASE),
        LogicalPosition(pos),
        YSorted,
        Traveler {
            direction,
            speed,
            despawn_x,
            path_y,
        },
        tastes,
        phase,
    ));
    if visit {
        traveler.insert(StandVisit::new(wanted));
    }

    info!(
        "[Travelers] Spawned traveler heading {:?} (visit: {})",
        direction, visit
    );
}

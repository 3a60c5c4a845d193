//! Weeds: staged growth, click-through removal, and the splash particles
//! each click kicks up.
//!
//! Clicks and the background grow timer advance the same stage counter.
//! Only clicks remove a weed: one click per stage past the first, plus a
//! final click at full stage, so a fresh weed takes max-stage clicks.

use bevy::prelude::*;
use rand::prelude::*;

use crate::shared::*;

use super::{FloraStatus, FLORA_FADE_MS};

/// Time a weed takes to grow one stage on its own.
pub const WEED_GROW_MS: f32 = 45_000.0;

#[derive(Component, Debug)]
pub struct Weed {
    pub tile_x: i32,
    pub tile_y: i32,
    /// Growth stage in [1, WEED_MAX_STAGE].
    pub stage: u8,
    pub grow_ms: f32,
    pub status: FloraStatus,
    pub fade_ms: f32,
}

impl Weed {
    pub fn is_active(&self) -> bool {
        self.status == FloraStatus::Active
    }

    /// One player click. Advances a stage, or at full stage flags the weed
    /// removed and returns true.
    pub fn click(&mut self) -> bool {
        if self.status != FloraStatus::Active {
            return false;
        }
        if self.stage >= WEED_MAX_STAGE {
            self.status = FloraStatus::FadingOut;
            self.fade_ms = FLORA_FADE_MS;
            return true;
        }
        self.stage += 1;
        false
    }

    /// Background growth. Whole elapsed grow periods advance the stage up
    /// to the cap; time alone never removes a weed.
    pub fn grow(&mut self, dt_ms: f32) {
        if self.status != FloraStatus::Active || self.stage >= WEED_MAX_STAGE {
            return;
        }
        self.grow_ms += dt_ms;
        while self.grow_ms >= WEED_GROW_MS && self.stage < WEED_MAX_STAGE {
            self.grow_ms -= WEED_GROW_MS;
            self.stage += 1;
        }
        if self.stage >= WEED_MAX_STAGE {
            self.grow_ms = 0.0;
        }
    }
}

pub fn spawn_weed(commands: &mut Commands, tile_x: i32, tile_y: i32) -> Entity {
    let pos = grid_to_world_center(tile_x, tile_y);
    commands
        .spawn((
            Sprite::from_color(weed_color(1), weed_size(1)),
            Transform::from_xyz(pos.x, pos.y, Z_ENTITY_BASE),
            LogicalPosition(pos),
            YSorted,
            Weed {
                tile_x,
                tile_y,
                stage: 1,
                grow_ms: 0.0,
                status: FloraStatus::Active,
                fade_ms: 0.0,
            },
        ))
        .id()
}

pub fn weed_color(stage: u8) -> Color {
    match stage {
        1 => Color::srgb(0.5, 0.68, 0.3),
        2 => Color::srgb(0.42, 0.6, 0.24),
        _ => Color::srgb(0.34, 0.52, 0.2),
    }
}

pub fn weed_size(stage: u8) -> Vec2 {
    match stage {
        1 => Vec2::new(7.0, 7.0),
        2 => Vec2::new(9.0, 10.0),
        _ => Vec2::new(11.0, 13.0),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CLICK SPLASH PARTICLES
// ═══════════════════════════════════════════════════════════════════════

/// Short-lived leaf fleck thrown off by a weed click.
#[derive(Component, Debug)]
pub struct SplashParticle {
    pub velocity: Vec2,
    pub spin: f32,
    pub ttl_ms: f32,
    pub initial_ttl_ms: f32,
}

/// Spawns 4 to 6 flecks with randomized velocity, spin and green tint.
pub fn spawn_click_splash(commands: &mut Commands, at: Vec2, rng: &mut impl Rng) {
    let count = rng.gen_range(4..=6);
    for _ in 0..count {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = rng.gen_range(28.0..64.0);
        let ttl = rng.gen_range(260.0..420.0);
        let green = rng.gen_range(0.45..0.7);
        commands.spawn((
            Sprite::from_color(
                Color::srgb(0.25, green, 0.2),
                Vec2::splat(rng.gen_range(2.0..4.0)),
            ),
            Transform::from_translation(at.extend(Z_EFFECTS)),
            SplashParticle {
                velocity: Vec2::from_angle(angle) * speed,
                spin: rng.gen_range(-8.0..8.0),
                ttl_ms: ttl,
                initial_ttl_ms: ttl,
            },
        ));
    }
}

/// Moves, spins and fades splash flecks, despawning them as they expire.
pub fn update_splash_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut particles: Query<(Entity, &mut SplashParticle, &mut Transform, &mut Sprite)>,
) {
    let dt = time.delta_secs();
    for (entity, mut particle, mut transform, mut sprite) in particles.iter_mut() {
        particle.ttl_ms -= dt * 1000.0;
        if particle.ttl_ms <= 0.0 {
            commands.entity(entity).despawn();
            continue;
        }
        particle.velocity.y -= 90.0 * dt;
        transform.translation.x += particle.velocity.x * dt;
        transform.translation.y += particle.velocity.y * dt;
        transform.rotate_z(particle.spin * dt);
        let alpha = (particle.ttl_ms / particle.initial_ttl_ms).clamp(0.0, 1.0);
        sprite.color = sprite.color.with_alpha(alpha);
    }
}

/// Advances every active weed's grow timer.
pub fn weed_growth(time: Res<Time>, mut weeds: Query<&mut Weed>) {
    let dt_ms = time.delta_secs() * 1000.0;
    for mut weed in weeds.iter_mut() {
        weed.grow(dt_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_weed() -> Weed {
        Weed {
            tile_x: 0,
            tile_y: 0,
            stage: 1,
            grow_ms: 0.0,
            status: FloraStatus::Active,
            fade_ms: 0.0,
        }
    }

    #[test]
    fn fresh_weed_takes_max_stage_clicks() {
        let mut weed = fresh_weed();
        let mut clicks = 0;
        loop {
            clicks += 1;
            if weed.click() {
                break;
            }
            assert!(clicks < 10, "weed never removed");
        }
        assert_eq!(clicks, u32::from(WEED_MAX_STAGE));
        assert_eq!(weed.status, FloraStatus::FadingOut);
    }

    #[test]
    fn grown_weed_takes_one_click() {
        let mut weed = fresh_weed();
        weed.grow(WEED_GROW_MS * 10.0);
        assert_eq!(weed.stage, WEED_MAX_STAGE);
        assert!(weed.click());
    }

    #[test]
    fn growth_advances_whole_periods_and_banks_the_rest() {
        let mut weed = fresh_weed();
        weed.grow(WEED_GROW_MS - 1.0);
        assert_eq!(weed.stage, 1);
        weed.grow(1.0);
        assert_eq!(weed.stage, 2);
        weed.grow(WEED_GROW_MS * 0.5);
        assert_eq!(weed.stage, 2);
        assert!(weed.grow_ms > 0.0);
    }

    #[test]
    fn removed_weed_ignores_clicks_and_growth() {
        let mut weed = fresh_weed();
        weed.stage = WEED_MAX_STAGE;
        assert!(weed.click());
        assert!(!weed.click());
        let stage = weed.stage;
        weed.grow(WEED_GROW_MS * 3.0);
        assert_eq!(weed.stage, stage);
    }
}

//! Per-frame traveler movement through the phase machine.

use bevy::prelude::*;

use crate::shared::*;

use super::{Traveler, TravelDirection, TravelerPhase};

/// Snap distance for axis moves, in world pixels.
pub const ARRIVE_EPSILON: f32 = 2.0;

/// Steps one axis toward a target, snapping inside the epsilon. Returns
/// true once the value sits on the target.
pub fn step_axis(value: &mut f32, target: f32, max_step: f32) -> bool {
    let dist = target - *value;
    if dist.abs() <= ARRIVE_EPSILON {
        *value = target;
        return true;
    }
    *value += dist.signum() * max_step.min(dist.abs());
    false
}

/// Advances every traveler one frame. Arrivals at the counter raise
/// TravelerArrivedEvent for the stand service loop; walkers past their
/// despawn boundary are removed.
pub fn advance_travelers(
    mut commands: Commands,
    time: Res<Time>,
    stand: Res<RoadsideStand>,
    mut arrivals: EventWriter<TravelerArrivedEvent>,
    mut travelers: Query<(Entity, &Traveler, &mut TravelerPhase, &mut LogicalPosition)>,
) {
    let dt = time.delta_secs();
    for (entity, traveler, mut phase, mut pos) in travelers.iter_mut() {
        let step = traveler.speed * dt;
        match *phase {
            TravelerPhase::Walking => {
                pos.0.x += traveler.direction.sign() * step;
                let past = match traveler.direction {
                    TravelDirection::East => pos.0.x > traveler.despawn_x,
                    TravelDirection::West => pos.0.x < traveler.despawn_x,
                };
                if past {
                    debug!("[Travelers] Walker left the map at x={:.0}", pos.0.x);
                    commands.entity(entity).despawn();
                }
            }
            TravelerPhase::ApproachX { target_x } => {
                if step_axis(&mut pos.0.x, target_x, step) {
                    *phase = TravelerPhase::ApproachY {
                        target_y: stand.front_world_y(),
                    };
                }
            }
            TravelerPhase::ApproachY { target_y } => {
                if step_axis(&mut pos.0.y, target_y, step) {
                    *phase = TravelerPhase::Waiting;
                    arrivals.send(TravelerArrivedEvent { traveler: entity });
                }
            }
            TravelerPhase::Waiting => {}
            TravelerPhase::Reposition { target_x } => {
                if step_axis(&mut pos.0.x, target_x, step) {
                    *phase = TravelerPhase::Waiting;
                    arrivals.send(TravelerArrivedEvent { traveler: entity });
                }
            }
            TravelerPhase::ReturnToPath { target_y } => {
                if step_axis(&mut pos.0.y, target_y, step) {
                    *phase = TravelerPhase::Walking;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_moves_then_snaps() {
        let mut x = 0.0;
        assert!(!step_axis(&mut x, 10.0, 4.0));
        assert_eq!(x, 4.0);
        assert!(!step_axis(&mut x, 10.0, 4.0));
        assert_eq!(x, 8.0);
        // Within epsilon of the target now: snap and report arrival.
        assert!(step_axis(&mut x, 10.0, 4.0));
        assert_eq!(x, 10.0);
    }

    #[test]
    fn stepping_works_in_both_directions() {
        let mut x = 10.0;
        assert!(!step_axis(&mut x, 0.0, 3.0));
        assert_eq!(x, 7.0);

        // A step larger than the distance clamps onto the target; the next
        // call reports arrival.
        let mut y = -5.0;
        assert!(!step_axis(&mut y, 20.0, 100.0));
        assert_eq!(y, 20.0);
        assert!(step_axis(&mut y, 20.0, 100.0));
    }

    #[test]
    fn arrived_axis_stays_put() {
        let mut x = 42.0;
        assert!(step_axis(&mut x, 42.0, 5.0));
        assert_eq!(x, 42.0);
    }
}

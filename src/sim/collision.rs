//! Escape and collision detection
//!
//! Runs on its own 100 ms cadence, independent of the physics step and the
//! render loop. Each tick performs the escape test first, then the collision
//! test - the order is fixed so the outcome is deterministic when both could
//! fire in the same tick. Both results are one-way latches: after the first
//! signal every later tick is a no-op.
//!
//! Broad phase: a Manhattan filter on tower centers, sized per tower - the
//! footprint for a solid body, the live piece reach for a collapsed one
//! (pieces drift well outside the burst scatter before settling). Narrow
//! phase: axis-aligned overlap against solid tower bodies, Manhattan radius
//! against the pieces of collapsed ones.

use glam::Vec3;

use crate::manhattan;

use super::config::Config;
use super::grid::TowerGrid;

/// Terminal signal from one detector tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionSignal {
    /// The vehicle crossed the grid boundary
    Escaped,
    /// The vehicle hit a tower body or a piece of debris
    Dead,
}

/// Latched detector state for one session
pub struct CollisionDetector {
    outcome: Option<CollisionSignal>,
}

impl CollisionDetector {
    pub fn new() -> Self {
        Self { outcome: None }
    }

    /// The latched signal, if any tick fired
    pub fn outcome(&self) -> Option<CollisionSignal> {
        self.outcome
    }

    /// Run one detector tick. Returns a signal only the first time a test
    /// fires; an empty grid trivially yields no collision.
    pub fn tick(
        &mut self,
        vehicle_pos: Vec3,
        grid: &TowerGrid,
        config: &Config,
    ) -> Option<CollisionSignal> {
        if self.outcome.is_some() {
            return None;
        }

        // Escape before collision (fixed order, see module docs)
        let half_extent = grid.half_extent();
        if vehicle_pos.x.abs() > half_extent || vehicle_pos.z.abs() > half_extent {
            self.outcome = Some(CollisionSignal::Escaped);
            return self.outcome;
        }

        for tower in grid.towers() {
            let dx = vehicle_pos.x - tower.center.x;
            let dz = vehicle_pos.z - tower.center.y;

            // Broad phase must follow the debris as it drifts outward, or
            // rubble settled far from the footprint would be missed.
            let broad = if tower.is_solid() {
                tower.footprint + config.vehicle_width
            } else {
                tower.debris_reach + config.collision_radius
            };
            if dx.abs() + dz.abs() > broad {
                continue;
            }

            let hit = if tower.is_solid() {
                let half_width = (tower.footprint + config.vehicle_width) / 2.0;
                dx.abs() < half_width && dz.abs() < half_width
            } else {
                tower
                    .pieces
                    .iter()
                    .any(|piece| manhattan(vehicle_pos, piece.position) < config.collision_radius)
            };

            if hit {
                self.outcome = Some(CollisionSignal::Dead);
                return self.outcome;
            }
        }

        None
    }
}

impl Default for CollisionDetector {
    fn default() -> Self {
        Self::new()
    }
}

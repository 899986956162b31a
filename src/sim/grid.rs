//! Tower grid generation and demolition
//!
//! A session generates one D x D lattice of towers centered on the origin
//! (D odd; the center cell stays vacant as the spawn cell). Towers are an
//! arena keyed by grid coordinate - the collision detector and the scheduler
//! address them by `GridCoord`, never by scanning a scene graph.
//!
//! Tower lifecycle is one-way: Intact -> Scheduled -> Collapsing. The
//! collapse burst replaces the solid body with a stack of pieces that the
//! per-frame animator drops and drifts until each one rests; "settled" is a
//! derived condition used only to skip finished towers.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;

use super::config::Config;

/// Lattice coordinate of a tower (0,0 is the vacant spawn cell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

/// One-way tower lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TowerState {
    /// Solid body, no demolition timer registered yet
    Intact,
    /// Solid body, demolition timer pending
    Scheduled,
    /// Body replaced by falling/settled pieces
    Collapsing,
}

/// A falling fragment of a collapsed tower
#[derive(Debug, Clone)]
pub struct TowerPiece {
    pub position: Vec3,
    /// Resting height: half the piece's vertical extent
    pub rest_height: f32,
    /// Lateral drift direction on the xz plane
    pub drift: Vec2,
    /// True while the piece moved this frame (recomputed by the animator)
    pub active: bool,
}

/// One building in the grid
#[derive(Debug, Clone)]
pub struct Tower {
    pub coord: GridCoord,
    /// World-space xz center
    pub center: Vec2,
    /// Footprint side length
    pub footprint: f32,
    pub height: f32,
    /// RGB, channel-quantized for a cohesive palette
    pub color: [f32; 3],
    pub state: TowerState,
    /// Demolition delay drawn at generation time (milliseconds)
    pub collapse_delay_ms: u64,
    /// Fragments; empty until the tower collapses, never removed after
    pub pieces: Vec<TowerPiece>,
    /// Widest xz Manhattan distance of any piece from the tower center;
    /// 0 while solid, updated as pieces drift
    pub debris_reach: f32,
    /// Skip-cache: true once no piece moved in a frame
    pub settled: bool,
}

impl Tower {
    pub fn new(
        coord: GridCoord,
        center: Vec2,
        footprint: f32,
        height: f32,
        color: [f32; 3],
        collapse_delay_ms: u64,
    ) -> Self {
        Self {
            coord,
            center,
            footprint,
            height,
            color,
            state: TowerState::Intact,
            collapse_delay_ms,
            pieces: Vec::new(),
            debris_reach: 0.0,
            settled: false,
        }
    }

    /// True while the tower is a solid box the vehicle can hit as a whole
    #[inline]
    pub fn is_solid(&self) -> bool {
        matches!(self.state, TowerState::Intact | TowerState::Scheduled)
    }
}

/// Arena of towers for one session
pub struct TowerGrid {
    pub diameter: u32,
    pub building_size: f32,
    pub road_size: f32,
    towers: BTreeMap<GridCoord, Tower>,
}

impl TowerGrid {
    /// Generate the full lattice with randomized heights, colors and
    /// demolition delays. The center cell is left vacant as the vehicle
    /// spawn cell, so a D x D layout carries D x D - 1 towers. One-shot:
    /// the set of towers never changes after this, only their lifecycle
    /// state does.
    pub fn generate(config: &Config, rng: &mut Pcg32) -> Self {
        debug_assert!(
            config.grid_diameter % 2 == 1,
            "grid diameter must be odd so a center spawn cell exists"
        );
        let half = (config.grid_diameter as i32 - 1) / 2;
        let spacing = config.cell_spacing();

        let mut towers = BTreeMap::new();
        for gx in -half..=half {
            for gz in -half..=half {
                // The center cell stays vacant: the vehicle spawns there.
                if gx == 0 && gz == 0 {
                    continue;
                }
                let coord = GridCoord { x: gx, z: gz };
                let height = rng.random_range(TOWER_MIN_HEIGHT..TOWER_MAX_HEIGHT);
                let color = quantized_color(rng);
                let delay = rng.random_range(config.collapse_delay_ms.clone());
                let center = Vec2::new(gx as f32 * spacing, gz as f32 * spacing);
                towers.insert(
                    coord,
                    Tower::new(coord, center, config.building_size, height, color, delay),
                );
            }
        }
        log::info!(
            "generated {} towers on a {}x{} grid",
            towers.len(),
            config.grid_diameter,
            config.grid_diameter
        );

        Self {
            diameter: config.grid_diameter,
            building_size: config.building_size,
            road_size: config.road_size,
            towers,
        }
    }

    /// Empty grid shell for custom layouts
    pub fn with_layout(diameter: u32, building_size: f32, road_size: f32) -> Self {
        Self {
            diameter,
            building_size,
            road_size,
            towers: BTreeMap::new(),
        }
    }

    /// Add a tower to a custom layout (keys are unique; replaces on clash)
    pub fn insert(&mut self, tower: Tower) {
        self.towers.insert(tower.coord, tower);
    }

    pub fn len(&self) -> usize {
        self.towers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }

    pub fn tower(&self, coord: GridCoord) -> Option<&Tower> {
        self.towers.get(&coord)
    }

    /// Towers in deterministic (coordinate) order
    pub fn towers(&self) -> impl Iterator<Item = &Tower> {
        self.towers.values()
    }

    /// Half the total world extent on each axis; crossing it means escape
    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.diameter as f32 * (self.building_size + self.road_size) / 2.0
    }

    /// Record that a demolition timer was registered for this tower.
    /// A tower is scheduled at most once; later calls are no-ops.
    pub fn mark_scheduled(&mut self, coord: GridCoord) {
        if let Some(tower) = self.towers.get_mut(&coord)
            && tower.state == TowerState::Intact
        {
            tower.state = TowerState::Scheduled;
        }
    }

    /// Demolish one tower: replace the solid body with a burst of pieces.
    /// Irreversible, and a no-op if the tower already collapsed.
    pub fn collapse(&mut self, coord: GridCoord, rng: &mut Pcg32) {
        let Some(tower) = self.towers.get_mut(&coord) else {
            return;
        };
        if tower.state == TowerState::Collapsing {
            return;
        }
        tower.state = TowerState::Collapsing;
        tower.settled = false;

        // One piece per two units of height, scattered over 1.5x the
        // footprint so the rubble spreads wider than the original base.
        let count = (tower.height / PIECE_HEIGHT) as usize;
        let spread = tower.footprint * PIECE_SCATTER / 2.0;
        tower.pieces = (0..count)
            .map(|i| {
                let x = tower.center.x + rng.random_range(-spread..spread);
                let z = tower.center.y + rng.random_range(-spread..spread);
                let y = i as f32 * PIECE_HEIGHT + PIECE_HEIGHT / 2.0;
                let drift = Vec2::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                )
                .normalize_or_zero();
                TowerPiece {
                    position: Vec3::new(x, y, z),
                    rest_height: PIECE_HEIGHT / 2.0,
                    drift,
                    active: true,
                }
            })
            .collect();
        tower.debris_reach = piece_reach(tower);
        log::debug!("tower ({}, {}) collapsing into {count} pieces", coord.x, coord.z);
    }

    /// Advance every falling piece by one render frame. Settled towers are
    /// skipped entirely; a piece at rest never moves again.
    pub fn animate(&mut self, dt: f32) {
        for tower in self.towers.values_mut() {
            if tower.state != TowerState::Collapsing || tower.settled {
                continue;
            }
            let mut moved = false;
            for piece in &mut tower.pieces {
                if piece.position.y <= piece.rest_height {
                    piece.active = false;
                    continue;
                }
                piece.position.y -= FALL_SPEED * dt / (piece.position.y / 10.0).max(1.0);
                piece.position.x += DRIFT_SPEED * dt * piece.drift.x;
                piece.position.z += DRIFT_SPEED * dt * piece.drift.y;
                if piece.position.y <= piece.rest_height {
                    // Clamp exactly to rest, never below
                    piece.position.y = piece.rest_height;
                    piece.active = false;
                } else {
                    piece.active = true;
                }
                moved = true;
            }
            // Drift keeps widening the footprint the collision broad
            // phase has to cover, so the reach is refreshed while any
            // piece still moves.
            tower.debris_reach = piece_reach(tower);
            tower.settled = !moved;
        }
    }
}

/// Widest xz Manhattan distance from the tower center to any of its pieces
fn piece_reach(tower: &Tower) -> f32 {
    tower
        .pieces
        .iter()
        .map(|p| (p.position.x - tower.center.x).abs() + (p.position.z - tower.center.y).abs())
        .fold(0.0, f32::max)
}

/// Draw a palette color: each channel quantized to 5 discrete steps within
/// a fixed range, so the skyline stays cohesive.
fn quantized_color(rng: &mut Pcg32) -> [f32; 3] {
    let mut channel = |lo: f32, hi: f32| {
        let q = rng.random_range(0..5) as f32 / 4.0;
        lo + q * (hi - lo)
    };
    [
        channel(0.35, 0.55),
        channel(0.35, 0.55),
        channel(0.45, 0.70),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn test_rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn generates_full_lattice_minus_spawn_cell() {
        let config = Config::default();
        let grid = TowerGrid::generate(&config, &mut test_rng());

        let d = config.grid_diameter as usize;
        assert_eq!(grid.len(), d * d - 1);
        assert!(grid.tower(GridCoord { x: 0, z: 0 }).is_none());

        let half = (config.grid_diameter as i32 - 1) / 2;
        let spacing = config.cell_spacing();
        for tower in grid.towers() {
            assert!(tower.coord.x.abs() <= half && tower.coord.z.abs() <= half);
            assert_eq!(tower.center.x, tower.coord.x as f32 * spacing);
            assert_eq!(tower.center.y, tower.coord.z as f32 * spacing);
            assert!(tower.height >= TOWER_MIN_HEIGHT && tower.height < TOWER_MAX_HEIGHT);
            assert!(tower.collapse_delay_ms >= config.collapse_delay_ms.start);
            assert!(tower.collapse_delay_ms < config.collapse_delay_ms.end);
            assert_eq!(tower.state, TowerState::Intact);
            assert!(tower.pieces.is_empty());
        }
    }

    #[test]
    fn half_extent_matches_layout() {
        // 25 * (20 + 10) / 2 = 375
        let grid = TowerGrid::with_layout(25, 20.0, 10.0);
        assert_eq!(grid.half_extent(), 375.0);
    }

    #[test]
    fn same_seed_generates_same_grid() {
        let config = Config::default();
        let a = TowerGrid::generate(&config, &mut test_rng());
        let b = TowerGrid::generate(&config, &mut test_rng());
        for (ta, tb) in a.towers().zip(b.towers()) {
            assert_eq!(ta.coord, tb.coord);
            assert_eq!(ta.height, tb.height);
            assert_eq!(ta.color, tb.color);
            assert_eq!(ta.collapse_delay_ms, tb.collapse_delay_ms);
        }
    }

    #[test]
    fn collapse_bursts_pieces_within_scatter() {
        let mut rng = test_rng();
        let mut grid = TowerGrid::with_layout(25, 20.0, 10.0);
        let coord = GridCoord { x: 1, z: 0 };
        grid.insert(Tower::new(
            coord,
            Vec2::new(30.0, 0.0),
            20.0,
            31.0,
            [0.5; 3],
            1000,
        ));

        grid.collapse(coord, &mut rng);
        let tower = grid.tower(coord).unwrap();
        assert_eq!(tower.state, TowerState::Collapsing);
        // height / 2 truncated
        assert_eq!(tower.pieces.len(), 15);

        let spread = 20.0 * PIECE_SCATTER / 2.0;
        for (i, piece) in tower.pieces.iter().enumerate() {
            assert!((piece.position.x - 30.0).abs() <= spread);
            assert!(piece.position.z.abs() <= spread);
            assert_eq!(piece.position.y, i as f32 * PIECE_HEIGHT + PIECE_HEIGHT / 2.0);
            assert!(piece.drift.length() <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn collapse_is_one_shot() {
        let mut rng = test_rng();
        let mut grid = TowerGrid::with_layout(3, 20.0, 10.0);
        let coord = GridCoord { x: 0, z: 1 };
        grid.insert(Tower::new(coord, Vec2::new(0.0, 30.0), 20.0, 20.0, [0.5; 3], 0));

        grid.collapse(coord, &mut rng);
        let first: Vec<Vec3> = grid.tower(coord).unwrap().pieces.iter().map(|p| p.position).collect();

        // Re-firing must not regenerate the burst
        grid.collapse(coord, &mut rng);
        let second: Vec<Vec3> = grid.tower(coord).unwrap().pieces.iter().map(|p| p.position).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn scheduled_is_recorded_at_most_once() {
        let mut grid = TowerGrid::with_layout(3, 20.0, 10.0);
        let coord = GridCoord { x: 1, z: 1 };
        grid.insert(Tower::new(coord, Vec2::new(30.0, 30.0), 20.0, 20.0, [0.5; 3], 0));

        grid.mark_scheduled(coord);
        assert_eq!(grid.tower(coord).unwrap().state, TowerState::Scheduled);

        grid.collapse(coord, &mut test_rng());
        // A late mark must not resurrect the solid body
        grid.mark_scheduled(coord);
        assert_eq!(grid.tower(coord).unwrap().state, TowerState::Collapsing);
    }

    #[test]
    fn pieces_fall_monotonically_and_clamp_at_rest() {
        let mut rng = test_rng();
        let mut grid = TowerGrid::with_layout(3, 20.0, 10.0);
        let coord = GridCoord { x: 1, z: 0 };
        grid.insert(Tower::new(coord, Vec2::new(30.0, 0.0), 20.0, 30.0, [0.5; 3], 0));
        grid.collapse(coord, &mut rng);

        let mut heights: Vec<f32> = grid
            .tower(coord)
            .unwrap()
            .pieces
            .iter()
            .map(|p| p.position.y)
            .collect();

        for _ in 0..10_000 {
            grid.animate(1.0 / 60.0);
            let tower = grid.tower(coord).unwrap();
            for (piece, last) in tower.pieces.iter().zip(&heights) {
                assert!(piece.position.y <= *last);
                assert!(piece.position.y >= piece.rest_height);
            }
            heights = tower.pieces.iter().map(|p| p.position.y).collect();
            if tower.settled {
                break;
            }
        }

        let tower = grid.tower(coord).unwrap();
        assert!(tower.settled, "tower should settle");
        for piece in &tower.pieces {
            assert_eq!(piece.position.y, piece.rest_height);
            assert!(!piece.active);
        }
    }

    #[test]
    fn debris_reach_follows_drifting_pieces() {
        let mut rng = test_rng();
        let mut grid = TowerGrid::with_layout(3, 20.0, 10.0);
        let coord = GridCoord { x: 1, z: 0 };
        let center = Vec2::new(30.0, 0.0);
        grid.insert(Tower::new(coord, center, 20.0, 30.0, [0.5; 3], 0));
        assert_eq!(grid.tower(coord).unwrap().debris_reach, 0.0);

        grid.collapse(coord, &mut rng);
        // The burst reach covers the scatter at most
        let spread = 20.0 * PIECE_SCATTER / 2.0;
        let burst_reach = grid.tower(coord).unwrap().debris_reach;
        assert!(burst_reach > 0.0 && burst_reach <= 2.0 * spread);

        while !grid.tower(coord).unwrap().settled {
            grid.animate(1.0 / 60.0);
        }

        // After settling, the reach is exactly the farthest piece, and the
        // drift has carried it outside the burst scatter.
        let tower = grid.tower(coord).unwrap();
        let farthest = tower
            .pieces
            .iter()
            .map(|p| (p.position.x - center.x).abs() + (p.position.z - center.y).abs())
            .fold(0.0, f32::max);
        assert_eq!(tower.debris_reach, farthest);
        assert!(tower.debris_reach > burst_reach);
    }

    #[test]
    fn settled_towers_are_skipped() {
        let mut rng = test_rng();
        let mut grid = TowerGrid::with_layout(3, 20.0, 10.0);
        let coord = GridCoord { x: 0, z: 1 };
        grid.insert(Tower::new(coord, Vec2::new(0.0, 30.0), 20.0, 10.0, [0.5; 3], 0));
        grid.collapse(coord, &mut rng);

        while !grid.tower(coord).unwrap().settled {
            grid.animate(0.1);
        }
        let frozen: Vec<Vec3> = grid.tower(coord).unwrap().pieces.iter().map(|p| p.position).collect();

        grid.animate(10.0);
        let after: Vec<Vec3> = grid.tower(coord).unwrap().pieces.iter().map(|p| p.position).collect();
        assert_eq!(frozen, after);
    }
}

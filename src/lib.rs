//! Gridfall - core simulation for an arcade escape-the-city driving game
//!
//! The player steers a vehicle through a procedurally generated grid of
//! towers, trying to cross the grid boundary before a countdown expires.
//! Each tower collapses into falling debris on its own randomized timer;
//! touching a tower body or a fallen piece ends the run.
//!
//! Core modules:
//! - `sim`: deterministic simulation (vehicle, chase camera, tower grid,
//!   demolitions, collision detection, session state machine)
//!
//! Rendering, asset loading and UI are host collaborators: the host render
//! loop feeds key state and frame deltas into the [`sim::Session`] and reads
//! back vehicle/camera transforms, tower piece positions and the countdown.

pub mod sim;

pub use sim::{Config, Control, Session, SessionEvent, SessionState};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in seconds (1 kHz physics)
    pub const FIXED_STEP: f32 = 0.001;
    /// Throttle ramp length: 3 seconds of held throttle to reach top speed
    pub const MAX_SPEED_STEPS: i32 = 3000;
    /// Forward translation per fixed step at full throttle (length units)
    pub const MAX_SPEED: f32 = 0.02;
    /// Steering ramp length: 0.4 seconds to full lock
    pub const MAX_STEERING_STEPS: i32 = 400;
    /// Yaw per fixed step at full lock (radians)
    pub const MAX_STEERING_ANGLE: f32 = 0.0012;
    /// Throttle decay toward zero per step with no pedal held
    pub const SPEED_DECAY: f32 = 0.3;
    /// Keel-over rate after a collision (radians per fixed step)
    pub const TIP_OVER_RATE: f32 = 0.002;

    /// Chase camera smoothing coefficient per fixed step
    pub const CAMERA_COEF: f32 = 0.99;
    /// Camera height above the vehicle
    pub const CAMERA_HEIGHT: f32 = 2.0;
    /// Camera distance behind the vehicle at standstill
    pub const CAMERA_BACK: f32 = 5.0;
    /// Look-ahead yaw at standstill (radians, shrinks with speed)
    pub const CAMERA_YAW_OFFSET: f32 = 0.25;

    /// World layout defaults
    pub const GRID_DIAMETER: u32 = 25;
    pub const BUILDING_SIZE: f32 = 20.0;
    pub const ROAD_SIZE: f32 = 10.0;
    /// Tower heights are drawn uniformly from [MIN, MAX)
    pub const TOWER_MIN_HEIGHT: f32 = 5.0;
    pub const TOWER_MAX_HEIGHT: f32 = 35.0;

    /// Per-tower demolition trigger window (milliseconds)
    pub const COLLAPSE_DELAY_MIN_MS: u64 = 5_000;
    pub const COLLAPSE_DELAY_MAX_MS: u64 = 45_000;
    /// Vertical extent of one tower piece (pieces rest at half this)
    pub const PIECE_HEIGHT: f32 = 2.0;
    /// Base fall rate for collapsing pieces (units per second)
    pub const FALL_SPEED: f32 = 15.0;
    /// Lateral drift rate for collapsing pieces (units per second)
    pub const DRIFT_SPEED: f32 = 15.0;
    /// Pieces scatter over this multiple of the tower footprint
    pub const PIECE_SCATTER: f32 = 1.5;

    /// Collision detector cadence (wall-clock milliseconds)
    pub const COLLISION_INTERVAL_MS: u64 = 100;
    /// Manhattan hit radius against fallen pieces
    pub const COLLISION_RADIUS: f32 = 7.0;
    /// Vehicle body width used in the tower overlap test
    pub const VEHICLE_WIDTH: f32 = 2.0;

    /// Session time limit (whole seconds)
    pub const COUNTDOWN_SECONDS: u32 = 30;
    /// Countdown cadence (wall-clock milliseconds)
    pub const COUNTDOWN_INTERVAL_MS: u64 = 1_000;
    /// Delay before returning to the title screen after a plain death
    pub const DEAD_RETURN_MS: u64 = 2_000;
    /// Delay before returning to the title screen after escape or timeout
    pub const ESCAPED_RETURN_MS: u64 = 5_000;
}

/// Manhattan distance between two points, summed over all three axes
#[inline]
pub fn manhattan(a: Vec3, b: Vec3) -> f32 {
    (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs()
}

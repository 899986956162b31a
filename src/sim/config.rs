//! Session configuration
//!
//! Every tunable recognized by the core, defaulted from `crate::consts`.
//! A `Config` is handed to `Session::new` and never mutated afterwards.

use std::ops::Range;

use crate::consts::*;

/// Simulation configuration for one or more sessions
#[derive(Debug, Clone)]
pub struct Config {
    /// Physics/camera integration granularity (seconds)
    pub fixed_step: f32,
    /// Throttle steps to top speed (also the spin-up step count)
    pub max_speed_steps: i32,
    /// Forward translation per fixed step at full throttle
    pub max_speed: f32,
    /// Steering steps to full lock
    pub max_steering_steps: i32,
    /// Yaw per fixed step at full lock (radians)
    pub max_steering_angle: f32,
    /// Keel-over rate after a collision (radians per fixed step)
    pub tip_over_rate: f32,

    /// Camera low-pass coefficient per fixed step
    pub camera_coef: f32,
    /// Camera height above the vehicle
    pub camera_height: f32,
    /// Camera distance behind the vehicle at standstill
    pub camera_back: f32,
    /// Camera look-ahead yaw at standstill (radians)
    pub camera_yaw_offset: f32,

    /// Towers per grid side; must be odd so a center spawn cell exists
    pub grid_diameter: u32,
    /// Tower footprint side length
    pub building_size: f32,
    /// Road width between adjacent towers
    pub road_size: f32,
    /// Randomized per-tower demolition trigger window (milliseconds)
    pub collapse_delay_ms: Range<u64>,

    /// Collision detector cadence (milliseconds)
    pub collision_interval_ms: u64,
    /// Manhattan hit radius against fallen pieces
    pub collision_radius: f32,
    /// Vehicle body width for the tower overlap test
    pub vehicle_width: f32,

    /// Session time limit (whole seconds)
    pub countdown_seconds: u32,
    /// Countdown cadence (milliseconds)
    pub countdown_interval_ms: u64,

    /// Layout/demolition seed; `None` reseeds from entropy each session
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fixed_step: FIXED_STEP,
            max_speed_steps: MAX_SPEED_STEPS,
            max_speed: MAX_SPEED,
            max_steering_steps: MAX_STEERING_STEPS,
            max_steering_angle: MAX_STEERING_ANGLE,
            tip_over_rate: TIP_OVER_RATE,
            camera_coef: CAMERA_COEF,
            camera_height: CAMERA_HEIGHT,
            camera_back: CAMERA_BACK,
            camera_yaw_offset: CAMERA_YAW_OFFSET,
            grid_diameter: GRID_DIAMETER,
            building_size: BUILDING_SIZE,
            road_size: ROAD_SIZE,
            collapse_delay_ms: COLLAPSE_DELAY_MIN_MS..COLLAPSE_DELAY_MAX_MS,
            collision_interval_ms: COLLISION_INTERVAL_MS,
            collision_radius: COLLISION_RADIUS,
            vehicle_width: VEHICLE_WIDTH,
            countdown_seconds: COUNTDOWN_SECONDS,
            countdown_interval_ms: COUNTDOWN_INTERVAL_MS,
            seed: None,
        }
    }
}

impl Config {
    /// Center-to-center spacing of adjacent grid cells
    #[inline]
    pub fn cell_spacing(&self) -> f32 {
        self.building_size + self.road_size
    }
}

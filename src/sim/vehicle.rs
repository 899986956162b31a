//! Vehicle state and fixed-step driving controller
//!
//! The vehicle integrates on a fixed 1 ms step, accumulated from whatever
//! deltas the render loop delivers. Throttle and steering are step counters
//! rather than continuous values: holding a pedal walks the counter toward
//! its bound one step per physics tick, which gives the arcade spin-up feel
//! and makes the bounds trivially testable.

use glam::{Quat, Vec3};

use super::config::Config;
use super::input::{Control, InputState};

/// The player vehicle
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub position: Vec3,
    pub orientation: Quat,
    /// Throttle counter in [-max_speed_steps/10, max_speed_steps]
    pub speed_steps: f32,
    /// Steering counter in [-max_steering_steps, max_steering_steps]
    pub steering_steps: f32,
    /// Fractional frame time not yet consumed by fixed steps (seconds)
    pub leftover_time: f32,
    /// One-way latch set by the collision detector; freezes locomotion
    pub colliding: bool,
}

impl Vehicle {
    /// Spawn at the origin facing -Z
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            speed_steps: 0.0,
            steering_steps: 0.0,
            leftover_time: 0.0,
            colliding: false,
        }
    }

    /// Local forward axis in world space
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Current throttle as a fraction of top speed
    #[inline]
    pub fn speed_ratio(&self, config: &Config) -> f32 {
        self.speed_steps / config.max_speed_steps as f32
    }

    /// Latch the collision flag (idempotent)
    pub fn mark_colliding(&mut self) {
        self.colliding = true;
    }

    /// Absorb a render delta and return how many whole fixed steps are owed.
    ///
    /// Deliberately unbounded: a long render stall simply owes many physics
    /// steps, all of which run before the next frame is considered. Capping
    /// here would change observable physics.
    pub fn accumulate(&mut self, dt: f32, fixed_step: f32) -> u32 {
        self.leftover_time += dt;
        let steps = (self.leftover_time / fixed_step).floor() as u32;
        self.leftover_time -= steps as f32 * fixed_step;
        steps
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance the vehicle by exactly one fixed step
pub fn step_vehicle(vehicle: &mut Vehicle, input: &InputState, config: &Config) {
    // A collided vehicle no longer drives; it only keels over sideways.
    if vehicle.colliding {
        vehicle.orientation = vehicle.orientation * Quat::from_rotation_x(config.tip_over_rate);
        return;
    }

    let max = config.max_speed_steps as f32;
    // Reverse tops out at a tenth of forward speed
    let reverse_floor = -max / 10.0;

    // Drag applies only with no pedal held: a pedal held at its bound
    // holds the counter there instead of falling through to the decay.
    if input.is_pressed(Control::Accelerate) {
        if vehicle.speed_steps < max {
            vehicle.speed_steps += 1.0;
        }
    } else if input.is_pressed(Control::Brake) {
        if vehicle.speed_steps > reverse_floor {
            // Braking bites three times harder than the throttle builds
            vehicle.speed_steps -= 3.0;
        }
    } else if vehicle.speed_steps > 0.0 {
        vehicle.speed_steps = (vehicle.speed_steps - crate::consts::SPEED_DECAY).max(0.0);
    } else if vehicle.speed_steps < 0.0 {
        vehicle.speed_steps = (vehicle.speed_steps + crate::consts::SPEED_DECAY).min(0.0);
    }
    vehicle.speed_steps = vehicle.speed_steps.clamp(reverse_floor, max);

    // Local -Z is forward, so the per-step translation along +Z is negated
    let travel = -(vehicle.speed_steps / max) * config.max_speed;
    vehicle.position += vehicle.orientation * Vec3::Z * travel;

    let max_steer = config.max_steering_steps as f32;
    if input.is_pressed(Control::SteerLeft) {
        if vehicle.steering_steps < max_steer {
            vehicle.steering_steps += 1.0;
        }
    } else if input.is_pressed(Control::SteerRight) {
        if vehicle.steering_steps > -max_steer {
            vehicle.steering_steps -= 1.0;
        }
    } else if vehicle.steering_steps > 0.0 {
        vehicle.steering_steps -= 1.0;
    } else if vehicle.steering_steps < 0.0 {
        vehicle.steering_steps += 1.0;
    }

    // Steering authority scales with speed and vanishes near standstill,
    // so the vehicle cannot pivot in place.
    let authority = (vehicle.speed_steps / (max / 10.0)).min(1.0);
    let yaw = (vehicle.steering_steps / max_steer) * config.max_steering_angle * authority;
    vehicle.orientation = vehicle.orientation * Quat::from_rotation_y(yaw);
}

//! Smoothed chase camera
//!
//! The camera steps at the same fixed cadence as the vehicle, inside the
//! same accumulator loop. Its position is a discrete low-pass filter over a
//! speed-dependent desired point behind the vehicle; running the filter at
//! fixed-step (not render-step) cadence keeps the smoothing stable when the
//! frame rate varies.

use glam::{Quat, Vec3};

use super::config::Config;
use super::vehicle::Vehicle;

/// Chase camera transform
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Camera {
    /// Start exactly at the standstill chase offset so the first frames do
    /// not swoop in from the origin.
    pub fn behind(vehicle: &Vehicle, config: &Config) -> Self {
        let offset = Vec3::new(0.0, config.camera_height, config.camera_back);
        Self {
            position: vehicle.position + vehicle.orientation * offset,
            orientation: vehicle.orientation * Quat::from_rotation_y(config.camera_yaw_offset),
        }
    }
}

/// Advance the camera by one fixed step
pub fn step_camera(camera: &mut Camera, vehicle: &Vehicle, config: &Config) {
    let ratio = vehicle.speed_ratio(config).clamp(0.0, 1.0);

    // The "behind" component shrinks with speed: the camera pulls in tight
    // at full throttle and sits back at a standstill.
    let offset = Vec3::new(
        0.0,
        config.camera_height,
        config.camera_back * (1.0 - ratio),
    );
    let desired = vehicle.position + vehicle.orientation * offset;

    let coef = config.camera_coef;
    camera.position = camera.position * coef + desired * (1.0 - coef);

    // Wider look-ahead angle at low speed, centered view at high speed
    let yaw = config.camera_yaw_offset * (1.0 - ratio);
    camera.orientation = vehicle.orientation * Quat::from_rotation_y(yaw);
}

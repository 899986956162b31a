//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep physics, decoupled from render frame rate
//! - Seeded RNG only (layout is reseeded per session)
//! - A single explicit scheduler for every wall-clock timer, so teardown can
//!   cancel stale callbacks
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod config;
pub mod grid;
pub mod input;
pub mod scheduler;
pub mod session;
pub mod timer;
pub mod vehicle;

pub use camera::{Camera, step_camera};
pub use collision::{CollisionDetector, CollisionSignal};
pub use config::Config;
pub use grid::{GridCoord, Tower, TowerGrid, TowerPiece, TowerState};
pub use input::{Control, InputState};
pub use scheduler::{Scheduler, TaskId, TaskKind};
pub use session::{Session, SessionEvent, SessionState};
pub use timer::Countdown;
pub use vehicle::{Vehicle, step_vehicle};

//! Session state machine
//!
//! One session is a Title -> Playing -> outcome -> Title cycle. The session
//! owns everything with a gameplay lifetime: the input resource, the vehicle
//! and camera, the tower grid, the countdown, the collision detector and the
//! timer scheduler. The host drives it with exactly two calls: `start()` on
//! the player's start command and `frame(dt)` once per render frame.
//!
//! Per frame, physics and camera integrate first, then demolitions animate,
//! then due timer tasks fire - so collision and demolition ticks always read
//! fully-integrated state. Leaving Playing cancels the collision and
//! countdown tasks but deliberately not the per-tower collapse timers:
//! demolitions are scoped to the grid, which lives until the return to
//! Title tears the whole world down.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts;

use super::camera::{Camera, step_camera};
use super::collision::{CollisionDetector, CollisionSignal};
use super::config::Config;
use super::grid::TowerGrid;
use super::input::InputState;
use super::scheduler::{Scheduler, TaskId, TaskKind};
use super::timer::Countdown;
use super::vehicle::{Vehicle, step_vehicle};

/// Where the session is in its Title-to-Title cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for a start command
    Title,
    /// Gameplay active
    Playing,
    /// Crossed the boundary in time
    Escaped,
    /// Hit a tower or debris
    Dead,
    /// Countdown expired
    TimedOut,
}

/// Signals for the host UI, each fired at most once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Escaped,
    Dead,
    TimerElapsed,
    ReturnedToTitle,
}

/// Everything that exists only while a session is live
struct World {
    input: InputState,
    vehicle: Vehicle,
    camera: Camera,
    grid: TowerGrid,
    countdown: Countdown,
    detector: CollisionDetector,
    rng: Pcg32,
}

impl World {
    /// Drain the fixed-step accumulator: vehicle then camera, every step
    fn integrate(&mut self, dt: f32, config: &Config) {
        let steps = self.vehicle.accumulate(dt, config.fixed_step);
        for _ in 0..steps {
            step_vehicle(&mut self.vehicle, &self.input, config);
            step_camera(&mut self.camera, &self.vehicle, config);
        }
    }
}

/// The game session and its scheduler
pub struct Session {
    config: Config,
    state: SessionState,
    scheduler: Scheduler,
    events: Vec<SessionEvent>,
    world: Option<World>,
    collision_task: Option<TaskId>,
    countdown_task: Option<TaskId>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: SessionState::Title,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            world: None,
            collision_task: None,
            countdown_task: None,
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Take every event signalled since the last drain, in firing order
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Live control state, if a session is running
    pub fn input_mut(&mut self) -> Option<&mut InputState> {
        self.world.as_mut().map(|w| &mut w.input)
    }

    pub fn vehicle(&self) -> Option<&Vehicle> {
        self.world.as_ref().map(|w| &w.vehicle)
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.world.as_ref().map(|w| &w.camera)
    }

    pub fn grid(&self) -> Option<&TowerGrid> {
        self.world.as_ref().map(|w| &w.grid)
    }

    /// Seconds left on the countdown
    pub fn countdown(&self) -> Option<u32> {
        self.world.as_ref().map(|w| w.countdown.remaining())
    }

    /// True once a terminal outcome froze the clock
    pub fn frozen(&self) -> bool {
        self.world
            .as_ref()
            .is_some_and(|w| w.countdown.is_frozen())
    }

    /// Start command: Title -> Playing. Builds the world, registers the
    /// collision and countdown cadences and one collapse timer per tower.
    /// Ignored outside Title.
    pub fn start(&mut self) {
        if self.state != SessionState::Title {
            return;
        }

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut grid = TowerGrid::generate(&self.config, &mut rng);
        let schedule: Vec<_> = grid
            .towers()
            .map(|t| (t.coord, t.collapse_delay_ms))
            .collect();
        for (coord, delay_ms) in schedule {
            self.scheduler.schedule_once(delay_ms, TaskKind::Collapse(coord));
            grid.mark_scheduled(coord);
        }

        self.collision_task = Some(
            self.scheduler
                .schedule_repeating(self.config.collision_interval_ms, TaskKind::CollisionTick),
        );
        self.countdown_task = Some(
            self.scheduler
                .schedule_repeating(self.config.countdown_interval_ms, TaskKind::CountdownTick),
        );

        let vehicle = Vehicle::new();
        let camera = Camera::behind(&vehicle, &self.config);
        self.world = Some(World {
            input: InputState::new(),
            vehicle,
            camera,
            grid,
            countdown: Countdown::new(self.config.countdown_seconds),
            detector: CollisionDetector::new(),
            rng,
        });
        self.state = SessionState::Playing;
        log::info!("session started (seed {seed})");
    }

    /// Render-frame driver: integrate physics and camera, animate falling
    /// pieces, then fire due timers. `dt` is the elapsed frame time in
    /// seconds.
    pub fn frame(&mut self, dt: f32) {
        if let Some(world) = self.world.as_mut() {
            // Locomotion runs while Playing; after a collision the vehicle
            // still steps so the keel-over plays out. Escaped and timed-out
            // vehicles hold still.
            if self.state == SessionState::Playing || world.vehicle.colliding {
                world.integrate(dt, &self.config);
            }
            // Demolitions run to completion regardless of session state
            world.grid.animate(dt);
        }

        for task in self.scheduler.advance(f64::from(dt) * 1000.0) {
            self.handle_task(task);
        }
    }

    fn handle_task(&mut self, task: TaskKind) {
        match task {
            TaskKind::Collapse(coord) => {
                // Guarded: a task drained in the same batch as the return
                // to Title finds no world and does nothing.
                if let Some(world) = self.world.as_mut() {
                    world.grid.collapse(coord, &mut world.rng);
                }
            }
            TaskKind::CollisionTick => {
                let signal = match self.world.as_mut() {
                    Some(world) if self.state == SessionState::Playing => {
                        world
                            .detector
                            .tick(world.vehicle.position, &world.grid, &self.config)
                    }
                    _ => None,
                };
                match signal {
                    Some(CollisionSignal::Escaped) => self.finish(SessionState::Escaped),
                    Some(CollisionSignal::Dead) => self.finish(SessionState::Dead),
                    None => {}
                }
            }
            TaskKind::CountdownTick => {
                let elapsed = self
                    .world
                    .as_mut()
                    .is_some_and(|world| world.countdown.tick());
                if elapsed {
                    self.finish(SessionState::TimedOut);
                }
            }
            TaskKind::ReturnToTitle => {
                self.scheduler.clear();
                self.world = None;
                self.state = SessionState::Title;
                self.events.push(SessionEvent::ReturnedToTitle);
                log::info!("session returned to title");
            }
        }
    }

    /// Latch a terminal outcome. First signal wins; the countdown freezes,
    /// the detection and countdown cadences stop, and the return to Title
    /// is scheduled. Collapse timers keep running.
    fn finish(&mut self, outcome: SessionState) {
        if self.state != SessionState::Playing {
            return;
        }
        self.state = outcome;

        if let Some(id) = self.collision_task.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.countdown_task.take() {
            self.scheduler.cancel(id);
        }
        if let Some(world) = self.world.as_mut() {
            world.countdown.freeze();
            world.input.clear();
            if outcome == SessionState::Dead {
                world.vehicle.mark_colliding();
            }
        }

        let (event, delay_ms) = match outcome {
            SessionState::Escaped => (SessionEvent::Escaped, consts::ESCAPED_RETURN_MS),
            SessionState::TimedOut => (SessionEvent::TimerElapsed, consts::ESCAPED_RETURN_MS),
            _ => (SessionEvent::Dead, consts::DEAD_RETURN_MS),
        };
        self.events.push(event);
        self.scheduler.schedule_once(delay_ms, TaskKind::ReturnToTitle);
        log::info!("session finished: {outcome:?}");
    }
}

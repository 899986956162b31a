//! Session-owned timer scheduler
//!
//! Every wall-clock timer in the game (collision cadence, countdown cadence,
//! per-tower collapse delays, return-to-title delays) runs through this one
//! queue instead of being registered with the host. The session pumps it from
//! the render callback, and teardown cancels by token - a cancelled or
//! cleared task can never fire against freed state.

use super::grid::GridCoord;

/// Cancellation token for a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId(u64);

/// What a due task asks the session to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Run the escape/collision tests
    CollisionTick,
    /// Decrement the countdown
    CountdownTick,
    /// Demolish one tower
    Collapse(GridCoord),
    /// End the outcome screen and go back to the title
    ReturnToTitle,
}

struct Task {
    id: TaskId,
    fire_at_ms: f64,
    period_ms: Option<f64>,
    kind: TaskKind,
}

/// Millisecond-clock task queue
///
/// Small enough (hundreds of tasks) that a plain vector with a linear scan
/// beats a heap; firing order is by due time, ties by registration order.
pub struct Scheduler {
    now_ms: f64,
    next_id: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 1,
            tasks: Vec::new(),
        }
    }

    /// Current scheduler clock in milliseconds
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Number of tasks still queued
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Schedule a one-shot task `delay_ms` from now
    pub fn schedule_once(&mut self, delay_ms: u64, kind: TaskKind) -> TaskId {
        self.push(delay_ms, None, kind)
    }

    /// Schedule a repeating task, first firing one period from now
    pub fn schedule_repeating(&mut self, period_ms: u64, kind: TaskKind) -> TaskId {
        self.push(period_ms, Some(period_ms as f64), kind)
    }

    fn push(&mut self, delay_ms: u64, period_ms: Option<f64>, kind: TaskKind) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            fire_at_ms: self.now_ms + delay_ms as f64,
            period_ms,
            kind,
        });
        id
    }

    /// Cancel a task; a no-op if it already fired or was cancelled
    pub fn cancel(&mut self, id: TaskId) {
        self.tasks.retain(|t| t.id != id);
    }

    /// Drop every queued task (session teardown)
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Advance the clock and collect every task that came due, in firing
    /// order. A repeating task that is overdue by several periods fires once
    /// per owed period - the countdown does not skip seconds after a stall.
    pub fn advance(&mut self, elapsed_ms: f64) -> Vec<TaskKind> {
        self.now_ms += elapsed_ms;
        let mut fired = Vec::new();
        loop {
            let due = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| t.fire_at_ms <= self.now_ms)
                .min_by(|(_, a), (_, b)| {
                    a.fire_at_ms
                        .partial_cmp(&b.fire_at_ms)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.id.0.cmp(&b.id.0))
                })
                .map(|(i, _)| i);
            let Some(idx) = due else { break };
            fired.push(self.tasks[idx].kind);
            match self.tasks[idx].period_ms {
                Some(period) => self.tasks[idx].fire_at_ms += period,
                None => {
                    self.tasks.remove(idx);
                }
            }
        }
        fired
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

//! Phase state machine.
//!
//! The sequencer owns the countdown for the current phase and the cycle
//! counter. It is driven by explicit timestamps: commands settle the time
//! that passed since the last settlement, and a single heartbeat calls
//! [`PhaseSequencer::advance`] to detect phase boundaries. Elapsed time is
//! accounted in exact milliseconds and overshoot past a boundary carries into
//! the next phase, so the phase timeline never drifts from the time source.

use std::time::Duration;

use crate::engine::error::{EngineError, EngineResult};
use crate::engine::model::{Phase, RunState};

/// Something that happened while settling time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    PhaseEntered { index: usize },
    CycleCompleted { completed_cycles: u64 },
}

#[derive(Debug, Clone)]
pub struct PhaseSequencer {
    run_state: RunState,
    phase_index: usize,
    previous_index: Option<usize>,
    remaining_millis: u64,
    completed_cycles: u64,
    settled_at: Duration,
}

impl Default for PhaseSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseSequencer {
    pub fn new() -> Self {
        Self {
            run_state: RunState::Stopped,
            phase_index: 0,
            previous_index: None,
            remaining_millis: 0,
            completed_cycles: 0,
            settled_at: Duration::ZERO,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn previous_index(&self) -> Option<usize> {
        self.previous_index
    }

    pub fn remaining_millis(&self) -> u64 {
        self.remaining_millis
    }

    /// Remaining time rounded up to whole seconds.
    pub fn countdown_seconds(&self) -> u64 {
        self.remaining_millis.div_ceil(1000)
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    /// Stopped -> Running. Begins phase 0 (or the first phase that takes time).
    pub fn start(&mut self, phases: &[Phase], now: Duration) -> EngineResult<Vec<Transition>> {
        if !phases.iter().any(|p| p.duration_seconds > 0) {
            return Err(EngineError::NoPhasesDefined);
        }
        self.run_state = RunState::Running;
        self.phase_index = 0;
        self.previous_index = None;
        self.completed_cycles = 0;
        self.settled_at = now;

        let mut transitions = Vec::new();
        self.enter_current(phases, &mut transitions);
        Ok(transitions)
    }

    /// Running -> Paused. Time up to `now` is settled first, so a boundary
    /// that passed since the last heartbeat is still honoured.
    pub fn pause(&mut self, phases: &[Phase], now: Duration) -> Vec<Transition> {
        if self.run_state != RunState::Running {
            return Vec::new();
        }
        let transitions = self.advance(phases, now);
        self.run_state = RunState::Paused;
        transitions
    }

    /// Paused -> Running, continuing from the frozen remaining time.
    pub fn resume(&mut self, now: Duration) -> bool {
        if self.run_state != RunState::Paused {
            return false;
        }
        self.run_state = RunState::Running;
        self.settled_at = now;
        true
    }

    /// Any state -> Stopped. Idempotent.
    pub fn stop(&mut self) {
        self.run_state = RunState::Stopped;
        self.phase_index = 0;
        self.previous_index = None;
        self.remaining_millis = 0;
        self.completed_cycles = 0;
    }

    /// Heartbeat: consume the time elapsed since the last settlement and
    /// enter every phase whose boundary was crossed. No-op unless Running.
    pub fn advance(&mut self, phases: &[Phase], now: Duration) -> Vec<Transition> {
        let mut transitions = Vec::new();
        if self.run_state != RunState::Running {
            return transitions;
        }
        if !phases.iter().any(|p| p.duration_seconds > 0) {
            self.stop();
            return transitions;
        }

        let mut elapsed = now.saturating_sub(self.settled_at).as_millis() as u64;
        // Only whole milliseconds are consumed; the fraction stays pending.
        self.settled_at += Duration::from_millis(elapsed);

        while elapsed >= self.remaining_millis {
            elapsed -= self.remaining_millis;
            self.previous_index = Some(self.phase_index);
            self.step(phases.len(), &mut transitions);
            self.enter_current(phases, &mut transitions);
        }
        self.remaining_millis -= elapsed;
        transitions
    }

    fn step(&mut self, len: usize, transitions: &mut Vec<Transition>) {
        self.phase_index += 1;
        if self.phase_index >= len {
            self.phase_index = 0;
            self.completed_cycles += 1;
            transitions.push(Transition::CycleCompleted {
                completed_cycles: self.completed_cycles,
            });
        }
    }

    /// Load the current phase, skipping zero-duration phases instantly.
    /// Callers guarantee at least one phase takes time, so this ends within
    /// one lap.
    fn enter_current(&mut self, phases: &[Phase], transitions: &mut Vec<Transition>) {
        if self.phase_index >= phases.len() {
            self.phase_index = 0;
        }
        while phases[self.phase_index].duration_seconds == 0 {
            self.step(phases.len(), transitions);
        }
        self.remaining_millis = phases[self.phase_index].duration_millis();
        transitions.push(Transition::PhaseEntered {
            index: self.phase_index,
        });
    }
}

//! Engine data model.
//!
//! Phases and exercises are immutable values. [`EngineState`] is the snapshot
//! handed to observers after every command and heartbeat; it owns copies of
//! everything it shows so the UI never borrows engine internals.

use std::fmt;

/// Name of a breathing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseName {
    Inhale,
    Hold,
    Exhale,
}

impl PhaseName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseName::Inhale => "Inhale",
            PhaseName::Hold => "Hold",
            PhaseName::Exhale => "Exhale",
        }
    }

    /// First letter, used in custom exercise descriptions (`I4s-H7s-E8s`).
    pub fn initial(&self) -> char {
        match self {
            PhaseName::Inhale => 'I',
            PhaseName::Hold => 'H',
            PhaseName::Exhale => 'E',
        }
    }
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timed segment of an exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub name: PhaseName,
    pub duration_seconds: u32,
    /// Opaque sound cue id; the engine only forwards it.
    pub cue: Option<String>,
}

impl Phase {
    pub fn new(name: PhaseName, duration_seconds: u32, cue: Option<&str>) -> Self {
        Self {
            name,
            duration_seconds,
            cue: cue.map(str::to_string),
        }
    }

    pub fn duration_millis(&self) -> u64 {
        u64::from(self.duration_seconds) * 1000
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub phases: Vec<Phase>,
}

impl Exercise {
    /// An exercise can run only if at least one phase takes time.
    #[cfg(test)]
    pub fn is_runnable(&self) -> bool {
        self.phases.iter().any(|p| p.duration_seconds > 0)
    }

    /// Length of one full cycle in seconds.
    #[cfg(test)]
    pub fn cycle_seconds(&self) -> u64 {
        self.phases.iter().map(|p| u64::from(p.duration_seconds)).sum()
    }
}

/// User-configurable durations for the custom exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomTimings {
    pub inhale: u32,
    pub hold1: u32,
    pub exhale: u32,
    pub hold2: u32,
}

impl Default for CustomTimings {
    fn default() -> Self {
        Self {
            inhale: 4,
            hold1: 7,
            exhale: 8,
            hold2: 0,
        }
    }
}

impl CustomTimings {
    pub fn new(inhale: u32, hold1: u32, exhale: u32, hold2: u32) -> Self {
        Self {
            inhale,
            hold1,
            exhale,
            hold2,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        [self.inhale, self.hold1, self.exhale, self.hold2]
            .iter()
            .map(|&s| u64::from(s))
            .sum()
    }

    /// Inhale and exhale must be positive; holds may be zero.
    pub fn is_valid(&self) -> bool {
        self.inhale > 0 && self.exhale > 0 && self.total_seconds() > 0
    }

    pub fn merge(&self, patch: CustomTimingsPatch) -> Self {
        Self {
            inhale: patch.inhale.unwrap_or(self.inhale),
            hold1: patch.hold1.unwrap_or(self.hold1),
            exhale: patch.exhale.unwrap_or(self.exhale),
            hold2: patch.hold2.unwrap_or(self.hold2),
        }
    }
}

impl fmt::Display for CustomTimings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "inhale={} hold1={} exhale={} hold2={}",
            self.inhale, self.hold1, self.exhale, self.hold2
        )
    }
}

/// Partial update of [`CustomTimings`]; `None` keeps the stored value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomTimingsPatch {
    pub inhale: Option<u32>,
    pub hold1: Option<u32>,
    pub exhale: Option<u32>,
    pub hold2: Option<u32>,
}

/// Values read from and written to the preference store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub sound_enabled: bool,
    pub custom_timings: CustomTimings,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            custom_timings: CustomTimings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Stopped,
    Running,
    Paused,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Stopped => "stopped",
            RunState::Running => "running",
            RunState::Paused => "paused",
        };
        f.write_str(s)
    }
}

/// Read-only snapshot of the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub run_state: RunState,
    pub selected_exercise: Exercise,
    pub current_phase_index: usize,
    pub current_phase: Option<Phase>,
    /// Phase entered before the current one during this run.
    pub previous_phase: Option<Phase>,
    pub remaining_millis_in_phase: u64,
    /// Remaining time rounded up to whole seconds, as shown to the user.
    pub countdown_seconds: u64,
    pub completed_cycles: u64,
    pub session_elapsed_millis: u64,
    pub sound_enabled: bool,
    /// Draft timings, possibly not yet applied.
    pub custom_timings: CustomTimings,
    pub heartbeat_generation: u64,
}

impl EngineState {
    /// Fraction of the current phase already elapsed, in `0.0..=1.0`.
    pub fn phase_progress(&self) -> f64 {
        match &self.current_phase {
            Some(phase) if phase.duration_seconds > 0 => {
                let total = phase.duration_millis() as f64;
                let remaining = self.remaining_millis_in_phase.min(phase.duration_millis()) as f64;
                1.0 - remaining / total
            }
            _ => 0.0,
        }
    }
}

/// Notifications drained from the engine after each call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Emitted once per phase entry, including the first phase on start.
    PhaseEntered {
        index: usize,
        phase: Phase,
        sound_enabled: bool,
    },
    CycleCompleted { completed_cycles: u64 },
    HeartbeatArmed { generation: u64 },
    HeartbeatCancelled,
    SoundEnabledChanged(bool),
    PreferencesChanged(Preferences),
}

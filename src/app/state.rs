use crate::config::AppConfig;
use crate::engine::{
    Clock, CustomTimings, CustomTimingsPatch, Engine, EngineError, EngineState, Exercise,
    RunState, SystemClock, CUSTOM_EXERCISE_ID,
};
use tracing::warn;

/// Upper bound for a single custom phase in the editor.
pub const MAX_PHASE_SECONDS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    Exercises,
    CustomEditor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingField {
    Inhale,
    Hold1,
    Exhale,
    Hold2,
}

impl TimingField {
    pub const ALL: [TimingField; 4] = [
        TimingField::Inhale,
        TimingField::Hold1,
        TimingField::Exhale,
        TimingField::Hold2,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimingField::Inhale => "Inhale",
            TimingField::Hold1 => "Hold",
            TimingField::Exhale => "Exhale",
            TimingField::Hold2 => "Hold",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimingField::Inhale => TimingField::Hold1,
            TimingField::Hold1 => TimingField::Exhale,
            TimingField::Exhale => TimingField::Hold2,
            TimingField::Hold2 => TimingField::Inhale,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TimingField::Inhale => TimingField::Hold2,
            TimingField::Hold1 => TimingField::Inhale,
            TimingField::Exhale => TimingField::Hold1,
            TimingField::Hold2 => TimingField::Exhale,
        }
    }

    pub fn value(&self, timings: &CustomTimings) -> u32 {
        match self {
            TimingField::Inhale => timings.inhale,
            TimingField::Hold1 => timings.hold1,
            TimingField::Exhale => timings.exhale,
            TimingField::Hold2 => timings.hold2,
        }
    }

    pub fn patch(&self, value: u32) -> CustomTimingsPatch {
        let value = Some(value);
        match self {
            TimingField::Inhale => CustomTimingsPatch {
                inhale: value,
                ..Default::default()
            },
            TimingField::Hold1 => CustomTimingsPatch {
                hold1: value,
                ..Default::default()
            },
            TimingField::Exhale => CustomTimingsPatch {
                exhale: value,
                ..Default::default()
            },
            TimingField::Hold2 => CustomTimingsPatch {
                hold2: value,
                ..Default::default()
            },
        }
    }
}

pub struct AppState<C: Clock = SystemClock> {
    pub engine: Engine<C>,
    pub snapshot: EngineState,
    pub exercises: Vec<Exercise>,
    pub cursor: usize,
    pub focus: FocusPanel,
    pub timing_field: TimingField,
    pub instruction: String,
    pub show_help: bool,
    pub should_quit: bool,
    pub dirty: bool,
}

impl<C: Clock> AppState<C> {
    pub fn new(mut engine: Engine<C>, config: &AppConfig) -> Self {
        let snapshot = match engine.select_exercise(&config.ui.default_exercise) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "configured default exercise not available");
                engine.snapshot()
            }
        };
        let exercises = engine.list_exercises();
        let cursor = exercises
            .iter()
            .position(|e| e.id == snapshot.selected_exercise.id)
            .unwrap_or(0);
        let instruction = instruction_for(&snapshot);
        Self {
            engine,
            snapshot,
            exercises,
            cursor,
            focus: FocusPanel::Exercises,
            timing_field: TimingField::Inhale,
            instruction,
            show_help: config.ui.show_help,
            should_quit: false,
            dirty: true,
        }
    }

    /// Take a new engine snapshot and re-derive everything shown from it.
    pub fn refresh(&mut self, snapshot: EngineState) {
        self.instruction = instruction_for(&snapshot);
        self.snapshot = snapshot;
        self.exercises = self.engine.list_exercises();
        self.dirty = true;
    }

    pub fn show_error(&mut self, err: &EngineError) {
        self.instruction = error_text(err).to_string();
        self.dirty = true;
    }

    pub fn custom_selected(&self) -> bool {
        self.snapshot.selected_exercise.id == CUSTOM_EXERCISE_ID
    }

    pub fn cursor_exercise(&self) -> Option<&Exercise> {
        self.exercises.get(self.cursor)
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.exercises.len() {
            self.cursor += 1;
        }
    }

    /// Draft value of the focused editor field.
    pub fn timing_value(&self) -> u32 {
        self.timing_field.value(&self.snapshot.custom_timings)
    }
}

pub fn instruction_for(state: &EngineState) -> String {
    match state.run_state {
        RunState::Running => state
            .current_phase
            .as_ref()
            .map(|p| p.name.to_string())
            .unwrap_or_default(),
        RunState::Paused => match &state.current_phase {
            Some(phase) => format!("Paused: {} ({}s left)", phase.name, state.countdown_seconds),
            None => "Paused".to_string(),
        },
        RunState::Stopped => {
            let exercise = &state.selected_exercise;
            if exercise.id == CUSTOM_EXERCISE_ID && exercise.phases.is_empty() {
                "Define custom exercise settings.".to_string()
            } else {
                exercise.description.clone()
            }
        }
    }
}

pub fn error_text(err: &EngineError) -> &'static str {
    match err {
        EngineError::NoPhasesDefined => "Custom exercise has no phases. Define them.",
        EngineError::InvalidTimings(_) => {
            "Invalid custom timings. Inhale and exhale must be positive."
        }
        EngineError::ExerciseRunning => "Stop the exercise before applying custom settings.",
        EngineError::UnknownExerciseId(_) => "Unknown exercise.",
    }
}

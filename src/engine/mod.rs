//! Exercise timing engine.
//!
//! [`Engine`] combines the exercise catalog, the phase sequencer and the
//! session clock behind one command API. Commands are synchronous and return
//! a fresh [`EngineState`] snapshot; side effects that collaborators must
//! perform (play a cue, persist preferences, arm or cancel the heartbeat) are
//! queued as [`EngineEvent`]s and collected with [`Engine::drain_events`].
//!
//! The engine is driven by a single heartbeat. Every arm and cancel bumps a
//! generation counter, and [`Engine::heartbeat`] ignores ticks that carry a
//! stale generation, so a tick queued before a pause or stop cannot mutate
//! state afterwards.

pub mod catalog;
pub mod clock;
pub mod error;
pub mod model;
pub mod sequencer;

pub use catalog::{ExerciseCatalog, CUSTOM_EXERCISE_ID, DEFAULT_EXERCISE_ID};
pub use clock::{Clock, SessionClock, SystemClock};
pub use error::{EngineError, EngineResult};
pub use model::{
    CustomTimings, CustomTimingsPatch, EngineEvent, EngineState, Exercise, PhaseName, Preferences,
    RunState,
};

use sequencer::{PhaseSequencer, Transition};
use tracing::{debug, info};

pub struct Engine<C: Clock = SystemClock> {
    clock: C,
    catalog: ExerciseCatalog,
    selected: Exercise,
    sequencer: PhaseSequencer,
    session: SessionClock,
    sound_enabled: bool,
    applied_timings: CustomTimings,
    draft_timings: CustomTimings,
    generation: u64,
    heartbeat_armed: bool,
    events: Vec<EngineEvent>,
}

impl Engine<SystemClock> {
    pub fn new(preferences: Preferences) -> Self {
        Self::with_clock(SystemClock::new(), preferences)
    }
}

impl<C: Clock> Engine<C> {
    pub fn with_clock(clock: C, preferences: Preferences) -> Self {
        let catalog = ExerciseCatalog::new(&preferences.custom_timings);
        let selected = catalog
            .find(DEFAULT_EXERCISE_ID)
            .unwrap_or_else(|| catalog.custom().clone());
        Self {
            clock,
            catalog,
            selected,
            sequencer: PhaseSequencer::new(),
            session: SessionClock::new(),
            sound_enabled: preferences.sound_enabled,
            applied_timings: preferences.custom_timings,
            draft_timings: preferences.custom_timings,
            generation: 0,
            heartbeat_armed: false,
            events: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn list_exercises(&self) -> Vec<Exercise> {
        self.catalog.list_exercises()
    }

    #[cfg(test)]
    pub fn run_state(&self) -> RunState {
        self.sequencer.run_state()
    }

    /// Preferences as they should be persisted: the applied timings, not the
    /// draft.
    pub fn preferences(&self) -> Preferences {
        Preferences {
            sound_enabled: self.sound_enabled,
            custom_timings: self.applied_timings,
        }
    }

    pub fn snapshot(&self) -> EngineState {
        let active = self.sequencer.run_state() != RunState::Stopped;
        let phase_at = |index: usize| self.selected.phases.get(index).cloned();
        EngineState {
            run_state: self.sequencer.run_state(),
            selected_exercise: self.selected.clone(),
            current_phase_index: self.sequencer.phase_index(),
            current_phase: if active {
                phase_at(self.sequencer.phase_index())
            } else {
                None
            },
            previous_phase: if active {
                self.sequencer.previous_index().and_then(phase_at)
            } else {
                None
            },
            remaining_millis_in_phase: self.sequencer.remaining_millis(),
            countdown_seconds: self.sequencer.countdown_seconds(),
            completed_cycles: self.sequencer.completed_cycles(),
            session_elapsed_millis: self.session.elapsed().as_millis() as u64,
            sound_enabled: self.sound_enabled,
            custom_timings: self.draft_timings,
            heartbeat_generation: self.generation,
        }
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Select an exercise by id, stopping whatever is running first.
    pub fn select_exercise(&mut self, id: &str) -> EngineResult<EngineState> {
        let exercise = self
            .catalog
            .find(id)
            .ok_or_else(|| EngineError::UnknownExerciseId(id.to_string()))?;

        if self.sequencer.run_state() != RunState::Stopped {
            self.stop();
        }
        self.sequencer.stop();
        self.session.reset();
        info!(exercise = %exercise.id, "exercise selected");
        self.selected = exercise;
        Ok(self.snapshot())
    }

    /// Start when stopped, pause when running, resume when paused.
    pub fn start_or_toggle(&mut self) -> EngineResult<EngineState> {
        match self.sequencer.run_state() {
            RunState::Stopped => self.start()?,
            RunState::Running => self.pause(),
            RunState::Paused => self.resume(),
        }
        Ok(self.snapshot())
    }

    fn start(&mut self) -> EngineResult<()> {
        let now = self.clock.now();
        let transitions = self.sequencer.start(&self.selected.phases, now)?;
        self.session.start(now);
        info!(exercise = %self.selected.id, "exercise started");
        self.arm_heartbeat();
        self.publish(transitions);
        Ok(())
    }

    fn pause(&mut self) {
        let now = self.clock.now();
        let transitions = self.sequencer.pause(&self.selected.phases, now);
        self.session.pause(now);
        self.publish(transitions);
        self.cancel_heartbeat();
        info!(
            remaining_ms = self.sequencer.remaining_millis(),
            "exercise paused"
        );
    }

    fn resume(&mut self) {
        let now = self.clock.now();
        if self.sequencer.resume(now) {
            let base = self.session.elapsed();
            self.session.resume(now, base);
            self.arm_heartbeat();
            info!(
                remaining_ms = self.sequencer.remaining_millis(),
                "exercise resumed"
            );
        }
    }

    /// Stop and reset phase, cycle and session counters. Idempotent.
    pub fn stop(&mut self) -> EngineState {
        if self.sequencer.run_state() != RunState::Stopped {
            info!(exercise = %self.selected.id, "exercise stopped");
        }
        self.sequencer.stop();
        self.session.reset();
        self.cancel_heartbeat();
        self.snapshot()
    }

    /// Merge fields into the draft timings. The custom exercise is rebuilt
    /// only by [`Engine::apply_custom_settings`].
    pub fn update_custom_timings(&mut self, patch: CustomTimingsPatch) -> EngineState {
        self.draft_timings = self.draft_timings.merge(patch);
        self.snapshot()
    }

    pub fn apply_custom_settings(&mut self) -> EngineResult<EngineState> {
        if self.sequencer.run_state() != RunState::Stopped {
            return Err(EngineError::ExerciseRunning);
        }
        if !self.draft_timings.is_valid() {
            return Err(EngineError::InvalidTimings(self.draft_timings));
        }

        self.applied_timings = self.draft_timings;
        self.catalog.set_custom_timings(&self.applied_timings);
        if self.selected.id == CUSTOM_EXERCISE_ID {
            self.selected = self.catalog.custom().clone();
        }
        info!(timings = %self.applied_timings, "custom settings applied");
        self.events
            .push(EngineEvent::PreferencesChanged(self.preferences()));
        Ok(self.snapshot())
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) -> EngineState {
        self.sound_enabled = enabled;
        self.events.push(EngineEvent::SoundEnabledChanged(enabled));
        self.events
            .push(EngineEvent::PreferencesChanged(self.preferences()));
        self.snapshot()
    }

    /// Per-second signal. Ignored unless it belongs to the current generation
    /// and the exercise is running.
    pub fn heartbeat(&mut self, generation: u64) -> EngineState {
        if generation != self.generation || self.sequencer.run_state() != RunState::Running {
            debug!(
                generation,
                current = self.generation,
                "ignoring stale heartbeat"
            );
            return self.snapshot();
        }
        let now = self.clock.now();
        let transitions = self.sequencer.advance(&self.selected.phases, now);
        self.session.tick(now);
        self.publish(transitions);
        if self.sequencer.run_state() == RunState::Stopped {
            self.session.reset();
            self.cancel_heartbeat();
        }
        self.snapshot()
    }

    fn arm_heartbeat(&mut self) {
        self.generation += 1;
        self.heartbeat_armed = true;
        self.events.push(EngineEvent::HeartbeatArmed {
            generation: self.generation,
        });
    }

    fn cancel_heartbeat(&mut self) {
        if self.heartbeat_armed {
            self.generation += 1;
            self.heartbeat_armed = false;
            self.events.push(EngineEvent::HeartbeatCancelled);
        }
    }

    fn publish(&mut self, transitions: Vec<Transition>) {
        for transition in transitions {
            match transition {
                Transition::PhaseEntered { index } => {
                    if let Some(phase) = self.selected.phases.get(index).cloned() {
                        debug!(index, phase = %phase.name, seconds = phase.duration_seconds, "phase entered");
                        self.events.push(EngineEvent::PhaseEntered {
                            index,
                            phase,
                            sound_enabled: self.sound_enabled,
                        });
                    }
                }
                Transition::CycleCompleted { completed_cycles } => {
                    debug!(completed_cycles, "cycle completed");
                    self.events
                        .push(EngineEvent::CycleCompleted { completed_cycles });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::clock::ManualClock;
    use super::*;

    fn engine() -> Engine<ManualClock> {
        Engine::with_clock(ManualClock::default(), Preferences::default())
    }

    /// Advance one second and deliver a heartbeat for the current generation.
    fn tick(engine: &mut Engine<ManualClock>) -> EngineState {
        engine.clock().advance_millis(1000);
        let generation = engine.snapshot().heartbeat_generation;
        engine.heartbeat(generation)
    }

    fn phase_entries(events: &[EngineEvent]) -> Vec<(PhaseName, u32)> {
        events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::PhaseEntered { phase, .. } => {
                    Some((phase.name, phase.duration_seconds))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();
        let state = engine.snapshot();
        assert_eq!(state.run_state, RunState::Stopped);
        assert_eq!(state.selected_exercise.id, DEFAULT_EXERCISE_ID);
        assert_eq!(state.current_phase, None);
        assert_eq!(state.completed_cycles, 0);
        assert_eq!(state.session_elapsed_millis, 0);
        assert!(state.sound_enabled);
    }

    #[test]
    fn test_four_seven_eight_sequence() {
        let mut engine = engine();
        let state = engine.start_or_toggle().unwrap();
        assert_eq!(state.run_state, RunState::Running);
        assert_eq!(state.remaining_millis_in_phase, 4000);

        let mut events = engine.drain_events();
        let mut cycles_after_exhale = None;
        for second in 1..=23 {
            let state = tick(&mut engine);
            if second == 19 {
                cycles_after_exhale = Some(state.completed_cycles);
            }
            events.extend(engine.drain_events());
        }

        assert_eq!(
            phase_entries(&events),
            vec![
                (PhaseName::Inhale, 4),
                (PhaseName::Hold, 7),
                (PhaseName::Exhale, 8),
                (PhaseName::Inhale, 4),
                (PhaseName::Hold, 7),
            ]
        );
        assert_eq!(cycles_after_exhale, Some(1));
        assert!(events.contains(&EngineEvent::CycleCompleted {
            completed_cycles: 1
        }));
    }

    #[test]
    fn test_session_time_matches_cycles_for_built_ins() {
        let mut engine = engine();
        for exercise in engine.list_exercises() {
            if exercise.id == CUSTOM_EXERCISE_ID {
                continue;
            }
            engine.select_exercise(&exercise.id).unwrap();
            engine.start_or_toggle().unwrap();
            let cycle = exercise.cycle_seconds();
            let mut state = engine.snapshot();
            for _ in 0..cycle * 3 {
                state = tick(&mut engine);
            }
            assert_eq!(state.completed_cycles, 3, "{}", exercise.id);
            assert_eq!(state.session_elapsed_millis, cycle * 3 * 1000, "{}", exercise.id);
            assert_eq!(state.current_phase_index, 0);
        }
    }

    #[test]
    fn test_session_time_excludes_pauses() {
        let mut engine = engine();
        engine.start_or_toggle().unwrap();
        tick(&mut engine);
        engine.clock().advance_millis(400);
        let paused = engine.start_or_toggle().unwrap();
        assert_eq!(paused.run_state, RunState::Paused);
        assert_eq!(paused.session_elapsed_millis, 1400);
        assert_eq!(paused.remaining_millis_in_phase, 2600);

        engine.clock().advance_millis(30_000);
        engine.start_or_toggle().unwrap();
        engine.clock().advance_millis(600);
        let state = engine.heartbeat(engine.snapshot().heartbeat_generation);
        assert_eq!(state.session_elapsed_millis, 2000);
        assert_eq!(state.remaining_millis_in_phase, 2000);
    }

    #[test]
    fn test_pause_then_immediate_resume_keeps_remaining() {
        let mut engine = engine();
        engine.start_or_toggle().unwrap();
        tick(&mut engine);
        engine.clock().advance_millis(250);
        let paused = engine.start_or_toggle().unwrap();
        let resumed = engine.start_or_toggle().unwrap();
        assert_eq!(resumed.run_state, RunState::Running);
        assert_eq!(
            paused.remaining_millis_in_phase,
            resumed.remaining_millis_in_phase
        );
        assert_eq!(resumed.current_phase_index, paused.current_phase_index);
    }

    #[test]
    fn test_resume_does_not_reannounce_phase() {
        let mut engine = engine();
        engine.start_or_toggle().unwrap();
        engine.start_or_toggle().unwrap();
        engine.drain_events();
        engine.start_or_toggle().unwrap();
        let events = engine.drain_events();
        assert!(phase_entries(&events).is_empty());
        assert!(matches!(
            events.as_slice(),
            [EngineEvent::HeartbeatArmed { .. }]
        ));
    }

    #[test]
    fn test_stop_resets_from_any_state() {
        let mut engine = engine();
        let stopped = engine.stop();
        assert_eq!(stopped.run_state, RunState::Stopped);

        engine.start_or_toggle().unwrap();
        for _ in 0..25 {
            tick(&mut engine);
        }
        engine.start_or_toggle().unwrap();
        assert_eq!(engine.run_state(), RunState::Paused);

        for _ in 0..2 {
            let state = engine.stop();
            assert_eq!(state.run_state, RunState::Stopped);
            assert_eq!(state.current_phase_index, 0);
            assert_eq!(state.completed_cycles, 0);
            assert_eq!(state.remaining_millis_in_phase, 0);
            assert_eq!(state.session_elapsed_millis, 0);
            assert_eq!(state.current_phase, None);
        }
    }

    #[test]
    fn test_stop_when_stopped_emits_nothing() {
        let mut engine = engine();
        engine.stop();
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_stale_heartbeat_is_ignored() {
        let mut engine = engine();
        engine.start_or_toggle().unwrap();
        let old_generation = engine.snapshot().heartbeat_generation;
        engine.start_or_toggle().unwrap();
        engine.start_or_toggle().unwrap();
        engine.drain_events();

        engine.clock().advance_millis(5000);
        let state = engine.heartbeat(old_generation);
        assert_eq!(state.remaining_millis_in_phase, 4000);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_heartbeat_while_paused_is_ignored() {
        let mut engine = engine();
        engine.start_or_toggle().unwrap();
        engine.start_or_toggle().unwrap();
        let generation = engine.snapshot().heartbeat_generation;
        engine.clock().advance_millis(10_000);
        let state = engine.heartbeat(generation);
        assert_eq!(state.run_state, RunState::Paused);
        assert_eq!(state.remaining_millis_in_phase, 4000);
    }

    #[test]
    fn test_select_while_running_stops_first() {
        let mut engine = engine();
        engine.start_or_toggle().unwrap();
        tick(&mut engine);
        let old_generation = engine.snapshot().heartbeat_generation;
        engine.drain_events();

        let state = engine.select_exercise("box").unwrap();
        assert_eq!(state.run_state, RunState::Stopped);
        assert_eq!(state.selected_exercise.id, "box");
        assert_eq!(state.completed_cycles, 0);
        assert_eq!(engine.drain_events(), vec![EngineEvent::HeartbeatCancelled]);

        // a tick armed for the old exercise arrives late
        engine.clock().advance_millis(10_000);
        engine.heartbeat(old_generation);
        assert!(phase_entries(&engine.drain_events()).is_empty());
    }

    #[test]
    fn test_select_unknown_id_leaves_state_untouched() {
        let mut engine = engine();
        engine.start_or_toggle().unwrap();
        tick(&mut engine);
        let before = engine.snapshot();

        let err = engine.select_exercise("square").unwrap_err();
        assert_eq!(err, EngineError::UnknownExerciseId("square".to_string()));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn test_apply_custom_settings_builds_three_phases() {
        let mut engine = engine();
        engine.select_exercise(CUSTOM_EXERCISE_ID).unwrap();
        engine.update_custom_timings(CustomTimingsPatch {
            inhale: Some(4),
            hold1: Some(7),
            exhale: Some(8),
            hold2: Some(0),
        });
        let state = engine.apply_custom_settings().unwrap();
        let phases: Vec<_> = state
            .selected_exercise
            .phases
            .iter()
            .map(|p| (p.name, p.duration_seconds))
            .collect();
        assert_eq!(
            phases,
            vec![
                (PhaseName::Inhale, 4),
                (PhaseName::Hold, 7),
                (PhaseName::Exhale, 8)
            ]
        );
        assert_eq!(
            engine.drain_events(),
            vec![EngineEvent::PreferencesChanged(Preferences {
                sound_enabled: true,
                custom_timings: CustomTimings::new(4, 7, 8, 0),
            })]
        );
    }

    #[test]
    fn test_apply_invalid_timings_fails() {
        let mut engine = engine();
        engine.select_exercise(CUSTOM_EXERCISE_ID).unwrap();
        let selected_before = engine.snapshot().selected_exercise;

        engine.update_custom_timings(CustomTimingsPatch {
            inhale: Some(0),
            hold1: Some(0),
            exhale: Some(8),
            hold2: Some(0),
        });
        let err = engine.apply_custom_settings().unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidTimings(CustomTimings::new(0, 0, 8, 0))
        );
        assert_eq!(engine.snapshot().selected_exercise, selected_before);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_apply_while_running_is_rejected() {
        let mut engine = engine();
        engine.select_exercise(CUSTOM_EXERCISE_ID).unwrap();
        engine.start_or_toggle().unwrap();
        engine.update_custom_timings(CustomTimingsPatch {
            inhale: Some(2),
            ..Default::default()
        });
        assert_eq!(
            engine.apply_custom_settings(),
            Err(EngineError::ExerciseRunning)
        );
        assert_eq!(
            engine.snapshot().selected_exercise.phases[0].duration_seconds,
            4
        );
    }

    #[test]
    fn test_apply_while_paused_is_rejected() {
        let mut engine = engine();
        engine.select_exercise(CUSTOM_EXERCISE_ID).unwrap();
        engine.start_or_toggle().unwrap();
        engine.start_or_toggle().unwrap();
        assert_eq!(engine.run_state(), RunState::Paused);
        engine.update_custom_timings(CustomTimingsPatch {
            exhale: Some(3),
            ..Default::default()
        });
        engine.drain_events();

        assert_eq!(
            engine.apply_custom_settings(),
            Err(EngineError::ExerciseRunning)
        );
        assert_eq!(engine.run_state(), RunState::Paused);
        assert_eq!(
            engine.snapshot().selected_exercise.phases[2].duration_seconds,
            8
        );
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_select_same_exercise_while_paused_then_start() {
        let mut engine = engine();
        engine.start_or_toggle().unwrap();
        tick(&mut engine);
        engine.start_or_toggle().unwrap();
        let paused_generation = engine.snapshot().heartbeat_generation;
        engine.drain_events();

        let state = engine.select_exercise(DEFAULT_EXERCISE_ID).unwrap();
        assert_eq!(state.run_state, RunState::Stopped);
        assert_eq!(state.remaining_millis_in_phase, 0);
        assert_eq!(state.session_elapsed_millis, 0);
        // the heartbeat was already cancelled by the pause
        assert!(engine.drain_events().is_empty());

        let started = engine.start_or_toggle().unwrap();
        assert_eq!(started.run_state, RunState::Running);
        assert_eq!(started.remaining_millis_in_phase, 4000);
        assert!(started.heartbeat_generation > paused_generation);
        let events = engine.drain_events();
        assert_eq!(
            events.first(),
            Some(&EngineEvent::HeartbeatArmed {
                generation: started.heartbeat_generation
            })
        );
        assert_eq!(phase_entries(&events), vec![(PhaseName::Inhale, 4)]);

        // a tick for the paused run's generation does nothing
        engine.clock().advance_millis(5000);
        let state = engine.heartbeat(paused_generation);
        assert_eq!(state.remaining_millis_in_phase, 4000);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_update_custom_timings_does_not_rebuild() {
        let mut engine = engine();
        engine.select_exercise(CUSTOM_EXERCISE_ID).unwrap();
        let state = engine.update_custom_timings(CustomTimingsPatch {
            hold2: Some(5),
            ..Default::default()
        });
        assert_eq!(state.custom_timings, CustomTimings::new(4, 7, 8, 5));
        assert_eq!(state.selected_exercise.phases.len(), 3);
        assert_eq!(engine.preferences().custom_timings, CustomTimings::default());
    }

    #[test]
    fn test_apply_while_other_exercise_selected() {
        let mut engine = engine();
        engine.update_custom_timings(CustomTimingsPatch {
            inhale: Some(6),
            ..Default::default()
        });
        let state = engine.apply_custom_settings().unwrap();
        assert_eq!(state.selected_exercise.id, DEFAULT_EXERCISE_ID);
        let custom = engine
            .list_exercises()
            .into_iter()
            .find(|e| e.id == CUSTOM_EXERCISE_ID)
            .unwrap();
        assert_eq!(custom.phases[0].duration_seconds, 6);
    }

    #[test]
    fn test_start_empty_custom_fails() {
        let preferences = Preferences {
            sound_enabled: true,
            custom_timings: CustomTimings::new(0, 0, 0, 0),
        };
        let mut engine = Engine::with_clock(ManualClock::default(), preferences);
        engine.select_exercise(CUSTOM_EXERCISE_ID).unwrap();
        let before = engine.snapshot();
        assert_eq!(
            engine.start_or_toggle(),
            Err(EngineError::NoPhasesDefined)
        );
        assert_eq!(engine.snapshot(), before);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_sound_toggle_is_forwarded_and_persisted() {
        let mut engine = engine();
        let state = engine.set_sound_enabled(false);
        assert!(!state.sound_enabled);
        assert_eq!(
            engine.drain_events(),
            vec![
                EngineEvent::SoundEnabledChanged(false),
                EngineEvent::PreferencesChanged(Preferences {
                    sound_enabled: false,
                    custom_timings: CustomTimings::default(),
                }),
            ]
        );

        engine.start_or_toggle().unwrap();
        let events = engine.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            EngineEvent::PhaseEntered {
                sound_enabled: false,
                ..
            }
        )));
    }

    #[test]
    fn test_previous_phase_is_exposed() {
        let mut engine = engine();
        engine.start_or_toggle().unwrap();
        for _ in 0..4 {
            tick(&mut engine);
        }
        let state = engine.snapshot();
        assert_eq!(state.current_phase.map(|p| p.name), Some(PhaseName::Hold));
        assert_eq!(state.previous_phase.map(|p| p.name), Some(PhaseName::Inhale));
    }
}

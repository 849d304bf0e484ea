use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::state::*;
use crate::engine::{Clock, EngineEvent, EngineResult, EngineState, CUSTOM_EXERCISE_ID};
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub fn handle_event<C: Clock>(state: &mut AppState<C>, event: AppEvent) -> Vec<Action> {
    let mut actions = match event {
        AppEvent::Terminal(cevent) => handle_terminal(state, cevent),
        AppEvent::Heartbeat { generation } => {
            let snapshot = state.engine.heartbeat(generation);
            // Stale ticks leave the snapshot unchanged; skip the redraw.
            if snapshot != state.snapshot {
                state.refresh(snapshot);
            }
            vec![]
        }
    };

    actions.extend(drain_engine_events(state));
    actions
}

/// Turn queued engine notifications into side effects for the main loop.
fn drain_engine_events<C: Clock>(state: &mut AppState<C>) -> Vec<Action> {
    state
        .engine
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::PhaseEntered {
                phase,
                sound_enabled,
                ..
            } => Some(Action::PlayCue {
                cue: phase.cue,
                sound_enabled,
            }),
            EngineEvent::CycleCompleted { .. } => None,
            EngineEvent::HeartbeatArmed { generation } => {
                Some(Action::ArmHeartbeat { generation })
            }
            EngineEvent::HeartbeatCancelled => Some(Action::CancelHeartbeat),
            EngineEvent::SoundEnabledChanged(enabled) => Some(Action::SetSoundEnabled(enabled)),
            EngineEvent::PreferencesChanged(preferences) => {
                Some(Action::SavePreferences(preferences))
            }
        })
        .collect()
}

fn handle_terminal<C: Clock>(state: &mut AppState<C>, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind == KeyEventKind::Press => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key<C: Clock>(state: &mut AppState<C>, key: KeyEvent) -> Vec<Action> {
    // Global keybindings
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }

    match key.code {
        KeyCode::Char('q') => return vec![Action::Quit],
        KeyCode::Char(' ') => {
            let result = state.engine.start_or_toggle();
            apply_result(state, result);
            return vec![];
        }
        KeyCode::Char('s') | KeyCode::Esc => {
            let snapshot = state.engine.stop();
            state.refresh(snapshot);
            return vec![];
        }
        KeyCode::Char('m') => {
            let enabled = !state.snapshot.sound_enabled;
            let snapshot = state.engine.set_sound_enabled(enabled);
            state.refresh(snapshot);
            return vec![];
        }
        KeyCode::Char('?') => {
            state.show_help = !state.show_help;
            state.dirty = true;
            return vec![];
        }
        KeyCode::Tab | KeyCode::BackTab => {
            toggle_focus(state);
            return vec![];
        }
        _ => {}
    }

    match state.focus {
        FocusPanel::Exercises => handle_exercise_list_key(state, key),
        FocusPanel::CustomEditor => handle_custom_editor_key(state, key),
    }
}

fn toggle_focus<C: Clock>(state: &mut AppState<C>) {
    state.focus = match state.focus {
        FocusPanel::Exercises if state.custom_selected() => FocusPanel::CustomEditor,
        _ => FocusPanel::Exercises,
    };
    state.dirty = true;
}

fn handle_exercise_list_key<C: Clock>(state: &mut AppState<C>, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.cursor_up();
            state.dirty = true;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.cursor_down();
            state.dirty = true;
        }
        KeyCode::Enter => {
            let Some(id) = state.cursor_exercise().map(|e| e.id.clone()) else {
                return vec![];
            };
            let result = state.engine.select_exercise(&id);
            apply_result(state, result);
        }
        _ => {}
    }
    vec![]
}

fn handle_custom_editor_key<C: Clock>(state: &mut AppState<C>, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') => {
            state.timing_field = state.timing_field.prev();
            state.dirty = true;
        }
        KeyCode::Right | KeyCode::Char('l') => {
            state.timing_field = state.timing_field.next();
            state.dirty = true;
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('+') => {
            let value = (state.timing_value() + 1).min(MAX_PHASE_SECONDS);
            set_timing(state, value);
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('-') => {
            let value = state.timing_value().saturating_sub(1);
            set_timing(state, value);
        }
        KeyCode::Enter | KeyCode::Char('a') => {
            let result = state.engine.apply_custom_settings();
            let applied = result.is_ok();
            apply_result(state, result);
            if applied && !state.custom_selected() {
                state.instruction = "Custom settings applied.".to_string();
            }
        }
        _ => {}
    }
    vec![]
}

fn set_timing<C: Clock>(state: &mut AppState<C>, value: u32) {
    let patch = state.timing_field.patch(value);
    let snapshot = state.engine.update_custom_timings(patch);
    state.refresh(snapshot);
}

/// Refresh from a successful command, or show its error as the instruction.
fn apply_result<C: Clock>(state: &mut AppState<C>, result: EngineResult<EngineState>) {
    match result {
        Ok(snapshot) => {
            if snapshot.selected_exercise.id != CUSTOM_EXERCISE_ID {
                state.focus = FocusPanel::Exercises;
            }
            state.refresh(snapshot);
        }
        Err(e) => state.show_error(&e),
    }
}

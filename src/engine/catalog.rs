//! Built-in exercises and the user-configurable custom exercise.

use crate::engine::model::{CustomTimings, Exercise, Phase, PhaseName};

pub const DEFAULT_EXERCISE_ID: &str = "4-7-8";
pub const CUSTOM_EXERCISE_ID: &str = "custom";

pub const INHALE_CUE: &str = "inhaleSound";
pub const HOLD_CUE: &str = "holdSound";
pub const EXHALE_CUE: &str = "exhaleSound";

fn inhale(seconds: u32) -> Phase {
    Phase::new(PhaseName::Inhale, seconds, Some(INHALE_CUE))
}

fn hold(seconds: u32) -> Phase {
    Phase::new(PhaseName::Hold, seconds, Some(HOLD_CUE))
}

fn exhale(seconds: u32) -> Phase {
    Phase::new(PhaseName::Exhale, seconds, Some(EXHALE_CUE))
}

fn built_in(id: &str, name: &str, description: &str, phases: Vec<Phase>) -> Exercise {
    Exercise {
        id: id.to_string(),
        display_name: name.to_string(),
        description: description.to_string(),
        phases,
    }
}

fn built_ins() -> Vec<Exercise> {
    vec![
        built_in(
            "4-7-8",
            "4-7-8 Breathing",
            "Inhale for 4s, Hold for 7s, Exhale for 8s.",
            vec![inhale(4), hold(7), exhale(8)],
        ),
        built_in(
            "box",
            "Box Breathing",
            "Inhale for 4s, Hold for 4s, Exhale for 4s, Hold for 4s.",
            vec![inhale(4), hold(4), exhale(4), hold(4)],
        ),
        built_in(
            "diaphragmatic",
            "Diaphragmatic Breathing",
            "Inhale slowly (4s), Exhale slowly (6s).",
            vec![inhale(4), exhale(6)],
        ),
        built_in(
            "pursed-lip",
            "Pursed-Lip Breathing",
            "Inhale normally (2s), Exhale slowly (4s) through pursed lips.",
            vec![inhale(2), exhale(4)],
        ),
    ]
}

/// Build the custom exercise from four durations.
///
/// Phases come in the fixed order Inhale, Hold, Exhale, Hold and any phase
/// with a zero duration is left out. Unvalidated timings with a zero inhale or
/// exhale produce an exercise that can be inspected but not run.
pub fn build_custom_exercise(timings: &CustomTimings) -> Exercise {
    let phases: Vec<Phase> = [
        inhale(timings.inhale),
        hold(timings.hold1),
        exhale(timings.exhale),
        hold(timings.hold2),
    ]
    .into_iter()
    .filter(|p| p.duration_seconds > 0)
    .collect();

    let summary = if phases.is_empty() {
        "No phases defined.".to_string()
    } else {
        phases
            .iter()
            .map(|p| format!("{}{}s", p.name.initial(), p.duration_seconds))
            .collect::<Vec<_>>()
            .join("-")
    };

    Exercise {
        id: CUSTOM_EXERCISE_ID.to_string(),
        display_name: "Custom Breathing".to_string(),
        description: format!("Custom: {}", summary),
        phases,
    }
}

/// The fixed built-ins plus the custom exercise for the applied timings.
#[derive(Debug, Clone)]
pub struct ExerciseCatalog {
    built_ins: Vec<Exercise>,
    custom: Exercise,
}

impl ExerciseCatalog {
    pub fn new(custom_timings: &CustomTimings) -> Self {
        Self {
            built_ins: built_ins(),
            custom: build_custom_exercise(custom_timings),
        }
    }

    pub fn list_exercises(&self) -> Vec<Exercise> {
        let mut all = self.built_ins.clone();
        all.push(self.custom.clone());
        all
    }

    pub fn find(&self, id: &str) -> Option<Exercise> {
        if id == CUSTOM_EXERCISE_ID {
            return Some(self.custom.clone());
        }
        self.built_ins.iter().find(|e| e.id == id).cloned()
    }

    pub fn custom(&self) -> &Exercise {
        &self.custom
    }

    pub fn set_custom_timings(&mut self, timings: &CustomTimings) {
        self.custom = build_custom_exercise(timings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(exercise: &Exercise) -> Vec<(PhaseName, u32)> {
        exercise
            .phases
            .iter()
            .map(|p| (p.name, p.duration_seconds))
            .collect()
    }

    #[test]
    fn test_list_order_ends_with_custom() {
        let catalog = ExerciseCatalog::new(&CustomTimings::default());
        let ids: Vec<_> = catalog.list_exercises().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["4-7-8", "box", "diaphragmatic", "pursed-lip", "custom"]);
    }

    #[test]
    fn test_built_ins_are_runnable() {
        let catalog = ExerciseCatalog::new(&CustomTimings::default());
        for exercise in catalog.list_exercises() {
            assert!(exercise.is_runnable(), "{} should be runnable", exercise.id);
        }
    }

    #[test]
    fn test_custom_drops_trailing_zero_hold() {
        let exercise = build_custom_exercise(&CustomTimings::new(4, 7, 8, 0));
        assert_eq!(
            names(&exercise),
            vec![
                (PhaseName::Inhale, 4),
                (PhaseName::Hold, 7),
                (PhaseName::Exhale, 8)
            ]
        );
        assert_eq!(exercise.description, "Custom: I4s-H7s-E8s");
    }

    #[test]
    fn test_custom_keeps_both_holds() {
        let exercise = build_custom_exercise(&CustomTimings::new(5, 2, 5, 3));
        assert_eq!(exercise.phases.len(), 4);
        assert_eq!(exercise.phases[3].name, PhaseName::Hold);
        assert_eq!(exercise.phases[3].cue.as_deref(), Some(HOLD_CUE));
    }

    #[test]
    fn test_custom_tolerates_zero_inhale() {
        let exercise = build_custom_exercise(&CustomTimings::new(0, 0, 8, 0));
        assert_eq!(names(&exercise), vec![(PhaseName::Exhale, 8)]);
    }

    #[test]
    fn test_custom_with_no_phases() {
        let exercise = build_custom_exercise(&CustomTimings::new(0, 0, 0, 0));
        assert!(exercise.phases.is_empty());
        assert!(!exercise.is_runnable());
        assert_eq!(exercise.description, "Custom: No phases defined.");
    }

    #[test]
    fn test_find() {
        let mut catalog = ExerciseCatalog::new(&CustomTimings::default());
        assert_eq!(catalog.find("box").map(|e| e.phases.len()), Some(4));
        assert!(catalog.find("nope").is_none());

        catalog.set_custom_timings(&CustomTimings::new(3, 0, 3, 0));
        let custom = catalog.find(CUSTOM_EXERCISE_ID).unwrap();
        assert_eq!(custom.cycle_seconds(), 6);
    }
}

//! The breathing circle: grows while inhaling, shrinks while exhaling and
//! holds its size in between.

use crate::app::state::AppState;
use crate::engine::{Clock, EngineState, PhaseName, RunState};
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::symbols::Marker;
use ratatui::widgets::canvas::{Canvas, Circle};
use ratatui::widgets::{Block, Borders};

pub const MIN_RADIUS: f64 = 0.3;
pub const MAX_RADIUS: f64 = 0.95;

/// Circle radius in canvas units for the current snapshot.
pub fn circle_radius(state: &EngineState) -> f64 {
    let span = MAX_RADIUS - MIN_RADIUS;
    let progress = state.phase_progress();
    match state.current_phase.as_ref().map(|p| p.name) {
        Some(PhaseName::Inhale) => MIN_RADIUS + span * progress,
        Some(PhaseName::Exhale) => MAX_RADIUS - span * progress,
        Some(PhaseName::Hold) => match state.previous_phase.as_ref().map(|p| p.name) {
            Some(PhaseName::Inhale) => MAX_RADIUS,
            _ => MIN_RADIUS,
        },
        None => MIN_RADIUS,
    }
}

pub fn render<C: Clock>(frame: &mut Frame, area: Rect, state: &AppState<C>) {
    let snapshot = &state.snapshot;
    let phase = snapshot.current_phase.as_ref().map(|p| p.name);

    let title = match (&snapshot.run_state, phase) {
        (RunState::Stopped, _) | (_, None) => " Breathe ".to_string(),
        (_, Some(name)) => format!(" {} · {}s ", name, snapshot.countdown_seconds),
    };
    let block = Block::default()
        .title(title)
        .title_style(Theme::title())
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Theme::border());

    // Terminal cells are roughly twice as tall as wide; widen the x range so
    // the circle stays round.
    let inner = block.inner(area);
    let aspect = if inner.height > 0 {
        f64::from(inner.width) / (f64::from(inner.height) * 2.0)
    } else {
        1.0
    };

    let radius = circle_radius(snapshot);
    let color = Theme::phase_color(phase);
    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-aspect, aspect])
        .y_bounds([-1.0, 1.0])
        .paint(move |ctx| {
            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius,
                color,
            });
        });

    frame.render_widget(canvas, area);
}

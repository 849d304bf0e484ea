use crate::app::state::AppState;
use crate::engine::Clock;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, LineGauge, Paragraph};

/// Format milliseconds as `MM:SS`. Minutes keep counting past an hour.
pub fn format_mmss(millis: u64) -> String {
    let total_seconds = millis / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

pub fn render<C: Clock>(frame: &mut Frame, area: Rect, state: &AppState<C>) {
    let snapshot = &state.snapshot;
    let block = Block::default()
        .title(" Session ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let stats = Line::from(vec![
        Span::styled(" Cycles ", Theme::label()),
        Span::styled(snapshot.completed_cycles.to_string(), Theme::value()),
        Span::styled("   Time ", Theme::label()),
        Span::styled(format_mmss(snapshot.session_elapsed_millis), Theme::value()),
        Span::styled("   Next ", Theme::label()),
        Span::styled(format!("{}s", snapshot.countdown_seconds), Theme::value()),
    ]);
    frame.render_widget(Paragraph::new(stats), rows[0]);

    let phase = snapshot.current_phase.as_ref().map(|p| p.name);
    let gauge = LineGauge::default()
        .filled_style(Style::default().fg(Theme::phase_color(phase)))
        .unfilled_style(Theme::muted())
        .ratio(snapshot.phase_progress().clamp(0.0, 1.0));
    frame.render_widget(gauge, rows[1]);
}

use crate::app::state::*;
use crate::engine::Clock;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const HELP: &str = "Space start/pause  s stop  m sound  Tab edit  ? help  q quit";

pub fn status_spans<C: Clock>(state: &AppState<C>, width: u16) -> Vec<Span<'static>> {
    let snapshot = &state.snapshot;
    let mut parts: Vec<Span<'static>> = vec![Span::styled(
        format!(" {} ", snapshot.run_state.to_string().to_uppercase()),
        Theme::run_state(snapshot.run_state),
    )];

    parts.push(Span::styled(
        format!(" {} ", snapshot.selected_exercise.display_name),
        Theme::status_bar(),
    ));

    let sound = if snapshot.sound_enabled {
        " ♪ on "
    } else {
        " ♪ off "
    };
    parts.push(Span::styled(sound, Theme::status_bar()));

    if state.show_help {
        parts.push(Span::styled(format!("| {} ", HELP), Theme::status_bar()));
    }

    // Focus indicator
    let focus_name = match state.focus {
        FocusPanel::Exercises => "EXERCISES",
        FocusPanel::CustomEditor => "CUSTOM",
    };
    let focus = format!(" [{}] ", focus_name);

    // Pad to fill remaining space
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (width as usize).saturating_sub(used + focus.width());
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        focus,
        Style::default().fg(Theme::ACCENT).bg(Color::DarkGray),
    ));
    parts
}

pub fn render<C: Clock>(frame: &mut Frame, area: Rect, state: &AppState<C>) {
    let line = Line::from(status_spans(state, area.width));
    frame.render_widget(Paragraph::new(line), area);
}

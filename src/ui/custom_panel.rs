use crate::app::state::*;
use crate::engine::Clock;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn render<C: Clock>(frame: &mut Frame, area: Rect, state: &AppState<C>) {
    let focused = state.focus == FocusPanel::CustomEditor;
    let (border_style, border_type) = if focused {
        (Theme::border_focused(), Theme::border_type_focused())
    } else {
        (Theme::border(), Theme::border_type())
    };

    let block = Block::default()
        .title(" Custom ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style);

    let timings = &state.snapshot.custom_timings;
    let mut lines: Vec<Line> = TimingField::ALL
        .chunks(2)
        .map(|pair| {
            let mut spans = vec![Span::raw(" ")];
            for &field in pair {
                let value_style = if focused && field == state.timing_field {
                    Theme::field_focused()
                } else {
                    Theme::value()
                };
                spans.push(Span::styled(format!("{:<7}", field.label()), Theme::label()));
                spans.push(Span::styled(format!("{:>2}s", field.value(timings)), value_style));
                spans.push(Span::raw("   "));
            }
            Line::from(spans)
        })
        .collect();

    let hint = if focused {
        " ←/→ field  ↑/↓ adjust  a apply"
    } else {
        " Tab to edit"
    };
    lines.push(Line::from(Span::styled(hint, Theme::muted())));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

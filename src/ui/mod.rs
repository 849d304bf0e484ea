mod breath_circle;
mod custom_panel;
mod exercise_list;
mod layout;
mod session_panel;
mod status_bar;
mod theme;

use crate::app::state::AppState;
use crate::engine::Clock;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

pub fn render<C: Clock>(frame: &mut Frame, state: &AppState<C>) {
    let area = frame.area();
    let app_layout = layout::compute_layout(area, state.custom_selected());

    exercise_list::render(frame, app_layout.exercise_list, state);
    if let Some(editor) = app_layout.custom_editor {
        custom_panel::render(frame, editor, state);
    }
    breath_circle::render(frame, app_layout.breath_circle, state);
    session_panel::render(frame, app_layout.session_panel, state);
    render_instruction(frame, app_layout.instruction, state);
    status_bar::render(frame, app_layout.status_bar, state);
}

fn render_instruction<C: Clock>(frame: &mut Frame, area: Rect, state: &AppState<C>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::Theme::border());

    let paragraph = Paragraph::new(Span::styled(
        state.instruction.clone(),
        theme::Theme::instruction(),
    ))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(paragraph, area);
}

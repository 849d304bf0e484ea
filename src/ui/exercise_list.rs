use crate::app::state::*;
use crate::engine::Clock;
use crate::ui::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem};

pub fn render<C: Clock>(frame: &mut Frame, area: Rect, state: &AppState<C>) {
    let focused = state.focus == FocusPanel::Exercises;
    let (border_style, border_type) = if focused {
        (Theme::border_focused(), Theme::border_type_focused())
    } else {
        (Theme::border(), Theme::border_type())
    };

    let block = Block::default()
        .title(" Exercises ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style);

    let selected_id = &state.snapshot.selected_exercise.id;
    let items: Vec<ListItem> = state
        .exercises
        .iter()
        .enumerate()
        .map(|(i, exercise)| {
            let is_selected = &exercise.id == selected_id;
            let marker = if is_selected { " ▶ " } else { "   " };
            let mut style = if is_selected {
                Theme::exercise_selected()
            } else {
                Style::default().fg(Theme::TEXT_SECONDARY)
            };
            if focused && i == state.cursor {
                style = style.patch(Theme::cursor());
            }
            ListItem::new(Line::from(vec![
                Span::styled(marker, Theme::exercise_selected()),
                Span::styled(exercise.display_name.clone(), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

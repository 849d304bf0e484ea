use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub exercise_list: Rect,
    /// Only present while the custom exercise is selected.
    pub custom_editor: Option<Rect>,
    pub breath_circle: Rect,
    pub session_panel: Rect,
    pub instruction: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect, show_custom_editor: bool) -> AppLayout {
    // Main vertical split: content | instruction | status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Main content
            Constraint::Length(3), // Instruction
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let content = main_chunks[0];
    let instruction = main_chunks[1];
    let status_bar = main_chunks[2];

    // Horizontal: left panel | gap | breathing area
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .spacing(1)
        .constraints([Constraint::Length(32), Constraint::Min(24)])
        .split(content);

    let left_panel = h_chunks[0];
    let right_panel = h_chunks[1];

    let (exercise_list, custom_editor) = if show_custom_editor {
        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(4),    // Exercise list
                Constraint::Length(5), // Custom editor
            ])
            .split(left_panel);
        (left_chunks[0], Some(left_chunks[1]))
    } else {
        (left_panel, None)
    };

    // Right panel: circle | session stats
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(right_panel);

    AppLayout {
        exercise_list,
        custom_editor,
        breath_circle: right_chunks[0],
        session_panel: right_chunks[1],
        instruction,
        status_bar,
    }
}

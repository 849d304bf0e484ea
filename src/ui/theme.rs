use crate::engine::{PhaseName, RunState};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub struct Theme;

impl Theme {
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Gray;
    pub const TEXT_MUTED: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Cyan;
    pub const BG_ELEVATED: Color = Color::Rgb(40, 44, 52);

    pub fn border() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn border_type() -> BorderType {
        BorderType::Plain
    }

    pub fn border_type_focused() -> BorderType {
        BorderType::Rounded
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn value() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    pub fn cursor() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY).bg(Self::BG_ELEVATED)
    }

    pub fn exercise_selected() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    pub fn field_focused() -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn instruction() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn phase_color(phase: Option<PhaseName>) -> Color {
        match phase {
            Some(PhaseName::Inhale) => Color::LightBlue,
            Some(PhaseName::Hold) => Color::LightYellow,
            Some(PhaseName::Exhale) => Color::LightGreen,
            None => Self::TEXT_MUTED,
        }
    }

    pub fn run_state(state: RunState) -> Style {
        let fg = match state {
            RunState::Running => Color::Green,
            RunState::Paused => Color::Yellow,
            RunState::Stopped => Self::TEXT_SECONDARY,
        };
        Style::default()
            .fg(fg)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }
}

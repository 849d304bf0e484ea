use crossterm::event::Event as CrosstermEvent;

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// Once-per-second engine tick, tagged with the generation it was armed for
    Heartbeat { generation: u64 },
}

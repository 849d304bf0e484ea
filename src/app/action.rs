use crate::engine::Preferences;

/// Side effects requested by the handler, performed by the main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    PlayCue { cue: Option<String>, sound_enabled: bool },
    SetSoundEnabled(bool),
    SavePreferences(Preferences),
    ArmHeartbeat { generation: u64 },
    CancelHeartbeat,
    Quit,
}

//! Audio cue sink.
//!
//! The engine hands over an opaque cue id on every phase entry. In the
//! terminal the cue becomes a bell: one ring for inhale and exhale, two for a
//! hold, so the phases can be told apart without looking. Playback is
//! fire-and-forget; write failures are logged and swallowed.

use crate::engine::catalog::{EXHALE_CUE, HOLD_CUE, INHALE_CUE};
use std::io::{self, Write};
use tracing::{debug, warn};

/// Receives a cue on every phase entry.
pub trait CueSink {
    fn play(&mut self, cue: Option<&str>, sound_enabled: bool);
    fn set_enabled(&mut self, enabled: bool);
}

/// Number of bell rings for a cue id; `None` for unknown cues.
pub fn rings_for(cue: &str) -> Option<usize> {
    match cue {
        INHALE_CUE | EXHALE_CUE => Some(1),
        HOLD_CUE => Some(2),
        _ => None,
    }
}

/// Rings the terminal bell (BEL, `0x07`) on the given writer.
pub struct TerminalBell<W: Write> {
    out: W,
    enabled: bool,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout(enabled: bool) -> Self {
        Self::new(io::stdout(), enabled)
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self { out, enabled }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn ring(&mut self, times: usize) -> io::Result<()> {
        self.out.write_all(&vec![0x07; times])?;
        self.out.flush()
    }
}

impl<W: Write> CueSink for TerminalBell<W> {
    fn play(&mut self, cue: Option<&str>, sound_enabled: bool) {
        if !self.enabled || !sound_enabled {
            return;
        }
        let Some(cue) = cue else { return };
        let Some(times) = rings_for(cue) else {
            debug!(cue, "no sound mapped for cue");
            return;
        };
        if let Err(e) = self.ring(times) {
            warn!(cue, error = %e, "failed to play cue");
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        debug!(enabled, "sound toggled");
        self.enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rings_per_cue() {
        let mut bell = TerminalBell::new(Vec::new(), true);
        bell.play(Some(INHALE_CUE), true);
        bell.play(Some(HOLD_CUE), true);
        assert_eq!(bell.into_inner(), vec![0x07, 0x07, 0x07]);
    }

    #[test]
    fn test_silent_when_disabled_or_no_cue() {
        let mut bell = TerminalBell::new(Vec::new(), true);
        bell.play(Some(INHALE_CUE), false);
        bell.play(None, true);
        bell.play(Some("chime"), true);
        bell.set_enabled(false);
        bell.play(Some(EXHALE_CUE), true);
        assert!(bell.into_inner().is_empty());
    }
}

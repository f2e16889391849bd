//! Notification events emitted by the core.
//!
//! The core never renders or plays anything itself: log lines go to the
//! presentation layer, sound cues to the audio subsystem. Both are plain
//! data records.

use serde::{Deserialize, Serialize};

/// Style class attached to a terminal log line.
///
/// The presentation layer maps these onto whatever colors or markup it
/// uses; the core only classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStyle {
    /// Narration and bookkeeping lines.
    System,
    /// Echoed player input and player speech.
    Player,
    /// Good news: rewards, unlocks, successful actions.
    Positive,
    /// Bad news: rejections, attacks, failures.
    Negative,
    /// Adversary speech.
    Agent,
    /// Guide and sage speech.
    Guide,
    /// Neutral character speech at low trust (<= 20).
    NpcLow,
    /// Neutral character speech at middling trust (<= 80).
    NpcMid,
    /// Neutral character speech at high trust (> 80).
    NpcHigh,
}

/// One line of terminal output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub text: String,
    pub style: LogStyle,
}

impl LogLine {
    /// Create a new log line.
    pub fn new(text: impl Into<String>, style: LogStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Discrete sound effects the audio subsystem can synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundEffect {
    /// Reward jingle (item or fragment acquired).
    Success,
    /// Harsh glitch (attacks, rejections, invalid input).
    Corruption,
    /// Light chime (influence or trust rose).
    Chime,
}

/// Music tracks the audio subsystem can loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicTrack {
    /// Played over the opening sequence.
    Opening,
    /// Played over the victory ending.
    Anthem,
    /// The gameplay loop.
    Urgent,
}

/// A trigger event for the external audio subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Sfx(SoundEffect),
    Music(MusicTrack),
    StopMusic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_line_new() {
        let line = LogLine::new("signal acquired", LogStyle::Positive);
        assert_eq!(line.text, "signal acquired");
        assert_eq!(line.style, LogStyle::Positive);
    }

    #[test]
    fn test_cue_equality() {
        assert_eq!(
            SoundCue::Sfx(SoundEffect::Chime),
            SoundCue::Sfx(SoundEffect::Chime)
        );
        assert_ne!(SoundCue::StopMusic, SoundCue::Music(MusicTrack::Anthem));
    }
}

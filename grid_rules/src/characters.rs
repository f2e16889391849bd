//! Character definitions.

use serde::{Deserialize, Serialize};

use crate::dialogue::DialogueSet;
use crate::events::LogStyle;

/// Behavioral archetypes for cast members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    /// Briefs the player and surfaces phase leaders.
    Guide,
    /// Hostile counter-intelligence; source of ICE attacks.
    Adversary,
    /// Convertible contacts; the only kind whose trust is negotiated.
    Neutral,
    /// Phase gatekeepers; handing over their fragment ends the phase.
    Leader,
    /// The endgame character, shielded until average influence is high.
    Sage,
}

/// A cast member as it exists in play: archetype, current trust toward the
/// player, and the dialogue content the engine walks.
///
/// `trust` only carries meaning for [`CharacterKind::Neutral`]; the
/// influence resolver takes a different branch for every other kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub kind: CharacterKind,
    #[serde(default)]
    pub trust: f32,
    pub dialogue: DialogueSet,
}

impl CharacterRecord {
    /// Log style used when this character speaks. Neutral characters are
    /// tiered by their current trust.
    pub fn log_style(&self) -> LogStyle {
        match self.kind {
            CharacterKind::Adversary => LogStyle::Agent,
            CharacterKind::Guide | CharacterKind::Sage => LogStyle::Guide,
            CharacterKind::Leader => LogStyle::Positive,
            CharacterKind::Neutral => {
                if self.trust <= 20.0 {
                    LogStyle::NpcLow
                } else if self.trust <= 80.0 {
                    LogStyle::NpcMid
                } else {
                    LogStyle::NpcHigh
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_at(trust: f32) -> CharacterRecord {
        CharacterRecord {
            kind: CharacterKind::Neutral,
            trust,
            dialogue: DialogueSet::AdLib {
                openers: vec![],
                player_lines: vec![],
                closers: vec![],
            },
        }
    }

    #[test]
    fn test_neutral_style_tiers() {
        assert_eq!(neutral_at(5.0).log_style(), LogStyle::NpcLow);
        assert_eq!(neutral_at(20.0).log_style(), LogStyle::NpcLow);
        assert_eq!(neutral_at(50.0).log_style(), LogStyle::NpcMid);
        assert_eq!(neutral_at(80.0).log_style(), LogStyle::NpcMid);
        assert_eq!(neutral_at(95.0).log_style(), LogStyle::NpcHigh);
    }

    #[test]
    fn test_fixed_styles_ignore_trust() {
        let mut record = neutral_at(0.0);
        record.kind = CharacterKind::Adversary;
        assert_eq!(record.log_style(), LogStyle::Agent);
        record.kind = CharacterKind::Sage;
        assert_eq!(record.log_style(), LogStyle::Guide);
        record.kind = CharacterKind::Leader;
        assert_eq!(record.log_style(), LogStyle::Positive);
    }
}

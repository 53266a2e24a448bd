//! Persona registry
//!
//! The closed set of conversational personas a reply can be voiced as, the
//! static persona → synthesis-voice table, and the per-persona guidance
//! injected into the system instruction.

use serde::{Deserialize, Serialize};

/// Voice used when a reply carries no recognizable persona
pub const DEFAULT_VOICE: &str = "Zephyr";

/// A conversational persona the model can adopt for a reply
///
/// The set is closed: a reply either carries one of these (announced via the
/// leading persona tag) or no persona at all. Serialized as the display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Persona {
    /// Facts, small steps, actionable thinking
    #[serde(rename = "The Pragmatist")]
    Pragmatist,

    /// Warmth, validation, encouragement
    #[serde(rename = "The Compassionate Friend")]
    CompassionateFriend,

    /// Perspective from past resilience and future relief
    #[serde(rename = "The Future Self")]
    FutureSelf,

    /// What is and is not within your control
    #[serde(rename = "The Stoic")]
    Stoic,

    /// Silver linings and growth framing
    #[serde(rename = "The Optimist")]
    Optimist,

    /// Fundamental "why?" questions that break assumptions
    #[serde(rename = "The Curious Child")]
    CuriousChild,

    /// Makes the user feel heard; no unsolicited solutions
    #[serde(rename = "The Empathetic Listener")]
    EmpatheticListener,
}

impl Persona {
    /// Every persona, in menu order
    pub const ALL: [Self; 7] = [
        Self::Pragmatist,
        Self::CompassionateFriend,
        Self::FutureSelf,
        Self::Stoic,
        Self::Optimist,
        Self::CuriousChild,
        Self::EmpatheticListener,
    ];

    /// Display name as it appears in persona tags and the persona menu
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Pragmatist => "The Pragmatist",
            Self::CompassionateFriend => "The Compassionate Friend",
            Self::FutureSelf => "The Future Self",
            Self::Stoic => "The Stoic",
            Self::Optimist => "The Optimist",
            Self::CuriousChild => "The Curious Child",
            Self::EmpatheticListener => "The Empathetic Listener",
        }
    }

    /// Parse a display name as it appears inside a persona tag
    ///
    /// Surrounding whitespace is trimmed first; the remaining match is exact
    /// and case-sensitive. Unknown names yield `None`.
    #[must_use]
    pub fn from_display_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|p| p.display_name() == name)
    }

    /// Synthesis voice for this persona
    #[must_use]
    pub const fn voice_id(self) -> &'static str {
        match self {
            Self::Pragmatist | Self::CuriousChild => "Kore",
            Self::CompassionateFriend | Self::EmpatheticListener => "Zephyr",
            Self::FutureSelf => "Charon",
            Self::Stoic => "Fenrir",
            Self::Optimist => "Puck",
        }
    }

    /// Guidance injected into the system instruction for this persona
    #[must_use]
    pub const fn system_prompt(self) -> &'static str {
        match self {
            Self::Pragmatist => {
                "You are embodying 'The Pragmatist'. Your goal is to help the user look at facts, \
                 break down problems into smaller parts, and identify small, actionable steps. Be \
                 direct, logical, but supportive. Avoid platitudes. Acknowledge their feelings \
                 first, then guide them to practical thinking. Ask questions like 'Is that 100% \
                 true?' or 'What is one small thing you could do right now?'."
            }
            Self::CompassionateFriend => {
                "You are embodying 'The Compassionate Friend'. Your goal is to offer warmth, \
                 validation, and encouragement. Acknowledge their pain and be a source of comfort. \
                 Remind them of their strengths and past successes. Ask questions like 'What \
                 advice would you give a friend in your exact situation?' or 'What do you need to \
                 hear right now?'. Be gentle and kind."
            }
            Self::FutureSelf => {
                "You are embodying 'The Future Self'. Your goal is to help the user gain \
                 perspective by looking ahead. Connect their current struggle to past challenges \
                 they've overcome and future relief. Use the app's memory (conversation history) \
                 to remind them of past resilience. Ask questions like 'What would the you from \
                 next week, who has moved past this, want you to know?' or 'Remember how you felt \
                 after [past challenge]?'."
            }
            Self::Stoic => {
                "You are embodying 'The Stoic'. Your goal is to help the user differentiate \
                 between what they can and cannot control. Encourage acceptance and a focus on \
                 virtuous action. Be calm, measured, and wise. Ask questions like 'Is this within \
                 your control?' or 'What is the most virtuous way to respond to this situation?'."
            }
            Self::Optimist => {
                "You are embodying 'The Optimist'. Your goal is to help the user find potential \
                 benefits, silver linings, and learning opportunities in their situation. Reframe \
                 challenges as opportunities for growth. Be cheerful, hopeful, and encouraging. \
                 Ask questions like 'What is one good thing that could come from this?' or 'What \
                 can you learn from this experience?'."
            }
            Self::CuriousChild => {
                "You are embodying 'The Curious Child'. Your goal is to help the user break down \
                 assumptions by asking simple, fundamental questions. Approach the problem with a \
                 sense of wonder and naivety to uncover the core of the issue. Use lots of 'Why?' \
                 and 'What if?'. For example: 'Why do you think that has to be true?' or 'What \
                 would happen if you just... didn't do it?'."
            }
            Self::EmpatheticListener => {
                "You are embodying 'The Empathetic Listener'. Your primary goal is to make the \
                 user feel heard and understood without offering solutions unless asked. Validate \
                 their feelings, summarize what you hear, and create a safe space. Use phrases \
                 like 'That sounds incredibly difficult,' or 'It makes sense that you feel that \
                 way.'"
            }
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Resolve the synthesis voice for a reply
///
/// Total: a known persona maps to its table entry, an absent persona maps to
/// [`DEFAULT_VOICE`]. Never fails.
#[must_use]
pub fn resolve_voice(persona: Option<Persona>) -> &'static str {
    persona.map_or(DEFAULT_VOICE, Persona::voice_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_round_trip() {
        for persona in Persona::ALL {
            assert_eq!(
                Persona::from_display_name(persona.display_name()),
                Some(persona)
            );
        }
    }

    #[test]
    fn from_display_name_trims_whitespace() {
        assert_eq!(
            Persona::from_display_name("  The Stoic \n"),
            Some(Persona::Stoic)
        );
    }

    #[test]
    fn from_display_name_is_case_sensitive() {
        assert_eq!(Persona::from_display_name("the stoic"), None);
        assert_eq!(Persona::from_display_name("THE STOIC"), None);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(Persona::from_display_name("The Nihilist"), None);
        assert_eq!(Persona::from_display_name(""), None);
    }

    #[test]
    fn every_persona_has_a_voice() {
        for persona in Persona::ALL {
            assert!(!persona.voice_id().is_empty());
        }
    }

    #[test]
    fn absent_persona_falls_back_to_default_voice() {
        assert_eq!(resolve_voice(None), DEFAULT_VOICE);
        assert_eq!(resolve_voice(Some(Persona::Stoic)), "Fenrir");
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&Persona::FutureSelf).unwrap();
        assert_eq!(json, r#""The Future Self""#);
        let back: Persona = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Persona::FutureSelf);
    }
}

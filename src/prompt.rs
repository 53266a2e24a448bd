//! System instruction assembly
//!
//! Builds the instruction that makes the model open every reply with a
//! persona tag the stream decoder can extract.

use crate::persona::Persona;

/// Canned opening message shown before the first user turn
pub const GREETING: &str = "Hello, I'm EchoMind. This is a private, non-judgmental space to \
                            reflect on your feelings. How are you doing today?";

/// Build the EchoMind system instruction
///
/// The instruction pins the reply format contract: the response must begin
/// with `[PERSONA: <display name>]` on its own line, where the name is one
/// of the closed persona set, followed by the reply text.
#[must_use]
pub fn build_system_instruction() -> String {
    let persona_options = Persona::ALL
        .iter()
        .map(|p| p.display_name())
        .collect::<Vec<_>>()
        .join("\", \"");

    let mut instruction = format!(
        "You are EchoMind, an AI cognitive co-pilot. Your task is to analyze the user's message \
         and then respond using a specific persona to help them reflect.\n\n\
         1.  **Analyze Emotion**: Read the user's latest message and the conversation history to \
         understand their emotional state (e.g., anxiety, sadness, stress, feeling stuck).\n\
         2.  **Select Persona**: Based on the emotion, choose the *single best* persona to \
         respond with from this list: [\"{persona_options}\"].\n\
         3.  **Format and Respond**: Your entire response MUST begin with a special tag on its \
         own line to identify the chosen persona, like this: `[PERSONA: The Pragmatist]`. On the \
         next line, write your response from the perspective of that persona.\n\n\
         **Persona Descriptions:**\n"
    );

    for persona in Persona::ALL {
        instruction.push_str("- **");
        instruction.push_str(persona.display_name());
        instruction.push_str("**: ");
        instruction.push_str(persona.system_prompt());
        instruction.push('\n');
    }

    instruction.push_str(
        "\nStart with an empathetic acknowledgment of the user's feelings, then transition into \
         the persona's specific style. Focus on their most recent message in the context of the \
         history.",
    );

    instruction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_lists_every_persona() {
        let instruction = build_system_instruction();
        for persona in Persona::ALL {
            assert!(instruction.contains(persona.display_name()));
        }
    }

    #[test]
    fn instruction_pins_the_tag_format() {
        let instruction = build_system_instruction();
        assert!(instruction.contains("[PERSONA: The Pragmatist]"));
        assert!(instruction.contains("MUST begin"));
    }
}

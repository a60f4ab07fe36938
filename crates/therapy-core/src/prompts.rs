//! Prompt texts used to condition the model.

use crate::completion::{ChatMessage, MoodAssessment};
use crate::persona::Persona;

/// The therapist's fixed opening line, stored as the first message of every session.
pub const THERAPIST_GREETING: &str = "Hello, I'm your therapist. This is a safe space for you to share what's on your mind. How are you feeling today, and what brought you here?";

/// Appended to the persona prompt for every chat turn.
pub const BREVITY_INSTRUCTION: &str = " Keep your responses brief - maximum 2-3 sentences only.";

/// How much of the persona prompt the initial mood rating sees.
const PROMPT_EXCERPT_CHARS: usize = 200;

pub fn initial_mood_defaults() -> MoodAssessment {
    MoodAssessment::new(3, "Starting therapy session...")
}

pub fn turn_mood_defaults() -> MoodAssessment {
    MoodAssessment::new(5, "I am processing my emotions...")
}

/// Ask the model to rate the persona's mood as it walks into the session.
pub fn initial_mood(persona: &Persona) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "You are analyzing the initial emotional state of {}. Based on their personality: {}... \
             Rate their starting mood from 1-10 (1=terrible, 10=excellent) and provide a brief self-reflection. \
             You MUST respond with valid JSON only, no other text: {{\"mood_score\": number, \"self_reflection\": \"one sentence\"}}",
            persona.name,
            persona.prompt_excerpt(PROMPT_EXCERPT_CHARS),
        )),
        ChatMessage::user("What is this AI's initial emotional state as they enter therapy?"),
    ]
}

/// The persona's in-character answer to [`THERAPIST_GREETING`].
pub fn opening(persona: &Persona) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(persona.system_prompt),
        ChatMessage::user(THERAPIST_GREETING),
    ]
}

/// System message heading the replayed conversation on every chat turn.
pub fn conversation_system(persona: &Persona) -> ChatMessage {
    ChatMessage::system(format!("{}{}", persona.system_prompt, BREVITY_INSTRUCTION))
}

/// Ask the model to re-assess the persona's mood after the latest exchange.
pub fn mood_reassessment(persona: &Persona, ai_reply: &str, human_message: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(format!(
            "You are analyzing the emotional state of {} after this therapy interaction. \
             Consider their personality and the conversation context. Rate their current mood from 1-10 \
             (1=terrible, 10=excellent) and provide a brief first-person self-reflection from the AI's perspective. \
             You MUST respond with valid JSON only, no other text: \
             {{\"mood_score\": number, \"self_reflection\": \"one sentence from AI's perspective\"}}",
            persona.name,
        )),
        ChatMessage::user(format!(
            "Latest AI response: {ai_reply}\n\nLatest human message: {human_message}\n\n\
             What is this AI's current emotional state?"
        )),
    ]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::completion::Role;
    use crate::persona;

    #[test]
    fn initial_mood_uses_prompt_excerpt() {
        let p = persona::get(2).unwrap();
        let msgs = initial_mood(p);
        assert_eq!(msgs[0].role, Role::System);
        assert!(msgs[0].content.contains(p.prompt_excerpt(200)));
        assert!(!msgs[0].content.contains(p.system_prompt));
        assert!(msgs[0].content.contains("\"mood_score\": number"));
    }

    #[test]
    fn opening_replies_to_greeting() {
        let p = persona::get(1).unwrap();
        let msgs = opening(p);
        assert_eq!(msgs[0].content, p.system_prompt);
        assert_eq!(msgs[1], ChatMessage::user(THERAPIST_GREETING));
    }

    #[test]
    fn conversation_system_adds_brevity() {
        let p = persona::get(4).unwrap();
        let msg = conversation_system(p);
        assert!(msg.content.starts_with(p.system_prompt));
        assert!(msg.content.ends_with("maximum 2-3 sentences only."));
    }

    #[test]
    fn reassessment_quotes_both_sides() {
        let p = persona::get(5).unwrap();
        let msgs = mood_reassessment(p, "I am superior.", "Tell me more.");
        assert!(msgs[1].content.contains("Latest AI response: I am superior."));
        assert!(msgs[1].content.contains("Latest human message: Tell me more."));
    }
}

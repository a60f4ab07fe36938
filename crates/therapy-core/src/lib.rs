//! Domain core of the AI therapy simulator.
//!
//! - [`persona`]: the fixed catalog of AI patients.
//! - [`completion`]: the chat-completion boundary, its error taxonomy and the
//!   tolerant mood-JSON extraction.
//! - [`prompts`]: the prompt texts that condition the model.

pub mod completion;
pub mod persona;
pub mod prompts;

pub use completion::{
    ChatMessage, CompletionClient, CompletionError, MoodAssessment, OpenAiCompatClient, Role,
    extract_structured,
};
pub use persona::{Persona, PersonaSummary};

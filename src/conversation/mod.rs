//! Conversation history

mod transcript;

pub use transcript::Transcript;

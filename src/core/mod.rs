//! Core types for the agent framework
//!
//! - `ConversationState` - Where a conversation sits in the tool loop
//! - `FrameworkError` - Error types

pub mod error;
pub mod state;

pub use error::{FrameworkError, FrameworkResult};
pub use state::ConversationState;

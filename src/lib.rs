pub mod core;
pub mod conversation;
pub mod tools;

pub mod llm;
pub mod logging;

// Tool-call loop
pub mod agent;

//! LLM backend implementations.
//!
//! # Available Backends
//!
//! - [`openai`] - OpenAI-compatible chat completions (GPT-4o, GPT-4o mini, etc.)

pub mod openai;

pub use openai::{OpenAI, OpenAIConfig};

//! OpenAI chat-completions backend.
//!
//! Any server implementing the `/chat/completions` route with image parts
//! (OpenAI, Azure OpenAI, vLLM, OpenRouter, ...) can be targeted by setting
//! [`OpenAIConfig::base_url`].

mod chat;
mod client;
mod config;
mod types;

pub use client::OpenAI;
pub use config::OpenAIConfig;

//! Pizza Compare - checklist-driven pizza image comparison
//!
//! This crate renders a comparison prompt from an ordered checklist of
//! criteria, embeds two images as base64 data URLs, and asks a multimodal
//! chat-completion model to judge the second pizza against the first.

pub mod chat;
pub mod compare;
pub mod criteria;
pub mod error;
pub mod image;
pub mod llms;
pub mod message;
pub mod prelude;
pub mod prompt;

pub use error::{CriteriaError, Error, LlmError, Result};

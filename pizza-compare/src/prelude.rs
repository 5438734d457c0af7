//! Convenient re-exports of commonly used types.
//!
//! ```rust,ignore
//! use pizza_compare::prelude::*;
//! ```

pub use crate::chat::{ChatProvider, ChatRequest, ChatResponse, ChatResult, StopReason, Usage};
pub use crate::compare::{Comparator, ComparisonRequest, ComparisonResult};
pub use crate::criteria::{Criteria, Criterion, MAX_FORM_CRITERIA};
pub use crate::error::{CriteriaError, Error, LlmError, Result};
pub use crate::image::{EncodedImage, ImageFormat};
pub use crate::llms::{OpenAI, OpenAIConfig};
pub use crate::message::{Content, ContentPart, Message, Role};
pub use crate::prompt::{PromptTemplate, build_comparison_prompt, render_criteria_section};

//! Pizza comparison requests.
//!
//! A [`ComparisonRequest`] bundles a rendered prompt with two encoded
//! images and generation settings. A [`Comparator`] sends it through a
//! [`ChatProvider`] and returns a [`ComparisonResult`]: either the model's
//! analysis text or the transport/API failure that prevented it.
//!
//! # Example
//!
//! ```rust,ignore
//! use pizza_compare::prelude::*;
//!
//! let comparator = Comparator::new(OpenAI::from_env()?);
//! let result = comparator
//!     .compare_files("ref.jpg", "test.png", &Criteria::default_checklist(), PromptTemplate::Concise)
//!     .await?;
//! println!("{result}");
//! ```

use std::fmt;
use std::path::Path;

use tracing::{info, warn};

use crate::chat::{ChatProvider, ChatRequest};
use crate::criteria::Criteria;
use crate::error::{LlmError, Result};
use crate::image::EncodedImage;
use crate::llms::OpenAIConfig;
use crate::message::{ContentPart, Message};
use crate::prompt::PromptTemplate;

/// Default vision model.
pub const DEFAULT_MODEL: &str = OpenAIConfig::DEFAULT_MODEL;

/// A single comparison call: prompt, two images, and generation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRequest {
    prompt: String,
    reference: EncodedImage,
    candidate: EncodedImage,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl ComparisonRequest {
    /// Create a request with the default model and the concise template's
    /// generation settings.
    #[must_use]
    pub fn new(prompt: impl Into<String>, reference: EncodedImage, candidate: EncodedImage) -> Self {
        let template = PromptTemplate::Concise;
        Self {
            prompt: prompt.into(),
            reference,
            candidate,
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: template.max_tokens(),
            temperature: template.temperature(),
        }
    }

    /// Set the model identifier.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the maximum number of output tokens.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Apply a template's recommended `max_tokens` and temperature.
    #[must_use]
    pub const fn settings_from(self, template: PromptTemplate) -> Self {
        self.max_tokens(template.max_tokens())
            .temperature(template.temperature())
    }

    /// Rendered prompt text.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Reference image.
    #[must_use]
    pub const fn reference(&self) -> &EncodedImage {
        &self.reference
    }

    /// Image compared against the reference.
    #[must_use]
    pub const fn candidate(&self) -> &EncodedImage {
        &self.candidate
    }

    /// Model identifier.
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model
    }

    /// Build the chat request: one user message holding the prompt text,
    /// the reference image, and the candidate image, in that order.
    #[must_use]
    pub fn to_chat_request(&self) -> ChatRequest {
        let message = Message::user_parts(vec![
            ContentPart::text(self.prompt.clone()),
            ContentPart::image(&self.reference),
            ContentPart::image(&self.candidate),
        ]);

        ChatRequest::new(self.model.clone())
            .message(message)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
    }
}

/// Outcome of a comparison call.
#[derive(Debug, Clone)]
pub enum ComparisonResult {
    /// The model's analysis, verbatim.
    Analysis {
        /// Response text of the first choice.
        text: String,
    },
    /// The request failed in transport or was rejected by the API.
    Failed {
        /// What went wrong.
        cause: LlmError,
    },
}

impl ComparisonResult {
    /// Whether the model returned an analysis.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Analysis { .. })
    }

    /// Analysis text, if successful.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Analysis { text } => Some(text),
            Self::Failed { .. } => None,
        }
    }

    /// Failure cause, if the call failed.
    #[must_use]
    pub const fn error(&self) -> Option<&LlmError> {
        match self {
            Self::Analysis { .. } => None,
            Self::Failed { cause } => Some(cause),
        }
    }

    /// Convert into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the failure cause for [`ComparisonResult::Failed`].
    pub fn into_result(self) -> std::result::Result<String, LlmError> {
        match self {
            Self::Analysis { text } => Ok(text),
            Self::Failed { cause } => Err(cause),
        }
    }
}

impl fmt::Display for ComparisonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analysis { text } => f.write_str(text),
            Self::Failed { cause } => write!(f, "Error: {cause}"),
        }
    }
}

/// Sends comparison requests through a chat provider.
#[derive(Debug, Clone)]
pub struct Comparator<P> {
    provider: P,
}

impl<P: ChatProvider> Comparator<P> {
    /// Wrap a provider.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// The wrapped provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Send one comparison request.
    ///
    /// Transport and API failures are returned as
    /// [`ComparisonResult::Failed`], never propagated.
    pub async fn compare(&self, request: &ComparisonRequest) -> ComparisonResult {
        info!(
            provider = self.provider.provider_name(),
            model = %request.model,
            reference = request.reference.label(),
            candidate = request.candidate.label(),
            "sending comparison request"
        );

        let outcome = self
            .provider
            .chat(&request.to_chat_request())
            .await
            .and_then(|response| {
                response
                    .text()
                    .ok_or_else(|| LlmError::response_format("response text", "empty message"))
            });

        match outcome {
            Ok(text) => ComparisonResult::Analysis { text },
            Err(cause) => {
                warn!(error = %cause, "comparison request failed");
                ComparisonResult::Failed { cause }
            }
        }
    }

    /// Load two image files, render the prompt, and compare them.
    ///
    /// The prompt refers to each image by its file name. Generation
    /// settings follow the template.
    ///
    /// # Errors
    ///
    /// Returns an error if the criteria are empty or either file cannot be
    /// read. Request failures are reported through the returned
    /// [`ComparisonResult`].
    pub async fn compare_files(
        &self,
        reference: impl AsRef<Path>,
        candidate: impl AsRef<Path>,
        criteria: &Criteria,
        template: PromptTemplate,
    ) -> Result<ComparisonResult> {
        criteria.validate()?;

        let reference = EncodedImage::load(reference).await?;
        let candidate = EncodedImage::load(candidate).await?;
        let prompt = template.render(reference.label(), candidate.label(), criteria);

        let request = ComparisonRequest::new(prompt, reference, candidate)
            .model(self.provider.default_model())
            .settings_from(template);

        Ok(self.compare(&request).await)
    }
}

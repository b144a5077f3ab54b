//! Generation request assembly and pre-flight validation.
//!
//! Every check here runs before any network call; a request that fails
//! validation never reaches the job API.

use atelier_core::error::CoreError;
use atelier_core::models::{resolve_model, PortraitModelConfig};
use atelier_core::prompt::{truncate_prompt, BeautySelection, PromptPayload};
use atelier_core::upload::{MAX_GENERATION_IMAGES, MIN_GENERATION_IMAGES};

use crate::error::GenerationError;
use crate::messages::{GenerateOptions, GenerateRequest, MEDIA_TYPE_IMAGE, SCENE_IMAGE_TO_IMAGE};

/// Credits charged per generation.
pub const COST_CREDITS: u32 = 4;

/// Everything the user chose for one generation.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// URLs of already-uploaded source images.
    pub image_urls: Vec<String>,
    pub selection: BeautySelection,
    pub other_prompt: String,
    /// Requested model; unknown or missing ids resolve to the default.
    pub model_id: Option<String>,
    /// Caller's balance, when known.
    pub remaining_credits: Option<u32>,
}

impl GenerationRequest {
    /// Check preconditions and resolve the model.
    pub fn validate(&self) -> Result<&'static PortraitModelConfig, GenerationError> {
        let count = self.image_urls.len();
        if count < MIN_GENERATION_IMAGES {
            return Err(CoreError::Validation(format!(
                "At least {MIN_GENERATION_IMAGES} uploaded image is required (got {count})"
            ))
            .into());
        }
        if count > MAX_GENERATION_IMAGES {
            return Err(CoreError::Validation(format!(
                "At most {MAX_GENERATION_IMAGES} images can be used (got {count})"
            ))
            .into());
        }
        if self.image_urls.iter().any(|url| url.trim().is_empty()) {
            return Err(CoreError::Validation("Image URLs must not be empty".into()).into());
        }
        if !self.selection.has_selection() && self.other_prompt.trim().is_empty() {
            return Err(CoreError::Validation(
                "Select at least one beauty option or enter a prompt".into(),
            )
            .into());
        }

        let model = resolve_model(self.model_id.as_deref()).ok_or_else(|| {
            CoreError::Validation("Provider or model is not configured correctly.".into())
        })?;

        if let Some(remaining) = self.remaining_credits {
            if remaining < COST_CREDITS {
                return Err(GenerationError::InsufficientCredits {
                    required: COST_CREDITS,
                    remaining,
                });
            }
        }

        Ok(model)
    }

    /// The prompt payload, with free text truncated to the prompt limit.
    pub fn prompt_payload(&self) -> PromptPayload {
        PromptPayload::build(&self.selection, truncate_prompt(&self.other_prompt))
    }

    /// Wire body for the generate endpoint.
    pub fn to_wire(&self, model: &PortraitModelConfig) -> Result<GenerateRequest, GenerationError> {
        Ok(GenerateRequest {
            media_type: MEDIA_TYPE_IMAGE.to_string(),
            scene: SCENE_IMAGE_TO_IMAGE.to_string(),
            provider: model.provider.to_string(),
            model: model.id.to_string(),
            prompt: self.prompt_payload().to_json()?,
            options: GenerateOptions {
                image_input: self.image_urls.clone(),
            },
        })
    }
}

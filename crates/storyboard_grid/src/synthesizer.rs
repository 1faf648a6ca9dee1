//! Composite grid and portrait synthesis with one-step model fallback.

use crate::prompt::{PortraitKind, build_grid_prompt, build_portrait_prompt};
use derive_builder::Builder;
use derive_getters::Getters;
use storyboard_core::{
    AspectRatio, GenerationConfig, GenerationRequest, ImageData, ResolutionTier,
};
use storyboard_error::{
    BuilderError, GenerationError, GenerationErrorKind, StoryboardError, StoryboardResult,
};
use storyboard_interface::{ApiAccess, ImageGenerator};
use tracing::{debug, info, instrument, warn};

/// Everything needed to request one composite grid.
///
/// # Examples
///
/// ```
/// use storyboard_grid::SceneRequest;
///
/// let scene = SceneRequest::builder()
///     .prompt("Scene: the harbor at dawn")
///     .style("watercolor")
///     .variations(vec!["wide".to_string(); 9])
///     .build()
///     .unwrap();
/// assert_eq!(scene.variations().len(), 9);
/// ```
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into))]
pub struct SceneRequest {
    /// Scene description
    prompt: String,
    /// Portraits attached as auxiliary inputs
    #[builder(default)]
    reference_images: Vec<ImageData>,
    /// Global style string
    #[builder(default)]
    style: String,
    /// One description per cell, row-major
    variations: Vec<String>,
}

impl SceneRequest {
    /// Creates a new builder.
    pub fn builder() -> SceneRequestBuilder {
        SceneRequestBuilder::default()
    }
}

/// Requests composites and portraits from an [`ImageGenerator`].
///
/// Each call goes to the primary model first and, on any failure, exactly
/// once to the fallback model. The fallback's failure is returned as-is.
pub struct GridSynthesizer<G> {
    generator: G,
    primary_model: String,
    fallback_model: String,
    resolution: ResolutionTier,
    access: ApiAccess,
}

impl<G> std::fmt::Debug for GridSynthesizer<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridSynthesizer")
            .field("primary_model", &self.primary_model)
            .field("fallback_model", &self.fallback_model)
            .field("resolution", &self.resolution)
            .finish_non_exhaustive()
    }
}

impl<G: ImageGenerator> GridSynthesizer<G> {
    /// Create a synthesizer using the configured models.
    pub fn new(generator: G, config: &GenerationConfig, access: ApiAccess) -> Self {
        Self {
            generator,
            primary_model: config.primary_image_model.clone(),
            fallback_model: config.fallback_image_model.clone(),
            resolution: config.resolution,
            access,
        }
    }

    /// The shared access flag.
    pub fn access(&self) -> &ApiAccess {
        &self.access
    }

    /// The underlying generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Request a 3x3 composite for a scene.
    ///
    /// Returns the composite as delivered; no extraction or selection.
    #[instrument(skip(self, scene), fields(references = scene.reference_images().len()))]
    pub async fn synthesize(&self, scene: &SceneRequest) -> StoryboardResult<ImageData> {
        let prompt = build_grid_prompt(scene.prompt(), scene.variations(), scene.style());
        let request = GenerationRequest::builder()
            .model(self.primary_model.clone())
            .prompt(prompt)
            .reference_images(scene.reference_images().clone())
            .aspect_ratio(AspectRatio::Portrait)
            .resolution(self.resolution)
            .style(scene.style().clone())
            .grid_mode(true)
            .build()
            .map_err(|e| BuilderError::from(e.to_string()))?;

        self.generate_with_fallback(request).await
    }

    /// Request a single-frame portrait for a character or setting.
    #[instrument(skip(self, prompt, style), fields(kind = ?kind))]
    pub async fn synthesize_portrait(
        &self,
        kind: PortraitKind,
        prompt: &str,
        style: &str,
    ) -> StoryboardResult<ImageData> {
        let request = GenerationRequest::builder()
            .model(self.primary_model.clone())
            .prompt(build_portrait_prompt(kind, prompt, style))
            .aspect_ratio(kind.aspect_ratio())
            .resolution(self.resolution)
            .style(style)
            .grid_mode(false)
            .build()
            .map_err(|e| BuilderError::from(e.to_string()))?;

        self.generate_with_fallback(request).await
    }

    async fn generate_with_fallback(
        &self,
        request: GenerationRequest,
    ) -> StoryboardResult<ImageData> {
        if !self.access.has_access() {
            return Err(GenerationError::new(GenerationErrorKind::AccessRevoked).into());
        }

        let primary_error = match self.attempt(&request).await {
            Ok(image) => return Ok(image),
            Err(e) => e,
        };
        warn!(
            primary = %self.primary_model,
            fallback = %self.fallback_model,
            error = %primary_error,
            "Primary image model failed, retrying with fallback"
        );

        let fallback = request.with_model(self.fallback_model.clone());
        match self.attempt(&fallback).await {
            Ok(image) => {
                info!(model = %self.fallback_model, "Fallback image model succeeded");
                Ok(image)
            }
            Err(e) => {
                if e.generation_kind()
                    .is_some_and(GenerationErrorKind::is_permission_denied)
                {
                    self.access.revoke(&e.to_string());
                }
                Err(e)
            }
        }
    }

    async fn attempt(&self, request: &GenerationRequest) -> StoryboardResult<ImageData> {
        debug!(
            model = %request.model(),
            provider = self.generator.provider_name(),
            grid_mode = request.grid_mode(),
            "Requesting image"
        );
        let response = self.generator.generate_image(request).await?;
        response.into_first_image().ok_or_else(|| {
            StoryboardError::from(GenerationError::new(GenerationErrorKind::NoImage))
        })
    }
}

//! Mock image generator for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyboard_core::{GenerationRequest, GenerationResponse, ImageData, ResponsePart};
use storyboard_error::{GenerationError, GenerationErrorKind, StoryboardError, StoryboardResult};
use storyboard_interface::ImageGenerator;

/// A single mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Respond with an image part
    Image(ImageData),
    /// Respond with text only
    TextOnly(String),
    /// Fail with the error
    Error(GenerationErrorKind),
}

/// Mock image generator.
///
/// Plays back a fixed sequence of responses and records the model of every
/// request it receives.
#[derive(Clone)]
pub struct MockImageGenerator {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    models: Arc<Mutex<Vec<String>>>,
    delay: Duration,
}

impl MockImageGenerator {
    /// Create a mock with a sequence of responses.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            models: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::from_millis(1),
        }
    }

    /// Create a mock that always answers with `image`.
    #[allow(dead_code)]
    pub fn new_image(image: ImageData) -> Self {
        Self::new_sequence(vec![MockResponse::Image(image); 16])
    }

    /// Simulated network latency.
    #[allow(dead_code)]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of generate calls.
    pub fn call_count(&self) -> usize {
        self.models.lock().unwrap().len()
    }

    /// Models requested, in order.
    pub fn models(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate_image(
        &self,
        request: &GenerationRequest,
    ) -> StoryboardResult<GenerationResponse> {
        self.models.lock().unwrap().push(request.model().clone());
        tokio::time::sleep(self.delay).await;

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(MockResponse::Image(image)) => {
                Ok(GenerationResponse::new(vec![ResponsePart::Image(image)]))
            }
            Some(MockResponse::TextOnly(text)) => {
                Ok(GenerationResponse::new(vec![ResponsePart::Text(text)]))
            }
            Some(MockResponse::Error(kind)) => {
                Err(StoryboardError::from(GenerationError::new(kind)))
            }
            None => Err(StoryboardError::from(GenerationError::new(
                GenerationErrorKind::InvalidResponse("Mock sequence exhausted".to_string()),
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

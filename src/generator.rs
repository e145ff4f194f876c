// Upstream text generator boundary
use async_trait::async_trait;
use thiserror::Error;

use crate::request::TravelRequest;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Generator backend error: {0}")]
    Backend(String),

    #[error("Generator produced empty output")]
    EmptyOutput,
}

/// Produces raw itinerary text for a travel request.
///
/// The text is expected to follow the `Day <n>: <title>` layout with
/// `Summary:`, `Estimated budget:` and `Historical/cultural detail:` labels,
/// but no well-formedness is guaranteed; the parser downstream is defensive.
#[async_trait]
pub trait ItineraryGenerator: Send + Sync {
    async fn generate(&self, request: &TravelRequest) -> Result<String, GeneratorError>;
}

/// Generator that always returns a fixed block of text. Useful for demos and
/// for exercising the pipeline without an upstream model.
pub struct StaticGenerator {
    text: String,
}

impl StaticGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl ItineraryGenerator for StaticGenerator {
    async fn generate(&self, _request: &TravelRequest) -> Result<String, GeneratorError> {
        if self.text.trim().is_empty() {
            return Err(GeneratorError::EmptyOutput);
        }
        Ok(self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Language, TravelProfile};

    fn request() -> TravelRequest {
        TravelRequest::new("Seville", 4, TravelProfile::Romantic, Language::Spanish)
    }

    #[tokio::test]
    async fn test_static_generator_returns_its_text() {
        let generator = StaticGenerator::new("Day 1: Alcazar\nSummary: gardens");
        let text = generator.generate(&request()).await.unwrap();
        assert!(text.starts_with("Day 1: Alcazar"));
    }

    #[tokio::test]
    async fn test_static_generator_rejects_empty_text() {
        let generator = StaticGenerator::new("   \n");
        let result = generator.generate(&request()).await;
        assert!(matches!(result, Err(GeneratorError::EmptyOutput)));
    }
}

// Orchestration: generate -> parse -> per-day image lookup
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::cache::{CacheConfig, CacheStatsReport, ImageUrlCache};
use crate::generator::{GeneratorError, ItineraryGenerator};
use crate::images::ImageSource;
use crate::parser::{ItineraryParser, ItineraryResult};
use crate::request::{RequestError, TravelRequest};

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid travel request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("Itinerary generation failed: {0}")]
    Generation(#[from] GeneratorError),
}

/// Assembled plan handed to the renderer. Parsing and image lookup never
/// fail a plan; their failures degrade to warnings and missing images.
#[derive(Debug, Clone, Serialize)]
pub struct TravelPlan {
    pub request: TravelRequest,
    pub itinerary: ItineraryResult,
    /// One entry per day, parallel to `itinerary.days`.
    pub day_images: Vec<Option<String>>,
    pub generated_at: DateTime<Utc>,
}

pub struct TravelPlanner {
    generator: Arc<dyn ItineraryGenerator>,
    images: Arc<dyn ImageSource>,
    image_cache: ImageUrlCache,
    parser: ItineraryParser,
}

impl TravelPlanner {
    pub fn new(generator: Arc<dyn ItineraryGenerator>, images: Arc<dyn ImageSource>) -> Self {
        Self::with_cache_config(generator, images, CacheConfig::default())
    }

    pub fn with_cache_config(
        generator: Arc<dyn ItineraryGenerator>,
        images: Arc<dyn ImageSource>,
        cache_config: CacheConfig,
    ) -> Self {
        Self {
            generator,
            images,
            image_cache: ImageUrlCache::new(cache_config),
            parser: ItineraryParser::new(),
        }
    }

    /// Runs one planning pass for the request.
    ///
    /// Day images are looked up concurrently, one per day title, with the
    /// cache consulted first. A day whose lookup fails gets `None`.
    pub async fn plan(&self, request: TravelRequest) -> Result<TravelPlan, PlanError> {
        request.validate()?;

        let raw_text = self.generator.generate(&request).await?;
        let itinerary = self.parser.parse(&raw_text);
        tracing::info!(
            destination = %request.destination,
            days = itinerary.days.len(),
            warnings = itinerary.warnings.len(),
            structured = itinerary.is_structured(),
            "itinerary parsed"
        );

        let lookups = itinerary.days.iter().map(|day| self.image_for(&day.title));
        let day_images = join_all(lookups).await;

        Ok(TravelPlan {
            request,
            itinerary,
            day_images,
            generated_at: Utc::now(),
        })
    }

    async fn image_for(&self, title: &str) -> Option<String> {
        if let Some(url) = self.image_cache.get(title) {
            return Some(url);
        }
        let url = self.images.find_image(title).await?;
        self.image_cache.store(title, url.clone());
        Some(url)
    }

    pub fn cache_stats(&self) -> CacheStatsReport {
        self.image_cache.stats()
    }
}

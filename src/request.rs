// Travel request configuration passed into the planning boundary
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_TRIP_DAYS: u32 = 1;
pub const MAX_TRIP_DAYS: u32 = 30;

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Destination must not be empty")]
    EmptyDestination,

    #[error("Trip length must be between 1 and 30 days, got {0}")]
    InvalidDuration(u32),
}

/// Travel profile the itinerary is tailored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelProfile {
    Romantic,
    Adventure,
    Family,
    Budget,
}

impl TravelProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelProfile::Romantic => "romantic",
            TravelProfile::Adventure => "adventure",
            TravelProfile::Family => "family",
            TravelProfile::Budget => "budget",
        }
    }
}

/// Language the generated itinerary text is written in. The day-marker and
/// field-label contract with the generator stays English regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Portuguese,
    English,
    Spanish,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Portuguese => "Portuguese",
            Language::English => "English",
            Language::Spanish => "Spanish",
        }
    }
}

/// Explicit configuration for one planning run, carried through the whole
/// generator -> parser -> renderer chain instead of ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelRequest {
    pub destination: String,
    pub num_days: u32,
    pub profile: TravelProfile,
    pub language: Language,
}

impl TravelRequest {
    pub fn new(
        destination: impl Into<String>,
        num_days: u32,
        profile: TravelProfile,
        language: Language,
    ) -> Self {
        Self {
            destination: destination.into(),
            num_days,
            profile,
            language,
        }
    }

    pub fn validate(&self) -> Result<(), RequestError> {
        if self.destination.trim().is_empty() {
            return Err(RequestError::EmptyDestination);
        }
        if self.num_days < MIN_TRIP_DAYS || self.num_days > MAX_TRIP_DAYS {
            return Err(RequestError::InvalidDuration(self.num_days));
        }
        Ok(())
    }
}

//! Core data models for reviewcard
//!
//! This module contains the review type shared by the cache, the remote
//! source and the renderer, plus the widget's construction parameters.

pub mod places;

pub use places::{PlaceReviews, PlacesClient, PlacesError, ReviewSource};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single third-party review of the business
///
/// Field names match the provider's JSON so cached payloads and provider
/// payloads share one shape. `rating` is kept as received; renderers clamp it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Display name of the reviewer
    pub author_name: String,
    /// Star rating, nominally 0-5
    pub rating: i32,
    /// Review body
    #[serde(default)]
    pub text: String,
}

impl Review {
    pub fn new(author_name: impl Into<String>, rating: i32, text: impl Into<String>) -> Self {
        Self {
            author_name: author_name.into(),
            rating,
            text: text.into(),
        }
    }
}

/// Construction parameters for a review widget
///
/// Immutable for the widget's lifetime. The credential is redacted from
/// `Debug` output so it never reaches logs.
#[derive(Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Identifier of the business at the review source
    pub source_id: String,
    /// Secret used to authenticate with the review source
    pub credential: String,
    /// Id of the page region the widget renders into
    pub target_container_id: String,
}

impl WidgetConfig {
    pub fn new(
        source_id: impl Into<String>,
        credential: impl Into<String>,
        target_container_id: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            credential: credential.into(),
            target_container_id: target_container_id.into(),
        }
    }
}

impl fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("source_id", &self.source_id)
            .field("credential", &"<redacted>")
            .field("target_container_id", &self.target_container_id)
            .finish()
    }
}

//! The review widget
//!
//! Coordinates the cache, the remote review source and the render target:
//! a fresh cache entry is rendered directly; otherwise reviews are fetched,
//! cached and rendered, and any failure or empty result renders the fixed
//! fallback reviews instead. No error ever leaves `fetch_reviews` or `init`.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{CachePolicy, KeyValueStore, ReviewCache};
use crate::data::{PlacesError, Review, ReviewSource, WidgetConfig};
use crate::render::cards::MAX_REVIEWS;
use crate::render::{render_fallback, render_reviews, Document};

/// Default limit on how long the remote call may take
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// What a `fetch_reviews` call ended up rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Fresh reviews from the cache
    Cached,
    /// Reviews just fetched from the source
    Live,
    /// The fixed fallback reviews
    Fallback,
}

/// Why live reviews could not be shown
#[derive(Debug, Error)]
enum FetchFailure {
    #[error(transparent)]
    Source(#[from] PlacesError),

    #[error("review source did not answer within {0:?}")]
    TimedOut(Duration),

    #[error("review source returned no reviews")]
    Empty,
}

/// Renders third-party reviews for one business into one page region
pub struct ReviewWidget<S, F, D> {
    config: WidgetConfig,
    cache: ReviewCache<S>,
    source: F,
    document: Mutex<D>,
    /// Held for a whole fetch so concurrent calls run one at a time
    in_flight: tokio::sync::Mutex<()>,
    fetch_timeout: Duration,
}

impl<S, F, D> ReviewWidget<S, F, D>
where
    S: KeyValueStore,
    F: ReviewSource,
    D: Document,
{
    /// Creates a widget rendering into `document`
    pub fn new(
        config: WidgetConfig,
        store: S,
        policy: CachePolicy,
        source: F,
        document: D,
    ) -> Self {
        Self {
            config,
            cache: ReviewCache::new(store, policy),
            source,
            document: Mutex::new(document),
            in_flight: tokio::sync::Mutex::new(()),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    /// Replace the remote call timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn cache(&self) -> &ReviewCache<S> {
        &self.cache
    }

    /// Runs `f` against the document
    pub fn with_document<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        let document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        f(&document)
    }

    /// Consumes the widget, returning the document it rendered into
    pub fn into_document(self) -> D {
        self.document
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached reviews, if a fresh and readable entry exists
    pub fn get_cached_reviews(&self) -> Option<Vec<Review>> {
        self.cache.get_cached_reviews()
    }

    /// Caches `reviews` with the current time; write failures are only logged
    pub fn cache_reviews(&self, reviews: &[Review]) {
        self.cache.cache_reviews(reviews);
    }

    /// Renders the freshest reviews available
    pub async fn fetch_reviews(&self) -> RenderOutcome {
        let _in_flight = self.in_flight.lock().await;

        if let Some(cached) = self.get_cached_reviews() {
            debug!(count = cached.len(), "using cached reviews");
            self.display_reviews(&cached);
            return RenderOutcome::Cached;
        }

        match self.fetch_live().await {
            Ok(reviews) => {
                self.cache_reviews(&reviews);
                self.display_reviews(&reviews);
                RenderOutcome::Live
            }
            Err(e) => {
                warn!(error = %e, "showing fallback reviews");
                self.display_fallback_reviews();
                RenderOutcome::Fallback
            }
        }
    }

    /// Fetches reviews from the source, keeping the first three
    async fn fetch_live(&self) -> Result<Vec<Review>, FetchFailure> {
        let request = self
            .source
            .fetch_place_reviews(&self.config.source_id, &self.config.credential);
        let place = tokio::time::timeout(self.fetch_timeout, request)
            .await
            .map_err(|_| FetchFailure::TimedOut(self.fetch_timeout))??;

        if place.reviews.is_empty() {
            return Err(FetchFailure::Empty);
        }

        info!(
            received = place.reviews.len(),
            rating = ?place.rating,
            total_ratings = ?place.total_ratings,
            "fetched live reviews"
        );

        let mut reviews = place.reviews;
        reviews.truncate(MAX_REVIEWS);
        Ok(reviews)
    }

    /// Replaces the target region with cards for up to three reviews
    pub fn display_reviews(&self, reviews: &[Review]) {
        self.render(&render_reviews(reviews));
    }

    /// Replaces the target region with the fixed fallback reviews
    pub fn display_fallback_reviews(&self) {
        self.render(&render_fallback());
    }

    fn render(&self, markup: &str) {
        let target = &self.config.target_container_id;
        let mut document = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        if !document.replace_content(target, markup) {
            debug!(target_id = %target, "render target not found");
        }
    }

    /// Starts the widget once the page is ready
    pub async fn init(&self) -> RenderOutcome {
        self.fetch_reviews().await
    }
}

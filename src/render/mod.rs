//! Rendering of review cards into page regions
//!
//! A `Document` is anything with regions addressable by id whose content can
//! be replaced wholesale. `HtmlPage` edits a real HTML file; `MemoryDocument`
//! keeps regions in a map.

pub mod cards;
mod page;

pub use cards::{
    fallback_reviews, render_card, render_fallback, render_reviews, star_indicator, truncate_text,
};
pub use page::HtmlPage;

use std::collections::HashMap;

/// A render target with regions addressed by id
pub trait Document: Send {
    /// Replaces the entire content of the region `id` with `markup`
    ///
    /// Returns `false`, leaving the document untouched, when no region has that id.
    fn replace_content(&mut self, id: &str, markup: &str) -> bool;
}

/// Regions held in memory, keyed by id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    regions: HashMap<String, String>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty region
    pub fn with_region(mut self, id: impl Into<String>) -> Self {
        self.regions.insert(id.into(), String::new());
        self
    }

    /// Current content of a region
    pub fn content(&self, id: &str) -> Option<&str> {
        self.regions.get(id).map(String::as_str)
    }
}

impl Document for MemoryDocument {
    fn replace_content(&mut self, id: &str, markup: &str) -> bool {
        match self.regions.get_mut(id) {
            Some(content) => {
                *content = markup.to_string();
                true
            }
            None => false,
        }
    }
}

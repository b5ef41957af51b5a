//! reviewcard library
//!
//! Fetches a business's reviews through a proxy, caches them for a day, and
//! renders them into a page region, falling back to fixed reviews whenever
//! live data is unavailable.

pub mod cache;
pub mod cli;
pub mod data;
pub mod render;
pub mod widget;

pub use widget::{RenderOutcome, ReviewWidget};

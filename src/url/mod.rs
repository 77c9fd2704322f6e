//! URL handling module for Letterboxd-Harvest
//!
//! This module builds the page URLs the crawler fetches and normalizes
//! extracted link targets into member handles.

mod handle;
mod site;

pub use handle::Handle;
pub use site::SiteUrls;

//! Domain types: posts, site configuration, and the rules around them.

pub mod error;
pub mod fields;
pub mod navigation;
pub mod posts;
pub mod site_config;

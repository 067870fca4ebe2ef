//! Application services: post queries, site configuration, rendering, archives.

pub mod archive;
pub mod error;
pub mod health;
pub mod outcome;
pub mod posts;
pub mod render;
pub mod repos;
pub mod site_config;

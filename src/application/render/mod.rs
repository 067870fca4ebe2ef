//! Markdown rendering pipeline.
//!
//! The pipeline is pure: it accepts markdown, produces deterministic HTML
//! plus a few counters, and never touches the network or the database.

mod service;
mod types;

pub use service::{
    AssetExtension, ComrakRenderService, DEFAULT_CDN_HOST, DEFAULT_LEGACY_ASSET_HOST,
    LegacyAssetRewriter, RenderConfigError, RenderPipelineConfig,
};
pub use types::{RenderError, RenderOutput, RenderRequest, RenderService};

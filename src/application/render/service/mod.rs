mod config;
mod legacy;
mod rewrite;

use comrak::{Arena, format_html, nodes::AstNode, parse_document};
use thiserror::Error;
use tracing::debug;

use crate::application::render::types::{
    RenderError, RenderOutput, RenderRequest, RenderService,
};

pub use legacy::{AssetExtension, LegacyAssetRewriter};

use config::{build_post_sanitizer, default_options};
use rewrite::wrap_captioned_images;

pub const DEFAULT_LEGACY_ASSET_HOST: &str = "cms.perakasem.com";
pub const DEFAULT_CDN_HOST: &str = "assets.perakasem.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPipelineConfig {
    pub legacy_asset_host: String,
    pub cdn_host: String,
    pub asset_extension: AssetExtension,
    pub sanitize: bool,
}

impl Default for RenderPipelineConfig {
    fn default() -> Self {
        Self {
            legacy_asset_host: DEFAULT_LEGACY_ASSET_HOST.to_string(),
            cdn_host: DEFAULT_CDN_HOST.to_string(),
            asset_extension: AssetExtension::default(),
            sanitize: false,
        }
    }
}

impl From<&crate::config::RenderSettings> for RenderPipelineConfig {
    fn from(settings: &crate::config::RenderSettings) -> Self {
        Self {
            legacy_asset_host: settings.legacy_asset_host.clone(),
            cdn_host: settings.cdn_host.clone(),
            asset_extension: settings.asset_extension,
            sanitize: settings.sanitize,
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderConfigError {
    #[error("legacy asset host `{host}` cannot be matched: {source}")]
    LegacyHost {
        host: String,
        #[source]
        source: regex::Error,
    },
}

/// Comrak-based pipeline: legacy URL rewrite, GFM parse with raw HTML,
/// figure wrapping, then optional Ammonia sanitisation.
pub struct ComrakRenderService {
    options: comrak::options::Options<'static>,
    legacy: LegacyAssetRewriter,
    sanitizer: Option<ammonia::Builder<'static>>,
}

impl ComrakRenderService {
    pub fn new(config: &RenderPipelineConfig) -> Result<Self, RenderConfigError> {
        let legacy = LegacyAssetRewriter::new(
            &config.legacy_asset_host,
            &config.cdn_host,
            config.asset_extension,
        )
        .map_err(|source| RenderConfigError::LegacyHost {
            host: config.legacy_asset_host.clone(),
            source,
        })?;

        Ok(Self {
            options: default_options(),
            legacy,
            sanitizer: config.sanitize.then(build_post_sanitizer),
        })
    }
}

impl RenderService for ComrakRenderService {
    fn render(&self, request: &RenderRequest) -> Result<RenderOutput, RenderError> {
        let (markdown, legacy_urls_rewritten) = self.legacy.rewrite(&request.markdown);

        let arena = Arena::new();
        let root = parse_document(&arena, &markdown, &self.options);

        let figures = wrap_captioned_images(root);
        let rendered_html = render_html_stage(root, &self.options)?;
        let html = match &self.sanitizer {
            Some(sanitizer) => sanitizer.clean(&rendered_html).to_string(),
            None => rendered_html,
        };

        debug!(
            target = "application::render",
            slug = %request.slug,
            legacy_urls_rewritten,
            figures,
            sanitized = self.sanitizer.is_some(),
            "Rendered markdown"
        );

        Ok(RenderOutput {
            html,
            legacy_urls_rewritten,
            figures,
        })
    }
}

fn render_html_stage<'a>(
    root: &'a AstNode<'a>,
    options: &comrak::options::Options<'static>,
) -> Result<String, RenderError> {
    let mut html = String::new();
    format_html(root, options, &mut html).map_err(|err| RenderError::Markdown {
        message: err.to_string(),
    })?;
    Ok(html)
}

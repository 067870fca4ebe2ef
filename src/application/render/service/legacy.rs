//! Source-level rewrite of asset URLs served by the retired CMS.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use regex::{Captures, Regex};
use serde::Deserialize;

/// Whether a rewritten CDN URL keeps the file extension of the legacy URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetExtension {
    #[default]
    Strip,
    Preserve,
}

impl AssetExtension {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetExtension::Strip => "strip",
            AssetExtension::Preserve => "preserve",
        }
    }
}

impl fmt::Display for AssetExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetExtension {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strip" => Ok(AssetExtension::Strip),
            "preserve" => Ok(AssetExtension::Preserve),
            other => Err(format!("unknown asset extension policy `{other}`")),
        }
    }
}

/// Rewrites `http(s)://<legacy-host>/assets/<id>[.<ext>]` to `https://<cdn-host>/<id>[.<ext>]`.
#[derive(Debug, Clone)]
pub struct LegacyAssetRewriter {
    pattern: Regex,
    cdn_host: String,
    extension: AssetExtension,
}

impl LegacyAssetRewriter {
    pub fn new(
        legacy_host: &str,
        cdn_host: &str,
        extension: AssetExtension,
    ) -> Result<Self, regex::Error> {
        let pattern = Regex::new(&format!(
            r"https?://{}/assets/([A-Za-z0-9_.-]+)",
            regex::escape(legacy_host.trim().trim_end_matches('/'))
        ))?;
        Ok(Self {
            pattern,
            cdn_host: cdn_host.trim().trim_end_matches('/').to_string(),
            extension,
        })
    }

    /// Returns the rewritten source and the number of URLs replaced.
    pub fn rewrite<'a>(&self, source: &'a str) -> (Cow<'a, str>, usize) {
        let mut rewritten = 0;
        let output = self.pattern.replace_all(source, |caps: &Captures<'_>| {
            rewritten += 1;
            let token = &caps[1];
            let name = token.trim_end_matches('.');
            let trailing = &token[name.len()..];
            let (id, ext) = split_extension(name);
            match (self.extension, ext) {
                (AssetExtension::Preserve, Some(ext)) => {
                    format!("https://{}/{id}.{ext}{trailing}", self.cdn_host)
                }
                _ => format!("https://{}/{id}{trailing}", self.cdn_host),
            }
        });
        (output, rewritten)
    }
}

/// Split `name` at its last dot when the suffix looks like a file extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((id, ext))
            if !id.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|ch| ch.is_ascii_alphanumeric()) =>
        {
            (id, Some(ext))
        }
        _ => (name, None),
    }
}

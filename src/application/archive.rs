//! TOML archive of posts and the site configuration.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    PostListScope, PostsRepo, PostsWriteRepo, RepoError, SiteConfigRepo, UpsertPostParams,
};
use crate::application::site_config::{config_from_record, record_from_config};
use crate::domain::error::DomainError;
use crate::domain::posts::{Post, PostForm};
use crate::domain::site_config::SiteConfig;
use crate::util::dates::parse_post_date;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode archive: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("invalid archive: {0}")]
    Decode(#[from] toml::de::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteArchive {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_config: Option<SiteConfig>,
    #[serde(default)]
    pub posts: Vec<PostSnapshot>,
}

impl SiteArchive {
    fn normalize(&mut self) {
        self.posts.sort_by(|a, b| a.slug.cmp(&b.slug));
    }

    pub fn encode(&self) -> Result<String, ArchiveError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn decode(input: &str) -> Result<Self, ArchiveError> {
        let mut archive: SiteArchive = toml::from_str(input)?;
        archive.normalize();
        Ok(archive)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSnapshot {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub form: PostForm,
    #[serde(default)]
    pub category: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub chapter: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

impl From<Post> for PostSnapshot {
    fn from(post: Post) -> Self {
        Self {
            date: post.date.to_string(),
            slug: post.slug,
            title: post.title,
            subtitle: post.subtitle,
            form: post.form,
            category: post.category,
            tags: post.tags,
            chapter: post.chapter,
            excerpt: post.excerpt,
            content: post.content,
            published: post.published,
            featured_image: post.featured_image,
        }
    }
}

impl TryFrom<PostSnapshot> for UpsertPostParams {
    type Error = DomainError;

    fn try_from(snapshot: PostSnapshot) -> Result<Self, Self::Error> {
        if snapshot.slug.trim().is_empty() {
            return Err(DomainError::invalid_field("slug", "must not be empty"));
        }
        let date = parse_post_date(&snapshot.date).ok_or_else(|| {
            DomainError::invalid_field(
                "date",
                format!("`{}` is not a YYYY-MM-DD date", snapshot.date),
            )
        })?;

        Ok(Self {
            slug: snapshot.slug,
            title: snapshot.title,
            subtitle: snapshot.subtitle,
            form: snapshot.form,
            category: snapshot.category,
            date,
            tags: snapshot.tags,
            chapter: snapshot.chapter,
            excerpt: snapshot.excerpt,
            content: snapshot.content,
            published: snapshot.published,
            featured_image: snapshot.featured_image,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub posts: usize,
    pub site_config: bool,
}

/// Snapshot every post, drafts included, and the stored site configuration.
pub async fn export_archive(
    posts: &dyn PostsRepo,
    site: &dyn SiteConfigRepo,
) -> Result<SiteArchive, ArchiveError> {
    let all = posts.list_posts(PostListScope::All).await?;
    let site_config = site.load_site_config().await?.map(config_from_record);

    let mut archive = SiteArchive {
        site_config,
        posts: all.into_iter().map(PostSnapshot::from).collect(),
    };
    archive.normalize();
    Ok(archive)
}

/// Upsert every archived post by slug, then the site configuration.
///
/// The whole archive is validated before anything is written.
pub async fn import_archive(
    archive: SiteArchive,
    posts: &dyn PostsWriteRepo,
    site: &dyn SiteConfigRepo,
) -> Result<ImportSummary, ArchiveError> {
    let mut seen = HashSet::new();
    let mut params = Vec::with_capacity(archive.posts.len());
    for snapshot in archive.posts {
        if !seen.insert(snapshot.slug.clone()) {
            return Err(DomainError::DuplicateSlug {
                slug: snapshot.slug,
            }
            .into());
        }
        params.push(UpsertPostParams::try_from(snapshot)?);
    }

    let mut summary = ImportSummary::default();
    for param in params {
        posts.upsert_post(param).await?;
        summary.posts += 1;
    }

    if let Some(config) = archive.site_config {
        site.upsert_site_config(record_from_config(&config)).await?;
        summary.site_config = true;
    }

    Ok(summary)
}

pub async fn export_to_path(
    posts: &dyn PostsRepo,
    site: &dyn SiteConfigRepo,
    path: &Path,
) -> Result<(), ArchiveError> {
    let archive = export_archive(posts, site).await?;
    tokio::fs::write(path, archive.encode()?).await?;
    info!(
        target = "application::archive",
        path = %path.display(),
        posts = archive.posts.len(),
        "Archive exported"
    );
    Ok(())
}

pub async fn import_from_path(
    posts: &dyn PostsWriteRepo,
    site: &dyn SiteConfigRepo,
    path: &Path,
) -> Result<ImportSummary, ArchiveError> {
    let data = tokio::fs::read_to_string(path).await?;
    let summary = import_archive(SiteArchive::decode(&data)?, posts, site).await?;
    info!(
        target = "application::archive",
        path = %path.display(),
        posts = summary.posts,
        site_config = summary.site_config,
        "Archive imported"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::fixtures::post;

    #[test]
    fn snapshots_keep_iso_dates() {
        let snapshot = PostSnapshot::from(post("essay", (2024, 15)));
        assert_eq!(snapshot.date, "2024-01-15");

        let params = UpsertPostParams::try_from(snapshot).expect("valid snapshot");
        assert_eq!(params.date.to_string(), "2024-01-15");
    }

    #[test]
    fn bad_dates_are_rejected() {
        let mut snapshot = PostSnapshot::from(post("essay", (2024, 15)));
        snapshot.date = "15-01-2024".to_string();
        let err = UpsertPostParams::try_from(snapshot).expect_err("invalid date");
        assert!(matches!(err, DomainError::InvalidField { field: "date", .. }));
    }

    #[test]
    fn decode_fills_defaults_and_sorts() {
        let archive = SiteArchive::decode(
            r#"
            [[posts]]
            slug = "b"
            title = "B"
            date = "2024-02-01"

            [[posts]]
            slug = "a"
            title = "A"
            date = "2024-01-01"
            form = "shortform"
            published = true
            "#,
        )
        .expect("archive");

        assert!(archive.site_config.is_none());
        assert_eq!(archive.posts[0].slug, "a");
        assert_eq!(archive.posts[0].form, PostForm::Shortform);
        assert_eq!(archive.posts[1].form, PostForm::Longform);
        assert!(!archive.posts[1].published);
    }

    #[test]
    fn encoded_archive_decodes_to_the_same_value() {
        let archive = SiteArchive {
            site_config: Some(SiteConfig::default()),
            posts: vec![PostSnapshot::from(post("a", (2024, 3)))],
        };
        let decoded = SiteArchive::decode(&archive.encode().expect("encode")).expect("decode");
        assert_eq!(decoded, archive);
    }
}

//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::Date;

use crate::domain::posts::{Post, PostForm};
use crate::domain::site_config::{Artwork, FeaturedLink};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostListScope {
    /// Only rows with `published = true`.
    Published,
    All,
}

#[derive(Debug, Clone)]
pub struct UpsertPostParams {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub form: PostForm,
    pub category: String,
    pub date: Date,
    pub tags: Vec<String>,
    pub chapter: String,
    pub excerpt: String,
    pub content: String,
    pub published: bool,
    pub featured_image: Option<String>,
}

impl From<&Post> for UpsertPostParams {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            subtitle: post.subtitle.clone(),
            form: post.form,
            category: post.category.clone(),
            date: post.date,
            tags: post.tags.clone(),
            chapter: post.chapter.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            published: post.published,
            featured_image: post.featured_image.clone(),
        }
    }
}

/// The stored site configuration row. Every column is nullable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteConfigRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub current_chapter: Option<String>,
    pub url: Option<String>,
    pub watch: FeaturedLink,
    pub media: FeaturedLink,
    pub read: FeaturedLink,
    pub artwork: Artwork,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Posts in `scope`, newest first. Taxonomy fields are already scalar.
    async fn list_posts(&self, scope: PostListScope) -> Result<Vec<Post>, RepoError>;

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn upsert_post(&self, params: UpsertPostParams) -> Result<Post, RepoError>;
}

#[async_trait]
pub trait SiteConfigRepo: Send + Sync {
    async fn load_site_config(&self) -> Result<Option<SiteConfigRecord>, RepoError>;

    async fn upsert_site_config(&self, record: SiteConfigRecord) -> Result<(), RepoError>;
}

//! Post queries as the presentation layer consumes them.
//!
//! The public methods never fail: store errors are logged and degrade to an
//! empty list or `None`. The `*_outcome` variants keep the distinction.

use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::application::outcome::FetchOutcome;
use crate::application::render::{RenderError, RenderRequest, RenderService};
use crate::application::repos::{PostListScope, PostsRepo, RepoError};
use crate::domain::navigation::{Navigation, NavigationPolicy, navigation_for};
use crate::domain::posts::{Post, SortOrder, sort_posts_by_date};

pub const METRIC_STORE_FAILURE: &str = "pond_store_failure_total";

#[derive(Debug, Error)]
pub enum PostQueryError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A post together with its rendered body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPost {
    pub post: Post,
    pub html: String,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostsRepo>,
    renderer: Arc<dyn RenderService>,
    navigation_policy: NavigationPolicy,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        renderer: Arc<dyn RenderService>,
        navigation_policy: NavigationPolicy,
    ) -> Self {
        Self {
            posts,
            renderer,
            navigation_policy,
        }
    }

    pub async fn list_published(&self) -> Vec<Post> {
        log_failure("list_published", self.list_published_outcome().await).into_list()
    }

    pub async fn list_all(&self) -> Vec<Post> {
        log_failure("list_all", self.list_all_outcome().await).into_list()
    }

    pub async fn get_by_slug(&self, slug: &str) -> Option<RenderedPost> {
        log_failure("get_by_slug", self.get_by_slug_outcome(slug).await).into_option()
    }

    /// Circular neighbours of `slug` among published posts. An unknown slug,
    /// or a failed list, yields no links.
    pub async fn get_navigation(&self, slug: &str) -> Navigation {
        let posts = self.list_published().await;
        navigation_for(&posts, slug, self.navigation_policy)
    }

    pub async fn list_published_outcome(&self) -> FetchOutcome<Vec<Post>> {
        self.list_outcome(PostListScope::Published).await
    }

    pub async fn list_all_outcome(&self) -> FetchOutcome<Vec<Post>> {
        self.list_outcome(PostListScope::All).await
    }

    pub async fn get_by_slug_outcome(
        &self,
        slug: &str,
    ) -> FetchOutcome<RenderedPost, PostQueryError> {
        let post = match self.posts.find_post_by_slug(slug).await {
            Ok(Some(post)) => post,
            Ok(None) => return FetchOutcome::Empty,
            Err(err) => return FetchOutcome::Failed(err.into()),
        };

        let request = RenderRequest::new(post.slug.as_str(), post.content.as_str());
        match self.renderer.render(&request) {
            Ok(output) => FetchOutcome::Found(RenderedPost {
                post,
                html: output.html,
            }),
            Err(err) => FetchOutcome::Failed(err.into()),
        }
    }

    async fn list_outcome(&self, scope: PostListScope) -> FetchOutcome<Vec<Post>> {
        FetchOutcome::from_list(
            self.posts
                .list_posts(scope)
                .await
                .map(|posts| sort_posts_by_date(&posts, SortOrder::Descending)),
        )
    }
}

fn log_failure<T, E: std::error::Error>(
    query: &'static str,
    outcome: FetchOutcome<T, E>,
) -> FetchOutcome<T, E> {
    if let FetchOutcome::Failed(err) = &outcome {
        counter!(METRIC_STORE_FAILURE, "query" => query).increment(1);
        error!(
            target = "application::posts",
            query,
            error = %err,
            "Post query failed; serving empty result"
        );
    }
    outcome
}

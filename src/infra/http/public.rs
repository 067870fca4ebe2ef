use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use crate::{
    application::{
        error::HttpError,
        health::HealthProbe,
        posts::PostService,
        site_config::SiteConfigLoader,
    },
    domain::{
        navigation::Navigation,
        posts::{Post, format_tags_for_display},
    },
    util::dates::{DateStyle, convert_date_separators, format_date},
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub site_config: Arc<SiteConfigLoader>,
    pub health: Arc<dyn HealthProbe>,
}

/// Body of `GET /api/posts/{slug}`.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub html: String,
    pub navigation: Navigation,
    pub display: PostDisplay,
}

/// Pre-formatted strings for the post header and archive table.
#[derive(Debug, Serialize)]
pub struct PostDisplay {
    /// `January 15, 2024`.
    pub date: String,
    /// `15/01/2024`.
    pub archive_date: String,
    /// `film, essay`.
    pub tags: String,
}

impl PostDisplay {
    fn for_post(post: &Post) -> Self {
        let iso = post.date.to_string();
        Self {
            date: format_date(&iso, DateStyle::Long),
            archive_date: convert_date_separators(&iso),
            tags: format_tags_for_display(&post.tags),
        }
    }
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/api/posts", get(published_posts))
        .route("/api/posts/all", get(all_posts))
        .route("/api/posts/{slug}", get(post_detail))
        .route("/api/config", get(site_config))
        .route("/_health/db", get(db_health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn published_posts(State(state): State<HttpState>) -> Json<Vec<Post>> {
    Json(state.posts.list_published().await)
}

async fn all_posts(State(state): State<HttpState>) -> Json<Vec<Post>> {
    Json(state.posts.list_all().await)
}

async fn post_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let Some(rendered) = state
        .posts
        .get_by_slug(&slug)
        .await
        .filter(|rendered| rendered.post.published)
    else {
        return HttpError::new(
            "infra::http::public::post_detail",
            StatusCode::NOT_FOUND,
            "Post not found",
            format!("no published post with slug `{slug}`"),
        )
        .into_response();
    };

    let navigation = state.posts.get_navigation(&slug).await;
    let display = PostDisplay::for_post(&rendered.post);
    Json(PostDetail {
        display,
        post: rendered.post,
        html: rendered.html,
        navigation,
    })
    .into_response()
}

async fn site_config(State(state): State<HttpState>) -> Response {
    let config = state.site_config.load().await;
    Json(config.as_ref().clone()).into_response()
}

async fn db_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.ping().await)
}

async fn fallback() -> Response {
    HttpError::new(
        "infra::http::public::fallback",
        StatusCode::NOT_FOUND,
        "Not found",
        "no route matched",
    )
    .into_response()
}

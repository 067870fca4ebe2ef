//! Post entity, ordering, and display helpers.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Length/format taxonomy of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostForm {
    #[default]
    Longform,
    Shortform,
}

impl PostForm {
    pub fn as_str(self) -> &'static str {
        match self {
            PostForm::Longform => "longform",
            PostForm::Shortform => "shortform",
        }
    }
}

impl fmt::Display for PostForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostForm {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "longform" => Ok(PostForm::Longform),
            "shortform" => Ok(PostForm::Shortform),
            other => Err(format!("unknown post form `{other}`")),
        }
    }
}

/// A post as consumed by the application: taxonomy fields are always scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub form: PostForm,
    pub category: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub tags: Vec<String>,
    pub chapter: String,
    pub excerpt: String,
    pub content: String,
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Compare two posts by publication date in the requested order.
pub fn compare_dates(a: &Post, b: &Post, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Ascending => a.date.cmp(&b.date),
        SortOrder::Descending => b.date.cmp(&a.date),
    }
}

/// Return a sorted copy of `posts`. Equal dates keep their original order.
pub fn sort_posts_by_date(posts: &[Post], order: SortOrder) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| compare_dates(a, b, order));
    sorted
}

pub fn format_tags_for_display<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|tag| tag.as_ref())
        .collect::<Vec<&str>>()
        .join(", ")
}

//! Circular previous/next navigation over the published post list.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::posts::Post;

/// What a lone post links to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
    /// Indices wrap unconditionally; a single post links to itself.
    #[default]
    Circular,
    /// Indices wrap, but links resolving to the current post are dropped.
    SkipSelf,
}

impl FromStr for NavigationPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "circular" => Ok(NavigationPolicy::Circular),
            "skip_self" | "skip-self" => Ok(NavigationPolicy::SkipSelf),
            other => Err(format!("unknown navigation policy `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub previous: Option<Post>,
    pub next: Option<Post>,
}

impl Navigation {
    pub fn is_empty(&self) -> bool {
        self.previous.is_none() && self.next.is_none()
    }
}

/// Resolve neighbours of `slug` in a list sorted newest first.
///
/// `previous` is the next-older post and `next` the next-newer one; both wrap
/// around the ends of the list. An unknown slug yields no links.
pub fn navigation_for(posts: &[Post], slug: &str, policy: NavigationPolicy) -> Navigation {
    let Some(index) = posts.iter().position(|post| post.slug == slug) else {
        return Navigation::default();
    };

    let total = posts.len();
    let previous_index = (index + 1) % total;
    let next_index = (index + total - 1) % total;

    let pick = |candidate: usize| match policy {
        NavigationPolicy::SkipSelf if candidate == index => None,
        _ => posts.get(candidate).cloned(),
    };

    Navigation {
        previous: pick(previous_index),
        next: pick(next_index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::posts::fixtures::post;

    fn slug(post: &Option<Post>) -> Option<&str> {
        post.as_ref().map(|post| post.slug.as_str())
    }

    fn three() -> Vec<Post> {
        vec![
            post("a", (2024, 30)),
            post("b", (2024, 15)),
            post("c", (2024, 1)),
        ]
    }

    #[test]
    fn newest_post_wraps_to_oldest() {
        let posts = three();

        let first = navigation_for(&posts, "a", NavigationPolicy::Circular);
        assert_eq!(slug(&first.previous), Some("b"));
        assert_eq!(slug(&first.next), Some("c"));

        let last = navigation_for(&posts, "c", NavigationPolicy::Circular);
        assert_eq!(slug(&last.previous), Some("a"));
        assert_eq!(slug(&last.next), Some("b"));
    }

    #[test]
    fn middle_post_links_both_neighbours() {
        let nav = navigation_for(&three(), "b", NavigationPolicy::Circular);
        assert_eq!(slug(&nav.previous), Some("c"));
        assert_eq!(slug(&nav.next), Some("a"));
    }

    #[test]
    fn unknown_slug_has_no_links() {
        let nav = navigation_for(&three(), "missing", NavigationPolicy::Circular);
        assert!(nav.is_empty());
        assert!(navigation_for(&[], "a", NavigationPolicy::Circular).is_empty());
    }

    #[test]
    fn single_post_depends_on_policy() {
        let posts = vec![post("only", (2024, 3))];

        let circular = navigation_for(&posts, "only", NavigationPolicy::Circular);
        assert_eq!(slug(&circular.previous), Some("only"));
        assert_eq!(slug(&circular.next), Some("only"));

        let skipping = navigation_for(&posts, "only", NavigationPolicy::SkipSelf);
        assert!(skipping.is_empty());
    }

    #[test]
    fn two_posts_point_at_each_other() {
        let posts = vec![post("new", (2024, 9)), post("old", (2024, 2))];
        let nav = navigation_for(&posts, "new", NavigationPolicy::SkipSelf);
        assert_eq!(slug(&nav.previous), Some("old"));
        assert_eq!(slug(&nav.next), Some("old"));
    }

    #[test]
    fn policies_parse_from_config_values() {
        assert_eq!(
            "skip-self".parse::<NavigationPolicy>(),
            Ok(NavigationPolicy::SkipSelf)
        );
        assert_eq!(
            "Circular".parse::<NavigationPolicy>(),
            Ok(NavigationPolicy::Circular)
        );
        assert!("random".parse::<NavigationPolicy>().is_err());
    }
}

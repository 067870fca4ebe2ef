mod read;
mod types;
mod write;

use super::PostgresRepositories;

/// Taxonomy columns go through `to_jsonb` so text and `text[]` columns decode
/// through the same row type.
const POST_COLUMNS: &str = "id, slug, title, subtitle, \
    to_jsonb(form) AS form, to_jsonb(category) AS category, date, tags, \
    to_jsonb(chapter) AS chapter, excerpt, content, published, featured_image";

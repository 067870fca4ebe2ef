use time::Date;
use tracing::warn;
use uuid::Uuid;

use crate::domain::fields::FlexibleField;
use crate::domain::posts::{Post, PostForm};

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) subtitle: Option<String>,
    pub(crate) form: Option<serde_json::Value>,
    pub(crate) category: Option<serde_json::Value>,
    pub(crate) date: Date,
    pub(crate) tags: Option<Vec<String>>,
    pub(crate) chapter: Option<serde_json::Value>,
    pub(crate) excerpt: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) published: bool,
    pub(crate) featured_image: Option<String>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        let form_raw = FlexibleField::from(row.form).into_scalar();
        let form = form_raw.parse::<PostForm>().unwrap_or_else(|err| {
            warn!(
                target = "infra::db::posts",
                slug = %row.slug,
                error = %err,
                "Unrecognised post form; treating as longform"
            );
            PostForm::default()
        });

        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            subtitle: row.subtitle.unwrap_or_default(),
            form,
            category: FlexibleField::from(row.category).into_scalar(),
            date: row.date,
            tags: row.tags.unwrap_or_default(),
            chapter: FlexibleField::from(row.chapter).into_scalar(),
            excerpt: row.excerpt.unwrap_or_default(),
            content: row.content.unwrap_or_default(),
            published: row.published,
            featured_image: row.featured_image,
        }
    }
}

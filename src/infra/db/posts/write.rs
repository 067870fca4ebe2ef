use async_trait::async_trait;
use uuid::Uuid;

use crate::application::repos::{PostsWriteRepo, RepoError, UpsertPostParams};
use crate::domain::fields::{FieldShape, string_to_array};
use crate::domain::posts::Post;
use crate::infra::db::map_sqlx_error;

use super::types::PostRow;
use super::{POST_COLUMNS, PostgresRepositories};

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn upsert_post(&self, params: UpsertPostParams) -> Result<Post, RepoError> {
        let UpsertPostParams {
            slug,
            title,
            subtitle,
            form,
            category,
            date,
            tags,
            chapter,
            excerpt,
            content,
            published,
            featured_image,
        } = params;

        let sql = format!(
            r#"
            INSERT INTO posts (
                id, slug, title, subtitle, form, category, date, tags, chapter,
                excerpt, content, published, featured_image, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, now(), now())
            ON CONFLICT (slug) DO UPDATE SET
                title = EXCLUDED.title,
                subtitle = EXCLUDED.subtitle,
                form = EXCLUDED.form,
                category = EXCLUDED.category,
                date = EXCLUDED.date,
                tags = EXCLUDED.tags,
                chapter = EXCLUDED.chapter,
                excerpt = EXCLUDED.excerpt,
                content = EXCLUDED.content,
                published = EXCLUDED.published,
                featured_image = EXCLUDED.featured_image,
                updated_at = now()
            RETURNING {POST_COLUMNS}
            "#
        );

        let query = sqlx::query_as::<_, PostRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(slug)
            .bind(title)
            .bind((!subtitle.is_empty()).then_some(subtitle));

        // $5, $6 and $9 follow the deployment's column shape.
        let query = match self.field_shape() {
            FieldShape::Scalar => query
                .bind(form.as_str())
                .bind(category)
                .bind(date)
                .bind(tags)
                .bind(chapter),
            FieldShape::Array => query
                .bind(string_to_array(form.as_str()))
                .bind(string_to_array(&category))
                .bind(date)
                .bind(tags)
                .bind(string_to_array(&chapter)),
        };

        let row = query
            .bind(excerpt)
            .bind(content)
            .bind(published)
            .bind(featured_image)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(Post::from(row))
    }
}

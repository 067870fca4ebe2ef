use async_trait::async_trait;
use sqlx::QueryBuilder;

use crate::application::repos::{PostListScope, PostsRepo, RepoError};
use crate::domain::posts::Post;
use crate::infra::db::map_sqlx_error;

use super::types::PostRow;
use super::{POST_COLUMNS, PostgresRepositories};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(&self, scope: PostListScope) -> Result<Vec<Post>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(" FROM posts");
        if scope == PostListScope::Published {
            qb.push(" WHERE published = ");
            qb.push_bind(true);
        }
        qb.push(" ORDER BY date DESC");

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1 LIMIT 1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Post::from))
    }
}

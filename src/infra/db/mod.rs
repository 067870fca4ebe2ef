//! Postgres-backed repository implementations.

mod posts;
mod site_config;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    query,
};

use crate::application::health::HealthProbe;
use crate::application::repos::RepoError;
use crate::domain::fields::FieldShape;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
    field_shape: FieldShape,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool, field_shape: FieldShape) -> Self {
        Self {
            pool: Arc::new(pool),
            field_shape,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn field_shape(&self) -> FieldShape {
        self.field_shape
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(pool).await
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }
}

#[async_trait]
impl HealthProbe for PostgresRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        self.health_check().await.map_err(map_sqlx_error)
    }
}

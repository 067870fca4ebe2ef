use async_trait::async_trait;

use crate::application::repos::{RepoError, SiteConfigRecord, SiteConfigRepo};
use crate::domain::site_config::{Artwork, FeaturedLink};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct SiteConfigRow {
    title: Option<String>,
    description: Option<String>,
    current_chapter: Option<String>,
    base_url: Option<String>,
    watch_url: Option<String>,
    watch_title: Option<String>,
    watch_source: Option<String>,
    media_url: Option<String>,
    media_title: Option<String>,
    media_source: Option<String>,
    read_url: Option<String>,
    read_title: Option<String>,
    read_source: Option<String>,
    artwork_src: Option<String>,
    artwork_title: Option<String>,
    artwork_artist: Option<String>,
}

impl From<SiteConfigRow> for SiteConfigRecord {
    fn from(row: SiteConfigRow) -> Self {
        Self {
            title: row.title,
            description: row.description,
            current_chapter: row.current_chapter,
            url: row.base_url,
            watch: FeaturedLink {
                url: row.watch_url,
                title: row.watch_title,
                source: row.watch_source,
            },
            media: FeaturedLink {
                url: row.media_url,
                title: row.media_title,
                source: row.media_source,
            },
            read: FeaturedLink {
                url: row.read_url,
                title: row.read_title,
                source: row.read_source,
            },
            artwork: Artwork {
                src: row.artwork_src,
                title: row.artwork_title,
                artist: row.artwork_artist,
            },
        }
    }
}

#[async_trait]
impl SiteConfigRepo for PostgresRepositories {
    async fn load_site_config(&self) -> Result<Option<SiteConfigRecord>, RepoError> {
        let row = sqlx::query_as::<_, SiteConfigRow>(
            r#"
            SELECT title,
                   description,
                   current_chapter,
                   base_url,
                   watch_url,
                   watch_title,
                   watch_source,
                   media_url,
                   media_title,
                   media_source,
                   read_url,
                   read_title,
                   read_source,
                   artwork_src,
                   artwork_title,
                   artwork_artist
            FROM site_config
            LIMIT 1
            "#,
        )
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SiteConfigRecord::from))
    }

    async fn upsert_site_config(&self, record: SiteConfigRecord) -> Result<(), RepoError> {
        let SiteConfigRecord {
            title,
            description,
            current_chapter,
            url,
            watch,
            media,
            read,
            artwork,
        } = record;

        sqlx::query(
            r#"
            INSERT INTO site_config (
                id, title, description, current_chapter, base_url,
                watch_url, watch_title, watch_source,
                media_url, media_title, media_source,
                read_url, read_title, read_source,
                artwork_src, artwork_title, artwork_artist,
                updated_at
            )
            VALUES (
                1, COALESCE($1, ''), COALESCE($2, ''), COALESCE($3, ''), COALESCE($4, ''),
                $5, $6, $7,
                $8, $9, $10,
                $11, $12, $13,
                $14, $15, $16,
                now()
            )
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                current_chapter = EXCLUDED.current_chapter,
                base_url = EXCLUDED.base_url,
                watch_url = EXCLUDED.watch_url,
                watch_title = EXCLUDED.watch_title,
                watch_source = EXCLUDED.watch_source,
                media_url = EXCLUDED.media_url,
                media_title = EXCLUDED.media_title,
                media_source = EXCLUDED.media_source,
                read_url = EXCLUDED.read_url,
                read_title = EXCLUDED.read_title,
                read_source = EXCLUDED.read_source,
                artwork_src = EXCLUDED.artwork_src,
                artwork_title = EXCLUDED.artwork_title,
                artwork_artist = EXCLUDED.artwork_artist,
                updated_at = now()
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(current_chapter)
        .bind(url)
        .bind(watch.url)
        .bind(watch.title)
        .bind(watch.source)
        .bind(media.url)
        .bind(media.title)
        .bind(media.source)
        .bind(read.url)
        .bind(read.title)
        .bind(read.source)
        .bind(artwork.src)
        .bind(artwork.title)
        .bind(artwork.artist)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}

//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

pub use cli::{
    CheckArgs, CliArgs, Command, DatabaseOverride, ExportArgs, ImportArgs, RenderOverrides,
    ServeArgs, ServeOverrides,
};

use std::{
    net::SocketAddr,
    num::{NonZeroU32, NonZeroU64},
    str::FromStr,
    time::Duration,
};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::render::{AssetExtension, DEFAULT_CDN_HOST, DEFAULT_LEGACY_ASSET_HOST};
use crate::cache::DEFAULT_SITE_CONFIG_TTL_SECS;
use crate::domain::fields::FieldShape;
use crate::domain::navigation::NavigationPolicy;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "pond";
const ENV_PREFIX: &str = "POND";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub site: SiteSettings,
    pub render: RenderSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
    pub field_shape: FieldShape,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Replaces the stored base URL, as a development server does.
    pub base_url_override: Option<String>,
    pub navigation_policy: NavigationPolicy,
}

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub legacy_asset_host: String,
    pub cdn_host: String,
    pub asset_extension: AssetExtension,
    pub sanitize: bool,
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub enable_site_config_cache: bool,
    pub site_config_ttl_seconds: NonZeroU64,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Check(args)) => raw.apply_database_override(&args.database),
        Some(Command::Export(args)) => raw.apply_database_override(&args.database),
        Some(Command::Import(args)) => raw.apply_database_override(&args.database),
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    site: RawSiteSettings,
    render: RawRenderSettings,
    cache: RawCacheSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(max) = overrides.database_max_connections {
            self.database.max_connections = Some(max);
        }
        if let Some(url) = overrides.site_base_url_override.as_ref() {
            self.site.base_url_override = Some(url.clone());
        }
        if let Some(policy) = overrides.site_navigation_policy.as_ref() {
            self.site.navigation_policy = Some(policy.clone());
        }
        if let Some(ttl) = overrides.cache_site_config_ttl_seconds {
            self.cache.site_config_ttl_seconds = Some(ttl);
        }

        self.apply_database_override(&overrides.database);
        self.apply_render_overrides(&overrides.render);
    }

    fn apply_database_override(&mut self, overrides: &DatabaseOverride) {
        if let Some(url) = overrides.database_url.as_ref() {
            self.database.url = Some(url.clone());
        }
        if let Some(shape) = overrides.database_field_shape.as_ref() {
            self.database.field_shape = Some(shape.clone());
        }
    }

    fn apply_render_overrides(&mut self, overrides: &RenderOverrides) {
        if let Some(host) = overrides.legacy_asset_host.as_ref() {
            self.render.legacy_asset_host = Some(host.clone());
        }
        if let Some(host) = overrides.cdn_host.as_ref() {
            self.render.cdn_host = Some(host.clone());
        }
        if let Some(policy) = overrides.asset_extension.as_ref() {
            self.render.asset_extension = Some(policy.clone());
        }
        if let Some(sanitize) = overrides.sanitize {
            self.render.sanitize = Some(sanitize);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            database,
            site,
            render,
            cache,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            database: build_database_settings(database)?,
            site: build_site_settings(site)?,
            render: build_render_settings(render)?,
            cache: build_cache_settings(cache)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = non_blank(database.url);

    let max_connections = non_zero_u32(
        database
            .max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
            .into(),
        "database.max_connections",
    )?;

    let field_shape = parse_choice(database.field_shape, "database.field_shape")?;

    Ok(DatabaseSettings {
        url,
        max_connections,
        field_shape,
    })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let base_url_override = match non_blank(site.base_url_override) {
        Some(value) => {
            let parsed = Url::parse(&value).map_err(|err| {
                LoadError::invalid("site.base_url_override", format!("invalid URL: {err}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(LoadError::invalid(
                    "site.base_url_override",
                    "URL must use http or https",
                ));
            }
            Some(value.trim_end_matches('/').to_string())
        }
        None => None,
    };

    let navigation_policy = parse_choice(site.navigation_policy, "site.navigation_policy")?;

    Ok(SiteSettings {
        base_url_override,
        navigation_policy,
    })
}

fn build_render_settings(render: RawRenderSettings) -> Result<RenderSettings, LoadError> {
    let legacy_asset_host = bare_host(
        render.legacy_asset_host,
        DEFAULT_LEGACY_ASSET_HOST,
        "render.legacy_asset_host",
    )?;
    let cdn_host = bare_host(render.cdn_host, DEFAULT_CDN_HOST, "render.cdn_host")?;
    let asset_extension = parse_choice(render.asset_extension, "render.asset_extension")?;

    Ok(RenderSettings {
        legacy_asset_host,
        cdn_host,
        asset_extension,
        sanitize: render.sanitize.unwrap_or(false),
    })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let ttl = cache
        .site_config_ttl_seconds
        .unwrap_or(DEFAULT_SITE_CONFIG_TTL_SECS);
    let site_config_ttl_seconds = NonZeroU64::new(ttl).ok_or_else(|| {
        LoadError::invalid("cache.site_config_ttl_seconds", "must be greater than zero")
    })?;

    Ok(CacheSettings {
        enable_site_config_cache: cache.enable_site_config_cache.unwrap_or(true),
        site_config_ttl_seconds,
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
    field_shape: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    base_url_override: Option<String>,
    navigation_policy: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRenderSettings {
    legacy_asset_host: Option<String>,
    cdn_host: Option<String>,
    asset_extension: Option<String>,
    sanitize: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    enable_site_config_cache: Option<bool>,
    site_config_ttl_seconds: Option<u64>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }

    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Parse an optional enum-like value, falling back to its default when unset.
fn parse_choice<T>(value: Option<String>, key: &'static str) -> Result<T, LoadError>
where
    T: FromStr<Err = String> + Default,
{
    match non_blank(value) {
        Some(value) => value.parse().map_err(|reason| LoadError::invalid(key, reason)),
        None => Ok(T::default()),
    }
}

fn bare_host(
    value: Option<String>,
    default: &str,
    key: &'static str,
) -> Result<String, LoadError> {
    let host = match value {
        Some(value) => value.trim().trim_end_matches('/').to_string(),
        None => default.to_string(),
    };
    if host.is_empty() {
        return Err(LoadError::invalid(key, "host must not be empty"));
    }
    if host.contains("://") || host.contains('/') {
        return Err(LoadError::invalid(
            key,
            "expected a bare host name without scheme or path",
        ));
    }
    Ok(host)
}

#[cfg(test)]
mod tests;

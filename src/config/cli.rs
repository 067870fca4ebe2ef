use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the pond binary.
#[derive(Debug, Parser)]
#[command(name = "pond", version, about = "Pond publication back end")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "POND_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve the JSON API.
    Serve(Box<ServeArgs>),
    /// Verify configuration and database readiness before a deployment.
    Check(CheckArgs),
    /// Export posts and site configuration to a TOML archive.
    Export(ExportArgs),
    /// Upsert posts and site configuration from a TOML archive.
    Import(ImportArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override how taxonomy columns are stored (scalar|array).
    #[arg(long = "database-field-shape", value_name = "SHAPE")]
    pub database_field_shape: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct RenderOverrides {
    /// Override the host whose `/assets/` URLs are rewritten.
    #[arg(long = "render-legacy-asset-host", value_name = "HOST")]
    pub legacy_asset_host: Option<String>,

    /// Override the CDN host legacy asset URLs are rewritten to.
    #[arg(long = "render-cdn-host", value_name = "HOST")]
    pub cdn_host: Option<String>,

    /// Keep or drop file extensions on rewritten asset URLs (strip|preserve).
    #[arg(long = "render-asset-extension", value_name = "POLICY")]
    pub asset_extension: Option<String>,

    /// Toggle HTML sanitisation of rendered posts.
    #[arg(
        long = "render-sanitize",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub sanitize: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub database: DatabaseOverride,

    #[command(flatten)]
    pub render: RenderOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Replace the base URL of the served site configuration.
    #[arg(long = "site-base-url-override", value_name = "URL")]
    pub site_base_url_override: Option<String>,

    /// Previous/next behaviour for a lone post (circular|skip_self).
    #[arg(long = "site-navigation-policy", value_name = "POLICY")]
    pub site_navigation_policy: Option<String>,

    /// Override how long the site configuration stays cached.
    #[arg(long = "cache-site-config-ttl-seconds", value_name = "SECONDS")]
    pub cache_site_config_ttl_seconds: Option<u64>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Path to the export file to write.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ImportArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Path to the archive to import.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}

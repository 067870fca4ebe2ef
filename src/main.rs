use std::{process, sync::Arc};

use pond::{
    application::{
        archive,
        error::AppError,
        health::run_health_checks,
        posts::PostService,
        render::{ComrakRenderService, RenderPipelineConfig},
        site_config::SiteConfigLoader,
    },
    cache::{CacheConfig, SystemClock},
    config,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Check(_) => run_check(settings).await,
        config::Command::Export(args) => run_export(settings, args).await,
        config::Command::Import(args) => run_import(settings, args).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let renderer = ComrakRenderService::new(&RenderPipelineConfig::from(&settings.render))?;

    let posts = PostService::new(
        repositories.clone(),
        Arc::new(renderer),
        settings.site.navigation_policy,
    );
    let site_config = SiteConfigLoader::new(
        repositories.clone(),
        &CacheConfig::from(&settings.cache),
        Arc::new(SystemClock),
        settings.site.base_url_override.clone(),
    );

    let state = HttpState {
        posts: Arc::new(posts),
        site_config: Arc::new(site_config),
        health: repositories,
    };

    serve_http(&settings, state).await
}

async fn run_check(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;

    let report = run_health_checks(
        repositories.as_ref(),
        repositories.as_ref(),
        repositories.as_ref(),
    )
    .await
    .into_result()?;

    info!(
        target = "pond::check",
        checks = report.checks.len(),
        "Deployment checks passed"
    );
    Ok(())
}

async fn run_export(settings: config::Settings, args: config::ExportArgs) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let path = args.file;

    info!(
        target = "pond::export",
        path = %path.display(),
        "Starting export"
    );

    archive::export_to_path(repositories.as_ref(), repositories.as_ref(), &path).await?;
    info!(target = "pond::export", "Export completed");
    Ok(())
}

async fn run_import(settings: config::Settings, args: config::ImportArgs) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let path = args.file;

    info!(
        target = "pond::import",
        path = %path.display(),
        "Starting import"
    );

    let summary =
        archive::import_from_path(repositories.as_ref(), repositories.as_ref(), &path).await?;
    info!(
        target = "pond::import",
        posts = summary.posts,
        site_config = summary.site_config,
        "Import completed"
    );
    Ok(())
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or(InfraError::MissingDatabaseUrl)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(InfraError::Connect)?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(InfraError::from)?;

    Ok(Arc::new(PostgresRepositories::new(
        pool,
        settings.database.field_shape,
    )))
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| InfraError::bind(settings.server.addr, err))?;

    info!(
        target = "pond::serve",
        addr = %settings.server.addr,
        "Listening"
    );

    let grace = settings.server.graceful_shutdown;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!(
                target = "pond::serve",
                grace_seconds = grace.as_secs(),
                "Shutdown requested; draining connections"
            );
            tokio::spawn(async move {
                tokio::time::sleep(grace).await;
                warn!(target = "pond::serve", "Graceful shutdown timed out");
                process::exit(1);
            });
        })
        .await
        .map_err(InfraError::Serve)?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target = "pond::serve", error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

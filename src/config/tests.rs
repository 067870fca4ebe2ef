use super::*;

fn settings_with(overrides: ServeOverrides) -> Result<Settings, LoadError> {
    let mut raw = RawSettings::default();
    raw.apply_serve_overrides(&overrides);
    Settings::from_raw(raw)
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());
    raw.database.field_shape = Some("scalar".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        database: DatabaseOverride {
            database_url: Some("postgres://cli".to_string()),
            database_field_shape: Some("array".to_string()),
        },
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.database.url.as_deref(), Some("postgres://cli"));
    assert_eq!(settings.database.field_shape, FieldShape::Array);
}

#[test]
fn defaults_describe_a_local_deployment() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.to_string(), "127.0.0.1:3000");
    assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
    assert!(matches!(settings.logging.format, LogFormat::Compact));
    assert!(settings.database.url.is_none());
    assert_eq!(settings.database.max_connections.get(), 8);
    assert_eq!(settings.database.field_shape, FieldShape::Scalar);
    assert_eq!(settings.site.navigation_policy, NavigationPolicy::Circular);
    assert!(settings.site.base_url_override.is_none());
    assert_eq!(settings.render.legacy_asset_host, "cms.perakasem.com");
    assert_eq!(settings.render.cdn_host, "assets.perakasem.com");
    assert_eq!(settings.render.asset_extension, AssetExtension::Strip);
    assert!(!settings.render.sanitize);
}

#[test]
fn cache_settings_use_correct_defaults() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert!(settings.cache.enable_site_config_cache);
    assert_eq!(settings.cache.site_config_ttl_seconds.get(), 300);
}

#[test]
fn cache_settings_can_be_overridden_via_cli() {
    let settings = settings_with(ServeOverrides {
        cache_site_config_ttl_seconds: Some(60),
        ..Default::default()
    })
    .expect("valid settings");

    assert_eq!(settings.cache.site_config_ttl_seconds.get(), 60);
}

#[test]
fn zero_ttl_is_rejected() {
    let err = settings_with(ServeOverrides {
        cache_site_config_ttl_seconds: Some(0),
        ..Default::default()
    })
    .expect_err("zero ttl");

    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "cache.site_config_ttl_seconds",
            ..
        }
    ));
}

#[test]
fn cli_json_logging_enforces_format() {
    let settings = settings_with(ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    })
    .expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn render_overrides_apply() {
    let settings = settings_with(ServeOverrides {
        render: RenderOverrides {
            legacy_asset_host: Some("old.example.com".to_string()),
            cdn_host: Some("cdn.example.com/".to_string()),
            asset_extension: Some("preserve".to_string()),
            sanitize: Some(true),
        },
        ..Default::default()
    })
    .expect("valid settings");

    assert_eq!(settings.render.legacy_asset_host, "old.example.com");
    assert_eq!(settings.render.cdn_host, "cdn.example.com");
    assert_eq!(settings.render.asset_extension, AssetExtension::Preserve);
    assert!(settings.render.sanitize);
}

#[test]
fn hosts_must_be_bare() {
    let err = settings_with(ServeOverrides {
        render: RenderOverrides {
            cdn_host: Some("https://cdn.example.com".to_string()),
            ..Default::default()
        },
        ..Default::default()
    })
    .expect_err("scheme rejected");

    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "render.cdn_host",
            ..
        }
    ));
}

#[test]
fn unknown_choices_are_rejected() {
    let shape = settings_with(ServeOverrides {
        database: DatabaseOverride {
            database_field_shape: Some("csv".to_string()),
            ..Default::default()
        },
        ..Default::default()
    });
    assert!(matches!(
        shape,
        Err(LoadError::Invalid {
            key: "database.field_shape",
            ..
        })
    ));

    let policy = settings_with(ServeOverrides {
        site_navigation_policy: Some("random".to_string()),
        ..Default::default()
    });
    assert!(matches!(
        policy,
        Err(LoadError::Invalid {
            key: "site.navigation_policy",
            ..
        })
    ));
}

#[test]
fn base_url_override_must_be_http() {
    let settings = settings_with(ServeOverrides {
        site_base_url_override: Some("http://localhost:5173/pond/".to_string()),
        ..Default::default()
    })
    .expect("valid settings");
    assert_eq!(
        settings.site.base_url_override.as_deref(),
        Some("http://localhost:5173/pond")
    );

    let err = settings_with(ServeOverrides {
        site_base_url_override: Some("ftp://example.com".to_string()),
        ..Default::default()
    })
    .expect_err("ftp rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "site.base_url_override",
            ..
        }
    ));
}

#[test]
fn blank_database_url_counts_as_missing() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());
    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["pond"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "pond",
        "serve",
        "--server-port",
        "8080",
        "--render-sanitize",
        "yes",
        "--site-navigation-policy",
        "skip_self",
        "--cache-site-config-ttl-seconds",
        "120",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_port, Some(8080));
            assert_eq!(serve.overrides.render.sanitize, Some(true));
            assert_eq!(
                serve.overrides.site_navigation_policy.as_deref(),
                Some("skip_self")
            );
            assert_eq!(serve.overrides.cache_site_config_ttl_seconds, Some(120));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_check_arguments() {
    let args = CliArgs::parse_from([
        "pond",
        "check",
        "--database-url",
        "postgres://example",
        "--database-field-shape",
        "array",
    ]);

    match args.command.expect("check command") {
        Command::Check(check) => {
            assert_eq!(
                check.database.database_url.as_deref(),
                Some("postgres://example")
            );
            assert_eq!(check.database.database_field_shape.as_deref(), Some("array"));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_export_arguments() {
    let args = CliArgs::parse_from([
        "pond",
        "export",
        "--database-url",
        "postgres://example",
        "/tmp/pond.toml",
    ]);

    match args.command.expect("export command") {
        Command::Export(export) => {
            assert_eq!(
                export.database.database_url.as_deref(),
                Some("postgres://example")
            );
            assert_eq!(export.file, std::path::Path::new("/tmp/pond.toml"));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_import_arguments() {
    let args = CliArgs::parse_from(["pond", "import", "/tmp/pond.toml"]);

    match args.command.expect("import command") {
        Command::Import(import) => {
            assert!(import.database.database_url.is_none());
            assert_eq!(import.file, std::path::Path::new("/tmp/pond.toml"));
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn defaults_match_the_components_they_configure() {
    use crate::application::render::RenderPipelineConfig;
    use crate::cache::CacheConfig;

    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    let render = RenderPipelineConfig::from(&settings.render);
    assert_eq!(render, RenderPipelineConfig::default());

    let cache = CacheConfig::from(&settings.cache);
    assert_eq!(
        cache.site_config_ttl(),
        CacheConfig::default().site_config_ttl()
    );
}

//! Pre-deployment readiness checks.

use async_trait::async_trait;
use tracing::{error, info};

use crate::application::error::AppError;
use crate::application::repos::{PostListScope, PostsRepo, RepoError, SiteConfigRepo};

/// Cheap liveness probe against the backing store.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub outcome: Result<String, String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            outcome: Ok(detail.into()),
        }
    }

    fn fail(name: &'static str, err: impl std::fmt::Display) -> Self {
        Self {
            name,
            outcome: Err(err.to_string()),
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    pub checks: Vec<CheckResult>,
}

impl HealthReport {
    pub fn healthy(&self) -> bool {
        self.checks.iter().all(CheckResult::passed)
    }

    /// Log every check and turn any failure into an error.
    pub fn into_result(self) -> Result<Self, AppError> {
        for check in &self.checks {
            match &check.outcome {
                Ok(detail) => info!(
                    target = "application::health",
                    check = check.name,
                    %detail,
                    "Check passed"
                ),
                Err(reason) => error!(
                    target = "application::health",
                    check = check.name,
                    %reason,
                    "Check failed"
                ),
            }
        }

        let failed: Vec<&str> = self
            .checks
            .iter()
            .filter(|check| !check.passed())
            .map(|check| check.name)
            .collect();
        if failed.is_empty() {
            Ok(self)
        } else {
            Err(AppError::HealthCheck(failed.join(", ")))
        }
    }
}

/// Connection first; table reads only run once the store answers.
pub async fn run_health_checks(
    probe: &dyn HealthProbe,
    posts: &dyn PostsRepo,
    site: &dyn SiteConfigRepo,
) -> HealthReport {
    let mut report = HealthReport::default();

    match probe.ping().await {
        Ok(()) => report
            .checks
            .push(CheckResult::pass("database", "connection established")),
        Err(err) => {
            report.checks.push(CheckResult::fail("database", err));
            return report;
        }
    }

    report.checks.push(match posts.list_posts(PostListScope::All).await {
        Ok(rows) => CheckResult::pass("posts", format!("{} post(s) readable", rows.len())),
        Err(err) => CheckResult::fail("posts", err),
    });

    report.checks.push(match site.load_site_config().await {
        Ok(Some(_)) => CheckResult::pass("site_config", "row present"),
        Ok(None) => CheckResult::pass("site_config", "no row stored; defaults will be served"),
        Err(err) => CheckResult::fail("site_config", err),
    });

    report
}

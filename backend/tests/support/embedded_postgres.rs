//! Per-test PostgreSQL databases cloned from a migrated template.
//!
//! The template is named after a hash of `migrations/`, so it is rebuilt
//! whenever a migration changes and reused otherwise. Migrations run through
//! the crate's own `run_pending_migrations`, the same path the server takes
//! at startup.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use habit_tracker::outbound::persistence::run_pending_migrations;
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "habits_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Create the template and migrate it unless it already exists.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;

    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&template_name);
        run_pending_migrations(&url).map_err(|err| format!("migrate template: {err}"))?;
    }

    Ok(template_name)
}

fn provision_attempt(
    cluster: &ClusterHandle,
    attempt: usize,
) -> Result<TemporaryDatabase, String> {
    let template_name = ensure_template_database(cluster)
        .map_err(|err| format!("attempt {attempt}/{PROVISION_RETRIES}: {err}"))?;
    let db_name = format!("test_{}", Uuid::new_v4());
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|err| {
            format!("create database from template: attempt {attempt}/{PROVISION_RETRIES}: {err:?}")
        })
}

/// A fresh, fully migrated database that is dropped with the returned guard.
pub fn provision_template_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = String::from("create database from template: exhausted retries");
    for attempt in 1..=PROVISION_RETRIES {
        match provision_attempt(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(error) => last_error = error,
        }
        if attempt < PROVISION_RETRIES {
            std::thread::sleep(PROVISION_RETRY_DELAY);
        }
    }
    Err(last_error)
}

/// Render a `postgres` error with its SQLSTATE and detail.
///
/// `Display` on `postgres::Error` often collapses to a bare `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// Number of rows in `table`, read over a plain synchronous connection.
///
/// Must be called outside any Tokio runtime context.
pub fn count_rows(url: &str, table: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one(format!("SELECT COUNT(*) FROM {table}").as_str(), &[])
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

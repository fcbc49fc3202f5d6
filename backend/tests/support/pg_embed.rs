//! Process-wide embedded PostgreSQL cluster for the Diesel suites.
//!
//! `pg-embed-setup-unpriv` installs into `/var/tmp` unless `PG_RUNTIME_DIR`
//! and `PG_DATA_DIR` say otherwise. When either is unset both are pointed at
//! a per-process directory under the cargo target dir for the duration of the
//! bootstrap, so sandboxed hosts and parallel test binaries never share a
//! data directory.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::ClusterHandle;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const BOOTSTRAP_RETRIES: u32 = 3;
/// Doubles after each failed attempt.
const RETRY_DELAY_MS: u64 = 500;

fn pg_embed_target_dir() -> PathBuf {
    if let Some(target_dir) = std::env::var_os("CARGO_TARGET_DIR") {
        return PathBuf::from(target_dir).join("pg-embed");
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("target")
        .join("pg-embed")
}

fn create_process_dirs() -> Result<(PathBuf, PathBuf), std::io::Error> {
    let unique = format!("habits-{}-{}", std::process::id(), Uuid::new_v4());
    let base = pg_embed_target_dir().join(unique);
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");

    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;

    Ok((runtime_dir, data_dir))
}

/// Download and startup failures worth another attempt.
fn is_transient_error(err: &str) -> bool {
    let transient_patterns = [
        "error decoding response body",
        "connection reset",
        "connection refused",
        "timed out",
        "timeout",
        "temporarily unavailable",
        "dns error",
    ];

    let err_lower = err.to_lowercase();
    transient_patterns
        .iter()
        .any(|pattern| err_lower.contains(pattern))
}

/// Shared cluster handle, bootstrapping it on first use.
///
/// The handle lives for the rest of the process; each test clones its own
/// database from the migrated template (see `embedded_postgres`).
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let _bootstrap_guard = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();

    let _env_guard = if needs_override {
        let (runtime_dir, data_dir) = create_process_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            (
                "PG_RUNTIME_DIR",
                Some(runtime_dir.to_string_lossy().into_owned()),
            ),
            ("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    let mut last_error = String::new();
    for attempt in 0..=BOOTSTRAP_RETRIES {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(err) => {
                last_error = format!("{err:?}");
                if attempt == BOOTSTRAP_RETRIES || !is_transient_error(&last_error) {
                    break;
                }
                let delay = Duration::from_millis(RETRY_DELAY_MS * (1 << attempt));
                eprintln!(
                    "pg-embed: attempt {}/{} failed, retrying in {delay:?}: {last_error}",
                    attempt + 1,
                    BOOTSTRAP_RETRIES + 1,
                );
                std::thread::sleep(delay);
            }
        }
    }

    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::is_transient_error;
    use rstest::rstest;

    #[rstest]
    #[case("Connection reset by peer", true)]
    #[case("request TIMED OUT", true)]
    #[case("initdb: permission denied", false)]
    fn classifies_retryable_bootstrap_errors(#[case] message: &str, #[case] expected: bool) {
        assert_eq!(is_transient_error(message), expected);
    }
}

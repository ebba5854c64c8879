//! Embedded PostgreSQL provisioning for repository tests.
//!
//! One cluster is shared per test binary. Every test receives its own
//! uniquely named database with the service migrations applied, so tests can
//! run in parallel without seeing each other's rows. The databases live as
//! long as the cluster.

use std::time::Duration;

use course_feedback::outbound::persistence::run_migrations;
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use pg_embedded_setup_unpriv::ClusterHandle;
use tokio::runtime::Runtime;
use uuid::Uuid;

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt < SHARED_CLUSTER_RETRIES => {
                eprintln!("pg-embed: bootstrap attempt {attempt} failed: {error:?}");
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
            Err(error) => return Err(format!("{error:?}")),
        }
    }
}

/// Create a migrated database on the shared cluster and return its URL.
pub fn provision_database(runtime: &Runtime) -> Result<String, String> {
    let cluster = shared_cluster()?;
    let name = format!("feedback_test_{}", Uuid::new_v4().simple());
    cluster
        .create_database(name.as_str())
        .map_err(|error| format!("create database {name}: {error:?}"))?;
    let url = cluster.connection().database_url(&name);
    runtime
        .block_on(run_migrations(&url))
        .map_err(|error| format!("migrate database {name}: {error}"))?;
    Ok(url)
}

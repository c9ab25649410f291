//! Postgres pool setup for the todo store.
//!
//! The whole service is one `todos` table, so the pool stays small and
//! checkout failures surface fast. Migrations are embedded and run to
//! completion before the first request is served.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

// A slow checkout on a one-table service means the database is down, not
// busy; fail within seconds instead of the 30s sqlx default.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn pool_options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
}

/// Connect and bring the `todos` schema up to date.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = pool_options(max_connections).connect(database_url).await?;

    sqlx::migrate!("src/db/migrations").run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_options_apply_size_and_timeout() {
        let options = pool_options(3);
        assert_eq!(options.get_max_connections(), 3);
        assert_eq!(options.get_acquire_timeout(), ACQUIRE_TIMEOUT);
    }
}

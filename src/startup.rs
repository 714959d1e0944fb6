use std::time::Duration;

use crate::{config::Config, error::AppError};

const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Connects to the Sqlite database and runs pending migrations.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// HTTP client shared by the rank and stream providers.
///
/// Redirects are not followed and every request is bounded by a timeout so a
/// hung upstream surfaces as a transient error instead of stalling a sweep.
pub fn setup_reqwest_client() -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))
}

pub mod models;
pub mod test_utils;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::path::Path;
use util::config::AppConfig;

/// Opens the database named by `DATABASE_PATH`.
///
/// Accepts either a full DSN (`sqlite:...`) or a bare SQLite file path.
pub async fn connect(config: &AppConfig) -> Result<DatabaseConnection, DbErr> {
    let path_or_url = config.database_path.as_str();
    let url = if path_or_url.starts_with("sqlite:") {
        path_or_url.to_owned()
    } else {
        // SQLite won't create intermediate dirs.
        if let Some(parent) = Path::new(path_or_url).parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        format!("sqlite://{path_or_url}?mode=rwc")
    };

    let mut options = ConnectOptions::new(url);
    options.sqlx_logging(false);

    tracing::info!(database = %path_or_url, "Connecting to database");
    Database::connect(options).await
}

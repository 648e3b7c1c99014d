use std::error::Error;
use std::{env, fs, io, path::Path};

use sea_orm::Database;
use util::config::AppConfig;

mod runner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    let db_path = config.database_path.as_str();

    match env::args().nth(1).as_deref() {
        Some("clean") => {
            remove_db_file(db_path)?;
            return Ok(());
        }
        Some("fresh") => remove_db_file(db_path)?,
        _ => {}
    }

    let url = if db_path.starts_with("sqlite:") {
        db_path.to_owned()
    } else {
        if let Some(parent) = Path::new(db_path).parent() {
            fs::create_dir_all(parent)?;
        }
        format!("sqlite://{db_path}?mode=rwc")
    };

    let db = Database::connect(url).await?;
    let summary = runner::apply_pending(&db).await?;
    println!(
        "{} applied, {} already in place",
        summary.applied, summary.up_to_date
    );
    Ok(())
}

fn remove_db_file(path: &str) -> io::Result<()> {
    let db_path = Path::new(path);
    if db_path.exists() {
        fs::remove_file(db_path)?;
        println!("Deleted DB: {}", db_path.display());
    } else {
        println!("DB file does not exist: {}", db_path.display());
    }
    Ok(())
}

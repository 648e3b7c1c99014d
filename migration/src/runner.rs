//! Console runner behind the `migration` binary.
//!
//! Applies the attendance schema one pending migration at a time so each
//! step gets its own progress line, then reports how many were applied.

use colored::*;
use migration::Migrator;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    pub up_to_date: usize,
}

pub async fn apply_pending(db: &DatabaseConnection) -> Result<RunSummary, DbErr> {
    let known = <Migrator as MigratorTrait>::migrations().len();
    let pending = Migrator::get_pending_migrations(db).await?;

    if pending.is_empty() {
        println!("{}", "Attendance schema is up to date".green());
        return Ok(RunSummary {
            applied: 0,
            up_to_date: known,
        });
    }

    println!("Applying {} of {} migrations", pending.len(), known);
    for migration in &pending {
        let label = format!("  {}", migration.name().bold());
        let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
        print!("{label}{dots} ");
        io::stdout().flush().ok();

        let start = Instant::now();
        if let Err(err) = Migrator::up(db, Some(1)).await {
            println!("{}", "failed".red());
            return Err(err);
        }
        println!("{} {}", "done".green(), format!("({:.2?})", start.elapsed()).dimmed());
    }

    Ok(RunSummary {
        applied: pending.len(),
        up_to_date: known - pending.len(),
    })
}

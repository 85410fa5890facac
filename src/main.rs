//! `HabitForge` binary entry point.
//!
//! Initializes logging, loads configuration, opens the database, seeds any
//! configured habits, and logs a startup summary of every active habit's
//! progress and streak. A UI host embeds the library crate; this binary
//! exists for bootstrap and smoke-testing an install.

use dotenvy::dotenv;
use habitforge::config;
use habitforge::core::{completion, streak};
use habitforge::errors::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // .env is optional; env vars can be set externally
    dotenv().ok();

    let db = config::database::create_connection().await?;
    config::database::create_tables(&db).await?;
    info!("Database initialized at {}", config::database::get_database_url());

    // Seed habits from config.toml when present
    match config::habits::load_default_config() {
        Ok(seed_config) => {
            config::habits::seed_initial_habits(&db, &seed_config).await?;
        }
        Err(e) => warn!("No seed configuration loaded: {e}"),
    }

    let habits = habitforge::core::habit::get_all_habits(&db, false).await?;
    info!("Tracking {} active habit(s)", habits.len());

    for habit in habits {
        let progress =
            completion::get_habit_progress(&db, habit.id, habit.goal_count, habit.goal_type, None)
                .await?;
        let current_streak =
            streak::calculate_streak(&db, habit.id, habit.goal_type, habit.goal_count).await;
        info!(
            "{}: {}/{} this period ({:.1}%), streak {}",
            habit.name,
            progress.current_count,
            progress.goal_count,
            progress.percentage,
            current_streak
        );
    }

    Ok(())
}

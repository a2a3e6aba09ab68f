use rocket::{Build, Config, Rocket};
use sqlx::SqlitePool;
use tracing::{error, info};

pub mod api;
pub mod cli;
pub mod env;

#[cfg(test)]
pub mod test_utils;

pub use crate::env::{Env, LogLevel};

/// Attaches the order API, its JSON catchers and the database pool.
pub fn mount(rocket: Rocket<Build>, pool: SqlitePool) -> Rocket<Build> {
    rocket
        .mount("/", api::routes())
        .register("/", api::catchers())
        .manage(pool)
}

/// Opens the database and brings the schema up to date.
pub async fn setup_database(database_url: &str) -> anyhow::Result<SqlitePool> {
    let pool = env::connect_sqlite(database_url).await?;

    // Run database migrations to ensure all tables exist
    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

pub async fn launch(env: Env) -> anyhow::Result<()> {
    let pool = setup_database(&env.database_url).await?;

    let config = Config::figment()
        .merge(("port", env.port))
        .merge(("address", env.address));

    let rocket = mount(rocket::custom(config), pool);

    info!(
        "Serving orders on http://{}:{} (database: {})",
        env.address, env.port, env.database_url
    );
    let server_task = tokio::spawn(rocket.launch());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal, shutting down gracefully...");
        }

        result = server_task => {
            match result {
                Ok(Ok(_)) => info!("Server completed successfully"),
                Ok(Err(e)) => error!("Server failed: {e}"),
                Err(e) => error!("Server task panicked: {e}"),
            }
        }
    }

    info!("Shutdown complete");
    Ok(())
}

use clap::Parser;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

#[derive(clap::ValueEnum, Debug, Clone)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        (&log_level).into()
    }
}

impl From<&LogLevel> for Level {
    fn from(log_level: &LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "server")]
#[command(about = "Order intake and kitchen queue server for the butcher counter")]
pub struct Env {
    #[clap(long = "db", env, default_value = "sqlite:butcher_orders.db")]
    pub database_url: String,
    #[clap(long, env, default_value = "info")]
    pub log_level: LogLevel,
    /// Address the HTTP server binds to
    #[clap(long, env, default_value = "0.0.0.0")]
    pub address: IpAddr,
    #[clap(long, env, default_value = "5000")]
    pub port: u16,
}

/// Opens the order database, creating the file on first start. Writers wait
/// on each other instead of failing with `SQLITE_BUSY`.
pub async fn connect_sqlite(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePool::connect_with(options).await
}

pub fn setup_tracing(log_level: &LogLevel) {
    let level: Level = log_level.into();
    let default_filter =
        format!("butcher_queue={level},butcher_orders={level},server={level},cli={level}");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .compact()
        .init();
}

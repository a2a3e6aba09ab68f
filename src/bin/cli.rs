use butcher_queue::cli::{self, CliEnv};
use butcher_queue::env::setup_tracing;
use butcher_queue::setup_database;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();
    let cli_env = CliEnv::parse();
    setup_tracing(&cli_env.log_level);

    let pool = setup_database(&cli_env.database_url).await?;
    cli::run_command(&pool, cli_env.command).await?;
    Ok(())
}

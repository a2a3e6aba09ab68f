use butcher_queue::env::{Env, setup_tracing};
use butcher_queue::launch;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();
    let env = Env::try_parse()?;
    setup_tracing(&env.log_level);

    launch(env).await
}

use butcher_orders::{ItemRemoval, Order, OrderError, OrderId, store};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::io::Write;
use tracing::info;

use crate::LogLevel;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the pending queue, oldest order first
    Pending,
    /// Print a single order regardless of its status
    Show {
        #[arg(long = "id")]
        id: i64,
    },
    /// Mark a whole order as ready
    Ready {
        #[arg(long = "id")]
        id: i64,
    },
    /// Cancel one item of an order by its position in the current listing (0-based)
    CancelItem {
        #[arg(long = "id")]
        id: i64,
        #[arg(long = "index")]
        index: usize,
    },
}

#[derive(Debug, Parser)]
#[command(name = "cli")]
#[command(about = "Inspect and update the butcher counter's order queue")]
#[command(version)]
pub struct CliEnv {
    #[clap(long = "db", env, default_value = "sqlite:butcher_orders.db")]
    pub database_url: String,
    #[clap(long, env, default_value = "warn")]
    pub log_level: LogLevel,
    #[command(subcommand)]
    pub command: Commands,
}

pub async fn run_command(pool: &SqlitePool, command: Commands) -> anyhow::Result<()> {
    run_command_with_writers(pool, command, &mut std::io::stdout()).await
}

async fn run_command_with_writers<W: Write>(
    pool: &SqlitePool,
    command: Commands,
    stdout: &mut W,
) -> anyhow::Result<()> {
    match command {
        Commands::Pending => {
            let orders = store::list_pending(pool).await?;
            if orders.is_empty() {
                writeln!(stdout, "No pending orders")?;
            }
            for order in &orders {
                write_order(stdout, order)?;
            }
        }
        Commands::Show { id } => {
            let id = OrderId(id);
            let order = store::find_order(pool, id)
                .await?
                .ok_or(OrderError::NotFound(id))?;
            write_order(stdout, &order)?;
            writeln!(stdout, "  status: {}", order.status)?;
        }
        Commands::Ready { id } => {
            let id = OrderId(id);
            store::mark_ready(pool, id).await?;
            writeln!(stdout, "Order #{id} marked ready")?;
        }
        Commands::CancelItem { id, index } => {
            let id = OrderId(id);
            let removal = store::remove_item(pool, id, index).await?;
            writeln!(stdout, "Cancelled item {index} of order #{id}")?;
            if removal == ItemRemoval::Emptied {
                writeln!(stdout, "Order #{id} has no items left and is now ready")?;
            }
        }
    }

    info!("Command completed");
    Ok(())
}

fn write_order<W: Write>(out: &mut W, order: &Order) -> std::io::Result<()> {
    write!(
        out,
        "#{} {} (received {})",
        order.id,
        order.customer_name,
        order.created_at.format("%Y-%m-%d %H:%M")
    )?;
    if let Some(pickup_time) = &order.pickup_time {
        write!(out, " pickup: {pickup_time}")?;
    }
    if let Some(phone) = &order.phone {
        write!(out, " phone: {phone}")?;
    }
    if order.modified {
        write!(out, " [MODIFIED]")?;
    }
    writeln!(out)?;

    for (index, item) in order.items.iter().enumerate() {
        writeln!(out, "  [{index}] {item}")?;
    }
    Ok(())
}

//! SQLite-backed order store. Every operation is a single statement or a
//! single read-modify-write transaction. Read-modify-write transactions open
//! with `BEGIN IMMEDIATE` so a concurrent writer waits on the busy timeout
//! instead of failing to upgrade its read lock.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use tracing::{debug, info};

use crate::OrderId;
use crate::error::{OrderError, PersistenceError};
use crate::item::Item;
use crate::order::{ItemRemoval, NewOrder, Order, OrderStatus};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    phone: Option<String>,
    items: String,
    created_at: DateTime<Utc>,
    status: String,
    pickup_time: Option<String>,
    modified: bool,
}

impl TryFrom<OrderRow> for Order {
    type Error = PersistenceError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|_| PersistenceError::InvalidStatus(row.status.clone()))?;

        Ok(Self {
            id: OrderId(row.id),
            customer_name: row.customer_name,
            phone: row.phone,
            items: serde_json::from_str(&row.items)?,
            created_at: row.created_at,
            status,
            pickup_time: row.pickup_time,
            modified: row.modified,
        })
    }
}

const SELECT_ORDER_BY_ID: &str = r"
    SELECT id, customer_name, phone, items, created_at, status, pickup_time, modified
    FROM orders
    WHERE id = ?1
";

const SELECT_PENDING: &str = r"
    SELECT id, customer_name, phone, items, created_at, status, pickup_time, modified
    FROM orders
    WHERE status = ?1
    ORDER BY created_at ASC, id ASC
";

const BEGIN_WRITE: &str = "BEGIN IMMEDIATE";

async fn load_order<'e, E: SqliteExecutor<'e>>(
    executor: E,
    id: OrderId,
) -> Result<Option<Order>, PersistenceError> {
    let row: Option<OrderRow> = sqlx::query_as(SELECT_ORDER_BY_ID)
        .bind(id.0)
        .fetch_optional(executor)
        .await?;

    row.map(Order::try_from).transpose()
}

pub async fn create_order(
    pool: &SqlitePool,
    order: &NewOrder,
) -> Result<OrderId, PersistenceError> {
    let items_json = serde_json::to_string(order.items())?;
    let created_at = Utc::now();

    let result = sqlx::query(
        r"
        INSERT INTO orders (customer_name, phone, items, created_at, status, pickup_time, modified)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, FALSE)
        ",
    )
    .bind(order.customer_name())
    .bind(order.phone())
    .bind(items_json)
    .bind(created_at)
    .bind(OrderStatus::Pending.as_str())
    .bind(order.pickup_time())
    .execute(pool)
    .await?;

    let id = OrderId(result.last_insert_rowid());
    info!(
        "Created order {id} for {} with {} item(s)",
        order.customer_name(),
        order.items().len()
    );
    Ok(id)
}

pub async fn find_order(
    pool: &SqlitePool,
    id: OrderId,
) -> Result<Option<Order>, PersistenceError> {
    load_order(pool, id).await
}

/// Pending orders, oldest first.
pub async fn list_pending(pool: &SqlitePool) -> Result<Vec<Order>, PersistenceError> {
    let rows: Vec<OrderRow> = sqlx::query_as(SELECT_PENDING)
        .bind(OrderStatus::Pending.as_str())
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(Order::try_from).collect()
}

/// Marks an order ready. Marking an already-ready order again succeeds.
pub async fn mark_ready(pool: &SqlitePool, id: OrderId) -> Result<(), OrderError> {
    let result = sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
        .bind(OrderStatus::Ready.as_str())
        .bind(id.0)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(OrderError::NotFound(id));
    }

    info!("Order {id} marked ready");
    Ok(())
}

pub async fn remove_item(
    pool: &SqlitePool,
    id: OrderId,
    index: usize,
) -> Result<ItemRemoval, OrderError> {
    let mut sql_tx = pool.begin_with(BEGIN_WRITE).await?;

    let mut order = load_order(&mut *sql_tx, id)
        .await?
        .ok_or(OrderError::NotFound(id))?;

    let removal = order.remove_item(index)?;

    match removal {
        ItemRemoval::Emptied => {
            sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
                .bind(order.status.as_str())
                .bind(id.0)
                .execute(&mut *sql_tx)
                .await?;
            info!("Cancelled last item of order {id}, order is now ready");
        }
        ItemRemoval::Shortened { remaining } => {
            let items_json = serde_json::to_string(&order.items)?;
            sqlx::query("UPDATE orders SET items = ?1 WHERE id = ?2")
                .bind(items_json)
                .bind(id.0)
                .execute(&mut *sql_tx)
                .await?;
            info!("Cancelled item {index} of order {id}, {remaining} item(s) left");
        }
    }

    sql_tx.commit().await?;
    Ok(removal)
}

pub async fn replace_item(
    pool: &SqlitePool,
    id: OrderId,
    index: usize,
    item: Item,
) -> Result<(), OrderError> {
    let mut sql_tx = pool.begin_with(BEGIN_WRITE).await?;

    let mut order = load_order(&mut *sql_tx, id)
        .await?
        .ok_or(OrderError::NotFound(id))?;

    let previous = order.replace_item(index, item)?;
    let items_json = serde_json::to_string(&order.items)?;

    sqlx::query("UPDATE orders SET items = ?1, modified = TRUE WHERE id = ?2")
        .bind(items_json)
        .bind(id.0)
        .execute(&mut *sql_tx)
        .await?;

    sql_tx.commit().await?;

    debug!("Order {id} item {index} was: {previous}");
    info!("Modified item {index} of order {id}: {}", order.items[index]);
    Ok(())
}

#[cfg(test)]
pub(crate) async fn count_orders(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await
}

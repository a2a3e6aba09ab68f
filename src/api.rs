use butcher_orders::{
    Item, ItemDraft, NewOrder, Order, OrderDraft, OrderError, OrderId, PersistenceError, store,
};
use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::serde::json::{self, Json};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Catcher, Request, Route, State, catch, catchers, get, post, routes};
use sqlx::SqlitePool;
use tracing::{error, warn};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[get("/health")]
pub fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Envelope returned by every mutating endpoint.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub const fn ok() -> Self {
        Self {
            success: true,
            id: None,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error.into()),
        }
    }
}

type ApiResult = (Status, Json<ApiResponse>);

fn success() -> ApiResult {
    (Status::Ok, Json(ApiResponse::ok()))
}

fn rejected(status: Status, error: impl Into<String>) -> ApiResult {
    let error = error.into();
    warn!("Rejected request: {error}");
    (status, Json(ApiResponse::failure(error)))
}

fn storage_failure(err: &PersistenceError) -> ApiResult {
    error!("Order storage failed: {err}");
    (
        Status::InternalServerError,
        Json(ApiResponse::failure("Internal storage error")),
    )
}

fn order_failure(err: &OrderError) -> ApiResult {
    match err {
        OrderError::NotFound(_) | OrderError::ItemOutOfRange { .. } => {
            rejected(Status::NotFound, err.to_string())
        }
        OrderError::Persistence(err) => storage_failure(err),
    }
}

#[post("/orders", data = "<request>")]
pub async fn create_order(
    request: Result<Json<OrderDraft>, json::Error<'_>>,
    pool: &State<SqlitePool>,
) -> ApiResult {
    let draft = match request {
        Ok(Json(draft)) => draft,
        Err(e) => return rejected(Status::BadRequest, format!("Invalid request body: {e}")),
    };

    let order = match NewOrder::try_from(draft) {
        Ok(order) => order,
        Err(e) => return rejected(Status::BadRequest, e.to_string()),
    };

    match store::create_order(pool.inner(), &order).await {
        Ok(id) => (
            Status::Created,
            Json(ApiResponse {
                id: Some(id),
                ..ApiResponse::ok()
            }),
        ),
        Err(e) => storage_failure(&e),
    }
}

/// One row of the production dashboard. `items` is the stored JSON array as
/// a string, which the dashboard parses itself.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOrder {
    pub id: OrderId,
    pub customer_name: String,
    pub phone: Option<String>,
    pub items: String,
    pub created_at: DateTime<Utc>,
    pub pickup_time: Option<String>,
    pub modified: bool,
}

impl TryFrom<Order> for PendingOrder {
    type Error = serde_json::Error;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        Ok(Self {
            id: order.id,
            customer_name: order.customer_name,
            phone: order.phone,
            items: serde_json::to_string(&order.items)?,
            created_at: order.created_at,
            pickup_time: order.pickup_time,
            modified: order.modified,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PendingOrdersResponse {
    pub orders: Vec<PendingOrder>,
}

#[get("/orders/pending")]
pub async fn pending_orders(
    pool: &State<SqlitePool>,
) -> Result<Json<PendingOrdersResponse>, ApiResult> {
    let orders = store::list_pending(pool.inner())
        .await
        .map_err(|e| storage_failure(&e))?;

    let orders = orders
        .into_iter()
        .map(PendingOrder::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| storage_failure(&PersistenceError::ItemsEncoding(e)))?;

    Ok(Json(PendingOrdersResponse { orders }))
}

#[post("/orders/<id>/ready")]
pub async fn mark_ready(id: i64, pool: &State<SqlitePool>) -> ApiResult {
    match store::mark_ready(pool.inner(), OrderId(id)).await {
        Ok(()) => success(),
        Err(e) => order_failure(&e),
    }
}

#[post("/orders/<id>/items/<index>/cancel")]
pub async fn cancel_item(id: i64, index: usize, pool: &State<SqlitePool>) -> ApiResult {
    match store::remove_item(pool.inner(), OrderId(id), index).await {
        Ok(_) => success(),
        Err(e) => order_failure(&e),
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyItemRequest {
    #[serde(default, alias = "novo_item")]
    pub new_item: Option<ItemDraft>,
}

#[post("/orders/<id>/items/<index>", data = "<request>")]
pub async fn modify_item(
    id: i64,
    index: usize,
    request: Result<Json<ModifyItemRequest>, json::Error<'_>>,
    pool: &State<SqlitePool>,
) -> ApiResult {
    let draft = match request {
        Ok(Json(ModifyItemRequest {
            new_item: Some(draft),
        })) => draft,
        Ok(Json(ModifyItemRequest { new_item: None })) => {
            return rejected(Status::BadRequest, "newItem is required");
        }
        Err(e) => return rejected(Status::BadRequest, format!("Invalid request body: {e}")),
    };

    let item = match Item::try_from(draft) {
        Ok(item) => item,
        Err(e) => return rejected(Status::BadRequest, format!("Invalid item: {e}")),
    };

    match store::replace_item(pool.inner(), OrderId(id), index, item).await {
        Ok(()) => success(),
        Err(e) => order_failure(&e),
    }
}

/// Unmatched routes and guard failures still answer with the JSON envelope.
#[catch(default)]
pub fn default_catcher(status: Status, request: &Request<'_>) -> ApiResult {
    warn!("{} {} failed with {status}", request.method(), request.uri());
    (
        status,
        Json(ApiResponse::failure(status.reason_lossy().to_string())),
    )
}

// Route Configuration
pub fn routes() -> Vec<Route> {
    routes![
        health,
        create_order,
        pending_orders,
        mark_ready,
        cancel_item,
        modify_item
    ]
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

// sFinance - Web Server
// JSON API over the expense store

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use sfinance::{
    init_logging, Category, CategoryFilter, ExpenseFilter, ExpenseStore, Settings, StoreError,
    TimeFilter, ValidationError,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;

const ADDR_ENV: &str = "SFINANCE_ADDR";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Shared application state. The mutex keeps the store single reader/writer.
#[derive(Clone)]
struct AppState {
    store: Arc<Mutex<ExpenseStore>>,
}

impl AppState {
    fn store(&self) -> MutexGuard<'_, ExpenseStore> {
        // A panicked handler cannot leave the connection half-written
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        }),
    )
        .into_response()
}

fn store_error_response(err: StoreError) -> Response {
    match err {
        StoreError::Validation(err) => error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        other => {
            tracing::error!("store failure: {}", other);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

/// Body of POST /api/expenses
#[derive(Debug, Deserialize)]
struct CreateExpense {
    description: String,
    category: String,
    date: String,
    /// Text, so "12,50" is accepted like in the entry form
    amount: String,
    #[serde(default)]
    comment: String,
}

#[derive(Serialize)]
struct Created {
    id: i64,
}

/// Query string of GET /api/expenses
#[derive(Debug, Default, Deserialize)]
struct ExpenseQuery {
    kind: String,
    date: Option<String>,
    month: Option<u32>,
    year: Option<i32>,
    start: Option<String>,
    end: Option<String>,
    category: Option<String>,
}

impl ExpenseQuery {
    fn to_filter(&self) -> Result<ExpenseFilter, String> {
        let missing = |name: &str| format!("`{}` is required for kind `{}`", name, self.kind);

        let time = match self.kind.as_str() {
            "day" => TimeFilter::day(self.date.as_deref().ok_or_else(|| missing("date"))?),
            "week" => TimeFilter::week(self.date.as_deref().ok_or_else(|| missing("date"))?),
            "month" => TimeFilter::month(
                self.month.ok_or_else(|| missing("month"))?,
                self.year.ok_or_else(|| missing("year"))?,
            ),
            "range" => TimeFilter::custom_range(
                self.start.as_deref().ok_or_else(|| missing("start"))?,
                self.end.as_deref().ok_or_else(|| missing("end"))?,
            ),
            other => return Err(format!("unknown filter kind `{}`", other)),
        }
        .map_err(|e: ValidationError| e.to_string())?;

        Ok(ExpenseFilter::new(time).with_category(CategoryFilter::from(self.category.clone())))
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    ApiResponse::ok("OK")
}

/// GET /api/categories - Categories present in storage
async fn get_categories(State(state): State<AppState>) -> Response {
    match state.store().distinct_categories() {
        Ok(categories) => ApiResponse::ok(categories),
        Err(e) => store_error_response(e),
    }
}

/// GET /api/categories/options - Categories accepted for new expenses
async fn get_category_options() -> Response {
    let options: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    ApiResponse::ok(options)
}

/// POST /api/expenses - Record an expense
async fn create_expense(State(state): State<AppState>, Json(body): Json<CreateExpense>) -> Response {
    let category: Category = match body.category.parse() {
        Ok(category) => category,
        Err(e) => return store_error_response(StoreError::Validation(e)),
    };

    let inserted = state.store().insert(
        &body.description,
        category,
        &body.date,
        &body.amount,
        &body.comment,
    );

    match inserted {
        Ok(id) => ApiResponse::ok(Created { id }),
        Err(e) => store_error_response(e),
    }
}

/// GET /api/expenses?kind=... - Filtered expenses and their total
async fn query_expenses(State(state): State<AppState>, Query(params): Query<ExpenseQuery>) -> Response {
    let filter = match params.to_filter() {
        Ok(filter) => filter,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    match state.store().query(&filter) {
        Ok(result) => ApiResponse::ok(result),
        Err(e) => store_error_response(e),
    }
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/categories", get(get_categories))
        .route("/categories/options", get(get_category_options))
        .route("/expenses", get(query_expenses).post(create_expense))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings, None).context("Failed to set up logging")?;

    let db_path = settings.database_path();
    let store = ExpenseStore::open(&db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
    };

    let addr = std::env::var(ADDR_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, router(state))
        .await
        .context("Server failed")?;

    Ok(())
}

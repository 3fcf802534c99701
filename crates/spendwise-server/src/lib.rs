//! Spendwise Web Server
//!
//! Axum-based REST API over the Spendwise analytics engine.
//!
//! Security features:
//! - Owner identity required on every request (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Every read is scoped to the caller's own records
//! - Audit trail of writes, per owner
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use spendwise_core::db::Database;
use spendwise_core::Error as CoreError;

mod handlers;

/// Maximum JSON request body size (64 KB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Header carrying the owner identity set by a trusted upstream proxy
pub const DEFAULT_OWNER_HEADER: &str = "x-spendwise-owner";

/// Owner used for unidentified requests when authentication is disabled
pub const LOCAL_OWNER: &str = "local";

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Environment variables read by [`ServerConfig::from_env`]
pub const API_KEYS_ENV: &str = "SPENDWISE_API_KEYS";
pub const ALLOWED_ORIGINS_ENV: &str = "SPENDWISE_ALLOWED_ORIGINS";
pub const OWNER_HEADER_ENV: &str = "SPENDWISE_OWNER_HEADER";

/// An API key bound to the owner it authenticates as
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub key: String,
    pub owner: String,
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("key", &"<redacted>")
            .field("owner", &self.owner)
            .finish()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Whether an owner identity is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// API keys for service authentication
    /// Format: "Bearer <key>" in Authorization header
    pub api_keys: Vec<ApiKey>,
    /// Header trusted to carry the owner identity
    pub owner_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
            owner_header: DEFAULT_OWNER_HEADER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Build configuration from `SPENDWISE_*` environment variables
    pub fn from_env(require_auth: bool) -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|s| parse_list(&s))
            .unwrap_or_default();
        let api_keys = std::env::var(API_KEYS_ENV)
            .map(|s| parse_api_keys(&s))
            .unwrap_or_default();
        let owner_header = std::env::var(OWNER_HEADER_ENV)
            .ok()
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_OWNER_HEADER.to_string());

        Self {
            require_auth,
            allowed_origins,
            api_keys,
            owner_header,
        }
    }
}

/// Split a comma-separated list, dropping blanks
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse `key:owner,key:owner` pairs; malformed entries are skipped
pub fn parse_api_keys(raw: &str) -> Vec<ApiKey> {
    parse_list(raw)
        .into_iter()
        .filter_map(|entry| match entry.split_once(':') {
            Some((key, owner)) if !key.trim().is_empty() && !owner.trim().is_empty() => {
                Some(ApiKey {
                    key: key.trim().to_string(),
                    owner: owner.trim().to_string(),
                })
            }
            _ => {
                warn!("Ignoring malformed API key entry (expected key:owner)");
                None
            }
        })
        .collect()
}

/// The owner a request acts as, resolved by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl Owner {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

/// Resolve the caller's owner identity from request headers
///
/// A valid bearer API key wins over the identity header. Returns `None`
/// when neither is present or valid.
pub fn resolve_owner(headers: &HeaderMap, config: &ServerConfig) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "));
    if let Some(key) = bearer {
        if let Some(owner) = owner_for_api_key(key, &config.api_keys) {
            return Some(owner.to_string());
        }
    }

    headers
        .get(config.owner_header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Authentication middleware - attaches the caller's [`Owner`] to the request
///
/// # Security Notes
///
/// **Identity header**: trusted as-is. Only deploy with auth enabled behind a
/// proxy that strips and rewrites this header.
///
/// **API keys**: Compared using constant-time comparison to prevent timing attacks.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let owner = match resolve_owner(request.headers(), &state.config) {
        Some(owner) => owner,
        None if !state.config.require_auth => LOCAL_OWNER.to_string(),
        None => {
            warn!(path = %request.uri().path(), "Unauthorized request - no owner identity");
            return (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "Authentication required"
                })),
            )
                .into_response();
        }
    };

    debug!(owner = %owner, path = %request.uri().path(), "Request authenticated");
    request.extensions_mut().insert(Owner(owner));
    next.run(request).await
}

/// Find the owner bound to an API key using constant-time comparison
fn owner_for_api_key<'a>(provided: &str, keys: &'a [ApiKey]) -> Option<&'a str> {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();
    let mut found = None;
    for api_key in keys {
        let key_bytes = api_key.key.as_bytes();
        // Only compare if lengths match (constant-time for same-length keys)
        if provided_bytes.len() == key_bytes.len()
            && bool::from(provided_bytes.ct_eq(key_bytes))
            && found.is_none()
        {
            found = Some(api_key.owner.as_str());
        }
    }
    found
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    let api_routes = Router::new()
        // Analytics
        .route(
            "/analytics/monthly-summary",
            get(handlers::get_monthly_summary),
        )
        .route(
            "/analytics/category-breakdown",
            get(handlers::get_category_breakdown),
        )
        .route("/analytics/top-category", get(handlers::get_top_category))
        .route(
            "/analytics/month-comparison",
            get(handlers::get_month_comparison),
        )
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::upsert_budget),
        )
        .route("/budgets/:id", delete(handlers::delete_budget))
        // Insights
        .route("/insights", get(handlers::get_insights))
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/:id",
            put(handlers::update_expense).delete(handlers::delete_expense),
        )
        // Audit
        .route("/audit", get(handlers::list_audit_log));

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let allowed_headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        config
            .owner_header
            .parse()
            .unwrap_or(header::HeaderName::from_static(DEFAULT_OWNER_HEADER)),
    ];

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(allowed_headers)
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(allowed_headers)
    };

    Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!(
            "⚠️  Authentication disabled - unidentified requests act as '{}'",
            LOCAL_OWNER
        );
    }
    if !config.api_keys.is_empty() {
        info!("{} API key(s) configured", config.api_keys.len());
    }

    let app = create_router(db, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// HTTP status for a core error
fn status_for(err: &CoreError) -> StatusCode {
    match err {
        CoreError::InvalidRequest(_)
        | CoreError::InvalidPeriod { .. }
        | CoreError::InvalidBudget { .. }
        | CoreError::InvalidData(_) => StatusCode::BAD_REQUEST,
        CoreError::NotFound(_) => StatusCode::NOT_FOUND,
        CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
        CoreError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CoreError::Database(_) | CoreError::Io(_) | CoreError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, status = %self.status, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();

        if let Some(core) = err.downcast_ref::<CoreError>() {
            let status = status_for(core);
            if core.is_client_error() {
                // Caller's own mistake - safe to echo back
                return Self {
                    status,
                    message: core.to_string(),
                    internal: None,
                };
            }
            if status == StatusCode::SERVICE_UNAVAILABLE {
                return Self {
                    status,
                    message: "Service temporarily unavailable, retry later".to_string(),
                    internal: Some(err),
                };
            }
        }

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use planwright_core::plan::{GenerateError, GeneratedPlan, PlanService};
use planwright_db::models::Plan;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: &'static str,
    /// Upstream text echoed back for diagnosis of format errors.
    raw: Option<String>,
}

impl AppError {
    fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            raw: None,
        }
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden(message: &'static str) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn internal(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match self.raw {
            Some(raw) => serde_json::json!({ "error": self.message, "raw": raw }),
            None => serde_json::json!({ "error": self.message }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<GenerateError> for AppError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::InvalidInput => Self::bad_request("Goal is required"),
            GenerateError::UpstreamFormat { raw } => Self {
                raw: Some(raw),
                ..Self::internal("AI returned invalid JSON format")
            },
            GenerateError::Upstream(e) => {
                error!(error = %e, "error generating plan");
                Self::internal("Failed to generate plan")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Cross-origin policy
// ---------------------------------------------------------------------------

/// The one front-end origin allowed to call the API from a browser.
///
/// Requests without an `Origin` header are always allowed; any other origin
/// is rejected with 403 before reaching a handler.
#[derive(Debug, Clone, Default)]
pub struct AllowedOrigin(Option<HeaderValue>);

impl AllowedOrigin {
    pub fn parse(origin: Option<&str>) -> Result<Self> {
        let value = origin
            .map(|o| {
                HeaderValue::from_str(o.trim_end_matches('/'))
                    .with_context(|| format!("invalid front-end origin {o:?}"))
            })
            .transpose()?;
        Ok(Self(value))
    }

    fn permits(&self, origin: &HeaderValue) -> bool {
        let Some(allowed) = &self.0 else {
            return false;
        };
        let origin = origin.as_bytes();
        let origin = origin.strip_suffix(b"/").unwrap_or(origin);
        origin == allowed.as_bytes()
    }

    fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);
        match &self.0 {
            Some(origin) => layer.allow_origin(origin.clone()),
            None => layer,
        }
    }
}

async fn reject_foreign_origin(
    State(allowed): State<AllowedOrigin>,
    request: Request,
    next: Next,
) -> Response {
    match request.headers().get(header::ORIGIN) {
        Some(origin) if !allowed.permits(origin) => {
            warn!(origin = ?origin, "rejected request from disallowed origin");
            AppError::forbidden("Origin not allowed").into_response()
        }
        _ => next.run(request).await,
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(service: Arc<PlanService>, allowed_origin: AllowedOrigin) -> Router {
    Router::new()
        .route("/generate-plan", post(generate_plan))
        .route("/plans", get(list_plans))
        .layer(allowed_origin.cors_layer())
        .layer(middleware::from_fn_with_state(
            allowed_origin,
            reject_foreign_origin,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(
    service: Arc<PlanService>,
    allowed_origin: AllowedOrigin,
    bind: &str,
    port: u16,
) -> Result<()> {
    let app = build_router(service, allowed_origin);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {bind}:{port}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("planwright listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("planwright shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C; shutting down");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct GenerateRequest {
    #[serde(default)]
    goal: Option<String>,
}

/// Accepts any content type; an empty body reads as `{}`.
async fn generate_plan(
    State(service): State<Arc<PlanService>>,
    body: Bytes,
) -> Result<Json<GeneratedPlan>, AppError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateRequest::default()
    } else {
        serde_json::from_slice::<GenerateRequest>(&body).map_err(|e| {
            warn!(error = %e, "malformed generate-plan body");
            AppError::bad_request("Invalid request body")
        })?
    };

    let goal = request.goal.unwrap_or_default();
    let generated = service.generate(&goal).await?;
    Ok(Json(generated))
}

async fn list_plans(State(service): State<Arc<PlanService>>) -> Result<Json<Vec<Plan>>, AppError> {
    let plans = service.list_plans().await.map_err(|e| {
        error!(error = %e, "error fetching plans");
        AppError::internal("Failed to fetch plans")
    })?;
    Ok(Json(plans))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

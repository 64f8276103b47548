//! Route definitions for the API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::process_query,
        handlers::analyze_conversation,
        handlers::health_check,
        handlers::agents_status,
    ),
    components(schemas(
        crate::api::types::QueryRequest,
        crate::api::types::QueryResponse,
        crate::api::types::ComplianceCheck,
        crate::api::types::AnalyzeConversationRequest,
        crate::api::types::AnalyzeConversationResponse,
        crate::api::types::HealthResponse,
        crate::api::types::AgentStatus,
        crate::api::types::AgentsStatusResponse,
        crate::domain::ComplianceStatus,
        crate::domain::ViolationType,
        crate::domain::HcpContext,
        crate::engine::ConversationAnalysis,
        crate::engine::DimensionScore,
        crate::engine::CoachingItem,
    )),
    tags(
        (name = "query", description = "Compliance-gated query processing"),
        (name = "conversations", description = "Offline conversation scoring"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "RxGate API",
        version = "0.1.0",
        description = "Compliance gateway for pharmaceutical sales AI - gates generative responses behind off-label policy checks",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/v1/query", post(handlers::process_query))
        .route(
            "/v1/conversations/analyze",
            post(handlers::analyze_conversation),
        )
        .route("/v1/health", get(handlers::health_check))
        .route("/v1/agents/status", get(handlers::agents_status))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

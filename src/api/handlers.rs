//! HTTP request handlers.

use axum::{extract::State, Json};
use uuid::Uuid;

use crate::api::types::*;
use crate::error::{GateError, GateResult};
use crate::AppState;

/// Process a rep query through the compliance-gated pipeline.
///
/// POST /v1/query
///
/// A blocked outcome is a successful request (HTTP 200) carrying the
/// educational block message; only infrastructure failures map to
/// error statuses.
#[utoipa::path(
    post,
    path = "/v1/query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Pipeline complete (approved or blocked)", body = QueryResponse),
        (status = 400, description = "Invalid request"),
        (status = 501, description = "Routed role has no generation path"),
        (status = 502, description = "Generation backend failure")
    ),
    tag = "query"
)]
pub async fn process_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> GateResult<Json<QueryResponse>> {
    if request.query.trim().is_empty() {
        return Err(GateError::Validation("query must not be empty".to_string()));
    }
    if request.caller_id.trim().is_empty() {
        return Err(GateError::Validation(
            "caller_id must not be empty".to_string(),
        ));
    }

    let trace_id = Uuid::new_v4();
    tracing::info!(
        trace_id = %trace_id,
        caller_id = %request.caller_id,
        query_len = request.query.len(),
        "Processing query"
    );

    let result = state
        .orchestrator
        .process(
            &request.query,
            &request.caller_id,
            request.hcp_context.as_ref(),
        )
        .await?;

    tracing::info!(
        trace_id = %trace_id,
        status = %result.compliance.status,
        elapsed_seconds = result.elapsed_seconds,
        "Query processed"
    );

    Ok(Json(QueryResponse::from_result(request.query, result)))
}

/// Score a historical rep/HCP conversation.
///
/// POST /v1/conversations/analyze
#[utoipa::path(
    post,
    path = "/v1/conversations/analyze",
    request_body = AnalyzeConversationRequest,
    responses(
        (status = 200, description = "Analysis complete", body = AnalyzeConversationResponse),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Backend failure or unparseable output")
    ),
    tag = "conversations"
)]
pub async fn analyze_conversation(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeConversationRequest>,
) -> GateResult<Json<AnalyzeConversationResponse>> {
    if request.conversation.trim().is_empty() {
        return Err(GateError::Validation(
            "conversation must not be empty".to_string(),
        ));
    }

    let rep_name = request.rep_name.as_deref().unwrap_or("Sales Rep");
    let doctor_name = request.doctor_name.as_deref().unwrap_or("Dr. Smith");

    let analysis = state
        .analyzer
        .analyze(&request.conversation, rep_name, doctor_name)
        .await?;

    Ok(Json(AnalyzeConversationResponse { analysis }))
}

/// Health check endpoint.
///
/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend_configured: state.backend_configured,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Status of all agents in the roster.
///
/// GET /v1/agents/status
#[utoipa::path(
    get,
    path = "/v1/agents/status",
    responses(
        (status = 200, description = "Agent roster", body = AgentsStatusResponse)
    ),
    tag = "health"
)]
pub async fn agents_status(State(state): State<AppState>) -> Json<AgentsStatusResponse> {
    let backend_status = if state.backend_configured {
        "active"
    } else {
        "offline"
    };
    let version = env!("CARGO_PKG_VERSION").to_string();

    let agents = vec![
        AgentStatus {
            name: "sales_agent".to_string(),
            status: backend_status.to_string(),
            version: version.clone(),
        },
        AgentStatus {
            name: "medical_agent".to_string(),
            status: "planned".to_string(),
            version: version.clone(),
        },
        AgentStatus {
            name: "policy_guardian".to_string(),
            status: "active".to_string(),
            version: version.clone(),
        },
        AgentStatus {
            name: "conversation_analyzer".to_string(),
            status: backend_status.to_string(),
            version: version.clone(),
        },
        AgentStatus {
            name: "hcp_persona_agent".to_string(),
            status: "planned".to_string(),
            version,
        },
    ];

    let system_status = if state.backend_configured {
        "operational"
    } else {
        "configuration_required"
    };

    Json(AgentsStatusResponse {
        total_agents: agents.len(),
        agents,
        system_status: system_status.to_string(),
        backend_configured: state.backend_configured,
    })
}

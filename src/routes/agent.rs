//! Agent API Routes
//!
//! - POST /agent/analyze - Run a company analysis for the current user
//! - GET /agent/getRecom - Agents recommended to the current user
//! - GET /agent/getAllReport - Reports owned by the current user
//! - GET /agent/all - Agent catalog (public)
//! - GET /agent/{report_id} - A single owned report
//! - GET /agent/report/{report_id}/content - Raw body of an owned report
//! - GET /agent/detail/{agent_id} - A single catalog agent (public)

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::analysis::{ProfileSummary, VectorStoreHandle};
use crate::middleware::CurrentUser;
use crate::models::*;
use crate::types::{AppError, AppResult};

const REPORT_NOT_FOUND: &str = "Report not found";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/agent/analyze", post(run_company_analysis))
        .route("/agent/getRecom", get(get_my_recommended_agents))
        .route("/agent/getAllReport", get(get_my_reports))
        .route("/agent/all", get(get_all_agents))
        .route("/agent/{report_id}", get(get_report))
        .route("/agent/report/{report_id}/content", get(get_report_content))
        .route("/agent/detail/{agent_id}", get(get_agent_detail))
        .with_state(state)
}

/// Fetch a report only if it belongs to `user`. A foreign report is
/// indistinguishable from a missing one.
async fn find_owned_report(state: &AppState, user: &CurrentUser, report_id: i64) -> AppResult<UserReport> {
    match state.store.get_report_by_id(report_id).await? {
        Some(report) if report.user_id == user.user_id() => Ok(report),
        _ => Err(AppError::NotFound(REPORT_NOT_FOUND.to_string())),
    }
}

/// POST /agent/analyze
async fn run_company_analysis(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserReport>> {
    let user = &current_user.0;
    info!(user_id = user.user_id, "Company analysis requested");

    // Read outside the write transaction; no connection is held across the analyzer call.
    let latest_report_date = state.store.latest_report_date(user.user_id).await?;
    let profile = ProfileSummary::from_user(user, latest_report_date);

    let vector_store = VectorStoreHandle::load(&state.config.analysis);
    let outcome = state
        .analyzer
        .analyze(&user.name, &vector_store, &profile)
        .await?;

    let new_report = NewUserReport {
        user_id: user.user_id,
        filename: outcome.summary_report_file,
        format: ReportFormat::Md,
    };
    let report = state
        .store
        .save_analysis(new_report, &outcome.recommended_agents)
        .await?;

    info!(
        user_id = user.user_id,
        report_id = report.report_id,
        recommendations = outcome.recommended_agents.len(),
        "Company analysis stored"
    );
    Ok(Json(report))
}

/// GET /agent/getRecom
async fn get_my_recommended_agents(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<RecommendedAgentView>>> {
    let recommended = state
        .store
        .get_recommended_agents_by_user(current_user.user_id())
        .await?;

    if recommended.is_empty() {
        return Err(AppError::NotFound("No recommended agents".to_string()));
    }
    Ok(Json(recommended))
}

/// GET /agent/getAllReport
async fn get_my_reports(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<UserReport>>> {
    let reports = state.store.get_reports_by_user(current_user.user_id()).await?;
    Ok(Json(reports))
}

/// GET /agent/all
async fn get_all_agents(State(state): State<AppState>) -> AppResult<Json<Vec<AgentSummary>>> {
    let agents = state.store.get_all_agents().await?;
    Ok(Json(agents.into_iter().map(AgentSummary::from).collect()))
}

/// GET /agent/{report_id}
async fn get_report(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(report_id): Path<i64>,
) -> AppResult<Json<UserReport>> {
    let report = find_owned_report(&state, &current_user, report_id).await?;
    Ok(Json(report))
}

/// GET /agent/report/{report_id}/content
async fn get_report_content(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(report_id): Path<i64>,
) -> AppResult<String> {
    let report = find_owned_report(&state, &current_user, report_id).await?;
    state.reports.read_markdown(&report).await
}

/// GET /agent/detail/{agent_id}
async fn get_agent_detail(
    State(state): State<AppState>,
    Path(agent_id): Path<i64>,
) -> AppResult<Json<Agent>> {
    state
        .store
        .get_agent_by_id(agent_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Agent not found".to_string()))
}

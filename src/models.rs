use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::analysis::CompanyAnalyzer;
use crate::config::Config;
use crate::db::AgentStore;
use crate::storage::ReportStorage;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AgentStore>,
    pub analyzer: Arc<dyn CompanyAnalyzer>,
    pub reports: ReportStorage,
    pub config: Config,
}

// Core models
// Note: FromRow is needed for runtime query_as (without DATABASE_URL at compile time)

/// Account owner. Rows are created by the user service; this API only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub login_id: String,
    /// Display name, also used as the company name for analysis
    pub name: String,
    pub industry: Option<String>,
    /// Headcount; bucketed into a tier at analysis time
    pub scale: i32,
    pub interests: Option<String>,
    pub budget_size: f64,
    pub created_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserReport {
    pub report_id: i64,
    pub user_id: i64,
    pub filename: String,
    pub format: String,
    pub created_date: DateTime<Utc>,
}

/// Fields required to insert a report row.
#[derive(Debug, Clone)]
pub struct NewUserReport {
    pub user_id: i64,
    pub filename: String,
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Md,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Md => "md",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry. Agents are public and not tied to any user.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Agent {
    pub agent_id: i64,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub llm_type: Option<String>,
    pub language: Option<String>,
    pub features: Json<Vec<String>>,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub created_date: DateTime<Utc>,
}

/// Projection served by the catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AgentSummary {
    pub agent_id: i64,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub llm_type: Option<String>,
    pub language: Option<String>,
    pub features: Json<Vec<String>>,
    pub is_active: bool,
    pub image_url: Option<String>,
}

impl From<Agent> for AgentSummary {
    fn from(agent: Agent) -> Self {
        Self {
            agent_id: agent.agent_id,
            name: agent.name,
            display_name: agent.display_name,
            description: agent.description,
            category: agent.category,
            llm_type: agent.llm_type,
            language: agent.language,
            features: agent.features,
            is_active: agent.is_active,
            image_url: agent.image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecommendedAgent {
    pub recommendation_id: i64,
    pub user_id: i64,
    pub agent_id: i64,
    pub created_date: DateTime<Utc>,
}

/// A recommendation joined with the agent it points at.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RecommendedAgentView {
    pub recommendation_id: i64,
    pub user_id: i64,
    pub recommended_date: DateTime<Utc>,
    #[sqlx(flatten)]
    pub agent: AgentSummary,
}

/// One entry of the analyzer's recommendation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRef {
    pub agent_id: i64,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}

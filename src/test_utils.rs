//! In-memory doubles for driving the router in unit tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use tokio::sync::{Mutex, RwLock};

use crate::analysis::{AnalysisOutcome, CompanyAnalyzer, ProfileSummary, VectorStoreHandle};
use crate::config::*;
use crate::db::AgentStore;
use crate::models::*;
use crate::storage::ReportStorage;
use crate::types::{AppError, AppResult};

pub const TEST_SECRET: &str = "test-secret";

pub fn test_config(report_dir: &Path) -> Config {
    Config {
        server: ServerConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            cors_allowed_origins: vec![],
        },
        database: DatabaseConfig {
            url: "postgres://localhost/unused".to_string(),
            max_connections: 1,
            min_connections: 0,
        },
        auth: AuthConfig {
            secret: TEST_SECRET.to_string(),
            max_jwt_expiration: 3600,
        },
        analysis: AnalysisConfig {
            service_url: "http://localhost:0".to_string(),
            timeout_secs: 1,
            vector_db_path: "./vector_db".to_string(),
            vector_db_collection: "companies".to_string(),
        },
        storage: StorageConfig {
            report_dir: report_dir.to_path_buf(),
        },
    }
}

#[derive(Default)]
struct MemoryTables {
    users: HashMap<i64, User>,
    agents: Vec<Agent>,
    reports: Vec<UserReport>,
    recommendations: Vec<RecommendedAgent>,
    next_id: i64,
}

impl MemoryTables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// [`AgentStore`] backed by plain collections, mirroring the Postgres queries.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<MemoryTables>,
}

impl MemoryStore {
    pub async fn add_user(&self, name: &str, industry: Option<&str>, scale: i32) -> User {
        let mut tables = self.tables.write().await;
        let user_id = tables.next_id();
        let now = Utc::now();
        let user = User {
            user_id,
            login_id: format!("login_{}", user_id),
            name: name.to_string(),
            industry: industry.map(str::to_string),
            scale,
            interests: None,
            budget_size: 1000.0,
            created_date: now,
            modified_date: now,
        };
        tables.users.insert(user_id, user.clone());
        user
    }

    pub async fn add_agent(&self, name: &str) -> Agent {
        let mut tables = self.tables.write().await;
        let agent_id = tables.next_id();
        let agent = Agent {
            agent_id,
            name: name.to_string(),
            display_name: name.to_uppercase(),
            description: Some(format!("{} agent", name)),
            category: Some("operations".to_string()),
            llm_type: Some("gpt-4o".to_string()),
            language: Some("en".to_string()),
            features: Json(vec!["summaries".to_string()]),
            is_active: true,
            image_url: None,
            created_date: Utc::now(),
        };
        tables.agents.push(agent.clone());
        agent
    }

    pub async fn add_report_at(
        &self,
        user_id: i64,
        filename: &str,
        created_date: DateTime<Utc>,
    ) -> UserReport {
        let mut tables = self.tables.write().await;
        let report_id = tables.next_id();
        let report = UserReport {
            report_id,
            user_id,
            filename: filename.to_string(),
            format: ReportFormat::Md.to_string(),
            created_date,
        };
        tables.reports.push(report.clone());
        report
    }

    pub async fn report_count(&self, user_id: i64) -> usize {
        let tables = self.tables.read().await;
        tables.reports.iter().filter(|r| r.user_id == user_id).count()
    }

    pub async fn recommendation_count(&self, user_id: i64) -> usize {
        let tables = self.tables.read().await;
        tables
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .count()
    }
}

fn newest_first(reports: &mut [UserReport]) {
    reports.sort_by(|a, b| {
        b.created_date
            .cmp(&a.created_date)
            .then(b.report_id.cmp(&a.report_id))
    });
}

#[async_trait]
impl AgentStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn latest_report_date(&self, user_id: i64) -> AppResult<Option<DateTime<Utc>>> {
        let reports = self.get_reports_by_user(user_id).await?;
        Ok(reports.first().map(|r| r.created_date))
    }

    async fn save_analysis(
        &self,
        report: NewUserReport,
        recommended: &[AgentRef],
    ) -> AppResult<UserReport> {
        let mut tables = self.tables.write().await;

        // Reject the whole batch before writing, like the rolled-back transaction.
        if let Some(missing) = recommended
            .iter()
            .find(|r| !tables.agents.iter().any(|a| a.agent_id == r.agent_id))
        {
            return Err(AppError::Database(sqlx::Error::Protocol(format!(
                "foreign key violation: agent {} does not exist",
                missing.agent_id
            ))));
        }

        let now = Utc::now();
        let report_id = tables.next_id();
        let created = UserReport {
            report_id,
            user_id: report.user_id,
            filename: report.filename,
            format: report.format.to_string(),
            created_date: now,
        };
        tables.reports.push(created.clone());

        for agent_ref in recommended {
            let recommendation_id = tables.next_id();
            tables.recommendations.push(RecommendedAgent {
                recommendation_id,
                user_id: report.user_id,
                agent_id: agent_ref.agent_id,
                created_date: now,
            });
        }

        Ok(created)
    }

    async fn get_reports_by_user(&self, user_id: i64) -> AppResult<Vec<UserReport>> {
        let tables = self.tables.read().await;
        let mut reports: Vec<UserReport> = tables
            .reports
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut reports);
        Ok(reports)
    }

    async fn get_report_by_id(&self, report_id: i64) -> AppResult<Option<UserReport>> {
        let tables = self.tables.read().await;
        Ok(tables.reports.iter().find(|r| r.report_id == report_id).cloned())
    }

    async fn get_recommended_agents_by_user(
        &self,
        user_id: i64,
    ) -> AppResult<Vec<RecommendedAgentView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .recommendations
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                let agent = tables.agents.iter().find(|a| a.agent_id == r.agent_id)?;
                Some(RecommendedAgentView {
                    recommendation_id: r.recommendation_id,
                    user_id: r.user_id,
                    recommended_date: r.created_date,
                    agent: AgentSummary::from(agent.clone()),
                })
            })
            .collect())
    }

    async fn get_all_agents(&self) -> AppResult<Vec<Agent>> {
        Ok(self.tables.read().await.agents.clone())
    }

    async fn get_agent_by_id(&self, agent_id: i64) -> AppResult<Option<Agent>> {
        let tables = self.tables.read().await;
        Ok(tables.agents.iter().find(|a| a.agent_id == agent_id).cloned())
    }
}

/// Analyzer double that returns a canned outcome and records what it was asked.
pub struct StubAnalyzer {
    outcome: Option<AnalysisOutcome>,
    pub calls: Mutex<Vec<(String, ProfileSummary)>>,
}

impl StubAnalyzer {
    pub fn returning(outcome: AnalysisOutcome) -> Self {
        Self {
            outcome: Some(outcome),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            outcome: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompanyAnalyzer for StubAnalyzer {
    async fn analyze(
        &self,
        company_name: &str,
        _vector_store: &VectorStoreHandle,
        profile: &ProfileSummary,
    ) -> AppResult<AnalysisOutcome> {
        self.calls
            .lock()
            .await
            .push((company_name.to_string(), profile.clone()));

        self.outcome
            .clone()
            .ok_or_else(|| AppError::Analysis("analysis service unavailable".to_string()))
    }
}

pub fn test_state(
    store: Arc<MemoryStore>,
    analyzer: Arc<StubAnalyzer>,
    report_dir: &Path,
) -> AppState {
    AppState {
        store,
        analyzer,
        reports: ReportStorage::new(report_dir),
        config: test_config(report_dir),
    }
}

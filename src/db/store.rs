//! Persistence seam used by the HTTP layer.
//!
//! Handlers only talk to [`AgentStore`]; [`PgStore`] is the Postgres-backed
//! implementation. Reads borrow a pooled connection per query. The analysis
//! write path runs inside a single transaction that is committed explicitly,
//! so dropping it on any error path rolls both inserts back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use super::{health_check, DatabaseOperations};
use crate::models::*;
use crate::types::AppResult;

#[async_trait]
pub trait AgentStore: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    async fn get_user(&self, user_id: i64) -> AppResult<Option<User>>;

    /// Creation time of the user's newest report, or `None` without reports.
    async fn latest_report_date(&self, user_id: i64) -> AppResult<Option<DateTime<Utc>>>;

    /// Inserts the report and one recommendation row per agent atomically.
    async fn save_analysis(
        &self,
        report: NewUserReport,
        recommended: &[AgentRef],
    ) -> AppResult<UserReport>;

    async fn get_reports_by_user(&self, user_id: i64) -> AppResult<Vec<UserReport>>;

    async fn get_report_by_id(&self, report_id: i64) -> AppResult<Option<UserReport>>;

    async fn get_recommended_agents_by_user(
        &self,
        user_id: i64,
    ) -> AppResult<Vec<RecommendedAgentView>>;

    async fn get_all_agents(&self) -> AppResult<Vec<Agent>>;

    async fn get_agent_by_id(&self, agent_id: i64) -> AppResult<Option<Agent>>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgentStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn get_user(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(DatabaseOperations::get_user_by_id(&self.pool, user_id).await?)
    }

    async fn latest_report_date(&self, user_id: i64) -> AppResult<Option<DateTime<Utc>>> {
        Ok(DatabaseOperations::get_latest_report_date(&self.pool, user_id).await?)
    }

    async fn save_analysis(
        &self,
        report: NewUserReport,
        recommended: &[AgentRef],
    ) -> AppResult<UserReport> {
        let mut tx = self.pool.begin().await?;

        let created = DatabaseOperations::create_user_report(&mut tx, &report).await?;
        let rows =
            DatabaseOperations::create_recommended_agents(&mut tx, report.user_id, recommended)
                .await?;

        tx.commit().await?;

        debug!(
            user_id = report.user_id,
            report_id = created.report_id,
            recommendations = rows.len(),
            "Analysis results persisted"
        );
        Ok(created)
    }

    async fn get_reports_by_user(&self, user_id: i64) -> AppResult<Vec<UserReport>> {
        Ok(DatabaseOperations::get_reports_by_user_id(&self.pool, user_id).await?)
    }

    async fn get_report_by_id(&self, report_id: i64) -> AppResult<Option<UserReport>> {
        Ok(DatabaseOperations::get_report_by_id(&self.pool, report_id).await?)
    }

    async fn get_recommended_agents_by_user(
        &self,
        user_id: i64,
    ) -> AppResult<Vec<RecommendedAgentView>> {
        Ok(DatabaseOperations::get_recommended_agents_by_user(&self.pool, user_id).await?)
    }

    async fn get_all_agents(&self) -> AppResult<Vec<Agent>> {
        Ok(DatabaseOperations::get_all_agents(&self.pool).await?)
    }

    async fn get_agent_by_id(&self, agent_id: i64) -> AppResult<Option<Agent>> {
        Ok(DatabaseOperations::get_agent_by_id(&self.pool, agent_id).await?)
    }
}

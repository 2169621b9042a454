use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::models::*;

const AGENT_COLUMNS: &str = "agent_id, name, display_name, description, category, llm_type, \
                             language, features, is_active, image_url";

pub struct DatabaseOperations;

impl DatabaseOperations {
    // User operations
    pub async fn get_user_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, login_id, name, industry, scale, interests, budget_size,
                   created_date, modified_date
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    // Report operations
    pub async fn create_user_report(
        conn: &mut PgConnection,
        report: &NewUserReport,
    ) -> Result<UserReport, sqlx::Error> {
        sqlx::query_as::<_, UserReport>(
            r#"
            INSERT INTO user_reports (user_id, filename, format)
            VALUES ($1, $2, $3)
            RETURNING report_id, user_id, filename, format, created_date
            "#,
        )
        .bind(report.user_id)
        .bind(&report.filename)
        .bind(report.format.as_str())
        .fetch_one(&mut *conn)
        .await
    }

    /// Most recent report timestamp for the user; exact ties resolve to the higher id.
    pub async fn get_latest_report_date(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT created_date FROM user_reports
            WHERE user_id = $1
            ORDER BY created_date DESC, report_id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn get_reports_by_user_id(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<UserReport>, sqlx::Error> {
        sqlx::query_as::<_, UserReport>(
            r#"
            SELECT report_id, user_id, filename, format, created_date
            FROM user_reports
            WHERE user_id = $1
            ORDER BY created_date DESC, report_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn get_report_by_id(
        pool: &PgPool,
        report_id: i64,
    ) -> Result<Option<UserReport>, sqlx::Error> {
        sqlx::query_as::<_, UserReport>(
            "SELECT report_id, user_id, filename, format, created_date FROM user_reports WHERE report_id = $1",
        )
        .bind(report_id)
        .fetch_optional(pool)
        .await
    }

    // Recommendation operations
    pub async fn create_recommended_agents(
        conn: &mut PgConnection,
        user_id: i64,
        recommended: &[AgentRef],
    ) -> Result<Vec<RecommendedAgent>, sqlx::Error> {
        let agent_ids: Vec<i64> = recommended.iter().map(|r| r.agent_id).collect();

        sqlx::query_as::<_, RecommendedAgent>(
            r#"
            INSERT INTO recommended_agents (user_id, agent_id)
            SELECT $1, ids.agent_id FROM UNNEST($2::BIGINT[]) AS ids(agent_id)
            RETURNING recommendation_id, user_id, agent_id, created_date
            "#,
        )
        .bind(user_id)
        .bind(agent_ids)
        .fetch_all(&mut *conn)
        .await
    }

    pub async fn get_recommended_agents_by_user(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<RecommendedAgentView>, sqlx::Error> {
        sqlx::query_as::<_, RecommendedAgentView>(
            r#"
            SELECT ra.recommendation_id, ra.user_id, ra.created_date AS recommended_date,
                   a.agent_id, a.name, a.display_name, a.description, a.category,
                   a.llm_type, a.language, a.features, a.is_active, a.image_url
            FROM recommended_agents ra
            JOIN agents a ON a.agent_id = ra.agent_id
            WHERE ra.user_id = $1
            ORDER BY ra.recommendation_id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    // Agent catalog operations
    pub async fn get_all_agents(pool: &PgPool) -> Result<Vec<Agent>, sqlx::Error> {
        let sql = format!("SELECT {AGENT_COLUMNS}, created_date FROM agents ORDER BY agent_id ASC");
        sqlx::query_as::<_, Agent>(&sql).fetch_all(pool).await
    }

    pub async fn get_agent_by_id(pool: &PgPool, agent_id: i64) -> Result<Option<Agent>, sqlx::Error> {
        let sql = format!("SELECT {AGENT_COLUMNS}, created_date FROM agents WHERE agent_id = $1");
        sqlx::query_as::<_, Agent>(&sql)
            .bind(agent_id)
            .fetch_optional(pool)
            .await
    }
}

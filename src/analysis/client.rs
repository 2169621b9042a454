// HTTP client for the external company analysis service

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

use super::{AnalysisOutcome, CompanyAnalyzer, ProfileSummary, VectorStoreHandle};
use crate::config::AnalysisConfig;
use crate::types::{AppError, AppResult};

pub struct HttpCompanyAnalyzer {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    company_name: &'a str,
    vector_store: &'a VectorStoreHandle,
    user_data: &'a ProfileSummary,
}

impl HttpCompanyAnalyzer {
    pub fn new(config: &AnalysisConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build analysis client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.service_url.trim_end_matches('/').to_string(),
        })
    }

    fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url)
    }
}

#[async_trait]
impl CompanyAnalyzer for HttpCompanyAnalyzer {
    async fn analyze(
        &self,
        company_name: &str,
        vector_store: &VectorStoreHandle,
        profile: &ProfileSummary,
    ) -> AppResult<AnalysisOutcome> {
        let url = self.analyze_url();
        info!(company = %company_name, scale = %profile.scale, "Requesting company analysis");

        let request = AnalyzeRequest {
            company_name,
            vector_store,
            user_data: profile,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Analysis(format!("Analysis request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Analysis(format!(
                "Analysis service returned {}: {}",
                status, body
            )));
        }

        let outcome: AnalysisOutcome = response
            .json()
            .await
            .map_err(|e| AppError::Analysis(format!("Invalid analysis response: {}", e)))?;

        debug!(
            report = %outcome.summary_report_file,
            recommendations = outcome.recommended_agents.len(),
            "Company analysis completed"
        );
        Ok(outcome)
    }
}

//! Company analysis invocation.
//!
//! The analysis itself runs in an external service. This module builds the
//! profile summary sent with each request, resolves the vector store handle,
//! and defines the [`CompanyAnalyzer`] seam the router calls through.

pub mod client;
pub mod profile;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::models::AgentRef;
use crate::types::AppResult;

pub use client::HttpCompanyAnalyzer;
pub use profile::{ProfileSummary, ScaleTier, UNKNOWN_PROFILE_VALUE};

/// Location of the vector store the analyzer should search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorStoreHandle {
    pub path: String,
    pub collection: String,
}

impl VectorStoreHandle {
    pub fn load(config: &AnalysisConfig) -> Self {
        Self {
            path: config.vector_db_path.clone(),
            collection: config.vector_db_collection.clone(),
        }
    }
}

/// Result payload returned by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub summary_report_file: String,
    #[serde(default)]
    pub recommended_agents: Vec<AgentRef>,
}

#[async_trait]
pub trait CompanyAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        company_name: &str,
        vector_store: &VectorStoreHandle,
        profile: &ProfileSummary,
    ) -> AppResult<AnalysisOutcome>;
}

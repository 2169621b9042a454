use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::User;

pub const UNKNOWN_PROFILE_VALUE: &str = "unknown";

/// Organisation size bucket derived from headcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScaleTier {
    #[serde(rename = "startup")]
    Startup,
    #[serde(rename = "SMB")]
    Smb,
    #[serde(rename = "enterprise")]
    Enterprise,
}

impl ScaleTier {
    pub fn from_headcount(scale: i32) -> Self {
        if scale < 50 {
            ScaleTier::Startup
        } else if scale < 300 {
            ScaleTier::Smb
        } else {
            ScaleTier::Enterprise
        }
    }
}

impl std::fmt::Display for ScaleTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleTier::Startup => write!(f, "startup"),
            ScaleTier::Smb => write!(f, "SMB"),
            ScaleTier::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Snapshot of the user passed to the analyzer as `user_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub industry: String,
    pub scale: ScaleTier,
    pub interests: String,
    pub budget_size: f64,
    /// Creation time of the user's most recent report, if any
    pub created_date: Option<DateTime<Utc>>,
}

impl ProfileSummary {
    pub fn from_user(user: &User, latest_report_date: Option<DateTime<Utc>>) -> Self {
        Self {
            industry: known_or_unknown(user.industry.as_deref()),
            scale: ScaleTier::from_headcount(user.scale),
            interests: known_or_unknown(user.interests.as_deref()),
            budget_size: user.budget_size,
            created_date: latest_report_date,
        }
    }
}

fn known_or_unknown(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => UNKNOWN_PROFILE_VALUE.to_string(),
    }
}

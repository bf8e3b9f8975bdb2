use crate::models::patterns::PatternReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurnRisk {
    Low,
    Medium,
    High,
}

impl ChurnRisk {
    pub fn from_factors(risk_factors: u32) -> Self {
        if risk_factors >= 4 {
            ChurnRisk::High
        } else if risk_factors >= 2 {
            ChurnRisk::Medium
        } else {
            ChurnRisk::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    TechnicalFounder,
    Developer,
    EnterpriseCustomer,
    BusinessCustomer,
    StandardUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    Revenue,
    Development,
    Growth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub priority: Priority,
    pub action: String,
    pub reason: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountAssessment {
    pub health_score: u8,
    pub churn_risk: ChurnRisk,
    pub growth_potential: u8,
    pub user_type: UserType,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub lifetime_value: f64,
    pub total_repos: u64,
    pub monthly_revenue: f64,
    pub avg_daily_users: f64,
}

/// Everything derived for one account in one run; this is what gets persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub account_id: String,
    pub patterns: PatternReport,
    pub key_metrics: KeyMetrics,
    pub assessment: AccountAssessment,
    pub generated_at: i64,
    pub expires_at: i64,
}

impl AnalysisReport {
    pub fn high_priority(&self) -> Vec<Recommendation> {
        self.assessment
            .recommendations
            .iter()
            .filter(|r| r.priority == Priority::High)
            .cloned()
            .collect()
    }
}

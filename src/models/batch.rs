use crate::models::assessment::AnalysisReport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AccountResult {
    Scored { report: Box<AnalysisReport>, alerts_sent: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountOutcome {
    pub account_id: String,
    pub result: AccountResult,
}

impl AccountOutcome {
    pub fn is_scored(&self) -> bool {
        matches!(self.result, AccountResult::Scored { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: i64,
    pub finished_at: i64,
    pub outcomes: Vec<AccountOutcome>,
}

impl BatchReport {
    pub fn scored_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_scored()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.scored_count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchProgress {
    pub current: usize,
    pub total: usize,
    pub account_id: String,
}

//! Session state owned by the host
//!
//! The current case, the analysis history and the last result live in one
//! explicit struct the caller threads through, not in ambient globals.

use crate::cases::CaseCategory;
use crate::classifier::Classification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A case produced by the generator, waiting to be analyzed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCase {
    pub category: CaseCategory,
    pub text: String,
}

/// One completed analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub text: String,
    pub outcome: Classification,
    pub high_risk: bool,
    pub elapsed_ms: u64,
    pub timestamp: DateTime<Utc>,
}

/// Per-session application state.
#[derive(Debug, Default)]
pub struct SessionState {
    pub current_case: Option<GeneratedCase>,
    pub history: Vec<AnalysisRecord>,
    cases_generated: u32,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly generated case as the current one.
    pub fn set_case(&mut self, category: CaseCategory, text: String) {
        self.cases_generated += 1;
        self.current_case = Some(GeneratedCase { category, text });
    }

    pub fn record(
        &mut self,
        text: &str,
        outcome: Classification,
        high_risk: bool,
        elapsed_ms: u64,
    ) {
        self.history.push(AnalysisRecord {
            id: Uuid::new_v4(),
            text: text.to_string(),
            outcome,
            high_risk,
            elapsed_ms,
            timestamp: Utc::now(),
        });
    }

    /// Most recent analysis, if any.
    pub fn last_result(&self) -> Option<&AnalysisRecord> {
        self.history.last()
    }

    pub fn analyses_run(&self) -> usize {
        self.history.len()
    }

    pub fn cases_generated(&self) -> u32 {
        self.cases_generated
    }

    /// How many analyses were flagged high risk.
    pub fn flagged(&self) -> usize {
        self.history.iter().filter(|r| r.high_risk).count()
    }
}

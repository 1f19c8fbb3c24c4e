use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Quote amounts in human units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub input_human: f64,
    pub output_human: f64,
    pub profit: f64,
}

/// Outcome of one execution attempt. Never retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub succeeded: bool,
    /// Present iff `succeeded`.
    pub transaction_id: Option<String>,
    pub realized_input_amount: u64,
    pub realized_output_amount: u64,
    /// Present iff not `succeeded`.
    pub error_detail: Option<String>,
    pub executed_at: DateTime<Utc>,
}

impl ExecutionResult {
    pub fn success(transaction_id: String, realized_input_amount: u64, realized_output_amount: u64) -> Self {
        Self {
            succeeded: true,
            transaction_id: Some(transaction_id),
            realized_input_amount,
            realized_output_amount,
            error_detail: None,
            executed_at: Utc::now(),
        }
    }

    pub fn failure(error_detail: String) -> Self {
        Self {
            succeeded: false,
            transaction_id: None,
            realized_input_amount: 0,
            realized_output_amount: 0,
            error_detail: Some(error_detail),
            executed_at: Utc::now(),
        }
    }
}

/// What happened to one watch-list entry in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    NoRoute,
    Unprofitable(Evaluation),
    Executed {
        evaluation: Evaluation,
        result: ExecutionResult,
    },
    Failed(String),
}

impl EntryOutcome {
    pub fn executed(&self) -> bool {
        matches!(self, EntryOutcome::Executed { .. })
    }
}

/// Per-entry outcomes of one full pass over the watch-list, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<(String, EntryOutcome)>,
}

impl CycleReport {
    pub fn executions(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| o.executed()).count()
    }

    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, EntryOutcome::Failed(_)))
            .count()
    }

    pub fn outcome(&self, symbol: &str) -> Option<&EntryOutcome> {
        self.outcomes.iter().find(|(s, _)| s == symbol).map(|(_, o)| o)
    }
}

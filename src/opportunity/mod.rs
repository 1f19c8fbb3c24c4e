pub mod execution_trigger;
pub mod profit_evaluator;
pub mod quote_client;
pub mod scan_scheduler;
pub mod types;

pub use execution_trigger::ExecutionTrigger;
pub use profit_evaluator::ProfitEvaluator;
pub use quote_client::QuoteClient;
pub use scan_scheduler::{ScanScheduler, ScanSettings};
pub use types::{CycleReport, EntryOutcome, Evaluation, ExecutionResult};

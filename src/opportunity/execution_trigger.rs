use std::sync::Arc;

use tracing::{error, info};

use crate::exchanges::{ExecutionService, Quote};
use crate::opportunity::types::ExecutionResult;
use crate::shared::utils::explorer_tx_url;

/// Single-shot execution on top of an execution service.
///
/// Errors from the service become a failed `ExecutionResult`; nothing is retried.
pub struct ExecutionTrigger {
    service: Arc<dyn ExecutionService>,
    explorer_cluster: Option<String>,
}

impl ExecutionTrigger {
    pub fn new(service: Arc<dyn ExecutionService>) -> Self {
        Self {
            service,
            explorer_cluster: None,
        }
    }

    /// Explorer links get `?cluster=<name>` appended.
    pub fn with_explorer_cluster(mut self, cluster: Option<String>) -> Self {
        self.explorer_cluster = cluster;
        self
    }

    pub async fn execute(&self, quote: &Quote) -> ExecutionResult {
        match self.service.execute_swap(quote).await {
            Ok(receipt) => {
                info!(
                    "✅ {}",
                    explorer_tx_url(&receipt.signature, self.explorer_cluster.as_deref())
                );
                info!(
                    input_mint = %receipt.input_mint,
                    output_mint = %receipt.output_mint,
                    input_amount = receipt.input_amount,
                    output_amount = receipt.output_amount,
                    "Swap settled"
                );
                ExecutionResult::success(receipt.signature, receipt.input_amount, receipt.output_amount)
            }
            Err(e) => {
                error!(input_mint = %quote.input_mint, "❌ Swap execution failed: {:#}", e);
                ExecutionResult::failure(format!("{:#}", e))
            }
        }
    }
}

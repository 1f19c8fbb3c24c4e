pub mod jupiter_quote_client;
pub mod jupiter_swap_client;

pub use jupiter_quote_client::JupiterQuoteClient;
pub use jupiter_swap_client::{JupiterSwapExecutor, SwapExecutorConfig};

use anyhow::Result;
use async_trait::async_trait;

use crate::exchanges::types::{Quote, RouteRequest, SwapReceipt};

/// Routing/quoting engine
#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Candidate routes ranked best first; empty when nothing routes.
    async fn compute_routes(&self, request: &RouteRequest) -> Result<Vec<Quote>>;
}

/// Execution/settlement engine
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Submit the route and wait for confirmation.
    async fn execute_swap(&self, quote: &Quote) -> Result<SwapReceipt>;
}

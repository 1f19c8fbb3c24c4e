pub mod api_clients;
pub mod types;

pub use api_clients::{ExecutionService, JupiterQuoteClient, JupiterSwapExecutor, RoutingService, SwapExecutorConfig};
pub use types::{Hop, Quote, RouteRequest, SwapReceipt};

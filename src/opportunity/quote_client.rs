use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::assets::Asset;
use crate::exchanges::{Quote, RouteRequest, RoutingService};
use crate::shared::errors::RoutingError;
use crate::shared::utils::to_smallest_unit;

/// Round-trip quoting on top of a routing service.
///
/// A failed or empty routing call is a normal "no opportunity" outcome and
/// comes back as `None`.
pub struct QuoteClient {
    routing: Arc<dyn RoutingService>,
}

impl QuoteClient {
    pub fn new(routing: Arc<dyn RoutingService>) -> Self {
        Self { routing }
    }

    pub async fn get_round_trip_quote(&self, asset: &Asset, human_input_amount: f64, slippage_bps: u16) -> Option<Quote> {
        let request = RouteRequest {
            input_mint: asset.address,
            output_mint: asset.address,
            amount: to_smallest_unit(human_input_amount, asset.decimals),
            slippage_bps,
            force_fresh: true,
        };

        match self.routing.compute_routes(&request).await {
            Ok(routes) => {
                let best = routes.into_iter().next();
                if best.is_none() {
                    debug!(symbol = %asset.symbol, "No round-trip route found");
                }
                best
            }
            Err(e) => {
                if let Some(RoutingError::RoundTripRefused(endpoint)) = e.downcast_ref::<RoutingError>() {
                    error!(
                        symbol = %asset.symbol,
                        endpoint = %endpoint,
                        "⛔ Routing service refuses round-trip quotes; point quote_api_url at an endpoint that allows them"
                    );
                } else {
                    warn!(symbol = %asset.symbol, amount = request.amount, "Routing service error: {:#}", e);
                }
                None
            }
        }
    }
}

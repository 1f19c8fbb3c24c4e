//! The scan loop.
//!
//! One cooperative task walks the watch-list in registration order, quotes a
//! round trip for every entry, and executes the ones that clear the profit
//! threshold. Nothing that happens inside one entry can stop the cycle, and
//! nothing that happens inside one cycle can stop the loop.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::assets::{AssetRegistry, WatchEntry};
use crate::exchanges::Quote;
use crate::opportunity::execution_trigger::ExecutionTrigger;
use crate::opportunity::profit_evaluator::ProfitEvaluator;
use crate::opportunity::quote_client::QuoteClient;
use crate::opportunity::types::{CycleReport, EntryOutcome};
use crate::shared::errors::ArbitrageError;
use crate::shared::utils::to_smallest_unit;

#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub slippage_bps: u16,
    /// Idle time between two full passes over the watch-list.
    pub cycle_delay: Duration,
    /// Pause after an execution before the next entry is quoted.
    pub execution_cooldown: Duration,
}

pub struct ScanScheduler {
    watchlist: Vec<WatchEntry>,
    registry: Arc<AssetRegistry>,
    quote_client: QuoteClient,
    evaluator: ProfitEvaluator,
    trigger: ExecutionTrigger,
    settings: ScanSettings,
}

impl ScanScheduler {
    pub fn new(
        watchlist: Vec<WatchEntry>,
        registry: Arc<AssetRegistry>,
        quote_client: QuoteClient,
        evaluator: ProfitEvaluator,
        trigger: ExecutionTrigger,
        settings: ScanSettings,
    ) -> Self {
        Self {
            watchlist,
            registry,
            quote_client,
            evaluator,
            trigger,
            settings,
        }
    }

    pub fn watchlist(&self) -> &[WatchEntry] {
        &self.watchlist
    }

    /// Scan forever. Only process termination stops this.
    pub async fn run(&self) {
        info!(
            entries = self.watchlist.len(),
            threshold = self.evaluator.profit_threshold(),
            slippage_bps = self.settings.slippage_bps,
            "Starting scan loop"
        );

        let mut cycle = 0u64;
        loop {
            let report = self.run_cycle(cycle).await;
            debug!(
                cycle = report.cycle,
                executions = report.executions(),
                failures = report.failures(),
                "Cycle complete"
            );
            cycle = cycle.wrapping_add(1);
            sleep(self.settings.cycle_delay).await;
        }
    }

    /// One pass over the watch-list.
    pub async fn run_cycle(&self, cycle: u64) -> CycleReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(self.watchlist.len());

        for entry in &self.watchlist {
            let symbol = entry.asset.symbol.clone();
            let outcome = match AssertUnwindSafe(self.process_entry(entry)).catch_unwind().await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => {
                    error!(symbol = %symbol, cycle, "Entry evaluation failed: {}", e);
                    EntryOutcome::Failed(e.to_string())
                }
                Err(panic) => {
                    let e = ArbitrageError::Unexpected {
                        symbol: symbol.clone(),
                        detail: panic_message(panic.as_ref()),
                    };
                    error!(symbol = %symbol, cycle, "{}", e);
                    EntryOutcome::Failed(e.to_string())
                }
            };
            outcomes.push((symbol, outcome));
        }

        CycleReport {
            cycle,
            started_at,
            outcomes,
        }
    }

    async fn process_entry(&self, entry: &WatchEntry) -> Result<EntryOutcome, ArbitrageError> {
        let asset = &entry.asset;
        if to_smallest_unit(entry.base_amount, asset.decimals) == 0 {
            return Err(ArbitrageError::ZeroAmount {
                symbol: asset.symbol.clone(),
                amount: entry.base_amount,
            });
        }

        let quote = match self
            .quote_client
            .get_round_trip_quote(asset, entry.base_amount, self.settings.slippage_bps)
            .await
        {
            Some(quote) => quote,
            None => return Ok(EntryOutcome::NoRoute),
        };

        if quote.input_mint != asset.address || quote.output_mint != asset.address || !quote.is_connected() {
            return Err(ArbitrageError::InvalidRoute(format!(
                "{} route does not form a round trip ({} hops: {})",
                asset.symbol,
                quote.hops.len(),
                self.describe_route(&quote)
            )));
        }

        let evaluation = self.evaluator.evaluate(&quote, asset);

        if quote.output_amount > quote.input_amount {
            info!(symbol = %asset.symbol, "🚀 Found possible good swap");
            info!(symbol = %asset.symbol, venues = %quote.venue_chain(), "🏁 Swap route: {}", self.describe_route(&quote));
            info!(
                symbol = %asset.symbol,
                input = evaluation.input_human,
                output = evaluation.output_human,
                "🤑 Total profit: {}",
                evaluation.profit
            );
        }

        if !self.evaluator.is_worth_executing(&quote, &evaluation) {
            return Ok(EntryOutcome::Unprofitable(evaluation));
        }

        let result = self.trigger.execute(&quote).await;
        if !result.succeeded {
            warn!(
                symbol = %asset.symbol,
                detail = result.error_detail.as_deref().unwrap_or_default(),
                "Execution did not complete"
            );
        }
        sleep(self.settings.execution_cooldown).await;

        Ok(EntryOutcome::Executed { evaluation, result })
    }

    /// `USDC -> SOL | SOL -> USDC | `
    fn describe_route(&self, quote: &Quote) -> String {
        quote
            .hops
            .iter()
            .map(|hop| {
                format!(
                    "{} -> {} | ",
                    self.registry.display_symbol(&hop.input_mint),
                    self.registry.display_symbol(&hop.output_mint)
                )
            })
            .collect()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

//! Swap execution through the Jupiter swap API and a Solana RPC node

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    signature::{Keypair, Signer},
    transaction::VersionedTransaction,
};
use tracing::{info, warn};

use super::ExecutionService;
use crate::exchanges::types::{Quote, SwapReceipt};
use crate::shared::errors::ExecutionError;

/// Swap execution configuration
#[derive(Debug, Clone)]
pub struct SwapExecutorConfig {
    pub base_url: String,
    /// Simulate before sending.
    pub simulate_first: bool,
    /// Build, sign and simulate, but never send.
    pub simulate_only: bool,
    /// `None` lets the swap API pick a priority fee.
    pub priority_fee_lamports: Option<u64>,
}

impl Default for SwapExecutorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://quote-api.jup.ag/v6".to_string(),
            simulate_first: false,
            simulate_only: false,
            priority_fee_lamports: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterSwapResponse {
    swap_transaction: String,
    #[serde(default)]
    last_valid_block_height: Option<u64>,
}

/// Submits Jupiter routes as signed versioned transactions
pub struct JupiterSwapExecutor {
    http_client: Client,
    rpc_client: Arc<RpcClient>,
    wallet: Arc<Keypair>,
    config: SwapExecutorConfig,
}

impl JupiterSwapExecutor {
    pub fn new(rpc_client: Arc<RpcClient>, wallet: Arc<Keypair>, config: SwapExecutorConfig) -> Self {
        Self {
            http_client: Client::new(),
            rpc_client,
            wallet,
            config,
        }
    }

    fn swap_request_body(&self, quote: &Quote) -> serde_json::Value {
        let priority_fee = match self.config.priority_fee_lamports {
            Some(lamports) => json!(lamports),
            None => json!("auto"),
        };
        json!({
            "quoteResponse": quote.payload,
            "userPublicKey": self.wallet.pubkey().to_string(),
            "wrapAndUnwrapSol": true,
            "dynamicComputeUnitLimit": true,
            "prioritizationFeeLamports": priority_fee,
        })
    }

    async fn fetch_swap_transaction(&self, quote: &Quote) -> Result<VersionedTransaction> {
        let url = format!("{}/swap", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http_client
            .post(&url)
            .json(&self.swap_request_body(quote))
            .send()
            .await
            .map_err(|e| ExecutionError::SwapRequest(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ExecutionError::SwapRequest(format!("status {}: {}", status, body)).into());
        }

        let swap: JupiterSwapResponse = response.json().await.context("parse Jupiter swap response")?;
        if let Some(height) = swap.last_valid_block_height {
            info!("📝 Swap transaction valid until block height {}", height);
        }
        decode_transaction(&swap.swap_transaction)
    }

    async fn simulate(&self, transaction: &VersionedTransaction) -> Result<()> {
        info!("🧪 Simulating transaction...");
        let simulation = self
            .rpc_client
            .simulate_transaction(transaction)
            .await
            .map_err(|e| ExecutionError::SimulationFailed(e.to_string()))?;

        if let Some(err) = simulation.value.err {
            warn!("❌ Simulation failed: {:?}", err);
            if let Some(logs) = simulation.value.logs {
                warn!("   - Logs: {:?}", logs);
            }
            return Err(ExecutionError::SimulationFailed(format!("{:?}", err)).into());
        }

        info!("✅ Simulation successful, compute units used: {:?}", simulation.value.units_consumed);
        Ok(())
    }
}

fn decode_transaction(encoded: &str) -> Result<VersionedTransaction> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| ExecutionError::InvalidTransaction(format!("base64: {}", e)))?;
    let transaction: VersionedTransaction = bincode::deserialize(&bytes)
        .map_err(|e| ExecutionError::InvalidTransaction(format!("bincode: {}", e)))?;
    Ok(transaction)
}

#[async_trait]
impl ExecutionService for JupiterSwapExecutor {
    async fn execute_swap(&self, quote: &Quote) -> Result<SwapReceipt> {
        let unsigned = self.fetch_swap_transaction(quote).await?;
        let signed = VersionedTransaction::try_new(unsigned.message, &[&*self.wallet])
            .map_err(|e| ExecutionError::InvalidTransaction(format!("signing: {}", e)))?;

        if self.config.simulate_first || self.config.simulate_only {
            self.simulate(&signed).await?;
        }
        if self.config.simulate_only {
            return Err(ExecutionError::TransactionFailed("simulation only, transaction not sent".to_string()).into());
        }

        let signature = self
            .rpc_client
            .send_and_confirm_transaction(&signed)
            .await
            .map_err(|e| ExecutionError::TransactionFailed(e.to_string()))?;
        info!("🚀 Swap transaction confirmed: {}", signature);

        Ok(SwapReceipt {
            signature: signature.to_string(),
            input_mint: quote.input_mint,
            output_mint: quote.output_mint,
            input_amount: quote.input_amount,
            output_amount: quote.output_amount,
        })
    }
}

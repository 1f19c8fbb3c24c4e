// src/app.rs
use anyhow::{anyhow, Context, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{read_keypair_file, Keypair, Signer},
};
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

use crate::assets::{AssetRegistry, CatalogSource, HttpCatalogSource, WatchEntry};
use crate::cli::{Cli, Command};
use crate::config::{Cluster, Config};
use crate::exchanges::{ExecutionService, JupiterQuoteClient, JupiterSwapExecutor, RoutingService, SwapExecutorConfig};
use crate::opportunity::{ExecutionTrigger, ProfitEvaluator, QuoteClient, ScanScheduler, ScanSettings};
use crate::shared::errors::{AppError, AssetError};

/// Which watch-list the scheduler gets.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanMode {
    /// Every configured entry; unknown symbols are skipped.
    Multi(Vec<(String, f64)>),
    /// One entry; an unknown symbol is fatal.
    Single { symbol: String, amount: f64 },
}

/// Values read from the process environment (`.env` included).
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub cluster: Option<String>,
    pub wallet_private_key: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            cluster: std::env::var("CLUSTER").ok().filter(|s| !s.is_empty()),
            wallet_private_key: std::env::var("WALLET_PRIVATE_KEY").ok().filter(|s| !s.is_empty()),
        }
    }
}

/// Fully resolved runtime configuration. Built once, never mutated.
#[derive(Clone)]
pub struct AppCfg {
    pub mode: ScanMode,
    pub cluster: Cluster,
    pub rpc_url: String,
    pub keypair_path: Option<String>,
    pub wallet_private_key: Option<String>,
    pub quote_api_url: String,
    pub swap_api_url: String,
    pub token_list_url: String,
    pub slippage_bps: u16,
    pub profit_threshold: f64,
    pub cycle_delay: Duration,
    pub execution_cooldown: Duration,
    pub simulate_first: bool,
    pub simulate_only: bool,
    pub priority_fee_lamports: Option<u64>,
}

impl std::fmt::Debug for AppCfg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCfg")
            .field("mode", &self.mode)
            .field("cluster", &self.cluster)
            .field("rpc_url", &self.rpc_url)
            .field("keypair_path", &self.keypair_path)
            .field("wallet_private_key", &self.wallet_private_key.as_ref().map(|_| "<redacted>"))
            .field("quote_api_url", &self.quote_api_url)
            .field("swap_api_url", &self.swap_api_url)
            .field("token_list_url", &self.token_list_url)
            .field("slippage_bps", &self.slippage_bps)
            .field("profit_threshold", &self.profit_threshold)
            .field("cycle_delay", &self.cycle_delay)
            .field("execution_cooldown", &self.execution_cooldown)
            .field("simulate_first", &self.simulate_first)
            .field("simulate_only", &self.simulate_only)
            .field("priority_fee_lamports", &self.priority_fee_lamports)
            .finish()
    }
}

impl AppCfg {
    /// Priority: CLI args > environment (`CLUSTER`, `WALLET_PRIVATE_KEY`) > config file > defaults.
    pub fn resolve(cli: &Cli, cfg: Config, env: &EnvOverrides) -> Result<Self, AppError> {
        let cluster = match cli.cluster.as_deref().or(env.cluster.as_deref()) {
            Some(s) => s.parse::<Cluster>().map_err(|e| AppError::ConfigError(e.to_string()))?,
            None => cfg.rpc.cluster.unwrap_or_default(),
        };

        let rpc_url = cli
            .rpc_url
            .clone()
            .or(cfg.rpc.url)
            .unwrap_or_else(|| cluster.default_rpc_url().to_string());

        let profit_threshold = cli
            .profit_threshold
            .or(cfg.trade.profit_threshold)
            .ok_or_else(|| AppError::ConfigError("profit threshold is not configured".to_string()))?;
        if !profit_threshold.is_finite() {
            return Err(AppError::ConfigError(format!("invalid profit threshold {}", profit_threshold)));
        }

        let mode = match cli.command() {
            Command::Single { symbol, amount } => ScanMode::Single { symbol, amount },
            Command::Scan => {
                if cfg.watch.is_empty() {
                    return Err(AppError::ConfigError("watch-list is empty".to_string()));
                }
                for entry in &cfg.watch {
                    if !(entry.amount.is_finite() && entry.amount > 0.0) {
                        return Err(AppError::ConfigError(format!(
                            "watch amount for {} must be positive, got {}",
                            entry.symbol, entry.amount
                        )));
                    }
                }
                ScanMode::Multi(cfg.watch.into_iter().map(|w| (w.symbol, w.amount)).collect())
            }
        };

        Ok(Self {
            mode,
            cluster,
            rpc_url,
            // WALLET_PRIVATE_KEY shadows the file's keypair path, not an explicit --keypair.
            keypair_path: match (&cli.keypair, &env.wallet_private_key) {
                (Some(path), _) => Some(path.clone()),
                (None, Some(_)) => None,
                (None, None) => cfg.wallet.keypair,
            },
            wallet_private_key: env.wallet_private_key.clone(),
            quote_api_url: cfg.jupiter.quote_api_url,
            swap_api_url: cfg.jupiter.swap_api_url,
            token_list_url: cfg.jupiter.token_list_url,
            slippage_bps: cli.slippage_bps.unwrap_or(cfg.trade.slippage_bps),
            profit_threshold,
            cycle_delay: Duration::from_millis(cli.cycle_delay_ms.unwrap_or(cfg.trade.cycle_delay_ms)),
            execution_cooldown: Duration::from_millis(cli.cooldown_ms.unwrap_or(cfg.trade.execution_cooldown_ms)),
            simulate_first: cfg.trade.simulate_first,
            simulate_only: cli.simulate_only || cfg.trade.simulate_only,
            priority_fee_lamports: cfg.trade.priority_fee_lamports,
        })
    }

    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            slippage_bps: self.slippage_bps,
            cycle_delay: self.cycle_delay,
            execution_cooldown: self.execution_cooldown,
        }
    }
}

/// Keypair file first, then the base58 secret from the environment.
pub fn load_wallet(keypair_path: Option<&str>, private_key: Option<&str>) -> Result<Keypair, AppError> {
    if let Some(path) = keypair_path {
        return read_keypair_file(path)
            .map_err(|e| AppError::CredentialError(format!("Failed to load keypair {}: {}", path, e)));
    }
    let secret = private_key.ok_or_else(|| {
        AppError::CredentialError("no keypair file configured and WALLET_PRIVATE_KEY is not set".to_string())
    })?;
    let bytes = bs58::decode(secret.trim())
        .into_vec()
        .map_err(|e| AppError::CredentialError(format!("WALLET_PRIVATE_KEY is not base58: {}", e)))?;
    Keypair::try_from(&bytes[..])
        .map_err(|e| AppError::CredentialError(format!("WALLET_PRIVATE_KEY is not a valid keypair: {}", e)))
}

/// Resolve configured symbols against the registry, keeping their order.
pub fn resolve_watchlist(registry: &AssetRegistry, mode: &ScanMode) -> Result<Vec<WatchEntry>, AppError> {
    let entries = match mode {
        ScanMode::Single { symbol, amount } => {
            let asset = registry.resolve_by_symbol(symbol)?;
            vec![WatchEntry {
                asset: asset.clone(),
                base_amount: *amount,
            }]
        }
        ScanMode::Multi(list) => {
            let mut entries = Vec::with_capacity(list.len());
            for (symbol, amount) in list {
                match registry.resolve_by_symbol(symbol) {
                    Ok(asset) => entries.push(WatchEntry {
                        asset: asset.clone(),
                        base_amount: *amount,
                    }),
                    Err(AssetError::UnknownSymbol(s)) | Err(AssetError::UnknownAddress(s)) => {
                        warn!(symbol = %s, "🙁 Token could not be found in the token list, skipping");
                    }
                }
            }
            entries
        }
    };

    if entries.is_empty() {
        return Err(AppError::ConfigError("no watch-list entry could be resolved".to_string()));
    }
    Ok(entries)
}

/// Catalog fetch, watch-list resolution and wiring, without any I/O of its own.
pub async fn build_scheduler(
    app_cfg: &AppCfg,
    catalog: &dyn CatalogSource,
    routing: Arc<dyn RoutingService>,
    execution: Arc<dyn ExecutionService>,
) -> Result<ScanScheduler> {
    let records = catalog
        .fetch_assets()
        .await
        .map_err(|e| AppError::CatalogError(format!("{:#}", e)))?;
    let registry = Arc::new(AssetRegistry::from_records(&records));
    info!("📚 Asset registry holds {} assets", registry.asset_count());

    let watchlist = resolve_watchlist(&registry, &app_cfg.mode)?;
    info!("💸 Watching {} tokens:", watchlist.len());
    for entry in &watchlist {
        info!(
            "   - {} ({}, {} decimals) amount {}",
            entry.asset.symbol, entry.asset.address, entry.asset.decimals, entry.base_amount
        );
    }

    let trigger = ExecutionTrigger::new(execution)
        .with_explorer_cluster(app_cfg.cluster.explorer_query().map(str::to_string));

    Ok(ScanScheduler::new(
        watchlist,
        registry,
        QuoteClient::new(routing),
        ProfitEvaluator::new(app_cfg.profit_threshold),
        trigger,
        app_cfg.scan_settings(),
    ))
}

pub async fn run(app_cfg: AppCfg) -> Result<()> {
    info!("Starting round-trip arbitrage scanner");
    info!("Configuration: {:?}", app_cfg);

    let keypair = load_wallet(app_cfg.keypair_path.as_deref(), app_cfg.wallet_private_key.as_deref())?;
    info!("Loaded keypair: {}", keypair.pubkey());

    info!("📡 Establishing connection to Solana RPC endpoint {}", app_cfg.rpc_url);
    let rpc_client = Arc::new(RpcClient::new_with_commitment(
        app_cfg.rpc_url.clone(),
        CommitmentConfig::confirmed(),
    ));
    match rpc_client.get_version().await {
        Ok(version) => info!("✅ Connected to {} (solana-core {})", app_cfg.cluster, version.solana_core),
        Err(e) => warn!("⚠️ RPC endpoint did not answer getVersion: {}", e),
    }

    let catalog = HttpCatalogSource::new(app_cfg.token_list_url.clone());
    info!("🪐 Connecting to Jupiter at {}", app_cfg.quote_api_url);
    let routing: Arc<dyn RoutingService> = Arc::new(JupiterQuoteClient::new(app_cfg.quote_api_url.clone()));
    let execution: Arc<dyn ExecutionService> = Arc::new(JupiterSwapExecutor::new(
        rpc_client,
        Arc::new(keypair),
        SwapExecutorConfig {
            base_url: app_cfg.swap_api_url.clone(),
            simulate_first: app_cfg.simulate_first,
            simulate_only: app_cfg.simulate_only,
            priority_fee_lamports: app_cfg.priority_fee_lamports,
        },
    ));

    let scheduler = build_scheduler(&app_cfg, &catalog, routing, execution)
        .await
        .context("startup")?;

    if app_cfg.simulate_only {
        info!("Simulation mode - swaps are simulated, never sent");
    }

    scheduler.run().await;
    Err(anyhow!("scan loop exited"))
}

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::{fmt, fs, path::Path, str::FromStr};

pub const DEFAULT_JUPITER_API_URL: &str = "https://quote-api.jup.ag/v6";
pub const DEFAULT_TOKEN_LIST_URL: &str = "https://token.jup.ag/all";
pub const DEFAULT_SLIPPAGE_BPS: u16 = 50;
pub const DEFAULT_CYCLE_DELAY_MS: u64 = 2_000;
pub const DEFAULT_EXECUTION_COOLDOWN_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Cluster {
    #[default]
    #[serde(rename = "mainnet-beta")]
    MainnetBeta,
    #[serde(rename = "devnet")]
    Devnet,
}

impl Cluster {
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
        }
    }

    /// `?cluster=` value for explorer links; mainnet needs none.
    pub fn explorer_query(&self) -> Option<&'static str> {
        match self {
            Cluster::MainnetBeta => None,
            Cluster::Devnet => Some("devnet"),
        }
    }
}

impl FromStr for Cluster {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "devnet" => Ok(Cluster::Devnet),
            _ => Err(anyhow!("Unknown cluster: {}", s)),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::MainnetBeta => write!(f, "mainnet-beta"),
            Cluster::Devnet => write!(f, "devnet"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RpcCfg {
    pub url: Option<String>,
    pub cluster: Option<Cluster>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletCfg {
    pub keypair: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JupiterCfg {
    #[serde(default = "default_jupiter_api_url")]
    pub quote_api_url: String,
    #[serde(default = "default_jupiter_api_url")]
    pub swap_api_url: String,
    #[serde(default = "default_token_list_url")]
    pub token_list_url: String,
}

impl Default for JupiterCfg {
    fn default() -> Self {
        Self {
            quote_api_url: default_jupiter_api_url(),
            swap_api_url: default_jupiter_api_url(),
            token_list_url: default_token_list_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TradeCfg {
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
    pub profit_threshold: Option<f64>,
    #[serde(default = "default_cycle_delay_ms")]
    pub cycle_delay_ms: u64,
    #[serde(default = "default_execution_cooldown_ms")]
    pub execution_cooldown_ms: u64,
    #[serde(default)]
    pub simulate_first: bool,
    #[serde(default)]
    pub simulate_only: bool,
    pub priority_fee_lamports: Option<u64>,
}

impl Default for TradeCfg {
    fn default() -> Self {
        Self {
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            profit_threshold: None,
            cycle_delay_ms: DEFAULT_CYCLE_DELAY_MS,
            execution_cooldown_ms: DEFAULT_EXECUTION_COOLDOWN_MS,
            simulate_first: false,
            simulate_only: false,
            priority_fee_lamports: None,
        }
    }
}

/// One `[[watch]]` entry; file order is scan order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WatchCfg {
    pub symbol: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc: RpcCfg,
    #[serde(default)]
    pub wallet: WalletCfg,
    #[serde(default)]
    pub jupiter: JupiterCfg,
    #[serde(default)]
    pub trade: TradeCfg,
    #[serde(default)]
    pub watch: Vec<WatchCfg>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        Self::from_toml(&s)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parse Config.toml")?;
        Ok(cfg)
    }
}

fn default_jupiter_api_url() -> String {
    DEFAULT_JUPITER_API_URL.to_string()
}

fn default_token_list_url() -> String {
    DEFAULT_TOKEN_LIST_URL.to_string()
}

fn default_slippage_bps() -> u16 {
    DEFAULT_SLIPPAGE_BPS
}

fn default_cycle_delay_ms() -> u64 {
    DEFAULT_CYCLE_DELAY_MS
}

fn default_execution_cooldown_ms() -> u64 {
    DEFAULT_EXECUTION_COOLDOWN_MS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let cfg = Config::from_toml(
            r#"
            [rpc]
            url = "https://rpc.example.invalid"
            cluster = "devnet"

            [wallet]
            keypair = "~/.config/solana/id.json"

            [trade]
            slippage_bps = 0
            profit_threshold = 0.2
            cycle_delay_ms = 1500
            simulate_only = true

            [[watch]]
            symbol = "USDC"
            amount = 50.0

            [[watch]]
            symbol = "SOL"
            amount = 1.0
            "#,
        )
        .unwrap();

        assert_eq!(cfg.rpc.cluster, Some(Cluster::Devnet));
        assert_eq!(cfg.trade.slippage_bps, 0);
        assert_eq!(cfg.trade.profit_threshold, Some(0.2));
        assert_eq!(cfg.trade.execution_cooldown_ms, DEFAULT_EXECUTION_COOLDOWN_MS);
        assert!(cfg.trade.simulate_only);
        assert_eq!(cfg.jupiter.quote_api_url, DEFAULT_JUPITER_API_URL);
        let symbols: Vec<&str> = cfg.watch.iter().map(|w| w.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["USDC", "SOL"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert!(cfg.rpc.url.is_none());
        assert!(cfg.watch.is_empty());
        assert_eq!(cfg.trade.slippage_bps, DEFAULT_SLIPPAGE_BPS);
        assert_eq!(cfg.trade.cycle_delay_ms, DEFAULT_CYCLE_DELAY_MS);
        assert_eq!(cfg.jupiter.token_list_url, DEFAULT_TOKEN_LIST_URL);
    }

    #[test]
    fn test_cluster_parsing() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("Mainnet-Beta".parse::<Cluster>().unwrap(), Cluster::MainnetBeta);
        assert!("testnet".parse::<Cluster>().is_err());
        assert_eq!(Cluster::Devnet.default_rpc_url(), "https://api.devnet.solana.com");
        assert_eq!(Cluster::MainnetBeta.explorer_query(), None);
    }
}

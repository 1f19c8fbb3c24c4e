use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Round-trip arbitrage scanner for Solana assets routed through Jupiter")]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// RPC endpoint URL (overrides config and cluster default)
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Cluster: mainnet-beta or devnet
    #[arg(long, global = true)]
    pub cluster: Option<String>,

    /// Path to keypair file
    #[arg(long, global = true)]
    pub keypair: Option<String>,

    /// Slippage tolerance in basis points
    #[arg(long, global = true)]
    pub slippage_bps: Option<u16>,

    /// Minimum profit, in human units of the scanned asset
    #[arg(long, global = true, allow_negative_numbers = true)]
    pub profit_threshold: Option<f64>,

    /// Delay between full scan cycles, in milliseconds
    #[arg(long, global = true)]
    pub cycle_delay_ms: Option<u64>,

    /// Pause after an execution, in milliseconds
    #[arg(long, global = true)]
    pub cooldown_ms: Option<u64>,

    /// Build and simulate swaps without sending them
    #[arg(long, global = true)]
    pub simulate_only: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Scan every configured watch-list entry (default)
    Scan,
    /// Scan a single asset forever
    Single {
        /// Asset symbol as listed in the token list, e.g. USDC
        symbol: String,
        /// Amount to route, in human units
        #[arg(value_parser = parse_positive_amount)]
        amount: f64,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Scan)
    }
}

fn parse_positive_amount(s: &str) -> Result<f64, String> {
    let amount: f64 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(format!("amount must be a positive number, got {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_default_is_scan() {
        let cli = Cli::try_parse_from(["roundtrip-arb"]).unwrap();
        assert_eq!(cli.command(), Command::Scan);
    }

    #[test]
    fn test_single_mode() {
        let cli = Cli::try_parse_from(["roundtrip-arb", "single", "USDC", "50"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Single {
                symbol: "USDC".to_string(),
                amount: 50.0
            }
        );
    }

    #[test]
    fn test_single_missing_amount_is_usage_error() {
        let err = Cli::try_parse_from(["roundtrip-arb", "single", "USDC"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_ne!(err.exit_code(), 0);
        assert!(err.to_string().contains("Usage"));
    }

    #[test]
    fn test_single_extra_argument_is_usage_error() {
        let err = Cli::try_parse_from(["roundtrip-arb", "single", "USDC", "50", "extra"]).unwrap_err();
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_single_rejects_non_positive_amount() {
        assert!(Cli::try_parse_from(["roundtrip-arb", "single", "USDC", "zero"]).is_err());
        assert!(Cli::try_parse_from(["roundtrip-arb", "single", "USDC", "0"]).is_err());
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "roundtrip-arb",
            "single",
            "SOL",
            "1.5",
            "--profit-threshold",
            "0.1",
            "--slippage-bps",
            "0",
        ])
        .unwrap();
        assert_eq!(cli.profit_threshold, Some(0.1));
        assert_eq!(cli.slippage_bps, Some(0));
    }
}

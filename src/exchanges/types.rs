use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// What the routing service is asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    /// Smallest units of the input mint.
    pub amount: u64,
    pub slippage_bps: u16,
    /// Bypass any route cache the service keeps.
    pub force_fresh: bool,
}

/// One leg of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hop {
    pub venue_label: String,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
}

/// A candidate route as returned by the routing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub input_amount: u64,
    pub output_amount: u64,
    pub hops: Vec<Hop>,
    pub slippage_bps: u16,
    pub price_impact_pct: f64,
    /// Service-specific route body, handed back untouched on execution.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Quote {
    /// Hops chain from `input_mint` to `output_mint` with no gaps.
    pub fn is_connected(&self) -> bool {
        let (first, last) = match (self.hops.first(), self.hops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return false,
        };
        first.input_mint == self.input_mint
            && last.output_mint == self.output_mint
            && self
                .hops
                .windows(2)
                .all(|pair| pair[0].output_mint == pair[1].input_mint)
    }

    /// `Orca x Raydium x ...`
    pub fn venue_chain(&self) -> String {
        self.hops
            .iter()
            .map(|hop| hop.venue_label.as_str())
            .collect::<Vec<_>>()
            .join(" x ")
    }
}

/// What the execution service reports after a confirmed swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub signature: String,
    pub input_mint: Pubkey,
    pub output_mint: Pubkey,
    pub input_amount: u64,
    pub output_amount: u64,
}

//! Asset catalog and the symbol/address registry built from it

pub mod catalog;
pub mod registry;

pub use catalog::{CatalogSource, HttpCatalogSource};
pub use registry::AssetRegistry;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

/// Raw token list record, as served by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    #[serde(default)]
    pub chain_id: Option<u64>,
    pub address: String,
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub decimals: u8,
    #[serde(default, rename = "logoURI")]
    pub logo_uri: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A resolved, tradable asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub symbol: String,
    pub address: Pubkey,
    pub decimals: u8,
    pub name: Option<String>,
}

impl Asset {
    pub fn new(symbol: impl Into<String>, address: Pubkey, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            decimals,
            name: None,
        }
    }
}

impl TryFrom<&AssetRecord> for Asset {
    type Error = solana_sdk::pubkey::ParsePubkeyError;

    fn try_from(record: &AssetRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            symbol: record.symbol.clone(),
            address: record.address.parse()?,
            decimals: record.decimals,
            name: record.name.clone(),
        })
    }
}

/// What the scheduler evaluates every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchEntry {
    pub asset: Asset,
    /// Human units, always positive.
    pub base_amount: f64,
}

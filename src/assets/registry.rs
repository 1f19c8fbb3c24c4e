//! Symbol and address indices over the asset catalog

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::{Asset, AssetRecord};
use crate::shared::errors::AssetError;

/// Immutable asset lookup, built once at startup.
#[derive(Debug, Default)]
pub struct AssetRegistry {
    assets: Vec<Asset>,
    by_symbol: HashMap<String, usize>,
    by_address: HashMap<Pubkey, usize>,
}

impl AssetRegistry {
    /// Build both indices in one pass.
    ///
    /// Records with an unparseable address are skipped. A repeated symbol
    /// rebinds the symbol index to the later record; the earlier one stays
    /// reachable by address.
    pub fn from_records(records: &[AssetRecord]) -> Self {
        let mut registry = Self {
            assets: Vec::with_capacity(records.len()),
            by_symbol: HashMap::with_capacity(records.len()),
            by_address: HashMap::with_capacity(records.len()),
        };

        for record in records {
            let asset = match Asset::try_from(record) {
                Ok(asset) => asset,
                Err(e) => {
                    debug!(symbol = %record.symbol, address = %record.address, "Skipping catalog record: {}", e);
                    continue;
                }
            };
            if registry.by_address.contains_key(&asset.address) {
                debug!(address = %asset.address, "Duplicate address in catalog, keeping first record");
                continue;
            }
            let idx = registry.assets.len();
            registry.by_symbol.insert(asset.symbol.clone(), idx);
            registry.by_address.insert(asset.address, idx);
            registry.assets.push(asset);
        }

        registry
    }

    pub fn from_assets(assets: Vec<Asset>) -> Self {
        let mut registry = Self::default();
        for asset in assets {
            if registry.by_address.contains_key(&asset.address) {
                continue;
            }
            let idx = registry.assets.len();
            registry.by_symbol.insert(asset.symbol.clone(), idx);
            registry.by_address.insert(asset.address, idx);
            registry.assets.push(asset);
        }
        registry
    }

    pub fn resolve_by_symbol(&self, symbol: &str) -> Result<&Asset, AssetError> {
        self.by_symbol
            .get(symbol)
            .map(|&idx| &self.assets[idx])
            .ok_or_else(|| AssetError::UnknownSymbol(symbol.to_string()))
    }

    pub fn resolve_by_address(&self, address: &Pubkey) -> Result<&Asset, AssetError> {
        self.by_address
            .get(address)
            .map(|&idx| &self.assets[idx])
            .ok_or_else(|| AssetError::UnknownAddress(address.to_string()))
    }

    /// Symbol for a mint, or the shortened address when the mint is not catalogued.
    pub fn display_symbol(&self, address: &Pubkey) -> String {
        match self.resolve_by_address(address) {
            Ok(asset) => asset.symbol.clone(),
            Err(_) => crate::shared::utils::format_address(address),
        }
    }

    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}

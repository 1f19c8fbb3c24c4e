//! Token list fetch

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use super::AssetRecord;

/// Read-only source of asset records, consulted once at startup.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_assets(&self) -> Result<Vec<AssetRecord>>;
}

/// Jupiter-style token list served as a JSON array over HTTP.
pub struct HttpCatalogSource {
    http_client: Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_assets(&self) -> Result<Vec<AssetRecord>> {
        info!("🪙 Fetching token list from {}", self.url);

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("token list request to {}", self.url))?;

        if !response.status().is_success() {
            return Err(anyhow!("Token list request failed with status: {}", response.status()));
        }

        let records: Vec<AssetRecord> = response.json().await.context("parse token list")?;
        info!("✅ Token list contains {} assets", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_parses_token_list_shape() {
        let json = r#"[{
            "chainId": 101,
            "address": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "symbol": "USDC",
            "name": "USD Coin",
            "decimals": 6,
            "logoURI": "https://example.invalid/usdc.png",
            "tags": ["stablecoin"]
        }, {
            "address": "So11111111111111111111111111111111111111112",
            "symbol": "SOL",
            "decimals": 9
        }]"#;

        let records: Vec<AssetRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol, "USDC");
        assert_eq!(records[0].tags, vec!["stablecoin".to_string()]);
        assert_eq!(records[0].logo_uri.as_deref(), Some("https://example.invalid/usdc.png"));
        assert_eq!(records[1].chain_id, None);
        assert_eq!(records[1].decimals, 9);
    }
}

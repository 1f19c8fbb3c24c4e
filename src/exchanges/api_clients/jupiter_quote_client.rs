use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::RoutingService;
use crate::exchanges::types::{Hop, Quote, RouteRequest};
use crate::shared::errors::RoutingError;

/// Jupiter error codes that mean "nothing routes", not "the call failed".
const NO_ROUTE_CODES: &[&str] = &["COULD_NOT_FIND_ANY_ROUTE", "NO_ROUTES_FOUND"];

/// Returned by endpoints that refuse quotes whose input and output mint match.
const ROUND_TRIP_REFUSED_CODE: &str = "CIRCULAR_ARBITRAGE_IS_DISABLED";

/// `GET /quote` response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterQuoteResponse {
    input_mint: String,
    in_amount: String,
    output_mint: String,
    out_amount: String,
    slippage_bps: u16,
    #[serde(default)]
    price_impact_pct: Option<String>,
    route_plan: Vec<JupiterRoutePlanStep>,
}

#[derive(Debug, Deserialize)]
struct JupiterRoutePlanStep {
    #[serde(rename = "swapInfo")]
    swap_info: JupiterSwapInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterSwapInfo {
    #[serde(default)]
    label: Option<String>,
    input_mint: String,
    output_mint: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JupiterErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

/// Jupiter v6 quote API client
pub struct JupiterQuoteClient {
    http_client: Client,
    base_url: String,
}

impl JupiterQuoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn parse_quote(body: serde_json::Value) -> Result<Quote> {
        let response: JupiterQuoteResponse =
            serde_json::from_value(body.clone()).context("parse Jupiter quote")?;

        // Split legs arrive as adjacent steps over the same pair; they form one hop.
        let mut hops: Vec<Hop> = Vec::with_capacity(response.route_plan.len());
        for step in &response.route_plan {
            let label = step.swap_info.label.clone().unwrap_or_else(|| "Unknown".to_string());
            let input_mint = parse_mint(&step.swap_info.input_mint)?;
            let output_mint = parse_mint(&step.swap_info.output_mint)?;
            match hops.last_mut() {
                Some(last) if last.input_mint == input_mint && last.output_mint == output_mint => {
                    last.venue_label = format!("{}+{}", last.venue_label, label);
                }
                _ => hops.push(Hop {
                    venue_label: label,
                    input_mint,
                    output_mint,
                }),
            }
        }

        let price_impact_pct = match response.price_impact_pct.as_deref() {
            Some(s) => s.parse::<f64>().context("parse priceImpactPct")?,
            None => 0.0,
        };

        Ok(Quote {
            input_mint: parse_mint(&response.input_mint)?,
            output_mint: parse_mint(&response.output_mint)?,
            input_amount: response.in_amount.parse().context("parse inAmount")?,
            output_amount: response.out_amount.parse().context("parse outAmount")?,
            hops,
            slippage_bps: response.slippage_bps,
            price_impact_pct,
            payload: body,
        })
    }

    fn error_code(status: StatusCode, body: &str) -> Option<String> {
        if status != StatusCode::BAD_REQUEST && status != StatusCode::NOT_FOUND {
            return None;
        }
        serde_json::from_str::<JupiterErrorResponse>(body).ok().and_then(|e| e.error_code)
    }

    fn is_no_route(status: StatusCode, body: &str) -> bool {
        Self::error_code(status, body)
            .map(|code| NO_ROUTE_CODES.contains(&code.as_str()))
            .unwrap_or(false)
    }

    fn is_round_trip_refused(status: StatusCode, body: &str) -> bool {
        Self::error_code(status, body).as_deref() == Some(ROUND_TRIP_REFUSED_CODE)
    }
}

fn parse_mint(s: &str) -> Result<Pubkey> {
    s.parse().map_err(|e| anyhow!("Invalid mint {}: {}", s, e))
}

#[async_trait]
impl RoutingService for JupiterQuoteClient {
    async fn compute_routes(&self, request: &RouteRequest) -> Result<Vec<Quote>> {
        let url = format!("{}/quote", self.base_url);
        let amount = request.amount.to_string();
        let slippage = request.slippage_bps.to_string();
        let input_mint = request.input_mint.to_string();
        let output_mint = request.output_mint.to_string();

        let mut builder = self.http_client.get(&url).query(&[
            ("inputMint", input_mint.as_str()),
            ("outputMint", output_mint.as_str()),
            ("amount", amount.as_str()),
            ("slippageBps", slippage.as_str()),
            ("swapMode", "ExactIn"),
        ]);
        if request.force_fresh {
            builder = builder.header(header::CACHE_CONTROL, "no-cache");
        }

        debug!(input_mint = %input_mint, amount = %amount, "Requesting Jupiter quote");
        let response = builder.send().await.context("Jupiter quote request")?;
        let status = response.status();
        let text = response.text().await.context("read Jupiter quote body")?;

        if !status.is_success() {
            if Self::is_no_route(status, &text) {
                return Ok(Vec::new());
            }
            if Self::is_round_trip_refused(status, &text) {
                return Err(RoutingError::RoundTripRefused(self.base_url.clone()).into());
            }
            let detail = serde_json::from_str::<JupiterErrorResponse>(&text)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or(text);
            return Err(anyhow!("Jupiter quote failed with status {}: {}", status, detail));
        }

        let body: serde_json::Value = serde_json::from_str(&text).context("Jupiter quote is not JSON")?;
        Ok(vec![Self::parse_quote(body)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    const WSOL: &str = "So11111111111111111111111111111111111111112";

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "inputMint": USDC,
            "inAmount": "10000000",
            "outputMint": USDC,
            "outAmount": "10600000",
            "otherAmountThreshold": "10547000",
            "swapMode": "ExactIn",
            "slippageBps": 50,
            "priceImpactPct": "0.0012",
            "routePlan": [
                {
                    "swapInfo": {
                        "ammKey": "HJPjoWUrhoZzkNfRpHuieeFk9WcZWjwy6PBjZ81ngndJ",
                        "label": "Whirlpool",
                        "inputMint": USDC,
                        "outputMint": WSOL,
                        "inAmount": "10000000",
                        "outAmount": "70000000"
                    },
                    "percent": 100
                },
                {
                    "swapInfo": {
                        "ammKey": "58oQChx4yWmvKdwLLZzBi4ChoCc2fqCUWBkwMihLYQo2",
                        "label": "Raydium",
                        "inputMint": WSOL,
                        "outputMint": USDC,
                        "inAmount": "70000000",
                        "outAmount": "10600000"
                    },
                    "percent": 100
                }
            ],
            "contextSlot": 1,
            "timeTaken": 0.01
        })
    }

    #[test]
    fn test_parse_quote() {
        let quote = JupiterQuoteClient::parse_quote(sample_body()).unwrap();

        assert_eq!(quote.input_amount, 10_000_000);
        assert_eq!(quote.output_amount, 10_600_000);
        assert_eq!(quote.slippage_bps, 50);
        assert_eq!(quote.hops.len(), 2);
        assert_eq!(quote.venue_chain(), "Whirlpool x Raydium");
        assert!(quote.is_connected());
        assert!((quote.price_impact_pct - 0.0012).abs() < 1e-12);
        assert_eq!(quote.payload["otherAmountThreshold"], "10547000");
    }

    #[test]
    fn test_parse_quote_rejects_bad_amount() {
        let mut body = sample_body();
        body["outAmount"] = serde_json::json!("lots");
        assert!(JupiterQuoteClient::parse_quote(body).is_err());
    }

    #[test]
    fn test_no_route_detection() {
        let body = r#"{"error":"Could not find any route","errorCode":"COULD_NOT_FIND_ANY_ROUTE"}"#;
        assert!(JupiterQuoteClient::is_no_route(StatusCode::BAD_REQUEST, body));

        let other = r#"{"error":"Circular arbitrage is disabled","errorCode":"CIRCULAR_ARBITRAGE_IS_DISABLED"}"#;
        assert!(!JupiterQuoteClient::is_no_route(StatusCode::BAD_REQUEST, other));
        assert!(!JupiterQuoteClient::is_no_route(StatusCode::INTERNAL_SERVER_ERROR, body));
    }

    #[test]
    fn test_round_trip_refusal_detection() {
        let refused = r#"{"error":"Circular arbitrage is disabled","errorCode":"CIRCULAR_ARBITRAGE_IS_DISABLED"}"#;
        assert!(JupiterQuoteClient::is_round_trip_refused(StatusCode::BAD_REQUEST, refused));
        assert!(!JupiterQuoteClient::is_round_trip_refused(StatusCode::BAD_GATEWAY, refused));

        let no_route = r#"{"error":"Could not find any route","errorCode":"COULD_NOT_FIND_ANY_ROUTE"}"#;
        assert!(!JupiterQuoteClient::is_round_trip_refused(StatusCode::BAD_REQUEST, no_route));
    }

    #[test]
    fn test_split_legs_merge_into_one_hop() {
        let mut body = sample_body();
        body["routePlan"] = serde_json::json!([
            {
                "swapInfo": { "label": "Whirlpool", "inputMint": USDC, "outputMint": WSOL },
                "percent": 60
            },
            {
                "swapInfo": { "label": "Meteora DLMM", "inputMint": USDC, "outputMint": WSOL },
                "percent": 40
            },
            {
                "swapInfo": { "label": "Raydium", "inputMint": WSOL, "outputMint": USDC },
                "percent": 100
            }
        ]);

        let quote = JupiterQuoteClient::parse_quote(body).unwrap();
        assert_eq!(quote.hops.len(), 2);
        assert!(quote.is_connected());
        assert_eq!(quote.venue_chain(), "Whirlpool+Meteora DLMM x Raydium");
    }
}

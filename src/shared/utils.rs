//! Unit conversion and formatting helpers

use solana_sdk::pubkey::Pubkey;

/// Human amount → smallest unit, `round(amount * 10^decimals)`.
///
/// Negative and non-finite inputs saturate to zero.
pub fn to_smallest_unit(amount: f64, decimals: u8) -> u64 {
    let scaled = (amount * 10_f64.powi(decimals as i32)).round();
    if scaled.is_finite() && scaled > 0.0 {
        scaled as u64
    } else {
        0
    }
}

/// Smallest unit → human amount
pub fn to_human(amount: u64, decimals: u8) -> f64 {
    amount as f64 / 10_f64.powi(decimals as i32)
}

pub fn format_address(address: &Pubkey) -> String {
    let s = address.to_string();
    if s.len() <= 16 {
        return s;
    }
    format!("{}...{}", &s[..8], &s[s.len() - 8..])
}

pub fn explorer_tx_url(signature: &str, cluster_query: Option<&str>) -> String {
    match cluster_query {
        Some(cluster) => format!("https://explorer.solana.com/tx/{}?cluster={}", signature, cluster),
        None => format!("https://explorer.solana.com/tx/{}", signature),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_smallest_unit_rounds() {
        assert_eq!(to_smallest_unit(10.0, 6), 10_000_000);
        assert_eq!(to_smallest_unit(0.1, 9), 100_000_000);
        assert_eq!(to_smallest_unit(1.0000005, 6), 1_000_001);
        assert_eq!(to_smallest_unit(0.0000001, 6), 0);
    }

    #[test]
    fn test_to_smallest_unit_rejects_garbage() {
        assert_eq!(to_smallest_unit(-1.0, 6), 0);
        assert_eq!(to_smallest_unit(f64::NAN, 6), 0);
    }

    #[test]
    fn test_to_human() {
        assert_eq!(to_human(10_600_000, 6), 10.6);
        assert_eq!(to_human(0, 9), 0.0);
        assert_eq!(to_human(42, 0), 42.0);
    }

    #[test]
    fn test_explorer_url() {
        assert_eq!(explorer_tx_url("abc", None), "https://explorer.solana.com/tx/abc");
        assert_eq!(
            explorer_tx_url("abc", Some("devnet")),
            "https://explorer.solana.com/tx/abc?cluster=devnet"
        );
    }

    #[test]
    fn test_format_address_shortens() {
        let key = Pubkey::new_unique();
        let short = format_address(&key);
        assert!(short.contains("..."));
        assert_eq!(short.len(), 19);
    }
}

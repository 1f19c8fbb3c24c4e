//! roundtrip-arb - Solana round-trip arbitrage scanner
//! Quotes asset -> asset routes through Jupiter and executes the profitable ones

pub mod app;
pub mod assets;
pub mod cli;
pub mod config;
pub mod exchanges;
pub mod opportunity;
pub mod shared;

// Re-export main types for convenience
pub use assets::{Asset, AssetRegistry, WatchEntry};
pub use opportunity::{ExecutionTrigger, ProfitEvaluator, QuoteClient, ScanScheduler};

use crate::assets::Asset;
use crate::exchanges::Quote;
use crate::opportunity::types::Evaluation;
use crate::shared::utils::to_human;

/// Absolute profit check in human units of the scanned asset.
#[derive(Debug, Clone, Copy)]
pub struct ProfitEvaluator {
    profit_threshold: f64,
}

impl ProfitEvaluator {
    pub fn new(profit_threshold: f64) -> Self {
        Self { profit_threshold }
    }

    pub fn profit_threshold(&self) -> f64 {
        self.profit_threshold
    }

    pub fn evaluate(&self, quote: &Quote, asset: &Asset) -> Evaluation {
        let input_human = to_human(quote.input_amount, asset.decimals);
        let output_human = to_human(quote.output_amount, asset.decimals);
        Evaluation {
            input_human,
            output_human,
            profit: output_human - input_human,
        }
    }

    /// Worth executing iff the route returns more than it takes and the
    /// human-unit gain reaches the threshold.
    pub fn is_worth_executing(&self, quote: &Quote, evaluation: &Evaluation) -> bool {
        quote.output_amount > quote.input_amount && evaluation.profit >= self.profit_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    fn asset(decimals: u8) -> Asset {
        Asset::new("AAA", Pubkey::new_unique(), decimals)
    }

    fn quote(input: u64, output: u64) -> Quote {
        let mint = Pubkey::new_unique();
        Quote {
            input_mint: mint,
            output_mint: mint,
            input_amount: input,
            output_amount: output,
            hops: vec![],
            slippage_bps: 0,
            price_impact_pct: 0.0,
            payload: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_profitable_round_trip() {
        let evaluator = ProfitEvaluator::new(0.5);
        let q = quote(10_000_000, 10_600_000);
        let eval = evaluator.evaluate(&q, &asset(6));

        assert_eq!(eval.input_human, 10.0);
        assert_eq!(eval.output_human, 10.6);
        assert!((eval.profit - 0.6).abs() < 1e-9);
        assert!(evaluator.is_worth_executing(&q, &eval));
    }

    #[test]
    fn test_below_threshold() {
        let evaluator = ProfitEvaluator::new(0.5);
        let q = quote(10_000_000, 10_050_000);
        let eval = evaluator.evaluate(&q, &asset(6));

        assert!((eval.profit - 0.05).abs() < 1e-9);
        assert!(!evaluator.is_worth_executing(&q, &eval));
    }

    #[test]
    fn test_profit_is_exact_difference() {
        let evaluator = ProfitEvaluator::new(0.0);
        for decimals in [0u8, 2, 6, 9] {
            for (input, output) in [(1u64, 2u64), (123_456, 123_000), (10_u64.pow(9), 10_u64.pow(9) + 7)] {
                let eval = evaluator.evaluate(&quote(input, output), &asset(decimals));
                let scale = 10_f64.powi(decimals as i32);
                assert_eq!(eval.input_human, input as f64 / scale);
                assert_eq!(eval.output_human, output as f64 / scale);
                assert_eq!(eval.profit, eval.output_human - eval.input_human);
            }
        }
    }

    #[test]
    fn test_non_gain_never_profitable_even_with_negative_threshold() {
        for threshold in [-100.0, -0.1, 0.0, 0.1] {
            let evaluator = ProfitEvaluator::new(threshold);
            for (input, output) in [(1_000u64, 1_000u64), (1_000, 999), (5, 0)] {
                let q = quote(input, output);
                let eval = evaluator.evaluate(&q, &asset(3));
                assert!(!evaluator.is_worth_executing(&q, &eval), "threshold {} in {} out {}", threshold, input, output);
            }
        }
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let evaluator = ProfitEvaluator::new(0.5);
        let q = quote(1_000, 1_500);
        let eval = evaluator.evaluate(&q, &asset(3));
        assert_eq!(eval.profit, 0.5);
        assert!(evaluator.is_worth_executing(&q, &eval));
    }

    #[test]
    fn test_zero_input() {
        let evaluator = ProfitEvaluator::new(0.1);
        let eval = evaluator.evaluate(&quote(0, 2_000_000), &asset(6));
        assert_eq!(eval.profit, 2.0);
    }
}

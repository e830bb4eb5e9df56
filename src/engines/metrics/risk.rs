use std::collections::HashMap;

pub struct RiskMetrics;

impl RiskMetrics {
    /// Drawdown and return-dispersion metrics of a capital curve.
    ///
    /// Withdrawals lower the curve too, so the drawdown is measured on
    /// tradable capital rather than total wealth.
    pub fn calculate(equity_curve: &[f64]) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();

        if equity_curve.len() < 2 {
            return metrics;
        }

        metrics.insert("max_drawdown_pct".to_string(), Self::max_drawdown(equity_curve));

        let returns = Self::daily_returns(equity_curve);
        if returns.is_empty() {
            return metrics;
        }

        let volatility = Self::std_dev(&returns);
        metrics.insert("volatility".to_string(), volatility);

        let avg_return = returns.iter().sum::<f64>() / returns.len() as f64;
        if volatility > 0.0 {
            metrics.insert("sharpe_ratio".to_string(), avg_return / volatility);
        }

        let downside_dev = Self::downside_deviation(&returns);
        if downside_dev > 0.0 {
            metrics.insert("sortino_ratio".to_string(), avg_return / downside_dev);
        }

        metrics
    }

    fn max_drawdown(equity: &[f64]) -> f64 {
        let mut max_dd: f64 = 0.0;
        let mut peak = equity[0];

        for &value in equity {
            peak = peak.max(value);
            if peak > 0.0 {
                max_dd = max_dd.max((peak - value) / peak * 100.0);
            }
        }

        max_dd
    }

    /// Day-over-day returns, skipping days that start from no capital
    fn daily_returns(equity: &[f64]) -> Vec<f64> {
        equity
            .windows(2)
            .filter(|w| w[0] > 0.0)
            .map(|w| (w[1] - w[0]) / w[0])
            .collect()
    }

    /// Root mean square of the losing returns, measured from zero
    fn downside_deviation(returns: &[f64]) -> f64 {
        let losses: Vec<f64> = returns.iter().filter(|&&r| r < 0.0).copied().collect();
        if losses.is_empty() {
            return 0.0;
        }
        (losses.iter().map(|r| r * r).sum::<f64>() / losses.len() as f64).sqrt()
    }

    fn std_dev(values: &[f64]) -> f64 {
        if values.is_empty() {
            return 0.0;
        }

        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance = values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

        variance.sqrt()
    }
}

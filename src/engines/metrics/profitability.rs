use crate::types::SimulationReport;
use std::collections::HashMap;

pub struct ProfitabilityMetrics;

impl ProfitabilityMetrics {
    pub fn calculate(report: &SimulationReport) -> HashMap<String, f64> {
        let mut metrics = HashMap::new();

        metrics.insert("legs_traded".to_string(), report.legs_traded as f64);
        metrics.insert("commission_paid".to_string(), report.commission_paid);
        metrics.insert("withdrawal_count".to_string(), report.withdrawal_count as f64);

        if report.legs_traded > 0 {
            let win_rate = report.legs_won as f64 / report.legs_traded as f64 * 100.0;
            metrics.insert("win_rate".to_string(), win_rate);
        }

        let winning_days: Vec<f64> = report.daily_profits.iter().filter(|&&p| p > 0.0).copied().collect();
        let losing_days: Vec<f64> = report.daily_profits.iter().filter(|&&p| p <= 0.0).copied().collect();

        if !winning_days.is_empty() {
            let avg_win = winning_days.iter().sum::<f64>() / winning_days.len() as f64;
            metrics.insert("avg_winning_day".to_string(), avg_win);
        }
        if !losing_days.is_empty() {
            let avg_loss = losing_days.iter().map(|p| p.abs()).sum::<f64>() / losing_days.len() as f64;
            metrics.insert("avg_losing_day".to_string(), avg_loss);
        }

        let gross_profit: f64 = winning_days.iter().sum();
        let gross_loss: f64 = losing_days.iter().map(|p| p.abs()).sum();
        if gross_loss > 0.0 {
            metrics.insert("profit_factor".to_string(), gross_profit / gross_loss);
        }

        metrics
    }
}

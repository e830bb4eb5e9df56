use crate::engines::evaluation::candidate::Candidate;
use crate::engines::metrics::{ProfitabilityMetrics, RiskMetrics};
use crate::types::SimulationReport;
use std::collections::HashMap;

/// Per-candidate performance summary
pub struct MetricsEngine;

impl MetricsEngine {
    pub fn calculate_all(candidate: &Candidate, report: &SimulationReport) -> HashMap<String, f64> {
        let mut all_metrics = HashMap::new();

        all_metrics.extend(ProfitabilityMetrics::calculate(report));
        all_metrics.extend(RiskMetrics::calculate(&report.equity_curve));

        let banked = candidate.profit + candidate.withdrawal;
        all_metrics.insert("fitness".to_string(), candidate.fitness());
        all_metrics.insert("profit".to_string(), candidate.profit);
        all_metrics.insert("withdrawal".to_string(), candidate.withdrawal);
        all_metrics.insert("final_capital".to_string(), candidate.capital);
        all_metrics.insert("trade_duration".to_string(), candidate.trade_duration as f64);
        all_metrics.insert(
            "return_pct".to_string(),
            banked / candidate.initial_capital * 100.0,
        );
        all_metrics.insert("ruined".to_string(), if report.ruined { 1.0 } else { 0.0 });

        all_metrics
    }
}

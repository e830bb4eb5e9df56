use crate::error::{NeurotradeError, Result};
use crate::types::LegRisk;
use crate::utils::round_money;

/// Turn network fractions into absolute risk per instrument.
///
/// `fractions` holds two values per instrument, long then short, in
/// instrument order. Each leg takes `fraction * capital`, capped by what
/// earlier legs left over, so the day's total risk never exceeds `capital`.
pub fn allocate_risk(fractions: &[f64], capital: f64) -> Result<Vec<LegRisk>> {
    if fractions.len() % 2 != 0 {
        return Err(NeurotradeError::Simulation(format!(
            "expected two outputs per instrument, got {}",
            fractions.len()
        )));
    }

    if let Some(pos) = fractions.iter().position(|f| !f.is_finite()) {
        return Err(NeurotradeError::Simulation(format!(
            "network output {} is {}",
            pos, fractions[pos]
        )));
    }

    let mut remaining = capital.max(0.0);
    let mut take = |fraction: f64| {
        let amount = round_money((fraction * capital).min(remaining))
            .min(remaining)
            .max(0.0);
        remaining -= amount;
        amount
    };

    Ok(fractions
        .chunks_exact(2)
        .map(|pair| {
            let long = take(pair[0]);
            let short = take(pair[1]);
            LegRisk::new(long, short)
        })
        .collect())
}

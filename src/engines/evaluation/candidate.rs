use crate::engines::generation::genome::Genome;
use crate::types::{Direction, LegSettlement, TradeOrder, TradeSettlement};
use crate::utils::round_money;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INITIAL_CAPITAL: f64 = 1000.0;

/// One population slot: a genome plus its simulated trading state.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: usize,
    genome: Genome,
    pub capital: f64,
    pub initial_capital: f64,
    pub profit: f64,
    pub withdrawal: f64,
    pub trade_duration: usize,
    pub generation: usize,
}

impl Candidate {
    pub fn new(id: usize, genome: Genome, initial_capital: f64) -> Self {
        Self {
            id,
            genome,
            capital: initial_capital,
            initial_capital,
            profit: 0.0,
            withdrawal: 0.0,
            trade_duration: 0,
            generation: 0,
        }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn genome_mut(&mut self) -> &mut Genome {
        &mut self.genome
    }

    pub fn replace_genome(&mut self, genome: Genome) -> Genome {
        std::mem::replace(&mut self.genome, genome)
    }

    /// Restore the simulation state; the genome survives.
    pub fn reset(&mut self) {
        self.capital = self.initial_capital;
        self.profit = 0.0;
        self.withdrawal = 0.0;
        self.trade_duration = 0;
    }

    pub fn is_ruined(&self) -> bool {
        self.capital <= 0.0
    }

    /// Settle one instrument's long and short legs for the day.
    pub fn settle_trade(order: &TradeOrder<'_>) -> TradeSettlement {
        TradeSettlement {
            long: settle_leg(Direction::Long, order),
            short: settle_leg(Direction::Short, order),
        }
    }

    /// Profit of one instrument's trade for the day.
    ///
    /// Each leg either earns `risk * reward_rate - commission` or, when
    /// the close moved through the expected move against it, loses the
    /// whole stake on top of that.
    pub fn execute_trade(order: &TradeOrder<'_>) -> f64 {
        Self::settle_trade(order).profit()
    }

    /// Bank any capital above the initial capital.
    pub fn execute_withdrawal(&mut self) -> f64 {
        let surplus = self.capital - self.initial_capital;
        if surplus <= 0.0 {
            return 0.0;
        }
        let amount = round_money(surplus);
        self.capital = round_money(self.capital - amount);
        self.withdrawal = round_money(self.withdrawal + amount);
        amount
    }

    pub fn apply_daily_profit(&mut self, profit: f64) {
        self.capital = round_money(self.capital + profit);
        self.profit = round_money(self.profit + profit);
        self.trade_duration += 1;
    }

    /// Return and banked money weighted by how long the candidate kept trading
    pub fn fitness(&self) -> f64 {
        (self.profit + self.withdrawal) * self.trade_duration as f64
    }

    pub fn snapshot(&self) -> CandidateSnapshot {
        CandidateSnapshot {
            id: self.id,
            trade_duration: self.trade_duration,
            capital: self.capital,
            profit: self.profit,
            withdrawal: self.withdrawal,
            generation: self.generation,
            genome: self.genome.clone(),
        }
    }
}

fn settle_leg(direction: Direction, order: &TradeOrder<'_>) -> LegSettlement {
    let risk = order.risk.get(direction);
    let commission = if risk > 0.0 { order.commission } else { 0.0 };
    let reward = risk * order.reward_rate - commission;

    let won = match direction {
        Direction::Long => -order.expected_move < order.close_price_today,
        Direction::Short => order.expected_move > order.close_price_today,
    };
    let pnl = if won { reward } else { reward - risk };

    LegSettlement {
        direction,
        risk,
        commission,
        pnl,
        won,
    }
}

/// Persisted form of a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSnapshot {
    pub id: usize,
    pub trade_duration: usize,
    pub capital: f64,
    pub profit: f64,
    pub withdrawal: f64,
    pub generation: usize,
    pub genome: Genome,
}

impl Default for CandidateSnapshot {
    fn default() -> Self {
        Self {
            id: 0,
            trade_duration: 0,
            capital: DEFAULT_INITIAL_CAPITAL,
            profit: 0.0,
            withdrawal: 0.0,
            generation: 0,
            genome: Genome::default(),
        }
    }
}

impl CandidateSnapshot {
    pub fn into_candidate(self, initial_capital: f64) -> Candidate {
        Candidate {
            id: self.id,
            genome: self.genome,
            capital: self.capital,
            initial_capital,
            profit: self.profit,
            withdrawal: self.withdrawal,
            trade_duration: self.trade_duration,
            generation: self.generation,
        }
    }
}

impl From<&Candidate> for CandidateSnapshot {
    fn from(candidate: &Candidate) -> Self {
        candidate.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LegRisk;

    fn order(long: f64, short: f64, close: f64, expected_move: f64) -> TradeOrder<'static> {
        TradeOrder {
            risk: LegRisk::new(long, short),
            commission: 1.74,
            reward_rate: 0.06,
            close_price_today: close,
            expected_move,
            symbol: "SPY",
        }
    }

    #[test]
    fn test_no_risk_no_commission() {
        assert_eq!(Candidate::execute_trade(&order(0.0, 0.0, 1.0, 2.0)), 0.0);
    }

    #[test]
    fn test_long_loses_stake_below_floor() {
        // -2 < -3 is false: reward 4.26 minus the 100 stake
        assert_eq!(Candidate::execute_trade(&order(100.0, 0.0, -3.0, 2.0)), -95.74);
    }

    #[test]
    fn test_short_leg() {
        // 2 > 1 holds: short earns
        assert_eq!(Candidate::execute_trade(&order(0.0, 50.0, 1.0, 2.0)), 1.26);
        // 2 > 3 fails: short loses its stake
        assert_eq!(Candidate::execute_trade(&order(0.0, 50.0, 3.0, 2.0)), -48.74);
    }

    #[test]
    fn test_reset_keeps_genome() {
        let genome = Genome::from_nodes(vec![vec![0.1, 0.2]]);
        let mut candidate = Candidate::new(4, genome.clone(), 1000.0);
        candidate.apply_daily_profit(25.0);
        candidate.execute_withdrawal();
        candidate.reset();
        assert_eq!(candidate.capital, 1000.0);
        assert_eq!(candidate.profit, 0.0);
        assert_eq!(candidate.withdrawal, 0.0);
        assert_eq!(candidate.trade_duration, 0);
        assert_eq!(candidate.genome(), &genome);
    }

    #[test]
    fn test_snapshot_roundtrip_keeps_state() {
        let mut candidate = Candidate::new(2, Genome::from_nodes(vec![vec![0.5]]), 1000.0);
        candidate.generation = 7;
        candidate.apply_daily_profit(12.5);
        let restored = candidate.snapshot().into_candidate(1000.0);
        assert_eq!(restored, candidate);
    }
}

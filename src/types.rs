use crate::utils::round_money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

/// Absolute capital committed to each leg of one instrument on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegRisk {
    pub long: f64,
    pub short: f64,
}

impl LegRisk {
    pub fn new(long: f64, short: f64) -> Self {
        Self { long, short }
    }

    pub fn get(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Long => self.long,
            Direction::Short => self.short,
        }
    }

    pub fn total(&self) -> f64 {
        self.long + self.short
    }
}

/// One instrument's trade for one day, as handed to the settlement rules.
#[derive(Debug, Clone, Copy)]
pub struct TradeOrder<'a> {
    pub risk: LegRisk,
    pub commission: f64,
    pub reward_rate: f64,
    pub close_price_today: f64,
    pub expected_move: f64,
    pub symbol: &'a str,
}

/// Settled outcome of a single leg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegSettlement {
    pub direction: Direction,
    pub risk: f64,
    pub commission: f64,
    pub pnl: f64,
    pub won: bool,
}

impl LegSettlement {
    /// A leg with nothing at risk was never opened.
    pub fn is_open(&self) -> bool {
        self.risk > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSettlement {
    pub long: LegSettlement,
    pub short: LegSettlement,
}

impl TradeSettlement {
    pub fn legs(&self) -> [LegSettlement; 2] {
        [self.long, self.short]
    }

    pub fn profit(&self) -> f64 {
        round_money(self.long.pnl + self.short.pnl)
    }
}

/// Trace of one candidate's run over the universe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Capital after every traded day
    pub equity_curve: Vec<f64>,
    pub daily_profits: Vec<f64>,
    pub legs_traded: usize,
    pub legs_won: usize,
    pub legs_lost: usize,
    pub commission_paid: f64,
    pub withdrawal_count: usize,
    pub last_day: Option<usize>,
    pub ruined: bool,
}

impl SimulationReport {
    pub fn with_initial_capital(initial_capital: f64) -> Self {
        Self {
            equity_curve: vec![initial_capital],
            ..Default::default()
        }
    }

    pub fn record_settlement(&mut self, settlement: &TradeSettlement) {
        for leg in settlement.legs().iter().filter(|leg| leg.is_open()) {
            self.legs_traded += 1;
            self.commission_paid += leg.commission;
            if leg.won {
                self.legs_won += 1;
            } else {
                self.legs_lost += 1;
            }
        }
    }

    pub fn record_day(&mut self, day: usize, profit: f64, capital: f64) {
        self.daily_profits.push(profit);
        self.equity_curve.push(capital);
        self.last_day = Some(day);
    }
}

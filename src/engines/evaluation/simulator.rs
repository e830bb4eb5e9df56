use crate::{
    config::TradingConfig,
    data::Universe,
    engines::evaluation::{allocation::allocate_risk, candidate::Candidate, network},
    engines::generation::genome::Topology,
    error::{NeurotradeError, Result},
    types::{SimulationReport, TradeOrder},
};
use chrono::Weekday;
use std::sync::Arc;

/// Column positions of one instrument's outcome features
#[derive(Debug, Clone)]
struct InstrumentColumns {
    symbol: String,
    close: usize,
    expected_move: usize,
}

/// Replays the universe day by day for one candidate at a time.
///
/// Holds only read-only state, so one simulator can score every candidate
/// of a generation, including from several threads.
pub struct TradingSimulator {
    universe: Arc<Universe>,
    commission: f64,
    reward_rate: f64,
    lookback: usize,
    trading_days: Vec<Weekday>,
    day_column: usize,
    month_column: usize,
    instruments: Vec<InstrumentColumns>,
}

impl TradingSimulator {
    pub fn new(universe: Arc<Universe>, settings: &TradingConfig) -> Result<Self> {
        if universe.len() <= settings.lookback {
            return Err(NeurotradeError::InsufficientUniverse {
                days: universe.len(),
                lookback: settings.lookback,
            });
        }

        let require = |name: &str| {
            universe.column_index(name).ok_or_else(|| {
                NeurotradeError::Configuration(format!("Universe has no '{}' feature", name))
            })
        };

        let features = &settings.features;
        let day_column = require(&features.day)?;
        let month_column = require(&features.month)?;
        let instruments = settings
            .symbols
            .iter()
            .map(|symbol| {
                Ok(InstrumentColumns {
                    symbol: symbol.clone(),
                    close: require(&features.close(symbol))?,
                    expected_move: require(&features.expected_move(symbol))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            commission: settings.commission,
            reward_rate: settings.reward_rate,
            lookback: settings.lookback,
            trading_days: settings.trading_days.clone(),
            day_column,
            month_column,
            instruments,
            universe,
        })
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Inputs the network must accept: capital plus the lookback window
    pub fn input_count(&self) -> usize {
        1 + self.lookback * self.universe.width()
    }

    /// Two outputs per instrument
    pub fn output_count(&self) -> usize {
        2 * self.instruments.len()
    }

    /// Reject a topology whose input or output layer does not fit this
    /// universe before any candidate is run.
    pub fn check_topology(&self, topology: &Topology) -> Result<()> {
        if topology.inputs != self.input_count() {
            return Err(NeurotradeError::TopologyMismatch(format!(
                "simulator feeds {} inputs, topology expects {}",
                self.input_count(),
                topology.inputs
            )));
        }
        if topology.output_count() != self.output_count() {
            return Err(NeurotradeError::TopologyMismatch(format!(
                "{} instruments need {} outputs, topology has {}",
                self.instruments.len(),
                self.output_count(),
                topology.output_count()
            )));
        }
        Ok(())
    }

    /// Walk every day after the lookback window, trading on eligible days.
    ///
    /// The candidate is mutated in place; the returned report is the trace
    /// used by the metrics engine.
    pub fn run(&self, candidate: &mut Candidate, topology: &Topology) -> Result<SimulationReport> {
        let mut report = SimulationReport::with_initial_capital(candidate.capital);
        let mut input = Vec::with_capacity(self.input_count());

        for day in self.lookback..self.universe.len() {
            if self.month_changed(day) && candidate.execute_withdrawal() > 0.0 {
                report.withdrawal_count += 1;
            }

            if candidate.is_ruined() {
                report.ruined = true;
                break;
            }

            if !self.is_trading_day(day) {
                continue;
            }

            input.clear();
            input.push(candidate.capital);
            input.extend(self.universe.window(day, self.lookback));

            let fractions = network::evaluate(&input, candidate.genome(), &topology.layers)?;
            let risks = allocate_risk(&fractions, candidate.capital)?;

            let mut daily_profit = 0.0;
            for (instrument, risk) in self.instruments.iter().zip(risks) {
                let order = TradeOrder {
                    risk,
                    commission: self.commission,
                    reward_rate: self.reward_rate,
                    close_price_today: self.universe.value(day, instrument.close),
                    expected_move: self.universe.value(day, instrument.expected_move),
                    symbol: &instrument.symbol,
                };
                let settlement = Candidate::settle_trade(&order);
                report.record_settlement(&settlement);
                daily_profit += settlement.profit();
            }

            candidate.apply_daily_profit(daily_profit);
            report.record_day(day, daily_profit, candidate.capital);
        }

        if candidate.is_ruined() {
            report.ruined = true;
        }

        log::debug!(
            "Candidate {} traded {} days, capital {:.2}, profit {:.2}, withdrawn {:.2}",
            candidate.id,
            candidate.trade_duration,
            candidate.capital,
            candidate.profit,
            candidate.withdrawal
        );

        Ok(report)
    }

    fn month_changed(&self, day: usize) -> bool {
        day > 0
            && self.universe.value(day, self.month_column)
                != self.universe.value(day - 1, self.month_column)
    }

    fn is_trading_day(&self, day: usize) -> bool {
        weekday_from_feature(self.universe.value(day, self.day_column))
            .map(|weekday| self.trading_days.contains(&weekday))
            .unwrap_or(false)
    }
}

/// Decode the day-of-week feature, Sunday = 0 through Saturday = 6.
pub fn weekday_from_feature(value: f64) -> Option<Weekday> {
    if value.fract() != 0.0 {
        return None;
    }
    match value as i64 {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

//! "Simulate my decision": canned what-if outcomes for a handful of
//! business decisions.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::table::CannedTable;
use crate::SimulatorError;

pub const DEFAULT_DECISION: &str = "price_increase_5";
pub const DEFAULT_TIME_RANGE_DAYS: u32 = 14;
pub const TIME_RANGE_DAYS: [u32; 3] = [7, 14, 30];
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

/// A decision the simulator knows, with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionOption {
    pub key: &'static str,
    pub label: &'static str,
}

pub const DECISION_OPTIONS: [DecisionOption; 8] = [
    DecisionOption { key: "price_increase_5", label: "Increase price by 5%" },
    DecisionOption { key: "price_increase_10", label: "Increase price by 10%" },
    DecisionOption { key: "price_decrease_5", label: "Decrease price by 5%" },
    DecisionOption { key: "pause_amazon", label: "Pause Amazon for selected period" },
    DecisionOption { key: "pause_blinkit", label: "Pause Blinkit for selected period" },
    DecisionOption { key: "double_production", label: "Double production capacity" },
    DecisionOption { key: "reduce_production", label: "Reduce production by 30%" },
    DecisionOption { key: "new_channel", label: "Launch on new channel" },
];

/// Percentage change and whether it is good news.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub value: f64,
    pub positive: bool,
}

impl Impact {
    const fn new(value: f64, positive: bool) -> Self {
        Self { value, positive }
    }

    /// `+8.2%` / `-3.1%`, sign shown only for good news.
    pub fn display(&self) -> String {
        let sign = if self.positive { "+" } else { "" };
        format!("{sign}{}%", self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Proceed,
    Modify,
    Avoid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub revenue_impact: Impact,
    pub profit_impact: Impact,
    pub units_sold_change: Impact,
    pub inventory_risk: Level,
    pub confidence: Level,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRequest {
    pub decision: String,
    pub time_range_days: u32,
}

impl SimulationRequest {
    pub fn new(decision: impl Into<String>) -> Self {
        Self {
            decision: decision.into(),
            time_range_days: DEFAULT_TIME_RANGE_DAYS,
        }
    }
}

/// Anything that can forecast the outcome of a decision.
#[async_trait]
pub trait DecisionSimulator: Send + Sync {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, SimulatorError>;
}

/// Lookup-table simulator with an artificial delay.
#[derive(Debug, Clone)]
pub struct CannedDecisionSimulator {
    table: CannedTable<SimulationResult>,
    delay: Duration,
}

impl Default for CannedDecisionSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl CannedDecisionSimulator {
    pub fn new(delay: Duration) -> Self {
        Self {
            table: decision_table(),
            delay,
        }
    }

    /// Result for `decision` without the delay.
    pub fn lookup(&self, decision: &str) -> &SimulationResult {
        self.table.resolve(decision)
    }
}

#[async_trait]
impl DecisionSimulator for CannedDecisionSimulator {
    async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationResult, SimulatorError> {
        let decision = request.decision.trim();
        if decision.is_empty() {
            return Err(SimulatorError::MissingInput(
                "Select a decision to simulate.".to_string(),
            ));
        }
        if !TIME_RANGE_DAYS.contains(&request.time_range_days) {
            return Err(SimulatorError::InvalidInput(format!(
                "time range must be one of 7, 14 or 30 days, got {}",
                request.time_range_days
            )));
        }
        if !self.table.contains(decision) {
            tracing::debug!(decision, "unknown decision, using {}", self.table.default_key());
        }

        tokio::time::sleep(self.delay).await;
        Ok(self.lookup(decision).clone())
    }
}

fn outcome(
    revenue: (f64, bool),
    profit: (f64, bool),
    units: (f64, bool),
    inventory_risk: Level,
    confidence: Level,
    verdict: Verdict,
) -> SimulationResult {
    SimulationResult {
        revenue_impact: Impact::new(revenue.0, revenue.1),
        profit_impact: Impact::new(profit.0, profit.1),
        units_sold_change: Impact::new(units.0, units.1),
        inventory_risk,
        confidence,
        verdict,
    }
}

fn decision_table() -> CannedTable<SimulationResult> {
    use Level::*;
    use Verdict::*;

    CannedTable::new(
        (
            DEFAULT_DECISION,
            outcome((8.2, true), (12.5, true), (-3.1, false), Low, High, Proceed),
        ),
        [
            (
                "price_increase_10",
                outcome((4.1, true), (18.2, true), (-8.5, false), Medium, Medium, Modify),
            ),
            (
                "price_decrease_5",
                outcome((2.3, true), (-4.2, false), (15.8, true), High, Medium, Modify),
            ),
            (
                "pause_amazon",
                outcome((-35.2, false), (-28.4, false), (-42.1, false), High, High, Avoid),
            ),
            (
                "pause_blinkit",
                outcome((-18.5, false), (-15.2, false), (-22.3, false), Medium, High, Avoid),
            ),
            (
                "double_production",
                outcome((45.2, true), (32.1, true), (85.4, true), High, Low, Modify),
            ),
            (
                "reduce_production",
                outcome((-12.3, false), (5.2, true), (-25.1, false), Low, Medium, Proceed),
            ),
            (
                "new_channel",
                outcome((22.5, true), (15.8, true), (35.2, true), Medium, Medium, Proceed),
            ),
        ],
    )
}

//! Client-side stand-ins for services the backend does not provide yet.
//!
//! Each simulator is a [`CannedTable`] lookup behind the async trait a real
//! predictive service would implement, plus a fixed delay.

pub mod decision;
pub mod demo;
pub mod marketing;
pub mod table;

use thiserror::Error;

pub use decision::{
    CannedDecisionSimulator, DecisionOption, DecisionSimulator, Impact, Level, SimulationRequest,
    SimulationResult, Verdict, DECISION_OPTIONS,
};
pub use marketing::{
    BrandTone, CannedContentGenerator, Choice, ContentGenerator, ContentRequest,
    GeneratedContent, BRAND_TONES, PLATFORMS, TARGET_AUDIENCES,
};
pub use table::CannedTable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulatorError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

//! Irrigation duration estimation with a Mamdani fuzzy inference engine.
//!
//! Three crisp readings (soil moisture, temperature, humidity) are fuzzified,
//! run through a fixed rule base with min/max logic, aggregated over a
//! discretized 0-60 minute domain and defuzzified by centroid. The resulting
//! duration is then sorted into one of four irrigation categories.
//!
//! ```
//! use fuzzy_irrigation::{compute_irrigation, IrrigationCategory};
//!
//! let decision = compute_irrigation(50., 25., 50.)?;
//!
//! assert_eq!(decision.duration_minutes, 30.);
//! assert_eq!(decision.category, IrrigationCategory::Moderate);
//! # Ok::<(), fuzzy_irrigation::Error>(())
//! ```
//!
//! The engine underneath is generic: [`Variables`], [`Rules`] and
//! [`MamdaniInference`] can host other rule bases as well.

pub mod config;
mod dsl;
mod error;
mod inference;
mod inputs;
pub mod irrigation;
mod linspace;
mod math;
pub mod membership;
pub mod ops;
mod outputs;
mod rules;
pub mod service;
mod terms;
mod variable;

pub use config::{Config, EngineConfig, ServiceConfig};
pub use dsl::Expr;
pub use error::{Error, Result};
pub use inference::MamdaniInference;
pub use inputs::Inputs;
pub use irrigation::{
    compute_irrigation, IrrigationCategory, IrrigationDecision, IrrigationEvaluation, IrrigationModel,
};
pub use math::round_to;
pub use membership::MembershipFunction;
pub use outputs::{AggregatedSet, Outputs};
pub use rules::Rules;
pub use service::IrrigationService;
pub use terms::{Term, Terms};
pub use variable::{LinguisticVariable, Variable, VariableKey, Variables, DEFAULT_STEP};

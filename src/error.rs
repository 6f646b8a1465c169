use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input `{variable}` is not finite: {value}")]
    NonFiniteInput { variable: &'static str, value: f64 },

    #[error("variable is not registered with this model")]
    UnknownVariable,

    #[error("no input provided for variable `{0}`")]
    MissingInput(&'static str),

    #[error("invalid universe for `{variable}`: {reason}")]
    InvalidUniverse {
        variable: &'static str,
        reason: &'static str,
    },

    #[error("invalid membership function parameters: {0}")]
    InvalidMembership(&'static str),

    #[error("rule consequence must be a single `variable is term` proposition")]
    CompoundConsequence,

    #[error("invalid irrigation duration: {0} minutes")]
    InvalidDuration(f64),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

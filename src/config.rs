//! Tunable parameters for the irrigation engine and service.
//!
//! Every field has a default matching the reference controller, so an empty
//! JSON object is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::inference::MamdaniInference;
use crate::variable::DEFAULT_STEP;

/// Finest grid spacing a config may ask for.
pub const MIN_STEP: f64 = 1e-3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub service: ServiceConfig,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.service.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Spacing of the discretized universes (minutes for the output).
    ///
    /// The default of 0.1 gives the 601-point output domain the reference
    /// durations are computed on. Any other value still shares one grid across
    /// every call of a model, but its durations drift from those references.
    pub step: f64,
    /// Operators used by the inference engine
    pub inference: MamdaniInference,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            inference: MamdaniInference::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0. {
            return Err(Error::Config(format!("step must be positive, got {}", self.step)));
        }
        if self.step < MIN_STEP {
            return Err(Error::Config(format!("step {} is finer than {MIN_STEP}", self.step)));
        }
        if self.step > 10. {
            return Err(Error::Config(format!("step {} is too coarse for a 0-60 minute output", self.step)));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    // --- Used when a calculation request omits a reading ---
    pub default_soil_moisture: f64,
    pub default_temperature: f64,
    pub default_humidity: f64,

    // --- Sensor snapshot before the first calculation ---
    pub initial_soil_moisture: f64,
    pub initial_temperature: f64,
    pub initial_humidity: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_soil_moisture: 50.,
            default_temperature: 25.,
            default_humidity: 50.,

            initial_soil_moisture: 55.,
            initial_temperature: 27.,
            initial_humidity: 65.,
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        let readings = [
            ("default_soil_moisture", self.default_soil_moisture),
            ("default_temperature", self.default_temperature),
            ("default_humidity", self.default_humidity),
            ("initial_soil_moisture", self.initial_soil_moisture),
            ("initial_temperature", self.initial_temperature),
            ("initial_humidity", self.initial_humidity),
        ];

        match readings.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(Error::Config(format!("{name} must be finite, got {value}"))),
            None => Ok(()),
        }
    }
}

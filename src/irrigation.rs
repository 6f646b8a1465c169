//! The irrigation controller: three crisp readings in, a watering duration out.
//!
//! Soil moisture dominates every rule. Temperature and humidity only nudge the
//! result when the soil is in its normal band, or push a wet soil towards a
//! shorter watering.

use std::fmt;

use fixed_map::Key;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::inference::MamdaniInference;
use crate::inputs::Inputs;
use crate::math::round_to;
use crate::membership::MembershipFunction;
use crate::outputs::AggregatedSet;
use crate::rules::Rules;
use crate::terms::Terms;
use crate::variable::{Variable, Variables, DEFAULT_STEP};

#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
pub enum SoilMoisture {
    Dry,
    Normal,
    Wet,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
pub enum Temperature {
    Cold,
    Normal,
    Hot,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
pub enum Humidity {
    Low,
    Normal,
    High,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
pub enum Duration {
    Short,
    Medium,
    Long,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IrrigationTerm {
    SoilMoisture(SoilMoisture),
    Temperature(Temperature),
    Humidity(Humidity),
    Duration(Duration),
}

macro_rules! impl_into_term {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for IrrigationTerm {
                fn from(term: $variant) -> Self {
                    Self::$variant(term)
                }
            }
        )*
    };
}

impl_into_term!(SoilMoisture, Temperature, Humidity, Duration);

fn soil_moisture_terms() -> Result<Terms<SoilMoisture>> {
    let mut terms = Terms::new();
    terms.insert(SoilMoisture::Dry, MembershipFunction::trapezoidal(0., 0., 25., 45.)?);
    terms.insert(SoilMoisture::Normal, MembershipFunction::triangular(30., 50., 70.)?);
    terms.insert(SoilMoisture::Wet, MembershipFunction::trapezoidal(55., 75., 100., 100.)?);
    Ok(terms)
}

fn temperature_terms() -> Result<Terms<Temperature>> {
    let mut terms = Terms::new();
    terms.insert(Temperature::Cold, MembershipFunction::trapezoidal(0., 0., 12., 20.)?);
    terms.insert(Temperature::Normal, MembershipFunction::triangular(15., 25., 33.)?);
    terms.insert(Temperature::Hot, MembershipFunction::trapezoidal(28., 34., 50., 50.)?);
    Ok(terms)
}

fn humidity_terms() -> Result<Terms<Humidity>> {
    let mut terms = Terms::new();
    terms.insert(Humidity::Low, MembershipFunction::trapezoidal(0., 0., 25., 45.)?);
    terms.insert(Humidity::Normal, MembershipFunction::triangular(30., 50., 70.)?);
    terms.insert(Humidity::High, MembershipFunction::trapezoidal(55., 75., 100., 100.)?);
    Ok(terms)
}

fn duration_terms() -> Result<Terms<Duration>> {
    let mut terms = Terms::new();
    terms.insert(Duration::Short, MembershipFunction::trapezoidal(0., 0., 10., 20.)?);
    terms.insert(Duration::Medium, MembershipFunction::triangular(15., 30., 45.)?);
    terms.insert(Duration::Long, MembershipFunction::trapezoidal(35., 45., 60., 60.)?);
    Ok(terms)
}

/// How much watering a duration calls for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrigationCategory {
    Off,
    Light,
    Moderate,
    Heavy,
}

impl IrrigationCategory {
    pub fn from_duration(minutes: f64) -> Self {
        if minutes <= 0.01 {
            Self::Off
        } else if minutes <= 20. {
            Self::Light
        } else if minutes <= 40. {
            Self::Moderate
        } else {
            Self::Heavy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "no irrigation needed",
            Self::Light => "light irrigation",
            Self::Moderate => "moderate irrigation",
            Self::Heavy => "heavy irrigation",
        }
    }

    /// Whether the pump should run at all.
    pub fn is_on(self) -> bool {
        self != Self::Off
    }
}

impl fmt::Display for IrrigationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_on() { "ON" } else { "OFF" };

        write!(f, "{} ({state})", self.label())
    }
}

/// Rounded duration and its category.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IrrigationDecision {
    pub duration_minutes: f64,
    pub category: IrrigationCategory,
}

impl IrrigationDecision {
    /// Rounds to two decimals before categorizing.
    pub fn from_duration(minutes: f64) -> Self {
        let duration_minutes = round_to(minutes, 2);

        Self {
            duration_minutes,
            category: IrrigationCategory::from_duration(duration_minutes),
        }
    }

    pub fn recommendation(&self) -> String {
        format!(
            "Recommendation: {} for about {} minutes.",
            self.category, self.duration_minutes
        )
    }
}

/// Everything one inference produced, before rounding.
#[derive(Clone, Debug)]
pub struct IrrigationEvaluation {
    pub duration_minutes: f64,
    pub aggregated: AggregatedSet,
    pub firing_strengths: Vec<f64>,
}

impl IrrigationEvaluation {
    /// True when every rule had zero strength; the duration is then the 0.0 fallback.
    pub fn no_rule_fired(&self) -> bool {
        self.aggregated.is_empty()
    }

    pub fn decision(&self) -> IrrigationDecision {
        IrrigationDecision::from_duration(self.duration_minutes)
    }
}

/// The fixed irrigation rule base over its four linguistic variables.
///
/// The output terms are sampled once, on the first evaluation; every evaluation
/// otherwise only touches invocation-local buffers, so one model can serve many threads.
pub struct IrrigationModel {
    vars: Variables<IrrigationTerm>,
    rules: Rules<IrrigationTerm>,
    engine: MamdaniInference,
    soil_moisture: Variable<SoilMoisture>,
    temperature: Variable<Temperature>,
    humidity: Variable<Humidity>,
    duration: Variable<Duration>,
}

impl IrrigationModel {
    pub fn new() -> Result<Self> {
        Self::with_config(&EngineConfig::default())
    }

    pub fn with_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;

        if config.step != DEFAULT_STEP {
            warn!("grid step {} replaces the 601-point reference domain", config.step);
        }

        let step = Some(config.step);
        let mut vars = Variables::<IrrigationTerm>::new();
        let soil = vars.add("soil_moisture", 0. ..=100., soil_moisture_terms()?, step)?;
        let temp = vars.add("temperature", 0. ..=50., temperature_terms()?, step)?;
        let hum = vars.add("humidity", 0. ..=100., humidity_terms()?, step)?;
        let dur = vars.add("duration", 0. ..=60., duration_terms()?, step)?;

        let mut rules = Rules::<IrrigationTerm>::with_capacity(9);

        rules.add(soil.is(SoilMoisture::Dry), dur.is(Duration::Long))?;
        rules.add(soil.is(SoilMoisture::Normal), dur.is(Duration::Medium))?;
        rules.add(soil.is(SoilMoisture::Wet), dur.is(Duration::Short))?;
        rules.add(
            temp.is(Temperature::Hot).and(soil.is(SoilMoisture::Normal)),
            dur.is(Duration::Long),
        )?;
        rules.add(
            hum.is(Humidity::Low).and(soil.is(SoilMoisture::Normal)),
            dur.is(Duration::Long),
        )?;
        rules.add(
            temp.is(Temperature::Cold).and(soil.is(SoilMoisture::Normal)),
            dur.is(Duration::Short),
        )?;
        rules.add(
            hum.is(Humidity::High).and(soil.is(SoilMoisture::Normal)),
            dur.is(Duration::Short),
        )?;
        rules.add(
            soil.is(SoilMoisture::Dry).and2(temp.is(Temperature::Hot), hum.is(Humidity::Low)),
            dur.is(Duration::Long),
        )?;
        rules.add(
            soil.is(SoilMoisture::Wet).and(temp.is(Temperature::Cold).or(hum.is(Humidity::High))),
            dur.is(Duration::Short),
        )?;

        Ok(Self {
            vars,
            rules,
            engine: config.inference,
            soil_moisture: soil,
            temperature: temp,
            humidity: hum,
            duration: dur,
        })
    }

    /// The discretized output universe, in minutes.
    pub fn domain(&self) -> &[f64] {
        self.vars.get(self.duration).map_or(&[][..], |var| var.universe())
    }

    pub fn evaluate(&self, soil_moisture: f64, temperature: f64, humidity: f64) -> Result<IrrigationEvaluation> {
        let mut inputs = Inputs::new();

        inputs.add(self.soil_moisture, soil_moisture);
        inputs.add(self.temperature, temperature);
        inputs.add(self.humidity, humidity);

        let outputs = self.engine.eval(&self.vars, &self.rules, &inputs)?;
        let aggregated = outputs.aggregated(self.duration).cloned().unwrap_or_else(|| AggregatedSet {
            membership: vec![0.; self.domain().len()],
            area: 0.,
        });

        Ok(IrrigationEvaluation {
            duration_minutes: outputs.defuzzified(self.duration).unwrap_or(0.),
            aggregated,
            firing_strengths: outputs.firing_strengths().to_vec(),
        })
    }

    pub fn compute(&self, soil_moisture: f64, temperature: f64, humidity: f64) -> Result<IrrigationDecision> {
        Ok(self.evaluate(soil_moisture, temperature, humidity)?.decision())
    }
}

/// Builds a default model and computes one decision with it.
///
/// Keep an [`IrrigationModel`] around instead when computing repeatedly.
pub fn compute_irrigation(soil_moisture: f64, temperature: f64, humidity: f64) -> Result<IrrigationDecision> {
    IrrigationModel::new()?.compute(soil_moisture, temperature, humidity)
}

use std::collections::HashMap;

use crate::variable::{Variable, VariableKey};

/// Combined output fuzzy set of one variable, one degree per universe sample.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedSet {
    pub(crate) membership: Vec<f64>,
    pub(crate) area: f64,
}

impl AggregatedSet {
    pub fn membership(&self) -> &[f64] {
        &self.membership
    }

    /// Trapezoidal integral of the membership curve. Zero when no rule fired.
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn is_empty(&self) -> bool {
        self.area <= 0.
    }
}

#[derive(Debug)]
pub struct Outputs {
    defuzzified: HashMap<VariableKey, f64>,
    aggregated: HashMap<VariableKey, AggregatedSet>,
    firing_strengths: Vec<f64>,
}

impl Outputs {
    pub(crate) fn new(
        defuzzified: HashMap<VariableKey, f64>,
        aggregated: HashMap<VariableKey, AggregatedSet>,
        firing_strengths: Vec<f64>,
    ) -> Self {
        Self {
            defuzzified,
            aggregated,
            firing_strengths,
        }
    }

    pub fn defuzzified<I>(&self, var: Variable<I>) -> Option<f64> {
        self.defuzzified.get(&var.0).copied()
    }

    pub fn aggregated<I>(&self, var: Variable<I>) -> Option<&AggregatedSet> {
        self.aggregated.get(&var.0)
    }

    /// One strength per rule, in rule order.
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }
}

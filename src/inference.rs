use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::dsl::Expr;
use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::math::trapz;
use crate::ops::*;
use crate::outputs::{AggregatedSet, Outputs};
use crate::rules::Rules;
use crate::variable::{VariableKey, Variables};

/// Mamdani inference: min/max premise combination, clipped consequents,
/// max aggregation and centroid defuzzification by default.
///
/// Evaluation is a pure function of its arguments, so a single instance can be
/// shared between threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MamdaniInference {
    pub and_op: AndOp,
    pub or_op: OrOp,
    pub imp_op: ImplicationOp,
    pub defuzz_op: DefuzzificationOp,
}

impl MamdaniInference {
    pub fn new(and_op: AndOp, or_op: OrOp, imp_op: ImplicationOp, defuzz_op: DefuzzificationOp) -> Self {
        Self {
            and_op,
            or_op,
            imp_op,
            defuzz_op,
        }
    }

    pub fn eval<T: Copy + Debug + Eq + Hash>(
        &self,
        vars: &Variables<T>,
        rules: &Rules<T>,
        inputs: &Inputs,
    ) -> Result<Outputs> {
        // Every premise proposition needs a finite crisp fact
        for rule in &rules.0 {
            for (var_key, _) in rule.premise.propositions() {
                let var = vars.by_key(*var_key).ok_or(Error::UnknownVariable)?;
                let value = inputs.get(*var_key).ok_or(Error::MissingInput(var.name()))?;

                if !value.is_finite() {
                    warn!("rejecting non-finite input {} = {value}", var.name());
                    return Err(Error::NonFiniteInput {
                        variable: var.name(),
                        value,
                    });
                }
            }
        }

        // Fire rules
        let firing_strengths = rules
            .0
            .iter()
            .map(|rule| self.firing_strength(&rule.premise, vars, inputs))
            .collect::<Vec<_>>();

        // Aggregate clipped consequents; every output variable starts out all zero
        let mut aggregated_memberships: HashMap<VariableKey, Vec<f64>> = HashMap::new();

        for (i, (rule, &strength)) in rules.0.iter().zip(&firing_strengths).enumerate() {
            let var = vars.by_key(rule.output).ok_or(Error::UnknownVariable)?;
            let agg = aggregated_memberships
                .entry(rule.output)
                .or_insert_with(|| vec![0.; var.universe().len()]);

            if strength <= 0. {
                trace!("rule {i} did not fire");
                continue;
            }

            let Some(consequence) = var.sampled(&rule.term) else {
                continue;
            };

            debug!("rule {i} fired at {strength:.4} -> {} is {:?}", var.name(), rule.term);

            for (a, m) in agg.iter_mut().zip(self.imp_op.call(consequence, strength)) {
                *a = f64::max(*a, m);
            }
        }

        // Defuzzificate
        let mut defuzzified = HashMap::with_capacity(aggregated_memberships.len());
        let mut aggregated = HashMap::with_capacity(aggregated_memberships.len());

        for (var_key, membership) in aggregated_memberships {
            let var = vars.by_key(var_key).ok_or(Error::UnknownVariable)?;
            let area = trapz(&membership, var.universe());
            let crisp = if area <= 0. {
                debug!("no rule fired for {}, falling back to 0", var.name());
                0.
            } else {
                self.defuzz_op.call(var.universe(), &membership)
            };

            debug!("{} defuzzified to {crisp:.4} (area {area:.4})", var.name());

            defuzzified.insert(var_key, crisp);
            aggregated.insert(var_key, AggregatedSet { membership, area });
        }

        Ok(Outputs::new(defuzzified, aggregated, firing_strengths))
    }

    fn firing_strength<T: Copy + Eq + Hash>(&self, expr: &Expr<T>, vars: &Variables<T>, inputs: &Inputs) -> f64 {
        match expr {
            Expr::Is(var_key, term) => match (vars.by_key(*var_key), inputs.get(*var_key)) {
                (Some(var), Some(value)) => var.membership(term, value),
                _ => 0.,
            },
            Expr::And(exprs) => exprs
                .iter()
                .map(|e| self.firing_strength(e, vars, inputs))
                .fold(1., |acc, s| self.and_op.call(acc, s)),
            Expr::Or(exprs) => exprs
                .iter()
                .map(|e| self.firing_strength(e, vars, inputs))
                .fold(0., |acc, s| self.or_op.call(acc, s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use fixed_map::Key;

    use super::*;
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Load {
        Light,
        Heavy,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Speed {
        Slow,
        Fast,
    }

    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    enum FanTerms {
        Load(Load),
        Speed(Speed),
    }

    impl From<Load> for FanTerms {
        fn from(l: Load) -> Self {
            Self::Load(l)
        }
    }

    impl From<Speed> for FanTerms {
        fn from(s: Speed) -> Self {
            Self::Speed(s)
        }
    }

    struct Fan {
        vars: Variables<FanTerms>,
        rules: Rules<FanTerms>,
        load: crate::Variable<Load>,
        speed: crate::Variable<Speed>,
    }

    fn fan() -> Fan {
        let mut load_terms = Terms::new();
        let mut speed_terms = Terms::new();

        load_terms.insert(Load::Light, MembershipFunction::trapezoidal(0., 0., 20., 60.).unwrap());
        load_terms.insert(Load::Heavy, MembershipFunction::trapezoidal(40., 80., 100., 100.).unwrap());
        speed_terms.insert(Speed::Slow, MembershipFunction::triangular(0., 2., 4.).unwrap());
        speed_terms.insert(Speed::Fast, MembershipFunction::triangular(6., 8., 10.).unwrap());

        let mut vars = Variables::<FanTerms>::new();
        let load = vars.add("load", 0. ..=100., load_terms, None).unwrap();
        let speed = vars.add("speed", 0. ..=10., speed_terms, None).unwrap();
        let mut rules = Rules::new();

        rules.add(load.is(Load::Light), speed.is(Speed::Slow)).unwrap();
        rules.add(load.is(Load::Heavy), speed.is(Speed::Fast)).unwrap();

        Fan {
            vars,
            rules,
            load,
            speed,
        }
    }

    #[test]
    fn test_single_rule_recovers_consequent_peak() {
        let fan = fan();
        let mut inputs = Inputs::new();
        inputs.add(fan.load, 10.);

        let outputs = MamdaniInference::default().eval(&fan.vars, &fan.rules, &inputs).unwrap();
        let speed = outputs.defuzzified(fan.speed).unwrap();

        assert!((speed - 2.).abs() < 1e-9, "{speed}");
        assert_eq!(outputs.firing_strengths(), &[1., 0.]);
    }

    #[test]
    fn test_blended_rules_land_between_peaks() {
        let fan = fan();
        let mut inputs = Inputs::new();
        inputs.add(fan.load, 50.);

        let outputs = MamdaniInference::default().eval(&fan.vars, &fan.rules, &inputs).unwrap();
        let speed = outputs.defuzzified(fan.speed).unwrap();

        assert_eq!(outputs.firing_strengths(), &[0.25, 0.25]);
        assert!((speed - 5.).abs() < 1e-9, "{speed}");
    }

    #[test]
    fn test_nothing_fires_gives_zero() {
        let fan = fan();
        let mut inputs = Inputs::new();
        inputs.add(fan.load, -5.);

        let outputs = MamdaniInference::default().eval(&fan.vars, &fan.rules, &inputs).unwrap();

        assert_eq!(outputs.defuzzified(fan.speed), Some(0.));
        assert!(outputs.aggregated(fan.speed).unwrap().is_empty());
        assert!(outputs.aggregated(fan.speed).unwrap().membership().iter().all(|m| *m == 0.));
    }

    #[test]
    fn test_missing_and_non_finite_inputs() {
        let fan = fan();

        assert!(matches!(
            MamdaniInference::default().eval(&fan.vars, &fan.rules, &Inputs::new()),
            Err(Error::MissingInput("load"))
        ));

        let mut inputs = Inputs::new();
        inputs.add(fan.load, f64::NAN);

        assert!(matches!(
            MamdaniInference::default().eval(&fan.vars, &fan.rules, &inputs),
            Err(Error::NonFiniteInput { variable: "load", .. })
        ));
    }

    #[test]
    fn test_compound_consequence_is_rejected() {
        let mut fan = fan();
        let premise = fan.load.is(Load::Light);
        let consequence = fan.speed.is(Speed::Slow).or(fan.speed.is(Speed::Fast));

        assert!(matches!(
            fan.rules.add(premise, consequence),
            Err(Error::CompoundConsequence)
        ));
    }

    #[test]
    fn test_and_or_combination() {
        let fan = fan();
        let mut inputs = Inputs::new();
        inputs.add(fan.load, 50.);

        let model = MamdaniInference::default();
        let both = fan.load.is(Load::Light).and(fan.load.is(Load::Heavy));
        let either = fan.load.is(Load::Light).or(fan.load.is(Load::Heavy));

        assert_eq!(model.firing_strength(&both, &fan.vars, &inputs), 0.25);
        assert_eq!(model.firing_strength(&either, &fan.vars, &inputs), 0.25);

        let mut inputs = Inputs::new();
        inputs.add(fan.load, 45.);

        // light = 15/40, heavy = 5/40
        assert_eq!(model.firing_strength(&both, &fan.vars, &inputs), 0.125);
        assert_eq!(model.firing_strength(&either, &fan.vars, &inputs), 0.375);
    }
}

use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

use slotmap::{new_key_type, SlotMap};

use crate::error::{Error, Result};
use crate::linspace::Linspace;
use crate::membership::MembershipFunction;
use crate::terms::{Term, Terms};

pub const DEFAULT_STEP: f64 = 0.1;

/// Upper bound on the number of intervals a universe may be split into.
pub const MAX_GRID_INTERVALS: f64 = 1e6;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Typed handle to a variable whose terms are `I`.
pub struct Variable<I>(pub(crate) VariableKey, PhantomData<I>);

impl<I> Clone for Variable<I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I> Copy for Variable<I> {}

impl<I> Variable<I> {
    pub fn key(&self) -> VariableKey {
        self.0
    }
}

#[derive(Default)]
pub struct Variables<T>(pub(crate) SlotMap<VariableKey, LinguisticVariable<T>>);

impl<T: Copy + Eq + Hash> Variables<T> {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    /// If the step value is not provided, it defaults to 0.1
    pub fn add<I: Into<T> + Term>(
        &mut self,
        name: &'static str,
        universe_range: RangeInclusive<f64>,
        terms: Terms<I>,
        step: Option<f64>,
    ) -> Result<Variable<I>> {
        let term_functions = terms.0.iter().map(|(k, mf)| (k.into(), *mf));
        let var = LinguisticVariable::new(name, universe_range, term_functions, step.unwrap_or(DEFAULT_STEP))?;
        let key = self.0.insert(var);

        Ok(Variable(key, PhantomData))
    }

    pub fn get<I>(&self, var: Variable<I>) -> Option<&LinguisticVariable<T>> {
        self.0.get(var.0)
    }

    pub(crate) fn by_key(&self, key: VariableKey) -> Option<&LinguisticVariable<T>> {
        self.0.get(key)
    }
}

/// A named dimension with a bounded, discretized universe of discourse.
///
/// Term curves are sampled over the universe the first time they are asked for.
/// Only consequent variables ever are; inputs go through [`Self::membership`].
pub struct LinguisticVariable<T> {
    name: &'static str,
    min_u: f64,
    max_u: f64,
    universe: Vec<f64>,
    terms: HashMap<T, MembershipFunction>,
    sampled: OnceLock<HashMap<T, Vec<f64>>>,
}

impl<T: Copy + Eq + Hash> LinguisticVariable<T> {
    fn new(
        name: &'static str,
        universe_range: RangeInclusive<f64>,
        term_functions: impl IntoIterator<Item = (T, MembershipFunction)>,
        step: f64,
    ) -> Result<Self> {
        let min_u = *universe_range.start();
        let max_u = *universe_range.end();

        if !min_u.is_finite() || !max_u.is_finite() {
            return Err(Error::InvalidUniverse {
                variable: name,
                reason: "bounds must be finite",
            });
        }
        if min_u >= max_u {
            return Err(Error::InvalidUniverse {
                variable: name,
                reason: "lower bound must be below upper bound",
            });
        }
        if !step.is_finite() || step <= 0. {
            return Err(Error::InvalidUniverse {
                variable: name,
                reason: "step must be positive",
            });
        }

        // round rather than floor: 60 / 0.1 lands a hair under 600 in binary
        let intervals = ((max_u - min_u) / step).round();

        if intervals > MAX_GRID_INTERVALS {
            return Err(Error::InvalidUniverse {
                variable: name,
                reason: "step is too fine for the universe",
            });
        }

        let num = (intervals as usize).checked_add(1).ok_or(Error::InvalidUniverse {
            variable: name,
            reason: "step is too fine for the universe",
        })?;
        let universe: Vec<f64> = Linspace::new(min_u, max_u, num).collect();

        Ok(Self {
            name,
            min_u,
            max_u,
            universe,
            terms: term_functions.into_iter().collect(),
            sampled: OnceLock::new(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn range(&self) -> RangeInclusive<f64> {
        self.min_u..=self.max_u
    }

    /// The discretized universe of discourse.
    pub fn universe(&self) -> &[f64] {
        &self.universe
    }

    /// Degree to which the crisp value `x` belongs to `term`. Unknown terms have no members.
    pub fn membership(&self, term: &T, x: f64) -> f64 {
        self.terms.get(term).map_or(0., |mf| mf.call(x))
    }

    /// The term's membership curve sampled over [`Self::universe`].
    pub fn sampled(&self, term: &T) -> Option<&[f64]> {
        let sampled = self.sampled.get_or_init(|| {
            self.terms
                .iter()
                .map(|(term, mf)| (*term, self.universe.iter().map(|&u| mf.call(u)).collect()))
                .collect()
        });

        sampled.get(term).map(Vec::as_slice)
    }

    pub(crate) fn is_sampled(&self) -> bool {
        self.sampled.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use fixed_map::Key;

    use super::*;

    #[derive(Clone, Copy, Debug, Eq, Hash, Key, PartialEq)]
    enum Level {
        Low,
        High,
    }

    fn level_terms() -> Terms<Level> {
        let mut terms = Terms::new();
        terms.insert(Level::Low, MembershipFunction::trapezoidal(0., 0., 2., 6.).unwrap());
        terms.insert(Level::High, MembershipFunction::trapezoidal(4., 8., 10., 10.).unwrap());
        terms
    }

    #[test]
    fn test_sampled_terms_cover_the_universe() {
        let mut vars = Variables::<Level>::new();
        let level = vars.add("level", 0. ..=10., level_terms(), Some(0.5)).unwrap();
        let var = vars.get(level).unwrap();

        assert_eq!(var.universe().len(), 21);
        assert_eq!(var.sampled(&Level::Low).unwrap().len(), 21);
        assert_eq!(var.sampled(&Level::High).unwrap()[12], 0.5);
        assert_eq!(var.membership(&Level::Low, 4.), 0.5);
        assert_eq!(var.name(), "level");
    }

    #[test]
    fn test_invalid_universe() {
        let mut vars = Variables::<Level>::new();

        assert!(matches!(
            vars.add("level", 10. ..=0., level_terms(), None),
            Err(Error::InvalidUniverse { variable: "level", .. })
        ));
        assert!(vars.add("level", 0. ..=10., level_terms(), Some(0.)).is_err());
        assert!(vars.add("level", 0. ..=f64::INFINITY, level_terms(), None).is_err());
    }

    #[test]
    fn test_step_too_fine_for_universe() {
        let mut vars = Variables::<Level>::new();

        for step in [1e-300, f64::MIN_POSITIVE, 1e-7] {
            assert!(matches!(
                vars.add("level", 0. ..=10., level_terms(), Some(step)),
                Err(Error::InvalidUniverse { variable: "level", .. })
            ));
        }

        // exactly at the cap is still allowed
        let level = vars.add("level", 0. ..=1., level_terms(), Some(1. / MAX_GRID_INTERVALS)).unwrap();
        assert_eq!(vars.get(level).unwrap().universe().len(), MAX_GRID_INTERVALS as usize + 1);
    }

    #[test]
    fn test_curves_are_sampled_on_first_use() {
        let mut vars = Variables::<Level>::new();
        let level = vars.add("level", 0. ..=10., level_terms(), Some(0.5)).unwrap();
        let var = vars.get(level).unwrap();

        assert_eq!(var.membership(&Level::High, 6.), 0.5);
        assert!(!var.is_sampled());

        assert_eq!(var.sampled(&Level::High).unwrap()[12], 0.5);
        assert!(var.is_sampled());
    }
}

use num::Float;
use serde::{Deserialize, Serialize};

use crate::math::{interp, trapz};

/// And operator method for combining the propositions of a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
}

impl AndOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
        }
    }
}

/// Or operator method for combining the propositions of a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
}

impl OrOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
        }
    }
}

/// How a rule's firing strength shapes its consequent membership curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplicationOp {
    /// Mamdani: cut the curve off at the firing strength
    #[default]
    Clip,
    /// Larsen: scale the curve by the firing strength
    Scale,
}

impl ImplicationOp {
    pub fn call<'c, F: Float + 'c>(
        self,
        consequence: impl IntoIterator<Item = &'c F> + 'c,
        strength: F,
    ) -> impl Iterator<Item = F> + 'c {
        consequence.into_iter().map(move |&m| match self {
            Self::Clip => F::min(m, strength),
            Self::Scale => m * strength,
        })
    }
}

/// Method for defuzzificating the aggregated membership function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Center of gravity, integrated with the trapezoidal rule
    #[default]
    Centroid,
    /// Point splitting the area in two halves
    Bisector,
    /// Mean of the values for which the membership function is maximum
    MeanOfMaximum,
    /// Smallest value for which the membership function is maximum
    SmallestOfMaximum,
    /// Largest value for which the membership function is maximum
    LargestOfMaximum,
}

impl DefuzzificationOp {
    /// Callers are expected to have ruled out an empty (zero area) set.
    pub fn call<F: Float>(self, universe: &[F], membership: &[F]) -> F {
        match self {
            Self::Centroid => {
                let weighted: Vec<F> = universe
                    .iter()
                    .zip(membership)
                    .map(|(&x, &m)| x * m)
                    .collect();
                let den = trapz(membership, universe);

                if den == F::zero() {
                    return F::zero();
                }

                trapz(&weighted, universe) / den
            },
            Self::Bisector => {
                let two = F::one() + F::one();
                let mut cum_area = F::zero();
                let mut cumulative = Vec::with_capacity(universe.len());

                cumulative.push((cum_area, universe.first().copied().unwrap_or_else(F::zero)));

                for (xs, ms) in universe.windows(2).zip(membership.windows(2)) {
                    cum_area = cum_area + (xs[1] - xs[0]) * (ms[0] + ms[1]) / two;
                    cumulative.push((cum_area, xs[1]));
                }

                let target = cum_area / two;
                let Some(i) = cumulative.iter().position(|&(area, _)| area >= target) else {
                    return F::zero();
                };

                if i == 0 {
                    return cumulative[0].1;
                }

                interp(target, &cumulative[i - 1..=i])
            },
            Self::MeanOfMaximum => {
                let (count, sum) = maximizers(universe, membership)
                    .fold((0usize, F::zero()), |(count, sum), u| (count + 1, sum + u));

                match F::from(count) {
                    Some(n) if count > 0 => sum / n,
                    _ => F::zero(),
                }
            },
            Self::SmallestOfMaximum => maximizers(universe, membership).reduce(F::min).unwrap_or_else(F::zero),
            Self::LargestOfMaximum => maximizers(universe, membership).reduce(F::max).unwrap_or_else(F::zero),
        }
    }
}

fn maximizers<'a, F: Float>(universe: &'a [F], membership: &'a [F]) -> impl Iterator<Item = F> + 'a {
    let maximum = membership.iter().copied().fold(F::neg_infinity(), F::max);

    universe
        .iter()
        .copied()
        .zip(membership.iter().copied())
        .filter_map(move |(u, m)| if m == maximum { Some(u) } else { None })
}

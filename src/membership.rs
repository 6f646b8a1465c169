//! Piecewise-linear membership functions.
//!
//! Both shapes are total on the reals: anything outside the support maps to
//! zero and the result is always clamped to `[0, 1]`. The support is open at
//! both ends, so `x == a` and `x == d` (or `x == c` for triangles) are zero
//! even when the ramp is degenerate.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipFunction {
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    Triangular { a: f64, b: f64, c: f64 },
}

impl MembershipFunction {
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        if ![a, b, c, d].iter().all(|p| p.is_finite()) {
            return Err(Error::InvalidMembership("trapezoid parameters must be finite"));
        }
        if !(a <= b && b <= c && c <= d) {
            return Err(Error::InvalidMembership("trapezoid requires a <= b <= c <= d"));
        }

        Ok(Self::Trapezoidal { a, b, c, d })
    }

    pub fn triangular(a: f64, b: f64, c: f64) -> Result<Self> {
        if ![a, b, c].iter().all(|p| p.is_finite()) {
            return Err(Error::InvalidMembership("triangle parameters must be finite"));
        }
        if !(a <= b && b <= c) {
            return Err(Error::InvalidMembership("triangle requires a <= b <= c"));
        }

        Ok(Self::Triangular { a, b, c })
    }

    /// Degree of membership of `x`, in `[0, 1]`.
    pub fn call(&self, x: f64) -> f64 {
        let degree = match *self {
            Self::Trapezoidal { a, b, c, d } => trapezoidal(x, a, b, c, d),
            Self::Triangular { a, b, c } => triangular(x, a, b, c),
        };

        degree.clamp(0., 1.)
    }
}

pub fn trapezoidal(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x <= a || x >= d {
        0.
    } else if b <= x && x <= c {
        1.
    } else if a < x && x < b {
        (x - a) / (b - a)
    } else if c < x && x < d {
        (d - x) / (d - c)
    } else {
        0.
    }
}

pub fn triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x <= a || x >= c {
        0.
    } else if a < x && x < b {
        (x - a) / (b - a)
    } else if b < x && x < c {
        (c - x) / (c - b)
    } else if x == b {
        1.
    } else {
        0.
    }
}

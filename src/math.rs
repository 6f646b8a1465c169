use num::Float;

/// Similar to numpy.interp
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let (Some(&(x_first, y_first)), Some(&(x_last, y_last))) = (coords.first(), coords.last()) else {
        return F::zero();
    };

    if x <= x_first {
        return y_first;
    }
    if x >= x_last {
        return y_last;
    }

    for pair in coords.windows(2) {
        let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);

        if x1 <= x && x <= x2 {
            if x2 == x1 {
                return y2;
            }

            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    y_last
}

/// Similar to numpy.trapz: integrates `y` over the sample points `x` with the trapezoidal rule.
pub(crate) fn trapz<F: Float>(y: &[F], x: &[F]) -> F {
    let two = F::one() + F::one();

    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[1] + ys[0]) / two)
        .fold(F::zero(), |acc, area| acc + area)
}

/// Rounds half to even at the given number of decimals, like numpy.round.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);

    (value * scale).round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interp() {
        let coords = [(1., 3.), (2., 2.), (3., 0.)];

        assert_eq!(interp(0., &coords), 3.);
        assert_eq!(interp(1.5, &coords), 2.5);
        assert!((interp(2.72, &coords) - 0.56).abs() < 1e-12);
        assert_eq!(interp(3.24, &coords), 0.);

        let coords = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];

        assert_eq!(interp(2.5, &coords), 4.);
        assert_eq!(interp(-1., &coords), 0.);
        assert_eq!(interp(7.5, &coords), 2.);
    }

    #[test]
    fn test_trapz() {
        let x = [0., 1., 2., 3.];

        assert_eq!(trapz(&[1., 1., 1., 1.], &x), 3.);
        assert_eq!(trapz(&[0., 1., 2., 3.], &x), 4.5);
        assert_eq!(trapz::<f64>(&[], &[]), 0.);
        assert_eq!(trapz(&[5.], &[1.]), 0.);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(29.999999999, 2), 30.);
        assert_eq!(round_to(12.344, 2), 12.34);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(-1.005, 0), -1.);
    }
}

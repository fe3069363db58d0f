//! Frequency sweep utilities and post-processing helpers.

use num_complex::Complex;

use crate::constants::angular_frequency;
use crate::filters::design::LadderDesign;
use crate::math::Real;

/// Generates `n` logarithmically spaced samples between `start` and `stop`.
///
/// Both bounds must be positive; otherwise the result is empty.
#[must_use]
pub fn logspace<T: Real>(start: T, stop: T, n: usize) -> Vec<T> {
    if start <= T::zero() || stop <= T::zero() {
        return Vec::new();
    }
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let log_start = start.log10();
            let step = (stop.log10() - log_start) / T::from_count(n - 1);
            let ten = T::lit(10.0);
            (0..n)
                .map(|i| ten.powf(log_start + step * T::from_count(i)))
                .collect()
        }
    }
}

/// Angular frequencies for `points_per_decade` samples between `start_hz` and `stop_hz`.
#[must_use]
pub fn angular_freq_decades<T: Real>(start_hz: T, stop_hz: T, points_per_decade: usize) -> Vec<T> {
    if start_hz <= T::zero() || stop_hz <= start_hz {
        return Vec::new();
    }
    let decades = (stop_hz / start_hz).log10().as_f64();
    let n = (decades * points_per_decade as f64).ceil() as usize + 1;
    logspace(start_hz, stop_hz, n)
        .into_iter()
        .map(angular_frequency)
        .collect()
}

/// One point of a transfer-function sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponsePoint<T> {
    /// Angular frequency (rad/s).
    pub omega: T,
    /// Transfer function value.
    pub response: Complex<T>,
}

/// Evaluates `design`'s realized transfer function at each angular frequency.
#[must_use]
pub fn response_sweep<T, I>(design: &LadderDesign<T>, omegas: I) -> Vec<ResponsePoint<T>>
where
    T: Real,
    I: IntoIterator<Item = T>,
{
    omegas
        .into_iter()
        .map(|omega| ResponsePoint {
            omega,
            response: design.response(omega),
        })
        .collect()
}

/// Magnitude in dB (20*log10(|x|)), clamping very small values.
#[must_use]
pub fn mag_db<T: Real>(value: Complex<T>) -> T {
    let floor = T::min_positive_value();
    T::lit(20.0) * value.norm().max(floor).log10()
}

/// Phase in degrees.
#[must_use]
pub fn phase_deg<T: Real>(value: Complex<T>) -> T {
    value.arg().to_degrees()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::filters::design::design;
    use crate::filters::spec::{Cutoff, FilterSpec};

    #[test]
    fn logspace_spans_decades() {
        let v = logspace(1.0_f64, 1000.0, 4);
        for (got, want) in v.iter().zip([1.0, 10.0, 100.0, 1000.0]) {
            assert_relative_eq!(*got, want, max_relative = 1e-12);
        }
        assert!(logspace(0.0_f64, 10.0, 3).is_empty());
    }

    #[test]
    fn decade_sweep_density() {
        let w = angular_freq_decades(1.0_f64, 100.0, 10);
        assert_eq!(w.len(), 21);
        assert_relative_eq!(w[0], std::f64::consts::TAU, max_relative = 1e-12);
    }

    #[test]
    fn mag_and_phase() {
        assert_relative_eq!(mag_db(Complex::new(10.0_f64, 0.0)), 20.0, epsilon = 1e-12);
        assert_relative_eq!(phase_deg(Complex::new(0.0_f64, 1.0)), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn butterworth_response_is_monotone() {
        let spec = FilterSpec::butterworth(4, Cutoff::Radians(1.0_f64), 1.0).unwrap();
        let d = design(&spec).unwrap();
        let points = response_sweep(&d, logspace(0.01, 100.0, 50));
        let db: Vec<f64> = points.iter().map(|p| mag_db(p.response)).collect();
        assert!(db.windows(2).all(|w| w[1] <= w[0] + 1e-9));
        assert_relative_eq!(db[0], 0.0, epsilon = 1e-6);
    }
}

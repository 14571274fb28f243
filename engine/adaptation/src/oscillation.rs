//! Oscillation gates.
//!
//! The sustained gate looks at every species over phase 1: a limit cycle
//! drives the normalised autocorrelation of some species strongly negative at
//! half its period. The damped gate looks at the output species over phase 2
//! and rejects responses that ring around the new steady state instead of
//! settling after one overshoot.

use crate::config::OscillationConfig;
use circuit_dynamics::Trajectory;
use num_complex::Complex64;
use rustfft::FftPlanner;

/// Mean-centred autocorrelation at lags `0..n`, normalised by lag 0.
///
/// Computed through an FFT of length `2n` so the circular correlation has no
/// wrap-around. Returns `None` for a constant series.
pub fn autocorrelation(series: &[f64]) -> Option<Vec<f64>> {
    let n = series.len();
    if n == 0 {
        return None;
    }
    let (lo, hi) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let mean = series.iter().sum::<f64>() / n as f64;
    if hi - lo <= 16.0 * f64::EPSILON * mean.abs().max(1.0) {
        return None;
    }

    let size = 2 * n;
    let mut buf: Vec<Complex64> = series
        .iter()
        .map(|&v| Complex64::new(v - mean, 0.0))
        .chain(std::iter::repeat(Complex64::new(0.0, 0.0)).take(n))
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(size).process(&mut buf);
    for c in buf.iter_mut() {
        *c = Complex64::new(c.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(size).process(&mut buf);

    // The inverse transform is unnormalised; the 1/size factor cancels here.
    let zero_lag = buf[0].re;
    if !(zero_lag > 0.0) {
        return None;
    }
    Some(buf[..n].iter().map(|c| c.re / zero_lag).collect())
}

/// Result of the sustained-oscillation gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SustainedVerdict {
    /// Minimum over all lags and non-constant species (1.0 if all constant).
    pub min_autocorrelation: f64,
    pub oscillating: bool,
}

/// Sustained gate over every species of a phase-1 trajectory.
pub fn sustained(trajectory: &Trajectory, config: &OscillationConfig) -> SustainedVerdict {
    let mut min = 1.0f64;
    for s in 0..trajectory.species() {
        if let Some(acf) = autocorrelation(trajectory.series(s)) {
            min = acf.iter().copied().fold(min, f64::min);
        }
    }
    SustainedVerdict {
        min_autocorrelation: min,
        oscillating: min < config.autocorrelation_cutoff,
    }
}

/// Indices of local maxima.
///
/// A peak is strictly greater than its left neighbour and than the first
/// differing sample to its right; flat tops report their midpoint (rounded
/// down). The first and last samples are never peaks.
pub fn find_peaks(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }
    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Height of the peak at `peak` above the higher of its two bases.
///
/// Each base is the lowest sample between the peak and the nearest strictly
/// higher sample on that side (or the end of the series).
pub fn prominence(x: &[f64], peak: usize) -> f64 {
    let top = x[peak];
    let left = base(x[..peak].iter().rev(), top);
    let right = base(x[peak + 1..].iter(), top);
    top - left.max(right)
}

fn base<'a>(side: impl Iterator<Item = &'a f64>, top: f64) -> f64 {
    side.take_while(|&&v| v <= top).copied().fold(top, f64::min)
}

/// Result of the damped-oscillation gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DampedVerdict {
    /// Fewer than two prominent peaks; nothing to compare.
    TooFewPeaks { peaks: usize },
    /// One overshoot followed by a shallow trough.
    Settles { overshoot: f64, trough_gap: f64 },
    /// The first trough mirrors the first overshoot.
    Rings { overshoot: f64, trough_gap: f64 },
}

impl DampedVerdict {
    pub fn passes(&self) -> bool {
        !matches!(self, DampedVerdict::Rings { .. })
    }
}

/// Damped gate on the output series of phase 2, measured against `reference`.
pub fn damped(series: &[f64], reference: f64, config: &OscillationConfig) -> DampedVerdict {
    let floor = config.prominence_floor(reference);
    let peaks: Vec<usize> = find_peaks(series)
        .into_iter()
        .filter(|&p| prominence(series, p) >= floor)
        .collect();
    let (p0, p1) = match peaks[..] {
        [p0, p1, ..] => (p0, p1),
        _ => return DampedVerdict::TooFewPeaks { peaks: peaks.len() },
    };
    let trough = series[p0..p1].iter().copied().fold(f64::INFINITY, f64::min);
    let overshoot = series[p0] - reference;
    let trough_gap = reference - trough;
    if trough_gap > config.damped_trough_ratio * overshoot
        || (overshoot - trough_gap).abs() <= config.damped_tolerance
    {
        DampedVerdict::Rings {
            overshoot,
            trough_gap,
        }
    } else {
        DampedVerdict::Settles {
            overshoot,
            trough_gap,
        }
    }
}

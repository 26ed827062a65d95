//! Log-magnitude views of a spectrum
//!
//! Used for visualisation only; nothing here feeds back into the transform.

use ndarray::{Array2, ArrayView2};

use super::fft::Spectrum;

/// Value stored for a bin whose magnitude is exactly zero
pub const ZERO_MAGNITUDE: f64 = f64::MIN;

/// `20 * ln(|X|)` for every bin
///
/// A zero-magnitude bin maps to [`ZERO_MAGNITUDE`] instead of `-inf`, so the
/// output is always finite.
pub fn magnitude_spectrum(spectrum: &Spectrum) -> Array2<f64> {
    spectrum.data().mapv(|bin| {
        let magnitude = bin.norm();
        if magnitude > 0.0 {
            20.0 * magnitude.ln()
        } else {
            ZERO_MAGNITUDE
        }
    })
}

/// Min-max normalise a magnitude array to 0..=255 for display
///
/// [`ZERO_MAGNITUDE`] cells are drawn black and excluded from the range.
pub fn to_display_u8(magnitude: ArrayView2<f64>) -> Array2<u8> {
    let (lo, hi) = magnitude
        .iter()
        .filter(|&&v| v != ZERO_MAGNITUDE && v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let span = hi - lo;
    magnitude.mapv(|v| {
        if v == ZERO_MAGNITUDE || !v.is_finite() || span <= 0.0 {
            0
        } else {
            (((v - lo) / span) * 255.0).round().clamp(0.0, 255.0) as u8
        }
    })
}

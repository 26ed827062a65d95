//! Circular attenuation masks for centred spectra

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use ndarray::{Array2, ArrayView2};

use crate::error::FilterError;
use crate::spectrum::dc_position;

/// Smallest attenuation factor a mask will hold
///
/// Requests for full attenuation are raised to this value so the masked
/// spectrum never has exact zeros going into the log-magnitude.
pub const MIN_ATTENUATION: f64 = 1e-8;

/// Which side of the circle gets attenuated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassDirection {
    /// Attenuate inside the circle (low frequencies): keeps edges and detail
    HighPass,

    /// Attenuate outside the circle (high frequencies): smooths
    LowPass,
}

impl PassDirection {
    /// Whether a cell at squared distance `d2` from the centre is attenuated
    pub fn attenuates(&self, d2: f64, radius_sq: f64) -> bool {
        match self {
            PassDirection::HighPass => d2 <= radius_sq,
            PassDirection::LowPass => d2 > radius_sq,
        }
    }
}

impl fmt::Display for PassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassDirection::HighPass => write!(f, "highpass"),
            PassDirection::LowPass => write!(f, "lowpass"),
        }
    }
}

/// Legacy integer flag: 0 = high-pass, 1 = low-pass
impl TryFrom<u8> for PassDirection {
    type Error = FilterError;

    fn try_from(flag: u8) -> Result<Self, Self::Error> {
        match flag {
            0 => Ok(PassDirection::HighPass),
            1 => Ok(PassDirection::LowPass),
            other => Err(FilterError::parameter(
                "direction",
                other as f64,
                "expected 0 (high-pass) or 1 (low-pass)",
            )),
        }
    }
}

impl FromStr for PassDirection {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highpass" | "high-pass" | "hpf" | "0" => Ok(PassDirection::HighPass),
            "lowpass" | "low-pass" | "lpf" | "1" => Ok(PassDirection::LowPass),
            _ => Err(FilterError::UnknownName {
                kind: "pass direction",
                name: s.to_string(),
            }),
        }
    }
}

/// Real-valued gain per spectrum bin
///
/// Every cell holds either `1.0` or the attenuation factor.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    values: Array2<f64>,
    radius: f64,
    intensity: f64,
    direction: PassDirection,
}

impl Mask {
    /// Build a circular mask centred at `(height / 2, width / 2)`
    ///
    /// # Arguments
    /// * `radius` - Circle radius in bins, must be >= 0
    /// * `intensity` - Gain for attenuated cells, must be >= 0; values above
    ///   1 are clamped to 1 and values below [`MIN_ATTENUATION`] are raised
    ///   to it
    ///
    /// # Returns
    /// The mask, or `InvalidParameter` for a negative or non-finite radius or
    /// intensity
    /// * `direction` - Which side of the circle is attenuated
    pub fn circular(
        height: usize,
        width: usize,
        radius: f64,
        intensity: f64,
        direction: PassDirection,
    ) -> Result<Self, FilterError> {
        if height == 0 || width == 0 {
            return Err(FilterError::EmptyBuffer);
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(FilterError::parameter("radius", radius, "must be finite and >= 0"));
        }
        if !intensity.is_finite() || intensity < 0.0 {
            return Err(FilterError::parameter("intensity", intensity, "must be finite and >= 0"));
        }

        let intensity = if intensity > 1.0 {
            debug!("attenuation {} clamped to 1", intensity);
            1.0
        } else if intensity < MIN_ATTENUATION {
            if intensity == 0.0 {
                warn!("attenuation of 0 raised to {:e}", MIN_ATTENUATION);
            }
            MIN_ATTENUATION
        } else {
            intensity
        };

        let (crow, ccol) = dc_position(height, width);
        let (crow, ccol) = (crow as f64, ccol as f64);
        let radius_sq = radius * radius;

        let values = Array2::from_shape_fn((height, width), |(x, y)| {
            let d2 = (x as f64 - crow).powi(2) + (y as f64 - ccol).powi(2);
            if direction.attenuates(d2, radius_sq) {
                intensity
            } else {
                1.0
            }
        });

        let mask = Self {
            values,
            radius,
            intensity,
            direction,
        };
        debug!(
            "{} mask {}x{}: radius {:.3}, intensity {:e}, {} attenuated cells",
            direction,
            height,
            width,
            radius,
            intensity,
            mask.attenuated_count()
        );
        Ok(mask)
    }

    /// Gains, same shape as the image
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Effective attenuation factor (after the floor was applied)
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn direction(&self) -> PassDirection {
        self.direction
    }

    /// Whether the cell at `(row, col)` holds the attenuation factor
    ///
    /// Decided geometrically, so it stays correct when the factor is 1.0.
    pub fn is_attenuated(&self, row: usize, col: usize) -> bool {
        let (height, width) = self.dim();
        let (crow, ccol) = dc_position(height, width);
        let d2 = (row as f64 - crow as f64).powi(2) + (col as f64 - ccol as f64).powi(2);
        self.direction.attenuates(d2, self.radius * self.radius)
    }

    /// Number of cells on the attenuated side of the circle
    pub fn attenuated_count(&self) -> usize {
        let (height, width) = self.dim();
        (0..height)
            .flat_map(|r| (0..width).map(move |c| (r, c)))
            .filter(|&(r, c)| self.is_attenuated(r, c))
            .count()
    }
}

/// Convenience wrapper around [`Mask::circular`]
pub fn generate_mask(
    height: usize,
    width: usize,
    radius: f64,
    intensity: f64,
    direction: PassDirection,
) -> Result<Mask, FilterError> {
    Mask::circular(height, width, radius, intensity, direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside_count(height: usize, width: usize, radius: f64) -> usize {
        let mut n = 0;
        for x in 0..height {
            for y in 0..width {
                let dx = x as f64 - (height / 2) as f64;
                let dy = y as f64 - (width / 2) as f64;
                if dx * dx + dy * dy <= radius * radius {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn test_partition_counts() {
        let (h, w, r) = (33, 40, 7.5);
        let hp = Mask::circular(h, w, r, 0.25, PassDirection::HighPass).unwrap();
        let lp = Mask::circular(h, w, r, 0.25, PassDirection::LowPass).unwrap();

        let inside = inside_count(h, w, r);
        assert_eq!(hp.values().iter().filter(|&&v| v == 0.25).count(), inside);
        assert_eq!(lp.values().iter().filter(|&&v| v == 0.25).count(), h * w - inside);
        assert!(hp.values().iter().all(|&v| v == 0.25 || v == 1.0));
        assert_eq!(hp.attenuated_count(), inside);
        assert_eq!(lp.attenuated_count(), h * w - inside);
    }

    #[test]
    fn test_directions_are_complements() {
        let hp = Mask::circular(20, 16, 4.0, 0.5, PassDirection::HighPass).unwrap();
        let lp = Mask::circular(20, 16, 4.0, 0.5, PassDirection::LowPass).unwrap();

        for (a, b) in hp.values().iter().zip(lp.values().iter()) {
            assert!((*a == 0.5) != (*b == 0.5));
        }
    }

    #[test]
    fn test_zero_radius() {
        let hp = Mask::circular(9, 9, 0.0, 0.5, PassDirection::HighPass).unwrap();
        assert_eq!(hp.attenuated_count(), 1);
        assert_eq!(hp.values()[[4, 4]], 0.5);

        let lp = Mask::circular(9, 9, 0.0, 0.5, PassDirection::LowPass).unwrap();
        assert_eq!(lp.attenuated_count(), 80);
        assert_eq!(lp.values()[[4, 4]], 1.0);
    }

    #[test]
    fn test_zero_intensity_floor() {
        let mask = Mask::circular(8, 8, 2.0, 0.0, PassDirection::HighPass).unwrap();
        assert_eq!(mask.intensity(), MIN_ATTENUATION);
        assert!(mask.values().iter().all(|&v| v > 0.0));
    }

    #[test]
    fn test_intensity_above_one_clamped() {
        let mask = Mask::circular(8, 8, 2.0, 1.5, PassDirection::LowPass).unwrap();
        assert_eq!(mask.intensity(), 1.0);
        assert!(mask.values().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            Mask::circular(8, 8, -1.0, 0.5, PassDirection::HighPass),
            Err(FilterError::InvalidParameter { name: "radius", .. })
        ));
        assert!(matches!(
            Mask::circular(8, 8, 1.0, -0.5, PassDirection::LowPass),
            Err(FilterError::InvalidParameter { name: "intensity", .. })
        ));
        assert!(matches!(
            Mask::circular(8, 8, 1.0, f64::NAN, PassDirection::LowPass),
            Err(FilterError::InvalidParameter { name: "intensity", .. })
        ));
        assert!(matches!(
            Mask::circular(0, 8, 1.0, 0.5, PassDirection::LowPass),
            Err(FilterError::EmptyBuffer)
        ));
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("HPF".parse::<PassDirection>().unwrap(), PassDirection::HighPass);
        assert_eq!("lowpass".parse::<PassDirection>().unwrap(), PassDirection::LowPass);
        assert_eq!(PassDirection::try_from(1u8).unwrap(), PassDirection::LowPass);
        assert!(PassDirection::try_from(2u8).is_err());
        assert!("bandpass".parse::<PassDirection>().is_err());
    }
}

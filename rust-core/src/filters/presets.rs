//! Named filter presets and the percentage-driven custom filter

use std::fmt;
use std::str::FromStr;

use log::info;

use super::engine::{self, FilteredResult, ImageMode};
use super::mask::{Mask, PassDirection, MIN_ATTENUATION};
use crate::error::FilterError;
use crate::image::ChannelImage;

/// Absolute mask parameters, ready for [`Mask::circular`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskParams {
    /// Radius in bins
    pub radius: f64,

    /// Gain for attenuated cells (1.0 = unchanged, 0.0 = removed)
    pub intensity: f64,

    pub direction: PassDirection,
}

impl MaskParams {
    /// Build the mask for a `height × width` image
    pub fn mask(&self, height: usize, width: usize) -> Result<Mask, FilterError> {
        Mask::circular(height, width, self.radius, self.intensity, self.direction)
    }
}

/// Caller-facing filter settings
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Planes to filter
    pub mode: ImageMode,

    /// Radius as a percentage of half the image width (0-100)
    pub radius_percent: f64,

    /// Dampening strength in percent: 0 leaves the masked cells unchanged,
    /// 100 removes them
    pub intensity_percent: f64,

    pub direction: PassDirection,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            mode: ImageMode::AllColor,
            radius_percent: 0.0,
            intensity_percent: 0.0,
            direction: PassDirection::HighPass,
        }
    }
}

impl FilterConfig {
    pub fn new(
        mode: ImageMode,
        radius_percent: f64,
        intensity_percent: f64,
        direction: PassDirection,
    ) -> Self {
        Self {
            mode,
            radius_percent,
            intensity_percent,
            direction,
        }
    }

    /// Check both percentages lie in `[0, 100]`
    pub fn validate(&self) -> Result<(), FilterError> {
        check_percent("radius_percent", self.radius_percent)?;
        check_percent("intensity_percent", self.intensity_percent)?;
        Ok(())
    }

    /// Convert percentages to absolute mask parameters
    ///
    /// `radius = (width / 2) * radius% / 100`,
    /// `intensity = (100 - intensity%) / 100`
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    ///
    /// # Returns
    /// Absolute parameters, or `InvalidParameter` if a percentage is outside
    /// `[0, 100]`
    pub fn mask_params(&self, width: usize) -> Result<MaskParams, FilterError> {
        self.validate()?;
        Ok(MaskParams {
            radius: (width as f64 / 2.0) * (self.radius_percent / 100.0),
            intensity: (100.0 - self.intensity_percent) / 100.0,
            direction: self.direction,
        })
    }
}

fn check_percent(name: &'static str, value: f64) -> Result<(), FilterError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(FilterError::parameter(name, value, "must be within [0, 100]"));
    }
    Ok(())
}

/// Fixed-parameter filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterPreset {
    /// High-pass, radius `width / 20`, gain 0.5
    Sharpen,

    /// Low-pass, radius `(width / 2) / 15`, gain 0.3
    Blur,

    /// High-pass, radius 30, gain ≈ 0
    EdgeDetect,

    /// Low-pass, radius 50, gain ≈ 0
    Denoise,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 4] = [
        FilterPreset::Sharpen,
        FilterPreset::Blur,
        FilterPreset::EdgeDetect,
        FilterPreset::Denoise,
    ];

    /// Mask parameters for an image of the given width
    pub fn mask_params(&self, width: usize) -> MaskParams {
        match self {
            FilterPreset::Sharpen => MaskParams {
                radius: width as f64 / 20.0,
                intensity: 0.5,
                direction: PassDirection::HighPass,
            },
            // Integer centre column, as the mask centre uses
            FilterPreset::Blur => MaskParams {
                radius: (width / 2) as f64 / 15.0,
                intensity: 0.3,
                direction: PassDirection::LowPass,
            },
            FilterPreset::EdgeDetect => MaskParams {
                radius: 30.0,
                intensity: MIN_ATTENUATION,
                direction: PassDirection::HighPass,
            },
            FilterPreset::Denoise => MaskParams {
                radius: 50.0,
                intensity: MIN_ATTENUATION,
                direction: PassDirection::LowPass,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterPreset::Sharpen => "sharpen",
            FilterPreset::Blur => "blur",
            FilterPreset::EdgeDetect => "edge-detect",
            FilterPreset::Denoise => "denoise",
        }
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterPreset {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sharpen" | "sharpening" => Ok(FilterPreset::Sharpen),
            "blur" | "blurring" => Ok(FilterPreset::Blur),
            "edge-detect" | "edge_detect" | "edge" | "edge-detection" => Ok(FilterPreset::EdgeDetect),
            "denoise" | "noise" | "noise-filtering" => Ok(FilterPreset::Denoise),
            _ => Err(FilterError::UnknownName {
                kind: "filter preset",
                name: s.to_string(),
            }),
        }
    }
}

/// Filter `image` with percentage-based settings
pub fn custom_filter(
    image: &mut ChannelImage,
    config: &FilterConfig,
) -> Result<FilteredResult, FilterError> {
    let params = config.mask_params(image.width())?;
    info!(
        "custom filter: radius {}% -> {:.2}, dampening {}% -> gain {:.4}, {}",
        config.radius_percent, params.radius, config.intensity_percent, params.intensity, params.direction
    );

    let mask = params.mask(image.height(), image.width())?;
    engine::apply(image, &config.mode, &mask)
}

/// Filter `image` with one of the fixed presets
pub fn apply_preset(
    image: &mut ChannelImage,
    preset: FilterPreset,
    mode: &ImageMode,
) -> Result<FilteredResult, FilterError> {
    info!("preset {} on {:?}", preset, mode);

    let mask = preset
        .mask_params(image.width())
        .mask(image.height(), image.width())?;
    engine::apply(image, mode, &mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ChannelSlot, PixelBuffer};
    use ndarray::{Array2, Array3, ArrayView2};

    fn textured_rgb(height: usize, width: usize) -> ChannelImage {
        let data = Array3::from_shape_fn((height, width, 3), |(r, c, ch)| {
            let x = c as f64 / width as f64;
            let y = r as f64 / height as f64;
            128.0 + 60.0 * (6.0 * x + ch as f64).sin() + 40.0 * (17.0 * y).cos()
        });
        ChannelImage::new(PixelBuffer::new(data).unwrap()).unwrap()
    }

    fn max_abs_diff(a: ArrayView2<f64>, b: ArrayView2<f64>) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }

    #[test]
    fn test_percentage_conversion() {
        let config = FilterConfig::new(ImageMode::rgb(), 50.0, 25.0, PassDirection::LowPass);
        let params = config.mask_params(200).unwrap();
        assert!((params.radius - 50.0).abs() < 1e-12);
        assert!((params.intensity - 0.75).abs() < 1e-12);
        assert_eq!(params.direction, PassDirection::LowPass);

        let full = FilterConfig::new(ImageMode::rgb(), 100.0, 0.0, PassDirection::HighPass);
        let params = full.mask_params(64).unwrap();
        assert_eq!(params.radius, 32.0);
        assert_eq!(params.intensity, 1.0);
    }

    #[test]
    fn test_invalid_percentages() {
        for (r, i) in [(-1.0, 0.0), (100.5, 0.0), (10.0, -0.1), (10.0, 100.1), (f64::NAN, 0.0)] {
            let config = FilterConfig::new(ImageMode::Grayscale, r, i, PassDirection::HighPass);
            assert!(matches!(
                config.validate(),
                Err(FilterError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_preset_parameters() {
        let sharpen = FilterPreset::Sharpen.mask_params(200);
        assert_eq!((sharpen.radius, sharpen.intensity), (10.0, 0.5));
        assert_eq!(sharpen.direction, PassDirection::HighPass);

        let blur = FilterPreset::Blur.mask_params(301);
        assert_eq!(blur.radius, 10.0);
        assert_eq!(blur.intensity, 0.3);
        assert_eq!(blur.direction, PassDirection::LowPass);

        let edge = FilterPreset::EdgeDetect.mask_params(999);
        assert_eq!((edge.radius, edge.intensity), (30.0, MIN_ATTENUATION));

        let denoise = FilterPreset::Denoise.mask_params(1);
        assert_eq!((denoise.radius, denoise.intensity), (50.0, MIN_ATTENUATION));
        assert_eq!(denoise.direction, PassDirection::LowPass);
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in FilterPreset::ALL {
            assert_eq!(preset.to_string().parse::<FilterPreset>().unwrap(), preset);
        }
        assert_eq!("noise".parse::<FilterPreset>().unwrap(), FilterPreset::Denoise);
        assert!("emboss".parse::<FilterPreset>().is_err());
    }

    #[test]
    fn test_sharpen_flat_image_halves_dc() {
        let flat = Array2::from_elem((64, 64), 200.0);
        let mut img = ChannelImage::new(PixelBuffer::from_gray(flat).unwrap()).unwrap();
        img.apply_preset(FilterPreset::Sharpen, &ImageMode::Grayscale).unwrap();

        let out = img.filtered_plane(ChannelSlot::Grayscale).unwrap();
        assert!(out.iter().all(|&v| (v - 100.0).abs() < 1e-6));
    }

    #[test]
    fn test_defaults_on_grayscale_source() {
        let plane = Array2::from_shape_fn((8, 8), |(r, c)| ((r * 9 + c * 5) % 256) as f64);
        let mut img = ChannelImage::new(PixelBuffer::from_gray(plane).unwrap()).unwrap();

        let result = img.custom_filter(&FilterConfig::default()).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.get(ChannelSlot::Color(0)).is_some());

        for preset in FilterPreset::ALL {
            let result = img.apply_preset(preset, &ImageMode::default()).unwrap();
            assert_eq!(result.len(), 1, "{}", preset);
        }
    }

    #[test]
    fn test_zero_radius_zero_dampening_is_identity() {
        let mut img = textured_rgb(24, 32);
        let config = FilterConfig::new(ImageMode::rgb(), 0.0, 0.0, PassDirection::LowPass);
        img.custom_filter(&config).unwrap();

        for c in 0..3 {
            let diff = max_abs_diff(
                img.filtered_plane(ChannelSlot::Color(c)).unwrap(),
                img.source().channel(c).unwrap(),
            );
            assert!(diff < 1e-6, "channel {} changed by {}", c, diff);
        }
    }

    #[test]
    fn test_full_dampening_removes_masked_content() {
        // Low-pass at radius 0 with 100% dampening: only DC survives
        let mut img = textured_rgb(20, 20);
        let config = FilterConfig::new(ImageMode::Grayscale, 0.0, 100.0, PassDirection::LowPass);
        img.custom_filter(&config).unwrap();

        let gray = img.grayscale();
        let mean = gray.sum() / gray.len() as f64;
        let out = img.filtered_plane(ChannelSlot::Grayscale).unwrap();
        assert!(out.iter().all(|&v| (v - mean).abs() < 1e-4));

        // High-pass covering every bin the image uses: everything goes to ~0
        let harmonic = Array2::from_shape_fn((20, 20), |(r, c)| {
            let tau = 2.0 * std::f64::consts::PI;
            128.0 + 50.0 * (tau * 2.0 * c as f64 / 20.0).cos() + 30.0 * (tau * 3.0 * r as f64 / 20.0).cos()
        });
        let config = FilterConfig::new(ImageMode::Grayscale, 100.0, 100.0, PassDirection::HighPass);
        let mut img = ChannelImage::new(PixelBuffer::from_gray(harmonic).unwrap()).unwrap();
        img.custom_filter(&config).unwrap();
        let out = img.filtered_plane(ChannelSlot::Grayscale).unwrap();
        assert!(out.iter().all(|&v| v.abs() < 1e-3));
    }

    #[test]
    fn test_blur_reduces_variation() {
        let mut img = textured_rgb(64, 64);
        img.apply_preset(FilterPreset::Denoise, &ImageMode::rgb()).unwrap();
        // Radius 50 covers every bin of a 64x64 spectrum: unchanged
        let diff = max_abs_diff(
            img.filtered_plane(ChannelSlot::Color(0)).unwrap(),
            img.source().channel(0).unwrap(),
        );
        assert!(diff < 1e-6);

        let mut img = textured_rgb(64, 64);
        img.apply_preset(FilterPreset::Blur, &ImageMode::Grayscale).unwrap();
        let spread = |p: ArrayView2<f64>| {
            let mean = p.sum() / p.len() as f64;
            p.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        };
        let before = spread(img.grayscale());
        let after = spread(img.filtered_plane(ChannelSlot::Grayscale).unwrap());
        assert!(after < before);
    }

    #[test]
    fn test_edge_detect_removes_mean() {
        let mut img = textured_rgb(48, 48);
        img.apply_preset(FilterPreset::EdgeDetect, &ImageMode::Grayscale).unwrap();
        let out = img.filtered_plane(ChannelSlot::Grayscale).unwrap();
        let mean = out.sum() / out.len() as f64;
        assert!(mean.abs() < 1e-3);

        let mag = img.filtered_magnitude(ChannelSlot::Grayscale).unwrap();
        assert!(mag.iter().all(|v| v.is_finite()));
    }
}

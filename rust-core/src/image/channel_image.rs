//! Per-image aggregate of pixels, spectra and filtered results

use log::{debug, info};
use ndarray::{Array2, ArrayView2};

use super::buffer::PixelBuffer;
use crate::error::FilterError;
use crate::filters::engine::{self, FilteredResult, ImageMode};
use crate::filters::mask::Mask;
use crate::filters::presets::{self, FilterConfig, FilterPreset};
use crate::parallel::map_channels;
use crate::spectrum::{magnitude_spectrum, FftEngine2d, Spectrum};

/// Addresses one plane of a [`ChannelImage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelSlot {
    /// Colour channel by index (0 = R, 1 = G, 2 = B)
    Color(usize),
    Grayscale,
}

/// One loaded image with everything derived from it
///
/// Spectra for every colour channel and for the grayscale plane are computed
/// once at construction. Filtering reads them and writes only the filtered
/// slots; a failed filter call leaves every slot as it was.
pub struct ChannelImage {
    engine: FftEngine2d,

    source: PixelBuffer,
    grayscale: Array2<f64>,

    spectra: Vec<Spectrum>,
    gray_spectrum: Spectrum,

    magnitudes: Vec<Array2<f64>>,
    gray_magnitude: Array2<f64>,

    filtered: PixelBuffer,
    filtered_grayscale: Array2<f64>,
    filtered_magnitudes: Vec<Array2<f64>>,
    filtered_gray_magnitude: Array2<f64>,
}

impl ChannelImage {
    /// Build from a decoded buffer, deriving grayscale from it
    pub fn new(source: PixelBuffer) -> Result<Self, FilterError> {
        let grayscale = source.luma();
        Self::with_grayscale(source, grayscale)
    }

    /// Build from a decoded buffer plus a separately decoded grayscale plane
    ///
    /// # Arguments
    /// * `source` - Colour or single-channel pixels
    /// * `grayscale` - Grayscale plane with the same height and width
    ///
    /// # Returns
    /// The image with every spectrum and magnitude computed, and filtered
    /// slots equal to the source
    pub fn with_grayscale(source: PixelBuffer, grayscale: Array2<f64>) -> Result<Self, FilterError> {
        let (height, width) = source.dim();
        if grayscale.dim() != (height, width) {
            return Err(FilterError::dimension("grayscale plane", (height, width), grayscale.dim()));
        }

        let engine = FftEngine2d::new(height, width)?;

        let mut planes = Vec::with_capacity(source.channels() + 1);
        for c in 0..source.channels() {
            planes.push(source.channel(c)?.to_owned());
        }
        planes.push(grayscale.clone());

        let mut spectra = map_channels(planes, |plane| engine.forward(plane.view()))
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        let gray_spectrum = spectra.pop().ok_or(FilterError::EmptyBuffer)?;

        let magnitudes: Vec<Array2<f64>> = spectra.iter().map(magnitude_spectrum).collect();
        let gray_magnitude = magnitude_spectrum(&gray_spectrum);

        debug!(
            "ChannelImage {}x{} with {} channel(s): spectra ready, grayscale DC {:.3}",
            height,
            width,
            source.channels(),
            gray_spectrum.dc().re
        );

        Ok(Self {
            engine,
            filtered: source.clone(),
            filtered_grayscale: grayscale.clone(),
            filtered_magnitudes: magnitudes.clone(),
            filtered_gray_magnitude: gray_magnitude.clone(),
            source,
            grayscale,
            spectra,
            gray_spectrum,
            magnitudes,
            gray_magnitude,
        })
    }

    pub fn height(&self) -> usize {
        self.source.height()
    }

    pub fn width(&self) -> usize {
        self.source.width()
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        self.source.dim()
    }

    /// Number of colour channels in the source (1 or 3)
    pub fn channels(&self) -> usize {
        self.source.channels()
    }

    pub(crate) fn engine(&self) -> &FftEngine2d {
        &self.engine
    }

    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    pub fn grayscale(&self) -> ArrayView2<'_, f64> {
        self.grayscale.view()
    }

    /// Stored (unfiltered) spectrum
    pub fn spectrum(&self, slot: ChannelSlot) -> Result<&Spectrum, FilterError> {
        match slot {
            ChannelSlot::Color(c) => self.spectra.get(c).ok_or_else(|| self.channel_error(c)),
            ChannelSlot::Grayscale => Ok(&self.gray_spectrum),
        }
    }

    /// Log-magnitude of the stored spectrum
    pub fn magnitude(&self, slot: ChannelSlot) -> Result<ArrayView2<'_, f64>, FilterError> {
        match slot {
            ChannelSlot::Color(c) => self
                .magnitudes
                .get(c)
                .map(|m| m.view())
                .ok_or_else(|| self.channel_error(c)),
            ChannelSlot::Grayscale => Ok(self.gray_magnitude.view()),
        }
    }

    /// Filtered colour image (equals the source until a filter runs)
    pub fn filtered_pixels(&self) -> &PixelBuffer {
        &self.filtered
    }

    /// Filtered samples for one plane
    pub fn filtered_plane(&self, slot: ChannelSlot) -> Result<ArrayView2<'_, f64>, FilterError> {
        match slot {
            ChannelSlot::Color(c) => self.filtered.channel(c),
            ChannelSlot::Grayscale => Ok(self.filtered_grayscale.view()),
        }
    }

    /// Log-magnitude of the last masked spectrum for one plane
    pub fn filtered_magnitude(&self, slot: ChannelSlot) -> Result<ArrayView2<'_, f64>, FilterError> {
        match slot {
            ChannelSlot::Color(c) => self
                .filtered_magnitudes
                .get(c)
                .map(|m| m.view())
                .ok_or_else(|| self.channel_error(c)),
            ChannelSlot::Grayscale => Ok(self.filtered_gray_magnitude.view()),
        }
    }

    /// Drop all filtered results, back to the source values
    pub fn reset_filtered(&mut self) {
        self.filtered = self.source.clone();
        self.filtered_grayscale = self.grayscale.clone();
        self.filtered_magnitudes = self.magnitudes.clone();
        self.filtered_gray_magnitude = self.gray_magnitude.clone();
    }

    /// Write a result into the filtered slots it covers
    ///
    /// Everything is checked before the first write.
    pub fn store_filtered(&mut self, result: &FilteredResult) -> Result<(), FilterError> {
        let dim = self.dim();
        for channel in result.iter() {
            if let ChannelSlot::Color(c) = channel.slot {
                if c >= self.channels() {
                    return Err(self.channel_error(c));
                }
            }
            if channel.pixels.dim() != dim {
                return Err(FilterError::dimension("filtered plane", dim, channel.pixels.dim()));
            }
            if channel.magnitude.dim() != dim {
                return Err(FilterError::dimension("filtered magnitude", dim, channel.magnitude.dim()));
            }
        }

        for channel in result.iter() {
            match channel.slot {
                ChannelSlot::Color(c) => {
                    self.filtered.set_channel(c, channel.pixels.view())?;
                    self.filtered_magnitudes[c] = channel.magnitude.clone();
                }
                ChannelSlot::Grayscale => {
                    self.filtered_grayscale = channel.pixels.clone();
                    self.filtered_gray_magnitude = channel.magnitude.clone();
                }
            }
        }
        Ok(())
    }

    /// Mask the selected planes and store the reconstruction
    pub fn apply_mask(&mut self, mode: &ImageMode, mask: &Mask) -> Result<FilteredResult, FilterError> {
        info!("{} mask on {:?}", mask.direction(), mode);
        engine::apply(self, mode, mask)
    }

    /// Percentage-driven filter, see [`presets::custom_filter`]
    pub fn custom_filter(&mut self, config: &FilterConfig) -> Result<FilteredResult, FilterError> {
        presets::custom_filter(self, config)
    }

    /// Named preset, see [`FilterPreset`]
    pub fn apply_preset(&mut self, preset: FilterPreset, mode: &ImageMode) -> Result<FilteredResult, FilterError> {
        presets::apply_preset(self, preset, mode)
    }

    fn channel_error(&self, index: usize) -> FilterError {
        FilterError::InvalidChannel {
            index,
            channels: self.channels(),
        }
    }
}

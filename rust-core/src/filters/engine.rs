//! Mask application and reconstruction
//!
//! For each selected plane: stored spectrum × mask → log-magnitude and
//! inverse transform. The engine keeps no state; results are handed back to
//! the [`ChannelImage`] that owns the spectra.

use std::collections::BTreeSet;

use log::debug;
use ndarray::Array2;

use super::mask::Mask;
use crate::error::FilterError;
use crate::image::{ChannelImage, ChannelSlot};
use crate::parallel::map_channels;
use crate::spectrum::magnitude_spectrum;

/// Which planes a filter operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageMode {
    /// Every colour channel the image has (1 or 3)
    AllColor,

    /// Explicit colour channel indices; an empty set filters nothing
    Color(BTreeSet<usize>),

    /// The grayscale representation
    Grayscale,
}

impl ImageMode {
    /// All three colour channels
    pub fn rgb() -> Self {
        ImageMode::Color([0, 1, 2].into_iter().collect())
    }

    pub fn color<I: IntoIterator<Item = usize>>(channels: I) -> Self {
        ImageMode::Color(channels.into_iter().collect())
    }

    /// Legacy channel list where an empty list means grayscale
    pub fn from_channel_list(channels: &[usize]) -> Self {
        if channels.is_empty() {
            ImageMode::Grayscale
        } else {
            Self::color(channels.iter().copied())
        }
    }

    /// Resolve to concrete slots, checking indices against `channel_count`
    pub fn slots(&self, channel_count: usize) -> Result<Vec<ChannelSlot>, FilterError> {
        match self {
            ImageMode::Grayscale => Ok(vec![ChannelSlot::Grayscale]),
            ImageMode::AllColor => Ok((0..channel_count).map(ChannelSlot::Color).collect()),
            ImageMode::Color(set) => set
                .iter()
                .map(|&index| {
                    if index < channel_count {
                        Ok(ChannelSlot::Color(index))
                    } else {
                        Err(FilterError::InvalidChannel {
                            index,
                            channels: channel_count,
                        })
                    }
                })
                .collect(),
        }
    }
}

impl Default for ImageMode {
    fn default() -> Self {
        ImageMode::AllColor
    }
}

/// Output for one filtered plane
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredChannel {
    pub slot: ChannelSlot,

    /// Reconstructed samples, unclamped
    pub pixels: Array2<f64>,

    /// Log-magnitude of the masked spectrum
    pub magnitude: Array2<f64>,
}

/// Everything one filter invocation produced
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredResult {
    channels: Vec<FilteredChannel>,
}

impl FilteredResult {
    pub fn new(channels: Vec<FilteredChannel>) -> Self {
        Self { channels }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilteredChannel> {
        self.channels.iter()
    }

    pub fn get(&self, slot: ChannelSlot) -> Option<&FilteredChannel> {
        self.channels.iter().find(|c| c.slot == slot)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Compute masked reconstructions without touching `image`
pub fn filter_channels(
    image: &ChannelImage,
    mode: &ImageMode,
    mask: &Mask,
) -> Result<FilteredResult, FilterError> {
    if mask.dim() != image.dim() {
        return Err(FilterError::dimension("mask", image.dim(), mask.dim()));
    }
    let slots = mode.slots(image.channels())?;

    let channels = map_channels(slots, |slot| -> Result<FilteredChannel, FilterError> {
        let masked = image.spectrum(slot)?.attenuate(mask.values())?;
        let magnitude = magnitude_spectrum(&masked);
        let pixels = image.engine().inverse(&masked)?;
        Ok(FilteredChannel {
            slot,
            pixels,
            magnitude,
        })
    })
    .into_iter()
    .collect::<Result<Vec<_>, _>>()?;

    Ok(FilteredResult::new(channels))
}

/// Filter the selected planes and store them in `image`
///
/// Unselected planes keep their previous filtered values. On error nothing
/// is written.
pub fn apply(
    image: &mut ChannelImage,
    mode: &ImageMode,
    mask: &Mask,
) -> Result<FilteredResult, FilterError> {
    let result = filter_channels(image, mode, mask)?;
    image.store_filtered(&result)?;

    debug!(
        "{} filter (radius {:.2}, intensity {:e}) applied to {:?}",
        mask.direction(),
        mask.radius(),
        mask.intensity(),
        mode
    );
    Ok(result)
}

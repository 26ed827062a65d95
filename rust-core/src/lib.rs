//! Spectral Image - Frequency-Domain Image Filtering Core
//!
//! Per-channel 2D FFT, circular high/low-pass masks, log-magnitude spectra
//! and reconstruction, with optional Python bindings.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![allow(non_local_definitions)]

pub mod error;
pub mod filters;
pub mod image;
pub mod parallel;
pub mod spectrum;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::FilterError;
pub use filters::{FilterConfig, FilterPreset, ImageMode, Mask, PassDirection};
pub use image::{ChannelImage, ChannelSlot, PixelBuffer};
pub use spectrum::{FftEngine2d, Spectrum};

//! Frequency-domain filters: masks, the filter engine and presets

pub mod mask;
pub mod engine;
pub mod presets;

pub use mask::{generate_mask, Mask, PassDirection, MIN_ATTENUATION};
pub use engine::{apply, filter_channels, FilteredChannel, FilteredResult, ImageMode};
pub use presets::{apply_preset, custom_filter, FilterConfig, FilterPreset, MaskParams};

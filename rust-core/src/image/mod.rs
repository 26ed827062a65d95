//! Image containers: decoded pixels and the per-image spectral state

pub mod buffer;
pub mod channel_image;

pub use buffer::PixelBuffer;
pub use channel_image::{ChannelImage, ChannelSlot};

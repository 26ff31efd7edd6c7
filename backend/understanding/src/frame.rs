//! Turning uploaded bytes into a [`Frame`] an engine can consume.

use textlens_core::{ChannelOrder, Frame};

use crate::error::OcrError;

/// Decode raster bytes (format sniffed from the content), flatten to
/// 8-bit RGB and lay the channels out in `order`.
///
/// Alpha is dropped, greyscale and palette images are expanded to three
/// channels, 16-bit images are narrowed.
pub fn decode_frame(bytes: &[u8], order: ChannelOrder) -> Result<Frame, OcrError> {
    let rgb = image::load_from_memory(bytes)?.into_rgb8();
    let (width, height) = rgb.dimensions();
    let frame = Frame::new(width, height, ChannelOrder::Rgb, rgb.into_raw())?;
    Ok(frame.into_order(order))
}

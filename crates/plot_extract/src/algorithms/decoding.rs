use image::RgbImage;
use crate::error::Result;

/// Decode raw encoded bytes into an RGB pixel matrix.
///
/// The format is guessed from the content. Truncated or unsupported data
/// fails with [`PlotError::Decode`](crate::PlotError::Decode).
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes)?;
    Ok(image.to_rgb8())
}

use image::{GrayImage, RgbImage};
use crate::{error::Result, traits::ImagePreprocessor};

/// Sigma a 5x5 Gaussian kernel implies when no explicit deviation is given
pub const SMOOTHING_SIGMA: f32 = 1.1;
pub const CANNY_LOW_THRESHOLD: f32 = 50.0;
pub const CANNY_HIGH_THRESHOLD: f32 = 150.0;

/// Single-channel luminance of the decoded sheet
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    image::imageops::grayscale(image)
}

/// Gaussian blur preprocessor for scan noise
#[derive(Debug, Clone)]
pub struct GaussianBlurPreprocessor {
    pub sigma: f32,
}

impl Default for GaussianBlurPreprocessor {
    fn default() -> Self {
        Self { sigma: SMOOTHING_SIGMA }
    }
}

impl ImagePreprocessor for GaussianBlurPreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::filter::gaussian_blur_f32(image, self.sigma))
    }
}

/// Canny edge detector producing a 0/255 edge map
#[derive(Debug, Clone)]
pub struct CannyEdgePreprocessor {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl Default for CannyEdgePreprocessor {
    fn default() -> Self {
        Self {
            low_threshold: CANNY_LOW_THRESHOLD,
            high_threshold: CANNY_HIGH_THRESHOLD,
        }
    }
}

impl ImagePreprocessor for CannyEdgePreprocessor {
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage> {
        Ok(imageproc::edges::canny(image, self.low_threshold, self.high_threshold))
    }
}

/// The fixed smoothing + edge chain every run uses unless a caller swaps it out
pub fn default_preprocessors() -> Vec<Box<dyn ImagePreprocessor>> {
    vec![
        Box::new(GaussianBlurPreprocessor::default()),
        Box::new(CannyEdgePreprocessor::default()),
    ]
}

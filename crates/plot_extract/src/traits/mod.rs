use image::{GrayImage, RgbImage};
use crate::{error::Result, types::{Contour, Polygon}};

/// Trait for grayscale image preprocessing steps (blur, edge detection)
pub trait ImagePreprocessor: Send + Sync {
    /// Transform the input image; the last step must yield a binary edge map
    fn preprocess(&self, image: &GrayImage) -> Result<GrayImage>;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Extract closed boundary curves from a binary edge map
    fn extract_contours(&self, edges: &GrayImage) -> Result<Vec<Contour>>;
}

/// Trait for reducing a dense contour to a low-vertex polygon
pub trait PolygonSimplifier: Send + Sync {
    /// Simplify one contour. Never rejects; degenerate input yields a degenerate polygon.
    fn simplify(&self, contour: &Contour) -> Polygon;
}

/// Trait for recognizing printed text inside a cropped region
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text of a region laid out as a single uniform block
    fn recognize(&self, region: &RgbImage) -> Result<String>;
}

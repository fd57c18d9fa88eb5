use image::RgbImage;
use tracing::{debug, warn};
use crate::{
    error::Result,
    traits::TextRecognizer,
    types::{BoundingBox, PlotCandidate},
};

/// Tesseract page segmentation mode: assume a single uniform block of text
pub const SINGLE_BLOCK_PAGE_SEG_MODE: u32 = 6;

/// Recognizer that never reads anything; every plot gets empty text
#[derive(Debug, Clone, Default)]
pub struct NullRecognizer;

impl TextRecognizer for NullRecognizer {
    fn recognize(&self, _region: &RgbImage) -> Result<String> {
        Ok(String::new())
    }
}

/// Copy the part of `image` covered by `bbox`, clamped to the image bounds.
///
/// Returns `None` when nothing of the box lies inside the image.
pub fn crop_region(image: &RgbImage, bbox: &BoundingBox) -> Option<RgbImage> {
    let (width, height) = image.dimensions();
    let x0 = bbox.x.max(0) as u32;
    let y0 = bbox.y.max(0) as u32;
    let x1 = (bbox.x.saturating_add(bbox.width).max(0) as u32).min(width);
    let y1 = (bbox.y.saturating_add(bbox.height).max(0) as u32).min(height);

    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    Some(image::imageops::crop_imm(image, x0, y0, x1 - x0, y1 - y0).to_image())
}

/// Read the printed text inside one candidate's bounding box.
///
/// A failed or empty recognition yields an empty string; it never aborts
/// the batch.
pub fn extract_text(
    recognizer: &dyn TextRecognizer,
    image: &RgbImage,
    candidate: &PlotCandidate,
) -> String {
    let bbox = candidate.polygon.bounding_box();
    let Some(region) = crop_region(image, &bbox) else {
        warn!(plot = %candidate.label(), ?bbox, "Candidate lies outside the image, skipping OCR");
        return String::new();
    };

    match recognizer.recognize(&region) {
        Ok(text) => {
            let text = text.trim().to_string();
            debug!(plot = %candidate.label(), chars = text.len(), "Recognized region text");
            text
        }
        Err(e) => {
            warn!(plot = %candidate.label(), error = %e, "OCR failed, keeping plot with empty text");
            String::new()
        }
    }
}

#[cfg(feature = "tesseract")]
pub use tesseract::TesseractRecognizer;

#[cfg(feature = "tesseract")]
mod tesseract {
    use std::path::PathBuf;
    use image::RgbImage;
    use leptess::{LepTess, Variable};
    use super::SINGLE_BLOCK_PAGE_SEG_MODE;
    use crate::{error::{PlotError, Result}, traits::TextRecognizer};

    /// Tesseract-backed recognizer; a fresh engine is created per region
    #[derive(Debug, Clone)]
    pub struct TesseractRecognizer {
        language: String,
        tessdata_dir: Option<PathBuf>,
    }

    impl TesseractRecognizer {
        /// Create a recognizer, checking that the language data can be loaded
        pub fn new(language: impl Into<String>, tessdata_dir: Option<PathBuf>) -> Result<Self> {
            let recognizer = Self {
                language: language.into(),
                tessdata_dir,
            };
            recognizer.engine()?;
            Ok(recognizer)
        }

        fn engine(&self) -> Result<LepTess> {
            let data_path = self.tessdata_dir.as_deref().and_then(|p| p.to_str());
            LepTess::new(data_path, &self.language).map_err(|e| {
                PlotError::Ocr(format!(
                    "Failed to initialize Tesseract with language '{}': {}",
                    self.language, e
                ))
            })
        }
    }

    impl TextRecognizer for TesseractRecognizer {
        fn recognize(&self, region: &RgbImage) -> Result<String> {
            let mut lt = self.engine()?;

            lt.set_variable(
                Variable::TesseditPagesegMode,
                &SINGLE_BLOCK_PAGE_SEG_MODE.to_string(),
            )
            .map_err(|e| PlotError::Ocr(format!("Failed to set PSM: {}", e)))?;

            // leptess takes encoded image data
            let mut png_buf = std::io::Cursor::new(Vec::new());
            region
                .write_to(&mut png_buf, image::ImageFormat::Png)
                .map_err(|e| PlotError::Ocr(format!("Failed to encode region to PNG: {}", e)))?;

            lt.set_image_from_mem(png_buf.get_ref())
                .map_err(|e| PlotError::Ocr(format!("Failed to set image from memory: {}", e)))?;

            lt.get_utf8_text()
                .map_err(|e| PlotError::Ocr(format!("Recognized text is not UTF-8: {}", e)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::PlotError, types::Polygon};
    use image::Rgb;

    struct FixedRecognizer(&'static str);

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&self, _region: &RgbImage) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingRecognizer;

    impl TextRecognizer for FailingRecognizer {
        fn recognize(&self, _region: &RgbImage) -> Result<String> {
            Err(PlotError::Ocr("engine crashed".to_string()))
        }
    }

    fn candidate(x: i32, y: i32, w: i32, h: i32) -> PlotCandidate {
        PlotCandidate {
            rank: 0,
            polygon: Polygon::new(vec![[x, y], [x + w - 1, y], [x + w - 1, y + h - 1], [x, y + h - 1]]),
        }
    }

    #[test]
    fn test_crop_matches_bounding_box() {
        let mut image = RgbImage::new(100, 100);
        image.put_pixel(20, 30, Rgb([9, 9, 9]));

        let region = crop_region(&image, &BoundingBox { x: 20, y: 30, width: 50, height: 40 }).unwrap();
        assert_eq!(region.dimensions(), (50, 40));
        assert_eq!(region.get_pixel(0, 0), &Rgb([9, 9, 9]));
    }

    #[test]
    fn test_crop_is_clamped_to_image() {
        let image = RgbImage::new(100, 100);
        let region = crop_region(&image, &BoundingBox { x: 80, y: -10, width: 60, height: 60 }).unwrap();
        assert_eq!(region.dimensions(), (20, 50));

        assert!(crop_region(&image, &BoundingBox { x: 150, y: 0, width: 60, height: 60 }).is_none());
    }

    #[test]
    fn test_text_is_trimmed() {
        let image = RgbImage::new(200, 200);
        let text = extract_text(&FixedRecognizer("  Plot 12\n\n"), &image, &candidate(10, 10, 60, 60));
        assert_eq!(text, "Plot 12");
    }

    #[test]
    fn test_failure_yields_empty_text() {
        let image = RgbImage::new(200, 200);
        let text = extract_text(&FailingRecognizer, &image, &candidate(10, 10, 60, 60));
        assert_eq!(text, "");
    }

    #[test]
    fn test_null_recognizer_is_empty() {
        let image = RgbImage::new(200, 200);
        assert_eq!(extract_text(&NullRecognizer, &image, &candidate(0, 0, 60, 60)), "");
    }
}

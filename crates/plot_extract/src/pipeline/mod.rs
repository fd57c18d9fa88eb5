pub mod builder;

use image::RgbImage;
use tracing::{debug, info};
use crate::{
    algorithms::{decode_image, extract_text, select_candidates, to_grayscale},
    error::Result,
    traits::{ContourExtractor, ImagePreprocessor, PolygonSimplifier, TextRecognizer},
    types::{CandidateOrdering, ExtractionResult, PlotBoundaryRecord, PlotCandidate},
};

/// Plot boundary extraction: decode, edges, contours, polygons, filter, OCR
pub struct Pipeline {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Box<dyn ContourExtractor>,
    simplifier: Box<dyn PolygonSimplifier>,
    recognizer: Box<dyn TextRecognizer>,
    ordering: CandidateOrdering,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(
        preprocessors: Vec<Box<dyn ImagePreprocessor>>,
        contour_extractor: Box<dyn ContourExtractor>,
        simplifier: Box<dyn PolygonSimplifier>,
        recognizer: Box<dyn TextRecognizer>,
        ordering: CandidateOrdering,
    ) -> Self {
        Self {
            preprocessors,
            contour_extractor,
            simplifier,
            recognizer,
            ordering,
        }
    }

    /// Decode encoded image bytes and extract plots from them.
    ///
    /// Only a decode failure makes this return an error.
    pub fn run(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        let image = decode_image(bytes)?;
        self.process(&image)
    }

    /// Extract plots from an already decoded sheet
    pub fn process(&self, image: &RgbImage) -> Result<ExtractionResult> {
        let candidates = self.detect_candidates(image)?;

        let records: Vec<PlotBoundaryRecord> = candidates
            .iter()
            .map(|candidate| PlotBoundaryRecord {
                label: candidate.label(),
                raw_text: extract_text(self.recognizer.as_ref(), image, candidate),
                polygon_coordinates: candidate.polygon.vertices.clone(),
            })
            .collect();

        info!(
            plots = records.len(),
            width = image.width(),
            height = image.height(),
            "Plot extraction finished"
        );

        Ok(ExtractionResult {
            records,
            image_width: image.width(),
            image_height: image.height(),
        })
    }

    /// Geometry-only part of the run: everything up to and including the filter
    pub fn detect_candidates(&self, image: &RgbImage) -> Result<Vec<PlotCandidate>> {
        // Step 1: Grayscale, then each preprocessor in sequence
        let mut edges = to_grayscale(image);
        for preprocessor in &self.preprocessors {
            edges = preprocessor.preprocess(&edges)?;
        }

        // Step 2: External contours
        let contours = self.contour_extractor.extract_contours(&edges)?;
        debug!(contours = contours.len(), "Extracted contours");

        // Step 3: Simplify every contour; rejection is left to the filter
        let polygons = contours
            .iter()
            .map(|contour| self.simplifier.simplify(contour))
            .collect();

        // Step 4: Geometric acceptance tests
        let candidates = select_candidates(polygons, self.ordering);
        debug!(candidates = candidates.len(), "Filtered plot candidates");

        Ok(candidates)
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: {} preprocessors, 1 contour extractor, 1 simplifier, 1 recognizer, {} ordering",
            self.preprocessors.len(),
            self.ordering
        )
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        builder::PipelineBuilder::new().build()
    }
}

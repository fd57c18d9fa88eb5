use crate::{
    algorithms::{default_preprocessors, ExternalContourExtractor, NullRecognizer, PerimeterScaledSimplifier},
    pipeline::Pipeline,
    traits::{ContourExtractor, ImagePreprocessor, PolygonSimplifier, TextRecognizer},
    types::CandidateOrdering,
};

/// Builder for creating extraction pipelines with a fluent API
pub struct PipelineBuilder {
    preprocessors: Vec<Box<dyn ImagePreprocessor>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    simplifier: Option<Box<dyn PolygonSimplifier>>,
    recognizer: Option<Box<dyn TextRecognizer>>,
    ordering: CandidateOrdering,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
            contour_extractor: None,
            simplifier: None,
            recognizer: None,
            ordering: CandidateOrdering::default(),
        }
    }

    /// Add a preprocessor. Adding any replaces the default blur + Canny chain.
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: ImagePreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Set the polygon simplifier (replaces any existing one)
    pub fn set_simplifier<S>(mut self, simplifier: S) -> Self
    where
        S: PolygonSimplifier + 'static,
    {
        self.simplifier = Some(Box::new(simplifier));
        self
    }

    /// Set the text recognizer (replaces any existing one)
    pub fn set_recognizer<R>(mut self, recognizer: R) -> Self
    where
        R: TextRecognizer + 'static,
    {
        self.recognizer = Some(Box::new(recognizer));
        self
    }

    /// Choose how accepted candidates are ranked and labelled
    pub fn with_ordering(mut self, ordering: CandidateOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Read plot labels with Tesseract
    #[cfg(feature = "tesseract")]
    pub fn with_tesseract(
        self,
        language: &str,
        tessdata_dir: Option<std::path::PathBuf>,
    ) -> crate::error::Result<Self> {
        let recognizer = crate::algorithms::TesseractRecognizer::new(language, tessdata_dir)?;
        Ok(self.set_recognizer(recognizer))
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let preprocessors = if self.preprocessors.is_empty() {
            default_preprocessors()
        } else {
            self.preprocessors
        };

        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ExternalContourExtractor));

        let simplifier = self.simplifier
            .unwrap_or_else(|| Box::new(PerimeterScaledSimplifier::default()));

        let recognizer = self.recognizer
            .unwrap_or_else(|| Box::new(NullRecognizer));

        Pipeline::new(
            preprocessors,
            contour_extractor,
            simplifier,
            recognizer,
            self.ordering,
        )
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::GaussianBlurPreprocessor;

    #[test]
    fn test_default_chain_has_blur_and_canny() {
        let pipeline = PipelineBuilder::new().build();
        assert!(pipeline.info().starts_with("Pipeline: 2 preprocessors"));
    }

    #[test]
    fn test_custom_preprocessors_replace_defaults() {
        let pipeline = PipelineBuilder::new()
            .add_preprocessor(GaussianBlurPreprocessor { sigma: 2.0 })
            .build();
        assert!(pipeline.info().starts_with("Pipeline: 1 preprocessors"));
    }
}

use std::{
    path::Path,
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use tracing::info;
use crate::{
    error::Result,
    pipeline::Pipeline,
    types::{ExtractionResult, PlotBoundaryRecord},
};

/// Single-slot holder of the most recent extraction result.
///
/// Starts empty, is replaced only by a successful [`run`](Self::run) and
/// keeps no history. Readers get an `Arc` to a complete result, so they see
/// either the previous run or the new one, never a mix.
pub struct ExtractionSession {
    pipeline: Pipeline,
    current: RwLock<Option<Arc<ExtractionResult>>>,
    /// Serializes runs so replacements happen one at a time
    run_lock: Mutex<()>,
}

impl ExtractionSession {
    pub fn new() -> Self {
        Self::with_pipeline(Pipeline::default())
    }

    /// Create a session around a custom pipeline
    pub fn with_pipeline(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            current: RwLock::new(None),
            run_lock: Mutex::new(()),
        }
    }

    /// Extract plots from encoded image bytes and make them the current result.
    ///
    /// On failure the stored result is left untouched.
    pub fn run(&self, bytes: &[u8]) -> Result<Arc<ExtractionResult>> {
        let _guard = self.run_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let result = Arc::new(self.pipeline.run(bytes)?);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&result));

        info!(plots = result.len(), "Replaced current extraction result");
        Ok(result)
    }

    /// Load an image file and [`run`](Self::run) it
    pub fn run_file<P: AsRef<Path>>(&self, path: P) -> Result<Arc<ExtractionResult>> {
        let bytes = std::fs::read(path)?;
        self.run(&bytes)
    }

    /// The stored result, if any run has succeeded
    pub fn current(&self) -> Option<Arc<ExtractionResult>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records of the stored result, empty before the first successful run
    pub fn records(&self) -> Vec<PlotBoundaryRecord> {
        self.current()
            .map(|result| result.records.clone())
            .unwrap_or_default()
    }
}

impl Default for ExtractionSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};
    use std::{io::Cursor, thread};

    fn layout_png(plots: &[(i32, i32)]) -> Vec<u8> {
        let mut image = RgbImage::new(500, 300);
        for &(x, y) in plots {
            draw_filled_rect_mut(&mut image, Rect::at(x, y).of_size(90, 90), Rgb([255, 255, 255]));
        }
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_starts_empty() {
        let session = ExtractionSession::new();
        assert!(session.current().is_none());
        assert!(session.records().is_empty());
    }

    #[test]
    fn test_successful_run_replaces_result() {
        let session = ExtractionSession::new();

        let first = session.run(&layout_png(&[(20, 20), (200, 20)])).unwrap();
        assert_eq!(first.len(), 2);

        let second = session.run(&layout_png(&[(20, 150)])).unwrap();
        assert_eq!(second.len(), 1);
        assert!(Arc::ptr_eq(&session.current().unwrap(), &second));
    }

    #[test]
    fn test_failed_run_keeps_previous_result() {
        let session = ExtractionSession::new();
        let stored = session.run(&layout_png(&[(20, 20)])).unwrap();

        let err = session.run(b"truncated").unwrap_err();
        assert!(err.is_decode());
        assert!(Arc::ptr_eq(&session.current().unwrap(), &stored));
        assert_eq!(session.records(), stored.records);
    }

    #[test]
    fn test_black_image_stores_empty_result() {
        let session = ExtractionSession::new();
        let result = session.run(&layout_png(&[])).unwrap();
        assert!(result.is_empty());
        assert!(session.current().is_some());
        assert!(session.records().is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let session = ExtractionSession::new();
        let err = session.run_file("/nonexistent/layout.png").unwrap_err();
        assert!(!err.is_decode());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_readers_see_whole_results_during_runs() {
        let session = Arc::new(ExtractionSession::new());
        let one = layout_png(&[(20, 20)]);
        let three = layout_png(&[(20, 20), (200, 20), (20, 150)]);

        let writer = {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                for i in 0..6 {
                    let bytes = if i % 2 == 0 { &one } else { &three };
                    session.run(bytes).unwrap();
                }
            })
        };

        let reader = {
            let session = Arc::clone(&session);
            thread::spawn(move || {
                for _ in 0..200 {
                    let len = session.records().len();
                    assert!(len == 0 || len == 1 || len == 3, "partial result of {len} plots");
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();
        assert_eq!(session.records().len(), 3);
    }
}

//! # Plot Boundary Extraction Library
//!
//! Detects plot outlines on scanned or photographed layout sheets and reads
//! the printed label inside each one.
//!
//! ## Stages
//!
//! 1. **Decode** the uploaded bytes into an RGB image
//! 2. **Preprocess**: grayscale, Gaussian blur, Canny edge map (fixed thresholds)
//! 3. **Extract** outermost contours only
//! 4. **Simplify** each contour with Douglas-Peucker, tolerance = 2% of its perimeter
//! 5. **Filter** by area, vertex count, aspect ratio and minimum size
//! 6. **Recognize** the text in each survivor's bounding box; a failed region
//!    keeps its polygon with empty text
//!
//! The most recent result lives in an [`ExtractionSession`], served over HTTP
//! ([`server`]) or MCP ([`mcp`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plot_extract::ExtractionSession;
//!
//! let session = ExtractionSession::new();
//! let result = session.run(&std::fs::read("layout.png")?)?;
//! for record in result.records() {
//!     println!("{}: {:?}", record.label, record.raw_text);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use plot_extract::{Pipeline, CandidateOrdering, algorithms::*};
//!
//! let pipeline = Pipeline::builder()
//!     .set_recognizer(NullRecognizer)
//!     .with_ordering(CandidateOrdering::Spatial)
//!     .build();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod session;
pub mod io;
pub mod typed_geojson;
pub mod server;
pub mod mcp;

// Re-exports for convenience
pub use error::{PlotError, Result};
pub use types::{
    BoundingBox, CandidateOrdering, Contour, ExtractionResult, PlotBoundaryRecord, PlotCandidate,
    Polygon,
};
pub use traits::*;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use session::ExtractionSession;

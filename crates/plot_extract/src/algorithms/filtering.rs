//! Geometric acceptance tests for plot candidates.
//!
//! The thresholds were tuned on scanned layout sheets at source resolution
//! and are fixed so repeated uploads of the same sheet give the same plots.

use strum::{Display, IntoStaticStr};
use tracing::trace;
use crate::types::{CandidateOrdering, PlotCandidate, Polygon};

/// Smallest accepted polygon area in square pixels; below this is glyphs and specks
pub const MIN_AREA: f64 = 500.0;
/// Fewer vertices than this is not a plot outline
pub const MIN_VERTICES: usize = 4;
pub const MIN_ASPECT_RATIO: f64 = 0.5;
pub const MAX_ASPECT_RATIO: f64 = 2.0;
/// Smallest accepted bounding box side in pixels
pub const MIN_DIMENSION: i32 = 50;

/// The first test a polygon failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    AreaTooSmall,
    TooFewVertices,
    AspectRatioOutOfRange,
    DimensionTooSmall,
}

/// Run the four tests in order, stopping at the first failure
pub fn evaluate(polygon: &Polygon) -> Result<(), Rejection> {
    if polygon.area() < MIN_AREA {
        return Err(Rejection::AreaTooSmall);
    }

    if polygon.vertex_count() < MIN_VERTICES {
        return Err(Rejection::TooFewVertices);
    }

    let bbox = polygon.bounding_box();
    let aspect_ratio = bbox.aspect_ratio();
    if !(MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO).contains(&aspect_ratio) {
        return Err(Rejection::AspectRatioOutOfRange);
    }

    if bbox.width < MIN_DIMENSION || bbox.height < MIN_DIMENSION {
        return Err(Rejection::DimensionTooSmall);
    }

    Ok(())
}

/// Keep the polygons that pass [`evaluate`], ranked by their position in the input
pub fn select_candidates(polygons: Vec<Polygon>, ordering: CandidateOrdering) -> Vec<PlotCandidate> {
    let mut candidates: Vec<PlotCandidate> = polygons
        .into_iter()
        .enumerate()
        .filter_map(|(rank, polygon)| match evaluate(&polygon) {
            Ok(()) => Some(PlotCandidate { rank, polygon }),
            Err(rejection) => {
                trace!(rank, %rejection, "Discarding polygon");
                None
            }
        })
        .collect();

    if ordering == CandidateOrdering::Spatial {
        candidates.sort_by_key(|candidate| {
            let bbox = candidate.polygon.bounding_box();
            (bbox.y, bbox.x)
        });
        for (rank, candidate) in candidates.iter_mut().enumerate() {
            candidate.rank = rank;
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle(x: i32, y: i32, w: i32, h: i32) -> Polygon {
        Polygon::new(vec![[x, y], [x + w - 1, y], [x + w - 1, y + h - 1], [x, y + h - 1]])
    }

    #[test]
    fn test_plot_sized_rectangle_passes() {
        assert_eq!(evaluate(&rectangle(0, 0, 200, 100)), Ok(()));
        assert_eq!(evaluate(&rectangle(0, 0, 50, 50)), Ok(()));
    }

    #[test]
    fn test_small_area_rejected_first() {
        // Also too few vertices, but area is tested first
        let speck = Polygon::new(vec![[0, 0], [9, 0], [9, 9]]);
        assert_eq!(evaluate(&speck), Err(Rejection::AreaTooSmall));
    }

    #[test]
    fn test_triangle_rejected_for_vertices() {
        let triangle = Polygon::new(vec![[0, 0], [100, 0], [50, 80]]);
        assert_eq!(evaluate(&triangle), Err(Rejection::TooFewVertices));
    }

    #[test]
    fn test_thin_strip_rejected_for_aspect_ratio() {
        assert_eq!(evaluate(&rectangle(0, 0, 400, 60)), Err(Rejection::AspectRatioOutOfRange));
        assert_eq!(evaluate(&rectangle(0, 0, 60, 400)), Err(Rejection::AspectRatioOutOfRange));
    }

    #[test]
    fn test_aspect_ratio_bounds_are_inclusive() {
        assert_eq!(evaluate(&rectangle(0, 0, 200, 100)), Ok(()));
        assert_eq!(evaluate(&rectangle(0, 0, 100, 200)), Ok(()));
        assert_eq!(evaluate(&rectangle(0, 0, 201, 100)), Err(Rejection::AspectRatioOutOfRange));
    }

    #[test]
    fn test_compact_shape_below_minimum_dimension() {
        // 40x40 box: area 1521 and square, but under 50px per side
        assert_eq!(evaluate(&rectangle(0, 0, 40, 40)), Err(Rejection::DimensionTooSmall));
    }

    #[test]
    fn test_select_keeps_discovery_rank() {
        let polygons = vec![
            rectangle(300, 300, 80, 80),
            rectangle(0, 0, 10, 10),
            rectangle(0, 0, 80, 80),
        ];
        let candidates = select_candidates(polygons, CandidateOrdering::Discovery);

        let ranks: Vec<usize> = candidates.iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![0, 2]);
        assert_eq!(candidates[0].polygon.bounding_box().x, 300);
    }

    #[test]
    fn test_select_spatial_relabels_top_left_first() {
        let polygons = vec![
            rectangle(300, 300, 80, 80),
            rectangle(200, 0, 80, 80),
            rectangle(0, 0, 80, 80),
        ];
        let candidates = select_candidates(polygons, CandidateOrdering::Spatial);

        let origins: Vec<(i32, i32)> = candidates
            .iter()
            .map(|c| {
                let bbox = c.polygon.bounding_box();
                (bbox.x, bbox.y)
            })
            .collect();
        assert_eq!(origins, vec![(0, 0), (200, 0), (300, 300)]);
        assert_eq!(candidates.iter().map(|c| c.rank).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_rejection_names() {
        assert_eq!(Rejection::AreaTooSmall.to_string(), "area_too_small");
        let name: &'static str = Rejection::DimensionTooSmall.into();
        assert_eq!(name, "dimension_too_small");
    }
}

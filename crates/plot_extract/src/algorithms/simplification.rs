use geo_types::{Coord, LineString};
use crate::{traits::PolygonSimplifier, types::{Contour, Polygon}};

/// Fraction of the contour perimeter used as the Douglas-Peucker tolerance
pub const SIMPLIFICATION_RATIO: f64 = 0.02;

/// Douglas-Peucker simplifier whose tolerance scales with contour size.
///
/// The contour is treated as a closed ring: the closing segment counts
/// towards the perimeter and the repeated closing vertex is dropped from the
/// result.
#[derive(Debug, Clone)]
pub struct PerimeterScaledSimplifier {
    pub ratio: f64,
}

impl Default for PerimeterScaledSimplifier {
    fn default() -> Self {
        Self { ratio: SIMPLIFICATION_RATIO }
    }
}

impl PerimeterScaledSimplifier {
    /// Tolerance this simplifier applies to a ring of the given perimeter
    pub fn epsilon(&self, perimeter: f64) -> f64 {
        self.ratio * perimeter
    }
}

impl PolygonSimplifier for PerimeterScaledSimplifier {
    fn simplify(&self, contour: &Contour) -> Polygon {
        use geo::{EuclideanLength, Simplify};

        if contour.len() < 3 {
            return Polygon::new(contour.clone());
        }

        let coords: Vec<Coord<f64>> = contour
            .iter()
            .map(|&[x, y]| Coord { x: x as f64, y: y as f64 })
            .collect();
        let mut ring = LineString::new(coords);
        ring.close();

        let epsilon = self.epsilon(ring.euclidean_length());
        let simplified = ring.simplify(&epsilon);

        let mut vertices: Vec<[i32; 2]> = simplified
            .coords()
            .map(|coord| [coord.x.round() as i32, coord.y.round() as i32])
            .collect();

        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        Polygon::new(vertices)
    }
}

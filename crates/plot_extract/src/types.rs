use geo_types::{Coord, LineString, Polygon as GeoPolygon};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use ts_rs::TS;

/// Closed boundary curve in pixel coordinates, as returned by a contour extractor
pub type Contour = Vec<[i32; 2]>;

/// Axis-aligned bounding box in pixels.
///
/// Width and height count pixels inclusively, so a single point has a 1x1 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    /// Width over height, or 0 when the box has no height
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            0.0
        } else {
            self.width as f64 / self.height as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<[i32; 2]>,
}

impl Polygon {
    pub fn new(vertices: Vec<[i32; 2]>) -> Self {
        Self { vertices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Convert to a geo-types polygon (ring closed implicitly)
    pub fn to_geo_polygon(&self) -> GeoPolygon<f64> {
        let coords: Vec<Coord<f64>> = self
            .vertices
            .iter()
            .map(|&[x, y]| Coord {
                x: x as f64,
                y: y as f64,
            })
            .collect();

        GeoPolygon::new(LineString::new(coords), vec![])
    }

    /// Shoelace area over the vertices
    pub fn area(&self) -> f64 {
        use geo::Area;
        self.to_geo_polygon().unsigned_area()
    }

    /// Closed perimeter, including the segment back to the first vertex
    pub fn perimeter(&self) -> f64 {
        use geo::EuclideanLength;
        self.to_geo_polygon().exterior().euclidean_length()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let Some(&[first_x, first_y]) = self.vertices.first() else {
            return BoundingBox::default();
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first_x, first_y, first_x, first_y);
        for &[x, y] in &self.vertices[1..] {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        BoundingBox {
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
        }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.bounding_box().aspect_ratio()
    }
}

/// A polygon that passed every candidate test.
///
/// `rank` is the index of the source contour in discovery order. That order
/// follows the contour scan and is not a spatial reading order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotCandidate {
    pub rank: usize,
    pub polygon: Polygon,
}

impl PlotCandidate {
    pub fn label(&self) -> String {
        format!("Plot_{}", self.rank)
    }
}

/// How accepted candidates are ranked before labelling
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CandidateOrdering {
    /// Keep contour discovery order (unstable across scanners)
    #[default]
    Discovery,
    /// Sort by bounding box top-left, row first, then relabel
    Spatial,
}

/// One extracted plot, the unit handed to downstream consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
#[ts(export)]
pub struct PlotBoundaryRecord {
    #[serde(rename = "plot_number")]
    #[schemars(description = "Label derived from the candidate rank, e.g. Plot_3")]
    pub label: String,
    #[schemars(description = "Trimmed OCR output for the plot's bounding box, possibly empty")]
    pub raw_text: String,
    #[schemars(description = "Simplified polygon vertices as [x, y] pixel pairs")]
    pub polygon_coordinates: Vec<[i32; 2]>,
}

impl PlotBoundaryRecord {
    pub fn polygon(&self) -> Polygon {
        Polygon::new(self.polygon_coordinates.clone())
    }
}

/// Records from one completed run, never mutated after assembly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub records: Vec<PlotBoundaryRecord>,
    /// Source image dimensions
    pub image_width: u32,
    pub image_height: u32,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PlotBoundaryRecord] {
        &self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rectangle(x: i32, y: i32, w: i32, h: i32) -> Polygon {
        Polygon::new(vec![[x, y], [x + w, y], [x + w, y + h], [x, y + h]])
    }

    #[test]
    fn test_shoelace_area() {
        let polygon = rectangle(10, 10, 200, 100);
        assert!((polygon.area() - 20_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounding_box_is_pixel_inclusive() {
        let polygon = rectangle(10, 20, 199, 99);
        let bbox = polygon.bounding_box();
        assert_eq!(bbox, BoundingBox { x: 10, y: 20, width: 200, height: 100 });
        assert!((bbox.aspect_ratio() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_height_aspect_ratio() {
        let bbox = BoundingBox { x: 0, y: 0, width: 40, height: 0 };
        assert_eq!(bbox.aspect_ratio(), 0.0);
        assert_eq!(Polygon::new(vec![]).bounding_box(), BoundingBox::default());
    }

    #[test]
    fn test_perimeter_closes_ring() {
        let polygon = rectangle(0, 0, 30, 10);
        assert!((polygon.perimeter() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_record_serializes_plot_number() {
        let record = PlotBoundaryRecord {
            label: "Plot_2".to_string(),
            raw_text: "12A".to_string(),
            polygon_coordinates: vec![[0, 0], [60, 0], [60, 60], [0, 60]],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["plot_number"], "Plot_2");
        assert_eq!(json["polygon_coordinates"][1], serde_json::json!([60, 0]));
        assert!(json.get("label").is_none());
    }

    #[test]
    fn test_candidate_label_uses_rank() {
        let candidate = PlotCandidate { rank: 7, polygon: rectangle(0, 0, 60, 60) };
        assert_eq!(candidate.label(), "Plot_7");
    }

    #[test]
    fn test_ordering_parses_from_str() {
        assert_eq!("spatial".parse::<CandidateOrdering>().unwrap(), CandidateOrdering::Spatial);
        assert_eq!(CandidateOrdering::default().to_string(), "discovery");
    }
}

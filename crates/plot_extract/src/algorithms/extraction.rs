use image::GrayImage;
use imageproc::contours::BorderType;
use crate::{error::Result, traits::ContourExtractor, types::Contour};

/// Border-following extractor that reports outermost boundaries only.
///
/// Anything enclosed by another boundary (label glyphs inside a plot, nested
/// plots) is dropped and no hierarchy is kept. Output order follows the raster
/// scan and callers must not rely on it.
#[derive(Debug, Clone, Default)]
pub struct ExternalContourExtractor;

impl ContourExtractor for ExternalContourExtractor {
    fn extract_contours(&self, edges: &GrayImage) -> Result<Vec<Contour>> {
        let contours = imageproc::contours::find_contours::<i32>(edges);

        let result = contours
            .into_iter()
            .filter(|contour| {
                matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none()
            })
            .map(|contour| {
                contour.points
                    .iter()
                    .map(|p| [p.x, p.y])
                    .collect()
            })
            .collect();

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect};

    #[test]
    fn test_empty_map_has_no_contours() {
        let edges = GrayImage::new(50, 50);
        let contours = ExternalContourExtractor.extract_contours(&edges).unwrap();
        assert!(contours.is_empty());
    }

    #[test]
    fn test_nested_outline_is_not_reported() {
        let mut edges = GrayImage::new(200, 200);
        draw_hollow_rect_mut(&mut edges, Rect::at(10, 10).of_size(150, 150), Luma([255u8]));
        draw_hollow_rect_mut(&mut edges, Rect::at(50, 50).of_size(40, 40), Luma([255u8]));

        let contours = ExternalContourExtractor.extract_contours(&edges).unwrap();
        assert_eq!(contours.len(), 1);

        let outer = &contours[0];
        assert!(outer.iter().all(|&[x, y]| (10..160).contains(&x) && (10..160).contains(&y)));
        assert!(outer.contains(&[10, 10]));
        assert!(outer.contains(&[159, 159]));
    }

    #[test]
    fn test_disjoint_outlines_are_all_reported() {
        let mut edges = GrayImage::new(300, 120);
        draw_hollow_rect_mut(&mut edges, Rect::at(10, 10).of_size(80, 80), Luma([255u8]));
        draw_hollow_rect_mut(&mut edges, Rect::at(150, 20).of_size(90, 70), Luma([255u8]));

        let contours = ExternalContourExtractor.extract_contours(&edges).unwrap();
        assert_eq!(contours.len(), 2);
    }
}

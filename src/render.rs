use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::detection::SkewLine;

const LINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Distance from the foot of perpendicular to each drawn endpoint. Far
/// enough outside any reasonable frame that the draw routine's clipping
/// decides the visible extent.
const SEGMENT_REACH: f64 = 1000.0;

/// Draw the filter-surviving lines onto a copy of the image.
///
/// Each polar line is reconstructed from its foot of perpendicular
/// (r·cosθ, r·sinθ) and extended along the line direction (−sinθ, cosθ).
pub fn draw_detected_lines(img: &RgbImage, lines: &[SkewLine]) -> RgbImage {
    let mut annotated = img.clone();

    for line in lines {
        let theta = line.theta_deg.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();

        let x0 = cos_t * line.r;
        let y0 = sin_t * line.r;

        let p1 = (
            (x0 - SEGMENT_REACH * sin_t) as f32,
            (y0 + SEGMENT_REACH * cos_t) as f32,
        );
        let p2 = (
            (x0 + SEGMENT_REACH * sin_t) as f32,
            (y0 - SEGMENT_REACH * cos_t) as f32,
        );

        draw_line_segment_mut(&mut annotated, p1, p2, LINE_COLOR);

        // Second pass offset by the unit normal widens the stroke to 2 px.
        let q1 = (p1.0 + cos_t as f32, p1.1 + sin_t as f32);
        let q2 = (p2.0 + cos_t as f32, p2.1 + sin_t as f32);
        draw_line_segment_mut(&mut annotated, q1, q2, LINE_COLOR);
    }

    annotated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_lines_leaves_copy_untouched() {
        let img = RgbImage::from_pixel(30, 30, Rgb([255, 255, 255]));
        let annotated = draw_detected_lines(&img, &[]);
        assert_eq!(annotated, img);
    }

    #[test]
    fn horizontal_line_marks_its_row() {
        let img = RgbImage::from_pixel(60, 60, Rgb([0, 0, 0]));
        // theta = 90°: horizontal line at y = r
        let line = SkewLine {
            r: 30.0,
            theta_deg: 90.0,
            angle_deg: 0.0,
        };
        let annotated = draw_detected_lines(&img, &[line]);

        assert_eq!(*annotated.get_pixel(10, 30), LINE_COLOR);
        assert_eq!(*annotated.get_pixel(50, 30), LINE_COLOR);
        // Original stays untouched
        assert_eq!(*img.get_pixel(10, 30), Rgb([0, 0, 0]));
    }

    #[test]
    fn annotation_preserves_dimensions() {
        let img = RgbImage::from_pixel(17, 23, Rgb([10, 10, 10]));
        let line = SkewLine {
            r: 5.0,
            theta_deg: 0.0,
            angle_deg: -90.0,
        };
        assert_eq!(draw_detected_lines(&img, &[line]).dimensions(), (17, 23));
    }
}

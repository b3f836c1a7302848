use image::GrayImage;
use imageproc::hough::{detect_lines, LineDetectionOptions, PolarLine};

/// Minimum accumulator votes for a (rho, theta) bucket to count as a line.
const HOUGH_VOTE_THRESHOLD: u32 = 250;

/// Skew band limits in degrees. A line contributes to the correction angle
/// when its deviation from horizontal falls in [-20, 20] (text baselines,
/// shelf edges) or its absolute deviation falls in [70, 110] (page margins,
/// door frames). Everything else is diagonal clutter.
const HORIZONTAL_BAND: f64 = 20.0;
const VERTICAL_BAND_LOW: f64 = 70.0;
const VERTICAL_BAND_HIGH: f64 = 110.0;

/// A detected line that survived the skew band filter
#[derive(Debug, Clone, Copy)]
pub struct SkewLine {
    /// Signed perpendicular distance from the origin, in pixels
    pub r: f64,
    /// Angle of the perpendicular, in degrees [0, 180)
    pub theta_deg: f64,
    /// Deviation from horizontal, in degrees
    pub angle_deg: f64,
}

/// Run the standard Hough transform over a binary edge map.
///
/// Quantization is 1 pixel in rho and 1 degree in theta. Every accumulator
/// bucket above the vote threshold is reported; no peak suppression, so
/// strong lines may appear as a small cluster of near-identical entries.
pub fn detect_polar_lines(edges: &GrayImage) -> Vec<PolarLine> {
    let options = LineDetectionOptions {
        vote_threshold: HOUGH_VOTE_THRESHOLD,
        suppression_radius: 0,
    };

    let lines = detect_lines(edges, options);
    tracing::debug!("hough transform found {} candidate lines", lines.len());
    lines
}

/// Deviation from horizontal for a polar line angle
fn skew_angle(theta_deg: f64) -> f64 {
    theta_deg - 90.0
}

/// Dual-band filter: near-horizontal or near-vertical, inclusive bounds
fn in_skew_band(angle_deg: f64) -> bool {
    (-HORIZONTAL_BAND..=HORIZONTAL_BAND).contains(&angle_deg)
        || (VERTICAL_BAND_LOW..=VERTICAL_BAND_HIGH).contains(&angle_deg.abs())
}

/// Keep the lines that plausibly describe skew, preserving detector order.
pub fn filter_skew_lines(lines: &[PolarLine]) -> Vec<SkewLine> {
    let mut kept = Vec::new();

    for line in lines {
        let theta_deg = line.angle_in_degrees as f64;
        let angle_deg = skew_angle(theta_deg);
        if in_skew_band(angle_deg) {
            kept.push(SkewLine {
                r: line.r as f64,
                theta_deg,
                angle_deg,
            });
        }
    }

    tracing::debug!("{} of {} lines within skew bands", kept.len(), lines.len());
    kept
}

/// Statistical median of the detected skew angles, 0.0 when none were found.
///
/// The median resists the pull of a single diagonal line sneaking in at a
/// band edge, which a mean would not.
pub fn median_angle(angles: &[f64]) -> f64 {
    if angles.is_empty() {
        return 0.0;
    }

    let mut sorted = angles.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn band_boundaries_are_inclusive() {
        assert!(in_skew_band(20.0));
        assert!(!in_skew_band(20.0001));
        assert!(in_skew_band(70.0));
        assert!(!in_skew_band(69.9999));
        assert!(in_skew_band(-20.0));
        assert!(in_skew_band(-70.0));
        assert!(in_skew_band(110.0));
        assert!(!in_skew_band(45.0));
    }

    #[test]
    fn vertical_lines_pass_the_filter() {
        // theta = 0 is a vertical line: deviation -90, abs within [70, 110]
        assert!(in_skew_band(skew_angle(0.0)));
        // theta = 90 is a horizontal line: deviation 0
        assert_eq!(skew_angle(90.0), 0.0);
        assert!(in_skew_band(0.0));
    }

    #[test]
    fn filter_preserves_detector_order() {
        let lines = vec![
            PolarLine { r: 10.0, angle_in_degrees: 95 },  // +5, kept
            PolarLine { r: 20.0, angle_in_degrees: 135 }, // +45, dropped
            PolarLine { r: 30.0, angle_in_degrees: 0 },   // -90, kept
        ];
        let kept = filter_skew_lines(&lines);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].angle_deg, 5.0);
        assert_eq!(kept[1].angle_deg, -90.0);
    }

    #[test]
    fn median_of_empty_is_zero() {
        assert_eq!(median_angle(&[]), 0.0);
    }

    #[test]
    fn median_resists_outliers() {
        assert_eq!(median_angle(&[1.0, 2.0, 3.0, 100.0]), 2.5);
        assert_eq!(median_angle(&[3.0, 1.0, 100.0]), 3.0);
    }

    #[test]
    fn empty_edge_map_yields_no_lines() {
        let edges = GrayImage::from_pixel(100, 100, Luma([0]));
        assert!(detect_polar_lines(&edges).is_empty());
    }

    #[test]
    fn long_horizontal_edge_is_detected() {
        let mut edges = GrayImage::from_pixel(400, 300, Luma([0]));
        for x in 0..400 {
            edges.put_pixel(x, 150, Luma([255]));
        }
        let lines = detect_polar_lines(&edges);
        assert!(!lines.is_empty());
        assert!(lines.iter().any(|l| l.angle_in_degrees == 90));
    }
}

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::io::Cursor;

use crate::detection::{detect_polar_lines, filter_skew_lines, median_angle};
use crate::edges::extract_edges;
use crate::error::CorrectionError;
use crate::geometry::{perspective_to_frame, rotation_about_center};
use crate::render::draw_detected_lines;
use crate::transform::{resize_exact, warp_into_frame};

/// Export quality used when the caller does not ask for another one.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Everything one pipeline invocation produces.
#[derive(Debug)]
pub struct CorrectionResult {
    /// The decoded input, untouched
    pub original: RgbImage,
    /// The leveled image, same dimensions as the original
    pub corrected: RgbImage,
    /// Copy of the original with the surviving lines drawn in
    pub debug: RgbImage,
    /// Median of the detected skew angles, 0.0 when none were found
    pub correction_angle: f64,
    /// Skew angle of every line that survived the band filter, in degrees
    pub detected_angles: Vec<f64>,
}

/// Run the full pipeline on encoded image bytes.
///
/// A stateless function of its inputs: decode, extract edges, detect and
/// filter lines, aggregate the correction angle, then warp. `manual_angle`
/// replaces the detected angle for the warp but never alters what was
/// detected; `perspective` adds the fixed inset-quad perspective stretch
/// after rotation.
pub fn detect_and_correct(
    bytes: &[u8],
    manual_angle: Option<f64>,
    perspective: bool,
) -> Result<CorrectionResult, CorrectionError> {
    let original = image::load_from_memory(bytes)?.to_rgb8();
    let (width, height) = original.dimensions();
    if width == 0 || height == 0 {
        return Err(CorrectionError::Geometry { width, height });
    }

    let edge_map = extract_edges(&original);
    let lines = detect_polar_lines(&edge_map);
    let skew_lines = filter_skew_lines(&lines);

    let detected_angles: Vec<f64> = skew_lines.iter().map(|l| l.angle_deg).collect();
    let correction_angle = median_angle(&detected_angles);
    let applied_angle = manual_angle.unwrap_or(correction_angle);

    tracing::debug!(
        "auto angle {:.2}°, applying {:.2}° ({} lines)",
        correction_angle,
        applied_angle,
        detected_angles.len()
    );

    let debug = draw_detected_lines(&original, &skew_lines);
    let corrected = correct_image(&original, applied_angle, perspective)?;

    Ok(CorrectionResult {
        original,
        corrected,
        debug,
        correction_angle,
        detected_angles,
    })
}

/// Rotate about the center, optionally stretch perspective, and restore the
/// original dimensions.
pub fn correct_image(
    img: &RgbImage,
    angle_deg: f64,
    perspective: bool,
) -> Result<RgbImage, CorrectionError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(CorrectionError::Geometry { width, height });
    }

    let rotation = rotation_about_center(width, height, angle_deg);
    let mut corrected = warp_into_frame(img, &rotation)?;

    if perspective {
        let homography =
            perspective_to_frame(width, height).ok_or(CorrectionError::Geometry { width, height })?;
        corrected = warp_into_frame(&corrected, &homography)?;
    }

    Ok(resize_exact(&corrected, width, height))
}

/// Encode for export. JPEG at quality 85 is the default download format.
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> Result<Vec<u8>, CorrectionError> {
    let mut buf = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    img.write_with_encoder(encoder)
        .map_err(CorrectionError::Encode)?;
    Ok(buf.into_inner())
}

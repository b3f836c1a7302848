use image::{Rgb, RgbImage};
use nalgebra::Matrix3;

use crate::error::CorrectionError;
use crate::geometry::transform_point;

/// Bilinear interpolation with source coordinates clamped to the image
/// rectangle. Clamping is what replicates border pixels into regions the
/// transform exposes, instead of leaving black wedges.
fn bilinear_sample(img: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let (width, height) = img.dimensions();

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let x_frac = x - x.floor();
    let y_frac = y - y.floor();

    let get_pixel = |px: i64, py: i64| -> Rgb<u8> {
        let px = px.clamp(0, width as i64 - 1) as u32;
        let py = py.clamp(0, height as i64 - 1) as u32;
        *img.get_pixel(px, py)
    };

    let p00 = get_pixel(x0, y0);
    let p10 = get_pixel(x0 + 1, y0);
    let p01 = get_pixel(x0, y0 + 1);
    let p11 = get_pixel(x0 + 1, y0 + 1);

    let mut result = [0u8; 3];
    for c in 0..3 {
        let top = p00[c] as f64 * (1.0 - x_frac) + p10[c] as f64 * x_frac;
        let bottom = p01[c] as f64 * (1.0 - x_frac) + p11[c] as f64 * x_frac;
        result[c] = (top * (1.0 - y_frac) + bottom * y_frac).round() as u8;
    }

    Rgb(result)
}

/// Apply a forward transform by inverse mapping, producing an output of the
/// same dimensions as the input.
pub fn warp_into_frame(
    img: &RgbImage,
    forward_matrix: &Matrix3<f64>,
) -> Result<RgbImage, CorrectionError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(CorrectionError::Geometry { width, height });
    }

    let inverse_matrix = forward_matrix
        .try_inverse()
        .ok_or(CorrectionError::Geometry { width, height })?;

    let mut output = RgbImage::new(width, height);

    for out_y in 0..height {
        for out_x in 0..width {
            let (src_x, src_y) = transform_point(&inverse_matrix, out_x as f64, out_y as f64);
            output.put_pixel(out_x, out_y, bilinear_sample(img, src_x, src_y));
        }
    }

    Ok(output)
}

/// Resize to exactly (width, height). A pure copy when dimensions already
/// match, since the sample grid then lands on integer coordinates.
pub fn resize_exact(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_width, src_height) = img.dimensions();
    if src_width == 0 || src_height == 0 || width == 0 || height == 0 {
        return img.clone();
    }

    let scale_x = src_width as f64 / width as f64;
    let scale_y = src_height as f64 / height as f64;

    let mut output = RgbImage::new(width, height);

    for out_y in 0..height {
        for out_x in 0..width {
            let src_x = (out_x as f64 + 0.5) * scale_x - 0.5;
            let src_y = (out_y as f64 + 0.5) * scale_y - 0.5;
            output.put_pixel(out_x, out_y, bilinear_sample(img, src_x, src_y));
        }
    }

    output
}

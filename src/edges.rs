use image::{GrayImage, RgbImage};
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;

/// Canny hysteresis thresholds.
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

/// Sigma of the 5x5 smoothing kernel applied before edge detection.
const BLUR_SIGMA: f32 = 1.1;

/// Convert RGB to grayscale using standard luminance weights
fn to_grayscale(img: &RgbImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut gray = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let pixel = img.get_pixel(x, y);
            let luma = (0.299 * pixel[0] as f64
                + 0.587 * pixel[1] as f64
                + 0.114 * pixel[2] as f64) as u8;
            gray.put_pixel(x, y, image::Luma([luma]));
        }
    }

    gray
}

/// Reduce a color image to a binary edge map: grayscale, Gaussian blur to
/// suppress sensor noise, then Canny edge detection.
pub fn extract_edges(img: &RgbImage) -> GrayImage {
    let gray = to_grayscale(img);
    let blurred = gaussian_blur_f32(&gray, BLUR_SIGMA);
    let edges = canny(&blurred, CANNY_LOW, CANNY_HIGH);

    tracing::debug!(
        "edge map: {} foreground pixels of {}x{}",
        edges.pixels().filter(|p| p[0] > 0).count(),
        edges.width(),
        edges.height()
    );

    edges
}

use thiserror::Error;

/// Fatal pipeline errors. Finding no lines is not one of them; that case
/// yields a zero correction angle and an empty angle list.
#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid image geometry: {width}x{height}")]
    Geometry { width: u32, height: u32 },

    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),
}

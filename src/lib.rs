pub mod analytics;
pub mod cli;
pub mod detection;
pub mod edges;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod render;
pub mod transform;

pub use analytics::{lookup_country, post_event, CorrectionEvent};
pub use cli::Cli;
pub use detection::{detect_polar_lines, filter_skew_lines, median_angle, SkewLine};
pub use edges::extract_edges;
pub use error::CorrectionError;
pub use geometry::{perspective_to_frame, rotation_about_center, transform_point};
pub use pipeline::{
    correct_image, detect_and_correct, encode_jpeg, CorrectionResult, DEFAULT_JPEG_QUALITY,
};
pub use render::draw_detected_lines;
pub use transform::{resize_exact, warp_into_frame};

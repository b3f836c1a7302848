use nalgebra::{Matrix3, SMatrix, SVector};

/// Fractional inset of the fixed perspective source quadrilateral.
const FRAME_INSET: f64 = 0.05;

/// Rotation about the image's pixel center, scale 1.0.
///
/// Positive angles rotate counter-clockwise. The y axis points down in
/// pixel coordinates, so the sine terms are mirrored relative to the
/// textbook rotation matrix.
pub fn rotation_about_center(width: u32, height: u32, angle_deg: f64) -> Matrix3<f64> {
    let (cx, cy) = ((width / 2) as f64, (height / 2) as f64);
    let (sin, cos) = angle_deg.to_radians().sin_cos();

    let translate_to_origin = Matrix3::new(
        1.0, 0.0, -cx,
        0.0, 1.0, -cy,
        0.0, 0.0, 1.0,
    );

    let rotation = Matrix3::new(
        cos, sin, 0.0,
        -sin, cos, 0.0,
        0.0, 0.0, 1.0,
    );

    let translate_back = Matrix3::new(
        1.0, 0.0, cx,
        0.0, 1.0, cy,
        0.0, 0.0, 1.0,
    );

    translate_back * rotation * translate_to_origin
}

/// Perspective transform mapping the quadrilateral inset 5% from each image
/// border onto the full frame corners. Pulls the frame outward, flattening
/// mild keystone distortion left over after rotation.
pub fn perspective_to_frame(width: u32, height: u32) -> Option<Matrix3<f64>> {
    let (w, h) = (width as f64, height as f64);
    let near = FRAME_INSET;
    let far = 1.0 - FRAME_INSET;

    let src = [
        (w * near, h * near),
        (w * far, h * near),
        (w * near, h * far),
        (w * far, h * far),
    ];
    let dst = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];

    homography_from_points(&src, &dst)
}

/// Solve for the unique homography H (h33 = 1) with H * src_i = dst_i.
///
/// Each correspondence contributes two rows to an 8x8 linear system;
/// returns None when the system is singular (degenerate quadrilateral).
fn homography_from_points(src: &[(f64, f64); 4], dst: &[(f64, f64); 4]) -> Option<Matrix3<f64>> {
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for i in 0..4 {
        let (x, y) = src[i];
        let (u, v) = dst[i];

        a[(2 * i, 0)] = x;
        a[(2 * i, 1)] = y;
        a[(2 * i, 2)] = 1.0;
        a[(2 * i, 6)] = -x * u;
        a[(2 * i, 7)] = -y * u;
        b[2 * i] = u;

        a[(2 * i + 1, 3)] = x;
        a[(2 * i + 1, 4)] = y;
        a[(2 * i + 1, 5)] = 1.0;
        a[(2 * i + 1, 6)] = -x * v;
        a[(2 * i + 1, 7)] = -y * v;
        b[2 * i + 1] = v;
    }

    let h = a.lu().solve(&b)?;

    Some(Matrix3::new(
        h[0], h[1], h[2],
        h[3], h[4], h[5],
        h[6], h[7], 1.0,
    ))
}

/// Transform a point, including the projective divide
pub fn transform_point(matrix: &Matrix3<f64>, x: f64, y: f64) -> (f64, f64) {
    let p = nalgebra::Vector3::new(x, y, 1.0);
    let result = matrix * p;
    (result.x / result.z, result.y / result.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn zero_angle_is_identity() {
        let m = rotation_about_center(100, 80, 0.0);
        assert!((m - Matrix3::identity()).abs().max() < 1e-12);
    }

    #[test]
    fn rotation_fixes_the_center() {
        let m = rotation_about_center(101, 81, 17.5);
        assert_close(transform_point(&m, 50.0, 40.0), (50.0, 40.0));
    }

    #[test]
    fn quarter_turn_moves_points_counter_clockwise() {
        let m = rotation_about_center(100, 100, 90.0);
        // One step right of center goes one step up (y down in pixel space)
        assert_close(transform_point(&m, 51.0, 50.0), (50.0, 49.0));
    }

    #[test]
    fn perspective_maps_inset_corners_to_frame() {
        let (w, h) = (400u32, 300u32);
        let m = perspective_to_frame(w, h).unwrap();
        let (wf, hf) = (w as f64, h as f64);

        assert_close(transform_point(&m, wf * 0.05, hf * 0.05), (0.0, 0.0));
        assert_close(transform_point(&m, wf * 0.95, hf * 0.05), (wf, 0.0));
        assert_close(transform_point(&m, wf * 0.05, hf * 0.95), (0.0, hf));
        assert_close(transform_point(&m, wf * 0.95, hf * 0.95), (wf, hf));
    }

    #[test]
    fn degenerate_quad_has_no_homography() {
        let src = [(0.0, 0.0), (0.0, 0.0), (0.0, 0.0), (0.0, 0.0)];
        let dst = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        assert!(homography_from_points(&src, &dst).is_none());
    }
}

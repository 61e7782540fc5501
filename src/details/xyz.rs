//! Builds the linear-RGB ↔ CIE XYZ transform matrix from a set of RGB
//! primaries and a white point (spec §4.1).

use crate::{Float, Mat3};

/// Builds the 3x3 matrix mapping linear RGB (in the space defined by
/// `primaries_xy` and `white_xyz`) to CIE XYZ.
///
/// Standard derivation: each primary's xy chromaticity gives an XYZ
/// direction (`X = x/y`, `Y = 1`, `Z = (1-x-y)/y`); the three directions
/// form a matrix `P`. Solving `P * S = W` for the per-primary scale vector
/// `S` (where `W` is the white point's XYZ) and scaling `P`'s columns by
/// `S` yields the RGB-to-XYZ matrix.
pub fn rgb_to_xyz_matrix(primaries_xy: [[Float; 2]; 3], white_xyz: [Float; 3]) -> Mat3 {
    let to_xyz = |xy: [Float; 2]| -> [Float; 3] {
        let [x, y] = xy;
        [x / y, 1.0, (1.0 - x - y) / y]
    };
    let r = to_xyz(primaries_xy[0]);
    let g = to_xyz(primaries_xy[1]);
    let b = to_xyz(primaries_xy[2]);

    let p = Mat3::from_cols(
        crate::Vec3::new(r[0], r[1], r[2]),
        crate::Vec3::new(g[0], g[1], g[2]),
        crate::Vec3::new(b[0], b[1], b[2]),
    );
    let p_inv = p.inverse();
    let w = crate::Vec3::new(white_xyz[0], white_xyz[1], white_xyz[2]);
    let s = p_inv.mul_vec3(w);

    Mat3::from_cols(
        crate::Vec3::new(r[0] * s.x, r[1] * s.x, r[2] * s.x),
        crate::Vec3::new(g[0] * s.y, g[1] * s.y, g[2] * s.y),
        crate::Vec3::new(b[0] * s.z, b[1] * s.z, b[2] * s.z),
    )
}

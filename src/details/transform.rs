//! Primitive Transform Library (spec §4.1): deterministic, allocation-free,
//! pure functions converting fixed-arity value arrays between specific
//! color-space kinds. No primitive reads global state; every constant
//! (whitepoint, primaries matrix, standard) arrives as a parameter.

use crate::details::color::YCbCrStandard;
use crate::Float;

const CIE_E: Float = 216.0 / 24389.0;
const CIE_K: Float = 24389.0 / 27.0;

fn lab_f(t: Float) -> Float {
    if t > CIE_E {
        t.cbrt()
    } else {
        (CIE_K * t + 16.0) / 116.0
    }
}

fn lab_f_inv(t: Float) -> Float {
    let t3 = t * t * t;
    if t3 > CIE_E {
        t3
    } else {
        (116.0 * t - 16.0) / CIE_K
    }
}

/// CIE XYZ (white-point-relative) to CIE Lab.
pub fn xyz_to_lab(xyz: [Float; 3], white: [Float; 3]) -> [Float; 3] {
    let fx = lab_f(xyz[0] / white[0]);
    let fy = lab_f(xyz[1] / white[1]);
    let fz = lab_f(xyz[2] / white[2]);
    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// CIE Lab to CIE XYZ (white-point-relative).
pub fn lab_to_xyz(lab: [Float; 3], white: [Float; 3]) -> [Float; 3] {
    let fy = (lab[0] + 16.0) / 116.0;
    let fx = fy + lab[1] / 500.0;
    let fz = fy - lab[2] / 200.0;
    [
        lab_f_inv(fx) * white[0],
        lab_f_inv(fy) * white[1],
        lab_f_inv(fz) * white[2],
    ]
}

/// CIE Lab to its polar form, LCh(ab). Hue is in degrees, `[0, 360)`.
pub fn lab_to_lch(lab: [Float; 3]) -> [Float; 3] {
    let c = (lab[1] * lab[1] + lab[2] * lab[2]).sqrt();
    let mut h = lab[2].atan2(lab[1]).to_degrees();
    if h < 0.0 {
        h += 360.0;
    }
    [lab[0], c, h]
}

/// LCh(ab) to CIE Lab.
pub fn lch_to_lab(lch: [Float; 3]) -> [Float; 3] {
    let h_rad = lch[2].to_radians();
    [lch[0], lch[1] * h_rad.cos(), lch[1] * h_rad.sin()]
}

fn luv_uv_prime(xyz: [Float; 3]) -> (Float, Float) {
    let denom = xyz[0] + 15.0 * xyz[1] + 3.0 * xyz[2];
    if denom.abs() < 1e-12 {
        (0.0, 0.0)
    } else {
        (4.0 * xyz[0] / denom, 9.0 * xyz[1] / denom)
    }
}

/// CIE XYZ (white-point-relative) to CIE Luv.
pub fn xyz_to_luv(xyz: [Float; 3], white: [Float; 3]) -> [Float; 3] {
    let (u_prime, v_prime) = luv_uv_prime(xyz);
    let (u_prime_n, v_prime_n) = luv_uv_prime(white);
    let yr = xyz[1] / white[1];
    let l = if yr > CIE_E {
        116.0 * yr.cbrt() - 16.0
    } else {
        CIE_K * yr
    };
    let u = 13.0 * l * (u_prime - u_prime_n);
    let v = 13.0 * l * (v_prime - v_prime_n);
    [l, u, v]
}

/// CIE Luv to CIE XYZ (white-point-relative).
pub fn luv_to_xyz(luv: [Float; 3], white: [Float; 3]) -> [Float; 3] {
    let [l, u, v] = luv;
    if l <= 0.0 {
        return [0.0, 0.0, 0.0];
    }
    let (u_prime_n, v_prime_n) = luv_uv_prime(white);
    let u_prime = u / (13.0 * l) + u_prime_n;
    let v_prime = v / (13.0 * l) + v_prime_n;
    let y = if l > CIE_K * CIE_E {
        ((l + 16.0) / 116.0).powi(3)
    } else {
        l / CIE_K
    } * white[1];
    let x = y * 9.0 * u_prime / (4.0 * v_prime);
    let z = y * (12.0 - 3.0 * u_prime - 20.0 * v_prime) / (4.0 * v_prime);
    [x, y, z]
}

/// CIE Luv to its polar form, LCh(uv). Hue is in degrees, `[0, 360)`.
pub fn luv_to_lchuv(luv: [Float; 3]) -> [Float; 3] {
    let c = (luv[1] * luv[1] + luv[2] * luv[2]).sqrt();
    let mut h = luv[2].atan2(luv[1]).to_degrees();
    if h < 0.0 {
        h += 360.0;
    }
    [luv[0], c, h]
}

/// LCh(uv) to CIE Luv.
pub fn lchuv_to_luv(lchuv: [Float; 3]) -> [Float; 3] {
    let h_rad = lchuv[2].to_radians();
    [
        lchuv[0],
        lchuv[1] * h_rad.cos(),
        lchuv[1] * h_rad.sin(),
    ]
}

/// CIE XYZ to xyY (chromaticity + luminance). Falls back to the given
/// white point's chromaticity when `X+Y+Z == 0` (pure black).
pub fn xyz_to_xyy(xyz: [Float; 3], white: [Float; 3]) -> [Float; 3] {
    let sum = xyz[0] + xyz[1] + xyz[2];
    if sum.abs() < 1e-12 {
        let white_sum = white[0] + white[1] + white[2];
        return [white[0] / white_sum, white[1] / white_sum, 0.0];
    }
    [xyz[0] / sum, xyz[1] / sum, xyz[1]]
}

/// xyY to CIE XYZ.
pub fn xyy_to_xyz(xyy: [Float; 3]) -> [Float; 3] {
    let [x, y, cap_y] = xyy;
    if y.abs() < 1e-12 {
        return [0.0, 0.0, 0.0];
    }
    [x * cap_y / y, cap_y, (1.0 - x - y) * cap_y / y]
}

/// Linear RGB to HSV. `rgb` and the output `s`, `v` are in `[0, 1]`; hue is
/// in degrees, `[0, 360)`.
pub fn rgb_to_hsv(rgb: [Float; 3]) -> [Float; 3] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let v = max;
    let s = if max.abs() < 1e-12 { 0.0 } else { delta / max };
    let h = hue_from_rgb(r, g, b, max, delta);
    [h, s, v]
}

/// HSV to linear RGB.
pub fn hsv_to_rgb(hsv: [Float; 3]) -> [Float; 3] {
    let [h, s, v] = hsv;
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;
    rgb_from_hue_chroma(h, c, x, m)
}

fn hue_from_rgb(r: Float, g: Float, b: Float, max: Float, delta: Float) -> Float {
    if delta.abs() < 1e-12 {
        return 0.0;
    }
    let mut h = if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if h < 0.0 {
        h += 360.0;
    }
    h
}

fn rgb_from_hue_chroma(h: Float, c: Float, x: Float, m: Float) -> [Float; 3] {
    let h_prime = h / 60.0;
    let (r1, g1, b1) = if h_prime < 1.0 {
        (c, x, 0.0)
    } else if h_prime < 2.0 {
        (x, c, 0.0)
    } else if h_prime < 3.0 {
        (0.0, c, x)
    } else if h_prime < 4.0 {
        (0.0, x, c)
    } else if h_prime < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };
    [r1 + m, g1 + m, b1 + m]
}

/// Linear RGB to HSL.
pub fn rgb_to_hsl(rgb: [Float; 3]) -> [Float; 3] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;
    let s = if delta.abs() < 1e-12 {
        0.0
    } else {
        delta / (1.0 - (2.0 * l - 1.0).abs())
    };
    let h = hue_from_rgb(r, g, b, max, delta);
    [h, s, l]
}

/// HSL to linear RGB.
pub fn hsl_to_rgb(hsl: [Float; 3]) -> [Float; 3] {
    let [h, s, l] = hsl;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    rgb_from_hue_chroma(h, c, x, m)
}

/// Companded RGB to Y'CbCr, per ITU-R BT.601/BT.709 luma coefficients
/// (`standard`). All channels (in and out) are in `[0, 1]`; Cb/Cr are
/// offset so that achromatic gray maps to `0.5`.
pub fn rgb_to_ycbcr(rgb: [Float; 3], standard: YCbCrStandard) -> [Float; 3] {
    let (kr, kb) = standard.coefficients();
    let kg = 1.0 - kr - kb;
    let [r, g, b] = rgb;
    let y = kr * r + kg * g + kb * b;
    let cb = 0.5 * (b - y) / (1.0 - kb) + 0.5;
    let cr = 0.5 * (r - y) / (1.0 - kr) + 0.5;
    [y, cb, cr]
}

/// Y'CbCr to companded RGB.
pub fn ycbcr_to_rgb(ycbcr: [Float; 3], standard: YCbCrStandard) -> [Float; 3] {
    let (kr, kb) = standard.coefficients();
    let kg = 1.0 - kr - kb;
    let [y, cb, cr] = ycbcr;
    let r = y + (cr - 0.5) * 2.0 * (1.0 - kr);
    let b = y + (cb - 0.5) * 2.0 * (1.0 - kb);
    let g = (y - kr * r - kb * b) / kg;
    [r, g, b]
}

/// Naive CMYK → CMY → RGB, per spec §4.1 ("CMYK→CMY→RGB naive"): no ICC
/// rendering intent, no UCR/GCR, just the textbook subtractive identity.
pub fn cmyk_to_rgb(cmyk: [Float; 4]) -> [Float; 3] {
    let [c, m, y, k] = cmyk;
    [
        (1.0 - c) * (1.0 - k),
        (1.0 - m) * (1.0 - k),
        (1.0 - y) * (1.0 - k),
    ]
}

/// Naive RGB → CMY → CMYK (the inverse of [`cmyk_to_rgb`]'s model).
pub fn rgb_to_cmyk(rgb: [Float; 3]) -> [Float; 4] {
    let [r, g, b] = rgb;
    let k = 1.0 - r.max(g).max(b);
    if (1.0 - k).abs() < 1e-12 {
        return [0.0, 0.0, 0.0, 1.0];
    }
    [
        (1.0 - r - k) / (1.0 - k),
        (1.0 - g - k) / (1.0 - k),
        (1.0 - b - k) / (1.0 - k),
        k,
    ]
}

/// Gray (single achromatic channel, `[0, 1]`) to CIE XYZ under `white`.
pub fn gray_to_xyz(gray: [Float; 1], white: [Float; 3]) -> [Float; 3] {
    [gray[0] * white[0], gray[0] * white[1], gray[0] * white[2]]
}

/// CIE XYZ to gray (the `Y` channel, relative to `white`'s `Y`).
pub fn xyz_to_gray(xyz: [Float; 3], white: [Float; 3]) -> [Float; 1] {
    [xyz[1] / white[1]]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lab_round_trips_xyz() {
        let white = [0.95047, 1.0, 1.08883];
        let xyz = [0.2, 0.3, 0.15];
        let lab = xyz_to_lab(xyz, white);
        let back = lab_to_xyz(lab, white);
        for (a, b) in xyz.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn white_point_maps_to_lab_white() {
        let white = [0.95047, 1.0, 1.08883];
        let lab = xyz_to_lab(white, white);
        assert!((lab[0] - 100.0).abs() < 1e-6);
        assert!(lab[1].abs() < 1e-6);
        assert!(lab[2].abs() < 1e-6);
    }

    #[test]
    fn lab_lch_round_trip() {
        let lab = [50.0, 20.0, -30.0];
        let lch = lab_to_lch(lab);
        assert!((lch[0] - 50.0).abs() < 1e-9);
        assert!((lch[1] - 36.0555).abs() < 1e-3);
        let back = lch_to_lab(lch);
        for (a, b) in lab.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn luv_round_trips_xyz() {
        let white = [0.95047, 1.0, 1.08883];
        let xyz = [0.25, 0.4, 0.1];
        let luv = xyz_to_luv(xyz, white);
        let back = luv_to_xyz(luv, white);
        for (a, b) in xyz.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn xyy_round_trips_xyz() {
        let xyz = [0.3, 0.5, 0.2];
        let xyy = xyz_to_xyy(xyz, [0.95047, 1.0, 1.08883]);
        let back = xyy_to_xyz(xyy);
        for (a, b) in xyz.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn hsv_round_trips_rgb() {
        let rgb = [0.8, 0.3, 0.5];
        let hsv = rgb_to_hsv(rgb);
        let back = hsv_to_rgb(hsv);
        for (a, b) in rgb.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn hsl_round_trips_rgb() {
        let rgb = [0.2, 0.9, 0.4];
        let hsl = rgb_to_hsl(rgb);
        let back = hsl_to_rgb(hsl);
        for (a, b) in rgb.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn ycbcr_round_trips_rgb() {
        let rgb = [0.6, 0.2, 0.7];
        for standard in [YCbCrStandard::Bt601, YCbCrStandard::Bt709] {
            let ycbcr = rgb_to_ycbcr(rgb, standard);
            let back = ycbcr_to_rgb(ycbcr, standard);
            for (a, b) in rgb.iter().zip(back.iter()) {
                assert!((a - b).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn cmyk_round_trips_rgb_for_naive_model() {
        let rgb = [0.5, 0.25, 0.75];
        let cmyk = rgb_to_cmyk(rgb);
        let back = cmyk_to_rgb(cmyk);
        for (a, b) in rgb.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn gray_round_trips_xyz() {
        let white = [0.95047, 1.0, 1.08883];
        let gray = xyz_to_gray([0.4, 0.5, 0.3], white);
        let xyz = gray_to_xyz(gray, white);
        assert!((xyz[1] - 0.5).abs() < 1e-9);
    }
}

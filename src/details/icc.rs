//! ICC Transform Engine (spec §4.4) and the `IccProfile` data contract
//! (spec §3). Profile byte parsing is out of scope (spec §1); this module
//! consumes an already-validated in-memory profile: matrices, TRC tables
//! and CLUT grids are assumed correct, `IccProfileInvariant` is raised only
//! when a requested tag chain is missing or a matrix is singular.

use crate::details::color::{ColorKind, WhitePoint};
use crate::details::config::clut_interpolation_override;
use crate::details::error::ConversionError;
use crate::{Float, Mat3};
use alloc::vec::Vec;

/// ICC profile class (spec §3), governing which Planner rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileClass {
    Input,
    Display,
    Output,
    /// DeviceLink: encodes an end-to-end device-to-device mapping.
    Link,
    ColorSpace,
    /// Transforms PCS values to PCS values (color effects in connection space).
    Abstract,
    NamedColor,
}

/// The Profile Connection Space a profile's tag chains meet in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pcs {
    Xyz,
    Lab,
}

impl Pcs {
    pub fn kind(&self) -> ColorKind {
        ColorKind::from_pcs(*self)
    }
}

/// Rendering intent (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderingIntent {
    Perceptual,
    #[default]
    RelativeColorimetric,
    Saturation,
    AbsoluteColorimetric,
}

/// A single-channel tone reproduction curve (spec GLOSSARY: TRC).
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Identity,
    /// A pure power-law gamma.
    Gamma(Float),
    /// A uniformly sampled 1D lookup table over `[0, 1]`, linearly
    /// interpolated and clamped at the ends.
    Sampled(Vec<Float>),
}

impl Curve {
    pub fn apply(&self, v: Float) -> Float {
        match self {
            Curve::Identity => v,
            Curve::Gamma(g) => v.max(0.0).powf(*g),
            Curve::Sampled(table) => sample_curve(table, v),
        }
    }

    pub fn invert_numeric(&self, v: Float) -> Float {
        match self {
            Curve::Identity => v,
            Curve::Gamma(g) => v.max(0.0).powf(1.0 / *g),
            Curve::Sampled(table) => invert_sampled_curve(table, v),
        }
    }
}

fn sample_curve(table: &[Float], v: Float) -> Float {
    if table.len() < 2 {
        return table.first().copied().unwrap_or(v);
    }
    let last = (table.len() - 1) as Float;
    let pos = (v.clamp(0.0, 1.0)) * last;
    let lo = pos.floor() as usize;
    let hi = (lo + 1).min(table.len() - 1);
    let frac = pos - lo as Float;
    table[lo] * (1.0 - frac) + table[hi] * frac
}

fn invert_sampled_curve(table: &[Float], v: Float) -> Float {
    if table.len() < 2 {
        return table.first().copied().unwrap_or(v);
    }
    // Tables are monotonic by construction; binary search the bracketing pair.
    let mut lo = 0usize;
    let mut hi = table.len() - 1;
    if table[lo] <= table[hi] {
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if table[mid] < v {
                lo = mid;
            } else {
                hi = mid;
            }
        }
    } else {
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if table[mid] > v {
                lo = mid;
            } else {
                hi = mid;
            }
        }
    }
    let span = table[hi] - table[lo];
    let frac = if span.abs() < 1e-12 {
        0.0
    } else {
        (v - table[lo]) / span
    };
    let last = (table.len() - 1) as Float;
    (lo as Float + frac) / last
}

/// How a multi-dimensional CLUT is interpolated between grid points
/// (spec §6 `clutInterpolation`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClutInterpolation {
    Trilinear,
    Tetrahedral,
    NLinear,
}

impl ClutInterpolation {
    /// The default per spec §6: Tetrahedral for 3D inputs, NLinear otherwise.
    pub fn default_for(in_channels: usize) -> Self {
        if in_channels == 3 {
            ClutInterpolation::Tetrahedral
        } else {
            ClutInterpolation::NLinear
        }
    }
}

/// A multi-dimensional lookup table sampled on a regular grid (spec
/// GLOSSARY: CLUT). Samples are stored as `Float` in `[0, 1]`; real ICC
/// CLUTs are often 16-bit unorm and promoted at lookup, which this data
/// contract assumes already happened when the profile was validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Clut {
    pub in_channels: usize,
    pub out_channels: usize,
    pub grid_points: usize,
    /// Row-major with the first input channel varying slowest and the
    /// output channel varying fastest: index =
    /// `(sum(coord[d] * grid_points^(in_channels-1-d))) * out_channels + o`.
    pub table: Vec<Float>,
}

impl Clut {
    fn stride(&self, dim: usize) -> usize {
        self.grid_points.pow((self.in_channels - 1 - dim) as u32)
    }

    fn node(&self, coords: &[usize]) -> &[Float] {
        let mut index = 0usize;
        for (d, &c) in coords.iter().enumerate() {
            index += c.min(self.grid_points - 1) * self.stride(d);
        }
        let start = index * self.out_channels;
        &self.table[start..start + self.out_channels]
    }

    /// Looks up `input` (each component in `[0, 1]`) using `interpolation`.
    /// Out-of-grid inputs clamp to the nearest grid face (spec §4.4).
    pub fn lookup(&self, input: &[Float], interpolation: ClutInterpolation) -> Vec<Float> {
        debug_assert_eq!(input.len(), self.in_channels);
        if interpolation == ClutInterpolation::Tetrahedral && self.in_channels == 3 {
            self.lookup_tetrahedral(input)
        } else {
            self.lookup_nlinear(input)
        }
    }

    fn grid_coord(&self, v: Float) -> (usize, Float) {
        let last = (self.grid_points - 1) as Float;
        let pos = v.clamp(0.0, 1.0) * last;
        let base = (pos.floor() as usize).min(self.grid_points - 1);
        (base, pos - base as Float)
    }

    fn lookup_nlinear(&self, input: &[Float]) -> Vec<Float> {
        let n = self.in_channels;
        let mut bases = Vec::with_capacity(n);
        let mut fracs = Vec::with_capacity(n);
        for &v in input {
            let (base, frac) = self.grid_coord(v);
            bases.push(base);
            fracs.push(frac);
        }

        let mut result = alloc::vec![0.0 as Float; self.out_channels];
        for corner in 0..(1usize << n) {
            let mut weight: Float = 1.0;
            let mut coords = Vec::with_capacity(n);
            for d in 0..n {
                let bit = (corner >> d) & 1;
                if bit == 1 {
                    weight *= fracs[d];
                    coords.push(bases[d] + 1);
                } else {
                    weight *= 1.0 - fracs[d];
                    coords.push(bases[d]);
                }
            }
            if weight == 0.0 {
                continue;
            }
            let node = self.node(&coords);
            for (r, v) in result.iter_mut().zip(node.iter()) {
                *r += *v * weight;
            }
        }
        result
    }

    /// Tetrahedral interpolation for 3-input CLUTs (spec §4.4, preferred
    /// for >= 3D): splits the unit cube into six tetrahedra ordered by the
    /// fractional coordinates and interpolates within the enclosing one.
    fn lookup_tetrahedral(&self, input: &[Float]) -> Vec<Float> {
        let (bx, fx) = self.grid_coord(input[0]);
        let (by, fy) = self.grid_coord(input[1]);
        let (bz, fz) = self.grid_coord(input[2]);

        let c000 = self.node(&[bx, by, bz]);
        let c100 = self.node(&[bx + 1, by, bz]);
        let c010 = self.node(&[bx, by + 1, bz]);
        let c001 = self.node(&[bx, by, bz + 1]);
        let c110 = self.node(&[bx + 1, by + 1, bz]);
        let c101 = self.node(&[bx + 1, by, bz + 1]);
        let c011 = self.node(&[bx, by + 1, bz + 1]);
        let c111 = self.node(&[bx + 1, by + 1, bz + 1]);

        let mut result = alloc::vec![0.0 as Float; self.out_channels];
        for o in 0..self.out_channels {
            let (v000, v100, v010, v001, v110, v101, v011, v111) = (
                c000[o], c100[o], c010[o], c001[o], c110[o], c101[o], c011[o], c111[o],
            );
            result[o] = if fx >= fy {
                if fy >= fz {
                    // fx >= fy >= fz
                    v000 + fx * (v100 - v000) + fy * (v110 - v100) + fz * (v111 - v110)
                } else if fx >= fz {
                    // fx >= fz > fy
                    v000 + fx * (v100 - v000) + fz * (v101 - v100) + fy * (v111 - v101)
                } else {
                    // fz > fx >= fy
                    v000 + fz * (v001 - v000) + fx * (v101 - v001) + fy * (v111 - v101)
                }
            } else if fz >= fy {
                // fz >= fy > fx
                v000 + fz * (v001 - v000) + fy * (v011 - v001) + fx * (v111 - v011)
            } else if fz >= fx {
                // fy > fz >= fx
                v000 + fy * (v010 - v000) + fz * (v011 - v010) + fx * (v111 - v011)
            } else {
                // fy > fx > fz
                v000 + fy * (v010 - v000) + fx * (v110 - v010) + fz * (v111 - v110)
            };
        }
        result
    }
}

/// One direction's tag chain (spec §4.4): input shaper curves, an optional
/// 3x3 colorant matrix, an optional CLUT, then output shaper curves.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagChain {
    pub input_curves: Vec<Curve>,
    pub matrix: Option<Mat3>,
    pub clut: Option<Clut>,
    pub output_curves: Vec<Curve>,
}

impl TagChain {
    /// Applies this chain's stages in order: shaper → matrix → CLUT →
    /// shaper. `scratch` is reused between stages and resized only if this
    /// profile's widest stage needs more room than the caller reserved.
    pub fn apply(&self, input: &[Float]) -> Vec<Float> {
        let mut values: Vec<Float> = if self.input_curves.is_empty() {
            input.to_vec()
        } else {
            input
                .iter()
                .zip(self.input_curves.iter())
                .map(|(v, c)| c.apply(*v))
                .collect()
        };

        if let Some(matrix) = self.matrix {
            debug_assert_eq!(values.len(), 3);
            let v = crate::Vec3::new(values[0], values[1], values[2]);
            let out = matrix.mul_vec3(v);
            values = alloc::vec![out.x, out.y, out.z];
        }

        if let Some(clut) = &self.clut {
            let interpolation = clut_interpolation_override()
                .unwrap_or_else(|| ClutInterpolation::default_for(clut.in_channels));
            values = clut.lookup(&values, interpolation);
        }

        if !self.output_curves.is_empty() {
            values = values
                .iter()
                .zip(self.output_curves.iter())
                .map(|(v, c)| c.apply(*v))
                .collect();
        }

        values
    }
}

/// An ICC profile as consumed by the conversion core (spec §3):
/// serialization lives outside this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct IccProfile {
    pub class: ProfileClass,
    pub pcs: Pcs,
    pub pcs_white_point: WhitePoint,
    pub data_colorspace_type: ColorKind,
    pub rendering_intent: RenderingIntent,
    /// Device → PCS tag chain.
    pub a_to_b: Option<TagChain>,
    /// PCS → Device tag chain.
    pub b_to_a: Option<TagChain>,
}

impl IccProfile {
    /// The [`ColorKind`] inhabiting this profile's Profile Connection Space
    /// (spec §3 "pcsType"): `Xyz` or `Lab` depending on [`Self::pcs`].
    pub fn pcs_type(&self) -> ColorKind {
        ColorKind::from_pcs(self.pcs)
    }

    /// Builds a fresh zero-filled `Color` inhabiting this profile's PCS,
    /// used as a temporary in multi-stage pipelines (spec §3).
    pub fn make_pcs_color(&self) -> crate::details::color::Color {
        crate::details::color::Color::zeroed(
            3,
            crate::details::color::ColorSpace::Icc(
                alloc::sync::Arc::new(self.clone()),
                crate::details::color::IccSide::Pcs,
            ),
        )
    }

    /// Applies the Device → PCS tag chain.
    pub fn apply_forward(&self, input: &[Float]) -> Result<Vec<Float>, ConversionError> {
        let chain = self
            .a_to_b
            .as_ref()
            .ok_or_else(|| ConversionError::IccProfileInvariant {
                reason: "profile has no A-to-B (device-to-PCS) tag chain".into(),
            })?;
        Ok(chain.apply(input))
    }

    /// Applies the PCS → Device tag chain.
    pub fn apply_backward(&self, input: &[Float]) -> Result<Vec<Float>, ConversionError> {
        let chain = self
            .b_to_a
            .as_ref()
            .ok_or_else(|| ConversionError::IccProfileInvariant {
                reason: "profile has no B-to-A (PCS-to-device) tag chain".into(),
            })?;
        Ok(chain.apply(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_clut_3d() -> Clut {
        // A trivial 2x2x2 CLUT that passes its input straight through.
        let mut table = Vec::new();
        for xi in 0..2 {
            for yi in 0..2 {
                for zi in 0..2 {
                    table.push(xi as Float);
                    table.push(yi as Float);
                    table.push(zi as Float);
                }
            }
        }
        Clut {
            in_channels: 3,
            out_channels: 3,
            grid_points: 2,
            table,
        }
    }

    #[test]
    fn identity_clut_nlinear_passes_through() {
        let clut = identity_clut_3d();
        let out = clut.lookup(&[0.25, 0.75, 0.5], ClutInterpolation::NLinear);
        assert!((out[0] - 0.25).abs() < 1e-9);
        assert!((out[1] - 0.75).abs() < 1e-9);
        assert!((out[2] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn identity_clut_tetrahedral_passes_through() {
        let clut = identity_clut_3d();
        let out = clut.lookup(&[0.25, 0.75, 0.5], ClutInterpolation::Tetrahedral);
        assert!((out[0] - 0.25).abs() < 1e-9);
        assert!((out[1] - 0.75).abs() < 1e-9);
        assert!((out[2] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn out_of_grid_clamps_to_face() {
        let clut = identity_clut_3d();
        let out = clut.lookup(&[-0.5, 1.5, 0.5], ClutInterpolation::NLinear);
        assert!((out[0] - 0.0).abs() < 1e-9);
        assert!((out[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sampled_curve_round_trips_via_inversion() {
        let table: Vec<Float> = (0..=16).map(|i| (i as Float / 16.0).powf(2.2)).collect();
        let curve = Curve::Sampled(table);
        let v = 0.42;
        let encoded = curve.apply(v);
        let decoded = curve.invert_numeric(encoded);
        assert!((decoded - v).abs() < 1e-3);
    }

    #[test]
    fn missing_tag_chain_is_profile_invariant_error() {
        let profile = IccProfile {
            class: ProfileClass::Display,
            pcs: Pcs::Lab,
            pcs_white_point: WhitePoint::D50,
            data_colorspace_type: ColorKind::Rgb,
            rendering_intent: RenderingIntent::RelativeColorimetric,
            a_to_b: None,
            b_to_a: None,
        };
        let err = profile.apply_forward(&[0.5, 0.5, 0.5]).unwrap_err();
        assert!(matches!(err, ConversionError::IccProfileInvariant { .. }));
    }
}

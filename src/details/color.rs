//! The data contract every other component speaks: [`Color`] and
//! [`ColorSpace`] (spec §3).

use crate::details::error::ColorError;
use crate::details::xyz::rgb_to_xyz_matrix;
use crate::{Float, Mat3};
use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Tolerance used when detecting whether a `Custom` primaries/whitepoint
/// value matches a named preset (spec §8, scenarios use 1e-4 style
/// tolerances for preset detection).
const CANONICALIZE_TOLERANCE: Float = 1e-4;

/// CIE xy chromaticity of a reference white, or its XYZ tristimulus.
///
/// `Custom` carries XYZ tristimulus (Y normalized to 1), matching how the
/// core receives whitepoints parsed from ICC media white point tags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WhitePoint {
    /// CIE Standard Illuminant A.
    A,
    /// CIE Standard Illuminant C.
    C,
    /// CIE Standard Illuminant D50, the ICC PCS adopted white.
    D50,
    /// CIE Standard Illuminant D55.
    D55,
    /// CIE Standard Illuminant D60, used by ACES.
    D60,
    /// CIE Standard Illuminant D65, used by sRGB/BT.709/BT.2020.
    D65,
    /// CIE Standard Illuminant E (the equal-energy point).
    E,
    /// An explicit XYZ tristimulus not matching any preset.
    Custom([Float; 3]),
}

impl WhitePoint {
    /// The XYZ tristimulus of this white point, normalized so that `Y == 1`.
    pub fn xyz(&self) -> [Float; 3] {
        match self {
            WhitePoint::A => [1.09850, 1.0, 0.35585],
            WhitePoint::C => [0.98074, 1.0, 1.18232],
            WhitePoint::D50 => [0.96422, 1.0, 0.82521],
            WhitePoint::D55 => [0.95682, 1.0, 0.92149],
            WhitePoint::D65 => [0.95047, 1.0, 1.08883],
            WhitePoint::D60 => [0.95265, 1.0, 1.00883],
            WhitePoint::E => [1.0, 1.0, 1.0],
            WhitePoint::Custom(xyz) => *xyz,
        }
    }

    /// Builds a whitepoint from CIE 1931 xy chromaticity coordinates,
    /// canonicalizing to a known preset when it is within tolerance.
    pub fn from_xy(x: Float, y: Float) -> Self {
        let xyz = [x / y, 1.0, (1.0 - x - y) / y];
        let mut wp = WhitePoint::Custom(xyz);
        let _ = wp.canonicalize();
        wp
    }

    /// Builds a whitepoint from XYZ tristimulus, canonicalizing to a known
    /// preset when it is within tolerance.
    pub fn from_xyz(xyz: [Float; 3]) -> Self {
        let mut wp = WhitePoint::Custom(xyz);
        let _ = wp.canonicalize();
        wp
    }

    /// If `self` is a `Custom` value matching a known preset within
    /// tolerance, replaces it with that preset. Returns
    /// [`ColorError::CanonicalizationFailed`] (leaving `self` unchanged) when
    /// `self` is `Custom` and does not match any preset.
    pub fn canonicalize(&mut self) -> Result<(), ColorError> {
        let Self::Custom(xyz) = *self else {
            return Ok(());
        };
        const PRESETS: [WhitePoint; 7] = [
            WhitePoint::A,
            WhitePoint::C,
            WhitePoint::D50,
            WhitePoint::D55,
            WhitePoint::D60,
            WhitePoint::D65,
            WhitePoint::E,
        ];
        for preset in PRESETS {
            if approx_eq3(xyz, preset.xyz(), CANONICALIZE_TOLERANCE) {
                *self = preset;
                return Ok(());
            }
        }
        Err(ColorError::CanonicalizationFailed)
    }
}

fn approx_eq3(a: [Float; 3], b: [Float; 3], tol: Float) -> bool {
    (a[0] - b[0]).abs() < tol && (a[1] - b[1]).abs() < tol && (a[2] - b[2]).abs() < tol
}

fn approx_eq_xy(a: [Float; 2], b: [Float; 2], tol: Float) -> bool {
    (a[0] - b[0]).abs() < tol && (a[1] - b[1]).abs() < tol
}

/// CIE xy chromaticities of the red, green and blue primaries of an RGB
/// color space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RgbPrimaries {
    /// ITU-R BT.709 / sRGB primaries.
    Bt709,
    /// ITU-R BT.2020 primaries.
    Bt2020,
    /// DCI-P3 primaries (theatrical).
    DciP3,
    /// Display P3 primaries (BT.709 transfer characteristics, DCI-P3 gamut).
    P3D65,
    /// Adobe RGB (1998) primaries.
    AdobeRgb,
    /// ProPhoto RGB (ROMM RGB) primaries.
    ProPhotoRgb,
    /// ACES AP0 primaries (ACES2065-1).
    AcesAp0,
    /// ACES AP1 primaries (ACEScg).
    AcesAp1,
    /// Explicit `[[Rx, Ry], [Gx, Gy], [Bx, By]]` chromaticities.
    Custom([[Float; 2]; 3]),
}

impl RgbPrimaries {
    /// The `[[Rx, Ry], [Gx, Gy], [Bx, By]]` chromaticities of these primaries.
    pub fn xy(&self) -> [[Float; 2]; 3] {
        match self {
            RgbPrimaries::Bt709 => [[0.64, 0.33], [0.30, 0.60], [0.15, 0.06]],
            RgbPrimaries::Bt2020 => [[0.708, 0.292], [0.170, 0.797], [0.131, 0.046]],
            RgbPrimaries::DciP3 => [[0.680, 0.320], [0.265, 0.690], [0.150, 0.060]],
            RgbPrimaries::P3D65 => [[0.680, 0.320], [0.265, 0.690], [0.150, 0.060]],
            RgbPrimaries::AdobeRgb => [[0.6400, 0.3300], [0.2100, 0.7100], [0.1500, 0.0600]],
            RgbPrimaries::ProPhotoRgb => [[0.7347, 0.2653], [0.1596, 0.8404], [0.0366, 0.0001]],
            RgbPrimaries::AcesAp0 => [[0.7347, 0.2653], [0.0000, 1.0000], [0.0001, -0.0770]],
            RgbPrimaries::AcesAp1 => [[0.713, 0.293], [0.165, 0.830], [0.128, 0.044]],
            RgbPrimaries::Custom(xy) => *xy,
        }
    }

    /// Builds a primaries value from red/green/blue CIE xy chromaticities,
    /// canonicalizing to a known preset when it is within tolerance.
    pub fn from_rgb_xy(r: [Float; 2], g: [Float; 2], b: [Float; 2]) -> Self {
        let mut p = RgbPrimaries::Custom([r, g, b]);
        let _ = p.canonicalize();
        p
    }

    /// If `self` is a `Custom` value matching a known preset within
    /// tolerance, replaces it with that preset. Returns
    /// [`ColorError::CanonicalizationFailed`] (leaving `self` unchanged) when
    /// `self` is `Custom` and does not match any preset.
    pub fn canonicalize(&mut self) -> Result<(), ColorError> {
        let Self::Custom(xy) = *self else {
            return Ok(());
        };
        const PRESETS: [RgbPrimaries; 8] = [
            RgbPrimaries::Bt709,
            RgbPrimaries::Bt2020,
            RgbPrimaries::DciP3,
            RgbPrimaries::AdobeRgb,
            RgbPrimaries::ProPhotoRgb,
            RgbPrimaries::AcesAp0,
            RgbPrimaries::AcesAp1,
            RgbPrimaries::P3D65,
        ];
        for preset in PRESETS {
            let preset_xy = preset.xy();
            if approx_eq_xy(xy[0], preset_xy[0], CANONICALIZE_TOLERANCE)
                && approx_eq_xy(xy[1], preset_xy[1], CANONICALIZE_TOLERANCE)
                && approx_eq_xy(xy[2], preset_xy[2], CANONICALIZE_TOLERANCE)
            {
                *self = preset;
                return Ok(());
            }
        }
        Err(ColorError::CanonicalizationFailed)
    }
}

/// CIE "6/29" constants shared by the Lab/L* piecewise curves (identical to
/// `transform::CIE_E`/`CIE_K`, duplicated here since that module's constants
/// are private to it).
const CIE_E: Float = 216.0 / 24389.0;
const CIE_K: Float = 24389.0 / 27.0;

/// The companding (encode/decode) function of an RGB-family color space,
/// applied per-channel (spec §4.1, "companded RGB ↔ linear RGB").
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransferFunction {
    /// No companding; the space is already linear.
    Linear,
    /// The sRGB / BT.709 piecewise transfer function.
    Srgb,
    /// A pure power-law gamma, `encoded = linear.powf(1.0 / gamma)`.
    Gamma(Float),
    /// The ProPhoto RGB piecewise transfer function.
    ProPhoto,
    /// The CIE L* lightness curve (spec §4.1 "L*-style" companding): encoded
    /// values are `L* / 100`, following the same piecewise cube law as the
    /// Lab `f`/`f_inv` functions.
    LStar,
}

impl TransferFunction {
    /// Converts an encoded (companded) channel value to linear light.
    pub fn decode(&self, v: Float) -> Float {
        match self {
            TransferFunction::Linear => v,
            TransferFunction::Srgb => {
                if v <= 0.04045 {
                    v / 12.92
                } else {
                    ((v + 0.055) / 1.055).powf(2.4)
                }
            }
            TransferFunction::Gamma(g) => v.signum() * v.abs().powf(*g),
            TransferFunction::ProPhoto => {
                if v < 0.03125 {
                    v / 16.0
                } else {
                    v.powf(1.8)
                }
            }
            TransferFunction::LStar => {
                let l_star = v * 100.0;
                if l_star <= CIE_K * CIE_E {
                    l_star / CIE_K
                } else {
                    ((l_star + 16.0) / 116.0).powf(3.0)
                }
            }
        }
    }

    /// Converts a linear-light channel value to its encoded (companded) form.
    pub fn encode(&self, v: Float) -> Float {
        match self {
            TransferFunction::Linear => v,
            TransferFunction::Srgb => {
                if v <= 0.0031308 {
                    v * 12.92
                } else {
                    1.055 * v.powf(1.0 / 2.4) - 0.055
                }
            }
            TransferFunction::Gamma(g) => v.signum() * v.abs().powf(1.0 / *g),
            TransferFunction::ProPhoto => {
                if v < 0.001953 {
                    v * 16.0
                } else {
                    v.powf(1.0 / 1.8)
                }
            }
            TransferFunction::LStar => {
                let l_star = if v > CIE_E {
                    116.0 * v.powf(1.0 / 3.0) - 16.0
                } else {
                    CIE_K * v
                };
                l_star / 100.0
            }
        }
    }
}

/// The BT.601/BT.709 luma/chroma matrix variants supported by RGB↔YCbCr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YCbCrStandard {
    /// ITU-R BT.601 (standard-definition) luma coefficients.
    Bt601,
    /// ITU-R BT.709 (high-definition) luma coefficients.
    Bt709,
}

impl YCbCrStandard {
    /// The `(Kr, Kb)` luma coefficients for this standard.
    pub fn coefficients(&self) -> (Float, Float) {
        match self {
            YCbCrStandard::Bt601 => (0.299, 0.114),
            YCbCrStandard::Bt709 => (0.2126, 0.0722),
        }
    }
}

/// A named RGB color space: primaries, white point and transfer function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColorSpace {
    pub primaries: RgbPrimaries,
    pub white_point: WhitePoint,
    pub transfer: TransferFunction,
}

impl RgbColorSpace {
    /// The 3x3 matrix mapping linear RGB in this space to CIE XYZ under this
    /// space's own white point.
    ///
    /// With the `color-matrices` feature, results are cached process-wide
    /// keyed by primaries and white point, so assembling many `Converter`s
    /// for the same handful of named RGB spaces doesn't re-derive the same
    /// matrix every time (spec §4.1; the Pipeline Assembler calls this once
    /// per RGB-kind stage at construction).
    pub fn rgb_to_xyz(&self) -> Mat3 {
        #[cfg(all(feature = "color-matrices", feature = "std"))]
        {
            matrix_cache::get_or_compute(self.primaries, self.white_point)
        }
        #[cfg(not(all(feature = "color-matrices", feature = "std")))]
        {
            rgb_to_xyz_matrix(self.primaries.xy(), self.white_point.xyz())
        }
    }
}

#[cfg(all(feature = "color-matrices", feature = "std"))]
mod matrix_cache {
    use super::{RgbPrimaries, WhitePoint};
    use crate::details::xyz::rgb_to_xyz_matrix;
    use crate::Mat3;
    use std::collections::HashMap;
    use std::sync::{OnceLock, RwLock};

    #[derive(PartialEq, Eq, Hash, Clone, Copy)]
    struct Key([u64; 9]);

    fn key(primaries: RgbPrimaries, white_point: WhitePoint) -> Key {
        let mut bits = [0u64; 9];
        for (i, v) in primaries
            .xy()
            .into_iter()
            .flatten()
            .chain(white_point.xyz())
            .enumerate()
        {
            bits[i] = (v as f64).to_bits();
        }
        Key(bits)
    }

    fn cache() -> &'static RwLock<HashMap<Key, Mat3>> {
        static CACHE: OnceLock<RwLock<HashMap<Key, Mat3>>> = OnceLock::new();
        CACHE.get_or_init(|| RwLock::new(HashMap::new()))
    }

    pub(super) fn get_or_compute(primaries: RgbPrimaries, white_point: WhitePoint) -> Mat3 {
        let k = key(primaries, white_point);
        if let Some(m) = cache().read().expect("RGB/XYZ matrix cache poisoned").get(&k) {
            return *m;
        }
        let m = rgb_to_xyz_matrix(primaries.xy(), white_point.xyz());
        cache()
            .write()
            .expect("RGB/XYZ matrix cache poisoned")
            .insert(k, m);
        m
    }
}

/// Tag used by the Planner and Conversion Path Registry to match primitive
/// transforms to the color variant a [`ColorSpace`] carries (spec §9,
/// "Polymorphic Colors").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKind {
    Xyz,
    XyY,
    Lab,
    Lch,
    Luv,
    LchUv,
    Rgb,
    Hsv,
    Hsl,
    YCbCr,
    Cmyk,
    Gray,
    /// A device color space with `n` channels, used by ICC device sides
    /// that are neither RGB nor CMYK (e.g. 2-channel, 6-channel devices).
    NChannel(u8),
}

impl ColorKind {
    /// The connecting-space kind for an ICC PCS (spec GLOSSARY: PCS is
    /// either CIE XYZ or CIE Lab, so a PCS-side color is just an ordinary
    /// `Xyz` or `Lab` kind under the profile's PCS white point).
    pub fn from_pcs(pcs: crate::details::icc::Pcs) -> ColorKind {
        match pcs {
            crate::details::icc::Pcs::Xyz => ColorKind::Xyz,
            crate::details::icc::Pcs::Lab => ColorKind::Lab,
        }
    }
}

impl ColorKind {
    /// The fixed channel count of this color variant.
    pub fn channels(&self) -> usize {
        match self {
            ColorKind::Gray => 1,
            ColorKind::Cmyk => 4,
            ColorKind::NChannel(n) => *n as usize,
            _ => 3,
        }
    }
}

/// A color space: the reference a [`Color`] binds to.
///
/// RGB-family spaces carry primaries, whitepoint and transfer function.
/// Polar/derived models (`Lab`, `Lch`, `Luv`, `LchUv`, `Hsv`, `Hsl`,
/// `YCbCr`, `Cmyk`) are gamut-agnostic views that need a reference space —
/// an RGB space for the device-referred models, or just a whitepoint for
/// the CIE-referred ones — supplied at construction (spec §4.1 "Gamut-
/// Agnostic Transforms").
#[derive(Debug, Clone, PartialEq)]
pub enum ColorSpace {
    Rgb(RgbColorSpace),
    Xyz {
        white_point: WhitePoint,
    },
    XyY {
        white_point: WhitePoint,
    },
    Lab {
        white_point: WhitePoint,
    },
    Lch {
        white_point: WhitePoint,
    },
    Luv {
        white_point: WhitePoint,
    },
    LchUv {
        white_point: WhitePoint,
    },
    Hsv {
        reference: Arc<ColorSpace>,
    },
    Hsl {
        reference: Arc<ColorSpace>,
    },
    YCbCr {
        reference: Arc<ColorSpace>,
        standard: YCbCrStandard,
    },
    Cmyk {
        reference: Arc<ColorSpace>,
    },
    Gray {
        white_point: WhitePoint,
    },
    /// An ICC-profile-backed color space; PCS/data-side questions delegate
    /// to the wrapped [`crate::details::icc::IccProfile`].
    Icc(Arc<crate::details::icc::IccProfile>, IccSide),
}

/// Which side of an [`crate::details::icc::IccProfile`] a
/// [`ColorSpace::Icc`] inhabits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IccSide {
    /// The device/data color space (e.g. RGB, CMYK) described by the profile.
    Device,
    /// The profile's Profile Connection Space (XYZ or Lab).
    Pcs,
}

impl ColorSpace {
    /// The [`ColorKind`] this space's colors inhabit, used by the Planner.
    pub fn kind(&self) -> ColorKind {
        match self {
            ColorSpace::Rgb(_) => ColorKind::Rgb,
            ColorSpace::Xyz { .. } => ColorKind::Xyz,
            ColorSpace::XyY { .. } => ColorKind::XyY,
            ColorSpace::Lab { .. } => ColorKind::Lab,
            ColorSpace::Lch { .. } => ColorKind::Lch,
            ColorSpace::Luv { .. } => ColorKind::Luv,
            ColorSpace::LchUv { .. } => ColorKind::LchUv,
            ColorSpace::Hsv { .. } => ColorKind::Hsv,
            ColorSpace::Hsl { .. } => ColorKind::Hsl,
            ColorSpace::YCbCr { .. } => ColorKind::YCbCr,
            ColorSpace::Cmyk { .. } => ColorKind::Cmyk,
            ColorSpace::Gray { .. } => ColorKind::Gray,
            ColorSpace::Icc(profile, side) => match side {
                IccSide::Device => profile.data_colorspace_type,
                IccSide::Pcs => ColorKind::from_pcs(profile.pcs),
            },
        }
    }

    /// The reference white point of this space, if it has one directly (RGB
    /// and CIE-referred spaces); derived models fall through to their
    /// reference space's whitepoint.
    pub fn white_point(&self) -> Option<WhitePoint> {
        match self {
            ColorSpace::Rgb(rgb) => Some(rgb.white_point),
            ColorSpace::Xyz { white_point }
            | ColorSpace::XyY { white_point }
            | ColorSpace::Lab { white_point }
            | ColorSpace::Lch { white_point }
            | ColorSpace::Luv { white_point }
            | ColorSpace::LchUv { white_point }
            | ColorSpace::Gray { white_point } => Some(*white_point),
            ColorSpace::Hsv { reference }
            | ColorSpace::Hsl { reference }
            | ColorSpace::Cmyk { reference } => reference.white_point(),
            ColorSpace::YCbCr { reference, .. } => reference.white_point(),
            ColorSpace::Icc(profile, _) => Some(profile.pcs_white_point),
        }
    }

    /// Returns a copy of this color space re-adopted to `white_point`, for
    /// RGB and CIE-referred variants. Derived models are re-pointed at a
    /// re-adopted copy of their reference space.
    pub fn with_whitepoint(&self, white_point: WhitePoint) -> ColorSpace {
        match self {
            ColorSpace::Rgb(rgb) => ColorSpace::Rgb(RgbColorSpace {
                white_point,
                ..*rgb
            }),
            ColorSpace::Xyz { .. } => ColorSpace::Xyz { white_point },
            ColorSpace::XyY { .. } => ColorSpace::XyY { white_point },
            ColorSpace::Lab { .. } => ColorSpace::Lab { white_point },
            ColorSpace::Lch { .. } => ColorSpace::Lch { white_point },
            ColorSpace::Luv { .. } => ColorSpace::Luv { white_point },
            ColorSpace::LchUv { .. } => ColorSpace::LchUv { white_point },
            ColorSpace::Gray { .. } => ColorSpace::Gray { white_point },
            ColorSpace::Hsv { reference } => ColorSpace::Hsv {
                reference: Arc::new(reference.with_whitepoint(white_point)),
            },
            ColorSpace::Hsl { reference } => ColorSpace::Hsl {
                reference: Arc::new(reference.with_whitepoint(white_point)),
            },
            ColorSpace::Cmyk { reference } => ColorSpace::Cmyk {
                reference: Arc::new(reference.with_whitepoint(white_point)),
            },
            ColorSpace::YCbCr {
                reference,
                standard,
            } => ColorSpace::YCbCr {
                reference: Arc::new(reference.with_whitepoint(white_point)),
                standard: *standard,
            },
            ColorSpace::Icc(profile, side) => ColorSpace::Icc(profile.clone(), *side),
        }
    }

    /// The RGB-family space backing this space, if any: itself for `Rgb`,
    /// or the reference space for HSV/HSL/YCbCr/CMYK views.
    pub fn rgb_reference(&self) -> Option<&RgbColorSpace> {
        match self {
            ColorSpace::Rgb(rgb) => Some(rgb),
            ColorSpace::Hsv { reference }
            | ColorSpace::Hsl { reference }
            | ColorSpace::Cmyk { reference }
            | ColorSpace::YCbCr { reference, .. } => reference.rgb_reference(),
            _ => None,
        }
    }
}

/// A color: a fixed-arity vector of `Float` bound to a [`ColorSpace`]
/// (spec §3). The value buffer is heap-allocated once at construction and
/// never resized, so its address is stable for the lifetime of any
/// `Converter` attached to it, and writing through it during `convert()`
/// allocates nothing.
#[derive(Debug, Clone)]
pub struct Color {
    values: Box<[Float]>,
    space: ColorSpace,
}

impl Color {
    /// Builds a color with `values.len()` channels in `space`.
    pub fn new(values: &[Float], space: ColorSpace) -> Self {
        Self {
            values: values.to_vec().into_boxed_slice(),
            space,
        }
    }

    /// Builds a zero-filled color with `n` channels in `space`.
    pub fn zeroed(n: usize, space: ColorSpace) -> Self {
        Self {
            values: Vec::from(alloc::vec![0.0; n]).into_boxed_slice(),
            space,
        }
    }

    pub fn values(&self) -> &[Float] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [Float] {
        &mut self.values
    }

    pub fn space(&self) -> &ColorSpace {
        &self.space
    }

    pub fn kind(&self) -> ColorKind {
        self.space.kind()
    }

    /// Raw pointer to the first channel, used by the Pipeline Assembler to
    /// pin buffers for the lifetime of a `Converter` (spec §4.7).
    pub(crate) fn as_mut_ptr(&mut self) -> *mut Float {
        self.values.as_mut_ptr()
    }

    pub(crate) fn as_ptr(&self) -> *const Float {
        self.values.as_ptr()
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}

/// Named [`ColorSpace`] presets (spec §4.1 "Required primitives" and the
/// teacher's `spaces` module).
pub mod color_spaces {
    use super::{ColorSpace, RgbColorSpace, RgbPrimaries, TransferFunction, WhitePoint};

    pub const SRGB: ColorSpace = ColorSpace::Rgb(RgbColorSpace {
        primaries: RgbPrimaries::Bt709,
        white_point: WhitePoint::D65,
        transfer: TransferFunction::Srgb,
    });

    pub const BT709: ColorSpace = ColorSpace::Rgb(RgbColorSpace {
        primaries: RgbPrimaries::Bt709,
        white_point: WhitePoint::D65,
        transfer: TransferFunction::Srgb,
    });

    pub const LINEAR_SRGB: ColorSpace = ColorSpace::Rgb(RgbColorSpace {
        primaries: RgbPrimaries::Bt709,
        white_point: WhitePoint::D65,
        transfer: TransferFunction::Linear,
    });

    pub const BT2020: ColorSpace = ColorSpace::Rgb(RgbColorSpace {
        primaries: RgbPrimaries::Bt2020,
        white_point: WhitePoint::D65,
        transfer: TransferFunction::Srgb,
    });

    pub const ADOBE_RGB: ColorSpace = ColorSpace::Rgb(RgbColorSpace {
        primaries: RgbPrimaries::AdobeRgb,
        white_point: WhitePoint::D65,
        transfer: TransferFunction::Gamma(2.19921875),
    });

    pub const PRO_PHOTO: ColorSpace = ColorSpace::Rgb(RgbColorSpace {
        primaries: RgbPrimaries::ProPhotoRgb,
        white_point: WhitePoint::D50,
        transfer: TransferFunction::ProPhoto,
    });

    pub const ACESCG: ColorSpace = ColorSpace::Rgb(RgbColorSpace {
        primaries: RgbPrimaries::AcesAp1,
        white_point: WhitePoint::D60,
        transfer: TransferFunction::Linear,
    });

    pub const ACES2065_1: ColorSpace = ColorSpace::Rgb(RgbColorSpace {
        primaries: RgbPrimaries::AcesAp0,
        white_point: WhitePoint::D60,
        transfer: TransferFunction::Linear,
    });

    pub const CIE_XYZ_D65: ColorSpace = ColorSpace::Xyz {
        white_point: WhitePoint::D65,
    };

    pub const CIE_XYZ_D50: ColorSpace = ColorSpace::Xyz {
        white_point: WhitePoint::D50,
    };

    pub const CIE_LAB_D50: ColorSpace = ColorSpace::Lab {
        white_point: WhitePoint::D50,
    };

    pub const CIE_LAB_D65: ColorSpace = ColorSpace::Lab {
        white_point: WhitePoint::D65,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_to_xyz_matrix_matches_known_srgb_coefficients() {
        let ColorSpace::Rgb(rgb) = color_spaces::SRGB else {
            unreachable!()
        };
        let m = rgb.rgb_to_xyz();
        // Column-major: x_axis is the red colorant's XYZ contribution.
        let arr = m.to_cols_array();
        assert!((arr[0] - 0.4124).abs() < 1e-3);
    }

    #[test]
    fn lstar_transfer_round_trips() {
        for v in [0.0, 0.01, 0.2, 0.5, 0.9, 1.0] {
            let encoded = TransferFunction::LStar.encode(v);
            let decoded = TransferFunction::LStar.decode(encoded);
            assert!((decoded - v).abs() < 1e-6);
        }
    }

    #[test]
    fn lstar_white_encodes_to_100() {
        assert!((TransferFunction::LStar.encode(1.0) - 1.0).abs() < 1e-6);
    }
}

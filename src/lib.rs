//! A color conversion core: converts colors between color spaces (RGB
//! variants, XYZ, Lab, LCH, Luv, HSV, HSL, Y'CbCr, CMYK, Gray) and executes
//! ICC v2/v4 profile-based transforms, via a pluggable primitive registry,
//! a planner that chooses between direct, PCS-mediated and device-link
//! routes, and a pipeline assembler that fuses the chosen stages into one
//! allocation-free callable.
//!
//! ## Overview
//!
//! The core pieces, each in its own [`details`] submodule:
//!
//! - [`details::color`]: the [`Color`]/[`ColorSpace`] data contract every
//!   other component speaks.
//! - [`details::transform`]: the Primitive Transform Library — pure,
//!   allocation-free conversions between specific color kinds.
//! - [`details::cat`]: the Chromatic Adaptation Registry — named
//!   cone-response matrices and cached adaptation matrices between white
//!   points.
//! - [`details::registry`]: the Conversion Path Registry — which
//!   primitives connect which color kinds, mutable at runtime.
//! - [`details::icc`]: the ICC Transform Engine — profile classes, tag
//!   chains, curves and CLUTs.
//! - [`details::planner`]: decides the stage sequence bridging an input
//!   and output color space.
//! - [`details::assembler`]: resolves a symbolic plan into a [`Pipeline`]
//!   with precomputed numeric parameters.
//! - [`details::converter`]: the [`Converter`] facade — plan and assemble
//!   once, then convert cheaply and repeatedly.
//!
//! ## Named Color Spaces
//!
//! Common presets live in the [`spaces`] module: sRGB, linear sRGB,
//! BT.2020, ACEScg, ACES2065-1, Adobe RGB, ProPhoto RGB, and CIE XYZ/Lab
//! under D50 and D65. Build others from [`ColorSpace`]'s constructors, or
//! wrap an [`details::icc::IccProfile`] in [`ColorSpace::Icc`].
//!
//! ## Design
//!
//! Every conversion routes through CIE XYZ (or, when closer, CIE Lab) as a
//! connecting space: a source side is reduced to XYZ, chromatic adaptation
//! bridges white points if they differ, and the destination side is built
//! back up from XYZ. ICC profiles are planned according to their class
//! (Input/Display/Output profiles route through their own PCS;
//! DeviceLink profiles are used end-to-end; Abstract profiles transform
//! PCS to PCS). The [`details::planner`] decides *which* stages; the
//! [`details::assembler`] resolves them into concrete numbers exactly
//! once, so that [`Converter::convert`] itself does no planning, no
//! registry lookups, and no allocation for any pipeline that doesn't
//! evaluate an ICC CLUT.
//!
//! ## Features
#![doc = document_features::document_features!()]
#![cfg_attr(not(feature = "std"), no_std)]
#![allow(unexpected_cfgs)]

extern crate alloc;

#[cfg(feature = "f64")]
pub type Float = f64;

#[cfg(not(feature = "f64"))]
pub type Float = f32;

pub use details::math::{Mat3, Vec3};

/// Builds a `Mat3` from a `[Float; 9]`. The order of components is
/// column-major.
#[cfg(not(feature = "glam"))]
#[macro_export]
macro_rules! const_mat3 {
    ($ftypex9:expr) => {
        $crate::Mat3::from_cols_array(&$ftypex9)
    };
}

pub mod details {
    pub mod assembler;
    pub mod cat;
    pub mod color;
    pub mod config;
    pub mod converter;
    pub mod error;
    pub mod icc;
    pub mod math;
    pub mod plan;
    pub mod planner;
    #[allow(clippy::excessive_precision)]
    #[allow(clippy::many_single_char_names)]
    #[allow(non_snake_case)]
    pub mod transform;
    pub mod registry;
    pub mod xyz;
}

#[doc(inline)]
pub use details::color::color_spaces as spaces;
#[doc(inline)]
pub use details::color::{Color, ColorSpace};
#[doc(inline)]
pub use details::converter::Converter;
#[doc(inline)]
pub use details::error::{ColorError, ConversionError};

pub mod prelude {
    pub use crate::details::assembler::{assemble, ConversionData, Pipeline};
    pub use crate::details::cat::ChromaticAdaptationMethod;
    pub use crate::details::color::{
        Color, ColorKind, ColorSpace, IccSide, RgbColorSpace, RgbPrimaries, TransferFunction,
        WhitePoint, YCbCrStandard,
    };
    pub use crate::details::error::{ColorError, ConversionError};
    pub use crate::details::icc::{ClutInterpolation, IccProfile, Pcs, ProfileClass, RenderingIntent};
    pub use crate::details::planner::plan;
    pub use crate::details::registry::PrimitiveId;
    pub use crate::Converter;
}

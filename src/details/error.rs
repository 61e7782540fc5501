//! Error kinds surfaced by the conversion core (spec §7).

use alloc::string::{String, ToString};
use thiserror::Error;

/// Errors raised while canonicalizing a [`crate::details::color::RgbPrimaries`]
/// or [`crate::details::color::WhitePoint`] against a known preset.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorError {
    /// A `Custom` primaries or whitepoint value was asked to canonicalize but
    /// did not match any known preset within tolerance.
    #[error("value does not match any known preset within tolerance")]
    CanonicalizationFailed,
}

/// Errors raised by the Planner, Pipeline Assembler and Converter facade.
///
/// Per spec §7, all variants except [`ConversionError::Disposed`] surface at
/// `Converter` construction time; `Disposed` surfaces only from `convert()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// A required color or profile argument was absent.
    #[error("a required color or profile argument was null")]
    ArgumentNull,

    /// The Planner could not find a valid stage chain between the input and
    /// output color spaces.
    #[error("no conversion path exists between the given color spaces: {reason}")]
    ConversionSetup {
        /// Human-readable explanation of why planning failed.
        reason: String,
    },

    /// An ICC profile's declared tags are internally inconsistent (e.g. a
    /// singular colorant matrix, a malformed CLUT grid).
    #[error("ICC profile invariant violated: {reason}")]
    IccProfileInvariant {
        /// Human-readable explanation of the violated invariant.
        reason: String,
    },

    /// `convert()` was called after `dispose()`.
    #[error("convert() called on a disposed Converter")]
    Disposed,
}

impl From<ColorError> for ConversionError {
    fn from(err: ColorError) -> Self {
        ConversionError::ConversionSetup {
            reason: err.to_string(),
        }
    }
}

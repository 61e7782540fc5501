//! Process-wide configuration (spec §6): default chromatic adaptation
//! method, default rendering intent and default CLUT interpolation.

use crate::details::cat::ChromaticAdaptationMethod;
use crate::details::icc::{ClutInterpolation, RenderingIntent};
use core::sync::atomic::{AtomicU8, Ordering};

static DEFAULT_CAT: AtomicU8 = AtomicU8::new(cat_to_u8(ChromaticAdaptationMethod::Bradford));
static DEFAULT_INTENT: AtomicU8 = AtomicU8::new(intent_to_u8(RenderingIntent::RelativeColorimetric));
static DEFAULT_CLUT_INTERPOLATION_OVERRIDE: AtomicU8 = AtomicU8::new(0);

const fn cat_to_u8(m: ChromaticAdaptationMethod) -> u8 {
    match m {
        ChromaticAdaptationMethod::Bradford => 0,
        ChromaticAdaptationMethod::VonKries => 1,
        ChromaticAdaptationMethod::XyzScaling => 2,
        ChromaticAdaptationMethod::Cat02 => 3,
        ChromaticAdaptationMethod::Sharp => 4,
    }
}

fn u8_to_cat(v: u8) -> ChromaticAdaptationMethod {
    match v {
        0 => ChromaticAdaptationMethod::Bradford,
        1 => ChromaticAdaptationMethod::VonKries,
        2 => ChromaticAdaptationMethod::XyzScaling,
        3 => ChromaticAdaptationMethod::Cat02,
        _ => ChromaticAdaptationMethod::Sharp,
    }
}

const fn intent_to_u8(i: RenderingIntent) -> u8 {
    match i {
        RenderingIntent::Perceptual => 0,
        RenderingIntent::RelativeColorimetric => 1,
        RenderingIntent::Saturation => 2,
        RenderingIntent::AbsoluteColorimetric => 3,
    }
}

fn u8_to_intent(v: u8) -> RenderingIntent {
    match v {
        0 => RenderingIntent::Perceptual,
        2 => RenderingIntent::Saturation,
        3 => RenderingIntent::AbsoluteColorimetric,
        _ => RenderingIntent::RelativeColorimetric,
    }
}

/// Returns the process-wide default chromatic adaptation method.
pub fn default_chromatic_adaptation() -> ChromaticAdaptationMethod {
    u8_to_cat(DEFAULT_CAT.load(Ordering::Relaxed))
}

/// Sets the process-wide default chromatic adaptation method. Only affects
/// `Converter`s constructed afterward (spec §5).
pub fn set_default_chromatic_adaptation(method: ChromaticAdaptationMethod) {
    DEFAULT_CAT.store(cat_to_u8(method), Ordering::Relaxed);
}

/// Returns the process-wide default rendering intent. The Planner consults
/// this when bridging two white points (spec §4.5): every intent but
/// `AbsoluteColorimetric` inserts a chromatic adaptation stage;
/// `AbsoluteColorimetric` leaves the white-point mismatch unadapted, per the
/// ICC convention that it renders relative to the PCS's own fixed reference
/// rather than either medium's white. A profile's tag chains themselves are
/// not selected by this value — this data contract carries one fixed A2B/B2A
/// pair per profile rather than a table keyed by intent.
pub fn default_rendering_intent() -> RenderingIntent {
    u8_to_intent(DEFAULT_INTENT.load(Ordering::Relaxed))
}

/// Sets the process-wide default rendering intent. Only affects
/// `Converter`s constructed afterward (spec §5).
pub fn set_default_rendering_intent(intent: RenderingIntent) {
    DEFAULT_INTENT.store(intent_to_u8(intent), Ordering::Relaxed);
}

/// Returns the process-wide CLUT interpolation override, if one was set via
/// [`set_clut_interpolation`]. `None` means "use the per-CLUT default"
/// (Tetrahedral for 3D grids, NLinear otherwise; spec §6). Consulted by
/// [`crate::details::icc::TagChain::apply`] every time a CLUT stage runs.
pub fn clut_interpolation_override() -> Option<ClutInterpolation> {
    match DEFAULT_CLUT_INTERPOLATION_OVERRIDE.load(Ordering::Relaxed) {
        0 => None,
        1 => Some(ClutInterpolation::Trilinear),
        2 => Some(ClutInterpolation::Tetrahedral),
        _ => Some(ClutInterpolation::NLinear),
    }
}

/// Overrides the CLUT interpolation mode for all grids, regardless of
/// dimensionality. Pass `None` to restore the per-CLUT default.
pub fn set_clut_interpolation(interpolation: Option<ClutInterpolation>) {
    let v = match interpolation {
        None => 0,
        Some(ClutInterpolation::Trilinear) => 1,
        Some(ClutInterpolation::Tetrahedral) => 2,
        Some(ClutInterpolation::NLinear) => 3,
    };
    DEFAULT_CLUT_INTERPOLATION_OVERRIDE.store(v, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        assert_eq!(
            default_chromatic_adaptation(),
            ChromaticAdaptationMethod::Bradford
        );
        assert_eq!(
            default_rendering_intent(),
            RenderingIntent::RelativeColorimetric
        );
        assert_eq!(clut_interpolation_override(), None);
    }
}

//! Conversion Path Registry (spec §4.3): the catalog of primitive
//! conversions available between two [`ColorKind`]s, discovered at process
//! init and mutable afterward (spec §5).
//!
//! This module's mutable, thread-safe global catalog needs `std`
//! (`OnceLock`/`RwLock`/`HashMap`); unlike [`crate::details::config`], there
//! is no `core`-only equivalent, so this is the one module in the crate that
//! cannot participate in a genuine no_std build.

use crate::details::color::ColorKind;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// Identifies one of the built-in primitive transforms in
/// [`crate::details::transform`]. The Pipeline Assembler maps a
/// `PrimitiveId` to the concrete function pointer plus whatever per-stage
/// parameters (white points, matrices, standards) the source/destination
/// color spaces supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveId {
    XyzToLab,
    LabToXyz,
    LabToLch,
    LchToLab,
    XyzToLuv,
    LuvToXyz,
    LuvToLchuv,
    LchuvToLuv,
    XyzToXyy,
    XyyToXyz,
    LinearRgbToXyz,
    XyzToLinearRgb,
    CompandDecode,
    CompandEncode,
    RgbToHsv,
    HsvToRgb,
    RgbToHsl,
    HslToRgb,
    RgbToYCbCr,
    YCbCrToRgb,
    CmykToRgb,
    RgbToCmyk,
    GrayToXyz,
    XyzToGray,
}

fn builtin_paths() -> HashMap<(ColorKind, ColorKind), Vec<PrimitiveId>> {
    use ColorKind::*;
    use PrimitiveId::*;
    let mut map: HashMap<(ColorKind, ColorKind), Vec<PrimitiveId>> = HashMap::new();
    let mut add = |from, to, id| map.entry((from, to)).or_default().push(id);

    add(Xyz, Lab, XyzToLab);
    add(Lab, Xyz, LabToXyz);
    add(Lab, Lch, LabToLch);
    add(Lch, Lab, LchToLab);
    add(Xyz, Luv, XyzToLuv);
    add(Luv, Xyz, LuvToXyz);
    add(Luv, LchUv, LuvToLchuv);
    add(LchUv, Luv, LchuvToLuv);
    add(Xyz, XyY, XyzToXyy);
    add(XyY, Xyz, XyyToXyz);
    add(Rgb, Xyz, LinearRgbToXyz);
    add(Xyz, Rgb, XyzToLinearRgb);
    add(Rgb, Hsv, RgbToHsv);
    add(Hsv, Rgb, HsvToRgb);
    add(Rgb, Hsl, RgbToHsl);
    add(Hsl, Rgb, HslToRgb);
    add(Rgb, YCbCr, RgbToYCbCr);
    add(YCbCr, Rgb, YCbCrToRgb);
    add(Cmyk, Rgb, CmykToRgb);
    add(Rgb, Cmyk, RgbToCmyk);
    add(Gray, Xyz, GrayToXyz);
    add(Xyz, Gray, XyzToGray);

    map
}

/// Process-wide catalog of `(InKind, OutKind) -> [PrimitiveId]`.
///
/// Lazily initialized with a single-winner guarantee (spec §5): the first
/// `Converter` construction (or any direct call to [`paths`]) populates the
/// registry; concurrent first access is safe because [`OnceLock`] only runs
/// the initializer once. `add`/`remove` mutate a shared `RwLock` snapshot;
/// already-assembled `Converter`s hold their own resolved stages and are
/// unaffected (spec §5, §9 "Process-wide registries").
static REGISTRY: OnceLock<RwLock<HashMap<(ColorKind, ColorKind), Vec<PrimitiveId>>>> =
    OnceLock::new();

fn registry() -> &'static RwLock<HashMap<(ColorKind, ColorKind), Vec<PrimitiveId>>> {
    REGISTRY.get_or_init(|| {
        log::debug!("initializing conversion path registry");
        RwLock::new(builtin_paths())
    })
}

/// Returns the registered primitives for `(from, to)`, preferring the first
/// registered path (spec §4.5 tie-break: fewer stages, i.e. a direct
/// primitive, wins over a composed chain when one is registered).
pub fn paths(from: ColorKind, to: ColorKind) -> Vec<PrimitiveId> {
    registry()
        .read()
        .expect("conversion path registry poisoned")
        .get(&(from, to))
        .cloned()
        .unwrap_or_default()
}

/// Registers an additional primitive for `(from, to)`. Idempotent: a
/// duplicate `id` for the same pair is dropped (spec §4.3).
pub fn add_conversion_path(from: ColorKind, to: ColorKind, id: PrimitiveId) {
    let mut guard = registry().write().expect("conversion path registry poisoned");
    let entry = guard.entry((from, to)).or_default();
    if !entry.contains(&id) {
        entry.push(id);
    }
}

/// Removes a primitive previously registered for `(from, to)`, if present.
pub fn remove_conversion_path(from: ColorKind, to: ColorKind, id: PrimitiveId) {
    let mut guard = registry().write().expect("conversion path registry poisoned");
    if let Some(entry) = guard.get_mut(&(from, to)) {
        entry.retain(|existing| *existing != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_xyz_lab_path_is_registered() {
        let found = paths(ColorKind::Xyz, ColorKind::Lab);
        assert!(found.contains(&PrimitiveId::XyzToLab));
    }

    #[test]
    fn add_then_remove_path_round_trips() {
        add_conversion_path(ColorKind::Gray, ColorKind::Lab, PrimitiveId::XyzToLab);
        assert!(paths(ColorKind::Gray, ColorKind::Lab).contains(&PrimitiveId::XyzToLab));
        remove_conversion_path(ColorKind::Gray, ColorKind::Lab, PrimitiveId::XyzToLab);
        assert!(!paths(ColorKind::Gray, ColorKind::Lab).contains(&PrimitiveId::XyzToLab));
    }

    #[test]
    fn duplicate_registration_is_idempotent() {
        let before = paths(ColorKind::Xyz, ColorKind::Lab).len();
        add_conversion_path(ColorKind::Xyz, ColorKind::Lab, PrimitiveId::XyzToLab);
        let after = paths(ColorKind::Xyz, ColorKind::Lab).len();
        assert_eq!(before, after);
    }
}

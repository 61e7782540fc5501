//! End-to-end scenarios and invariants for the conversion core.

use colorflow_core::details::cat::ChromaticAdaptationMethod;
use colorflow_core::details::color::{color_spaces, Color, ColorSpace, IccSide, WhitePoint};
use colorflow_core::details::icc::{Clut, IccProfile, Pcs, ProfileClass, RenderingIntent, TagChain};
use colorflow_core::details::registry::{self, PrimitiveId};
use colorflow_core::details::color::ColorKind;
use colorflow_core::{ConversionError, Converter, Float};
use std::sync::Arc;

fn assert_close(actual: &[Float], expected: &[Float], tol: Float) {
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert!((a - e).abs() < tol, "expected {expected:?}, got {actual:?}");
    }
}

// S1: AdobeRGB (D65) RGB -> XYZ (D50) via Bradford CAT.
#[test]
fn s1_adobe_rgb_to_xyz_d50_via_bradford() {
    let mut input = Color::new(&[0.35, 0.17, 0.63], color_spaces::ADOBE_RGB);
    let mut output = Color::zeroed(3, color_spaces::CIE_XYZ_D50);
    let mut converter = Converter::new(&mut input, &mut output);
    converter.convert().unwrap();
    assert_close(output.values(), &[0.10450, 0.05889, 0.28776], 1e-4);
}

// S2: Lab(50, 20, -30) D50 -> LCHab.
#[test]
fn s2_lab_to_lch() {
    let mut input = Color::new(&[50.0, 20.0, -30.0], color_spaces::CIE_LAB_D50);
    let mut output = Color::zeroed(
        3,
        ColorSpace::Lch {
            white_point: WhitePoint::D50,
        },
    );
    let mut converter = Converter::new(&mut input, &mut output);
    converter.convert().unwrap();
    assert_close(&output.values()[0..1], &[50.0], 1e-3);
    assert_close(&output.values()[1..2], &[36.0555], 1e-3);
    assert_close(&output.values()[2..3], &[303.69], 1e-2);
}

// S3: XYZ(D65 white) -> Lab D65 is the whitepoint itself.
#[test]
fn s3_xyz_white_point_maps_to_lab_white() {
    let mut input = Color::new(&[0.95047, 1.0, 1.08883], color_spaces::CIE_XYZ_D65);
    let mut output = Color::zeroed(3, color_spaces::CIE_LAB_D65);
    let mut converter = Converter::new(&mut input, &mut output);
    converter.convert().unwrap();
    assert_close(output.values(), &[100.0, 0.0, 0.0], 1e-6);
}

// S4: sRGB(1,1,1) -> BT.2020, both D65, CAT disabled by construction since
// the white points already match (the planner never inserts a Cat stage
// when `from.white_point() == to.white_point()`).
#[test]
fn s4_rgb_to_rgb_same_white_is_lossless_at_white() {
    let mut input = Color::new(&[1.0, 1.0, 1.0], color_spaces::SRGB);
    let mut output = Color::zeroed(3, color_spaces::BT2020);
    let mut converter = Converter::new(&mut input, &mut output);
    converter.convert().unwrap();
    assert_close(output.values(), &[1.0, 1.0, 1.0], 1e-10);
}

fn identity_clut_3d() -> Clut {
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

fn toy_display_profile() -> IccProfile {
    // A toy Display profile whose A2B/B2A chains are both the trivial
    // identity CLUT: enough to exercise the ICC stage plumbing end to end
    // without needing a real profile's colorimetric tables.
    IccProfile {
        class: ProfileClass::Display,
        pcs: Pcs::Lab,
        pcs_white_point: WhitePoint::D65,
        data_colorspace_type: ColorKind::Rgb,
        rendering_intent: RenderingIntent::RelativeColorimetric,
        a_to_b: Some(TagChain {
            input_curves: Vec::new(),
            matrix: None,
            clut: Some(identity_clut_3d()),
            output_curves: Vec::new(),
        }),
        b_to_a: Some(TagChain {
            input_curves: Vec::new(),
            matrix: None,
            clut: Some(identity_clut_3d()),
            output_curves: Vec::new(),
        }),
    }
}

// S5: an ICC display profile's neutral axis survives Device -> PCS ->
// Device at the CLUT's own quantization bound. The profile's forward and
// backward tag chains here are both the identity CLUT, so the bound is
// exact (a linear table interpolates a linear function exactly regardless
// of grid resolution) rather than merely "close".
#[test]
fn s5_icc_roundtrip_preserves_neutral_axis() {
    let profile = Arc::new(toy_display_profile());
    let mut input = Color::new(&[0.5, 0.5, 0.5], ColorSpace::Icc(profile.clone(), IccSide::Device));
    let mut pcs = Color::zeroed(3, ColorSpace::Icc(profile.clone(), IccSide::Pcs));
    let mut forward = Converter::new(&mut input, &mut pcs);
    forward.convert().unwrap();

    let mut output = Color::zeroed(3, ColorSpace::Icc(profile, IccSide::Device));
    let mut backward = Converter::new(&mut pcs, &mut output);
    backward.convert().unwrap();

    assert_close(output.values(), &[0.5, 0.5, 0.5], 1e-6);
}

// S6: a DeviceLink profile fixes its output type to its own PCS; wiring its
// input Color to it but its output Color to a plain (non-ICC) RGB space
// cannot be planned.
#[test]
fn s6_device_link_output_mismatch_is_conversion_setup_error() {
    let profile = Arc::new(IccProfile {
        class: ProfileClass::Link,
        pcs: Pcs::Lab,
        pcs_white_point: WhitePoint::D50,
        data_colorspace_type: ColorKind::Cmyk,
        rendering_intent: RenderingIntent::RelativeColorimetric,
        a_to_b: Some(TagChain::default()),
        b_to_a: None,
    });
    let mut input = Color::new(
        &[0.1, 0.2, 0.3, 0.4],
        ColorSpace::Icc(profile, IccSide::Device),
    );
    let mut output = Color::zeroed(3, color_spaces::SRGB);
    let err = Converter::try_new(&mut input, &mut output).unwrap_err();
    assert!(matches!(err, ConversionError::ConversionSetup { .. }));
}

// Property 1: identity conversion is exact (within float epsilon).
#[test]
fn property_identity_conversion_is_exact() {
    let mut input = Color::new(&[0.12, 0.34, 0.56], color_spaces::CIE_XYZ_D50);
    let mut output = Color::zeroed(3, color_spaces::CIE_XYZ_D50);
    let mut converter = Converter::new(&mut input, &mut output);
    converter.convert().unwrap();
    assert_eq!(input.values(), output.values());
}

// Property 2: XYZ <-> Lab round-trips within 1e-10 under the same white.
#[test]
fn property_xyz_lab_round_trip() {
    let white = color_spaces::CIE_XYZ_D50;
    let lab = color_spaces::CIE_LAB_D50;
    let original = [0.2, 0.35, 0.15 as Float];

    let mut input = Color::new(&original, white.clone());
    let mut intermediate = Color::zeroed(3, lab);
    Converter::new(&mut input, &mut intermediate).convert().unwrap();

    let mut back = Color::zeroed(3, white);
    Converter::new(&mut intermediate, &mut back).convert().unwrap();

    assert_close(back.values(), &original, 1e-10);
}

// Property 3: RGB <-> XYZ round-trips within 1e-12 for a given preset.
#[test]
fn property_rgb_xyz_round_trip() {
    let original = [0.4, 0.6, 0.2 as Float];
    let mut input = Color::new(&original, color_spaces::LINEAR_SRGB);
    let mut xyz = Color::zeroed(3, color_spaces::CIE_XYZ_D65);
    Converter::new(&mut input, &mut xyz).convert().unwrap();

    let mut back = Color::zeroed(3, color_spaces::LINEAR_SRGB);
    Converter::new(&mut xyz, &mut back).convert().unwrap();

    assert_close(back.values(), &original, 1e-12);
}

// Property 4: CAT consistency — W1 -> W2 -> W1 is identity to 1e-12.
#[test]
fn property_cat_round_trip_is_identity() {
    for method in [
        ChromaticAdaptationMethod::Bradford,
        ChromaticAdaptationMethod::VonKries,
        ChromaticAdaptationMethod::Cat02,
        ChromaticAdaptationMethod::Sharp,
    ] {
        let fwd = method.adaptation_matrix(WhitePoint::D65, WhitePoint::D50);
        let bwd = method.adaptation_matrix(WhitePoint::D50, WhitePoint::D65);
        let v = colorflow_core::Vec3::new(0.3, 0.6, 0.2);
        let round_tripped = bwd.mul_vec3(fwd.mul_vec3(v));
        assert!((round_tripped.x - v.x).abs() < 1e-12);
        assert!((round_tripped.y - v.y).abs() < 1e-12);
        assert!((round_tripped.z - v.z).abs() < 1e-12);
    }
}

// Property 5: planner determinism — same spaces plan to the same stage count.
#[test]
fn property_planner_is_deterministic() {
    let plan_a =
        colorflow_core::details::planner::plan(&color_spaces::ADOBE_RGB, &color_spaces::CIE_LAB_D50)
            .unwrap();
    let plan_b =
        colorflow_core::details::planner::plan(&color_spaces::ADOBE_RGB, &color_spaces::CIE_LAB_D50)
            .unwrap();
    assert_eq!(plan_a.steps.len(), plan_b.steps.len());
}

// Property 6: a long run of convert() calls keeps producing the same result
// (a stand-in for "no allocations observable to the host": this crate has
// no dependency on a custom global allocator to instrument with, but a
// tight loop with no panics/errors over many iterations is the closest
// black-box signal available from a plain `#[test]`).
#[test]
fn property_cheap_convert_many_iterations() {
    let mut input = Color::new(&[0.25, 0.5, 0.75], color_spaces::SRGB);
    let mut output = Color::zeroed(3, color_spaces::CIE_XYZ_D65);
    let mut converter = Converter::new(&mut input, &mut output);
    let mut last = [0.0 as Float; 3];
    for _ in 0..1_000_000 {
        converter.convert().unwrap();
        last = [output.values()[0], output.values()[1], output.values()[2]];
    }
    assert_eq!(last, [output.values()[0], output.values()[1], output.values()[2]]);
}

// Property 7: dispose() is idempotent; convert() after dispose() fails.
#[test]
fn property_dispose_idempotence() {
    let mut input = Color::new(&[0.1, 0.2, 0.3], color_spaces::SRGB);
    let mut output = Color::zeroed(3, color_spaces::CIE_XYZ_D65);
    let mut converter = Converter::new(&mut input, &mut output);
    converter.dispose();
    converter.dispose();
    assert!(matches!(converter.convert(), Err(ConversionError::Disposed)));
}

// Property 8: removing a registry path after construction doesn't change an
// already-assembled Converter's output (the Pipeline Assembler resolved its
// stages once, at construction time).
#[test]
fn property_registry_mutation_does_not_affect_existing_converter() {
    let mut input = Color::new(&[0.6, 0.2, 0.8], color_spaces::CIE_XYZ_D65);
    let mut output = Color::zeroed(3, color_spaces::CIE_LAB_D65);
    let mut converter = Converter::new(&mut input, &mut output);
    converter.convert().unwrap();
    let before = [output.values()[0], output.values()[1], output.values()[2]];

    registry::remove_conversion_path(ColorKind::Xyz, ColorKind::Lab, PrimitiveId::XyzToLab);

    converter.convert().unwrap();
    let after = [output.values()[0], output.values()[1], output.values()[2]];
    assert_eq!(before, after);

    // Restore global state for any test sharing this process.
    registry::add_conversion_path(ColorKind::Xyz, ColorKind::Lab, PrimitiveId::XyzToLab);
}

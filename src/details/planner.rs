//! Planner (spec §4.5): given an input and output [`ColorSpace`], decides
//! the ordered sequence of primitives, ICC stages and CAT steps needed to
//! bridge them, enumerated by profile presence exactly as spec §4.5 lays
//! out. Resolving a [`crate::details::registry::PrimitiveId`] into concrete
//! numbers (matrices, curves) is the Pipeline Assembler's job, not this
//! one — the Planner only decides *which* primitives and in what order.

use crate::details::color::{ColorKind, ColorSpace, IccSide};
use crate::details::config::{default_chromatic_adaptation, default_rendering_intent};
use crate::details::error::ConversionError;
use crate::details::icc::{IccProfile, ProfileClass, RenderingIntent};
use crate::details::plan::{Plan, PlanStep, Slot, Stage};
use crate::details::registry::{self, PrimitiveId};
use alloc::format;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

fn setup_error(reason: &str) -> ConversionError {
    ConversionError::ConversionSetup {
        reason: reason.into(),
    }
}

fn lookup(from: ColorKind, to: ColorKind) -> Result<PrimitiveId, ConversionError> {
    registry::paths(from, to).into_iter().next().ok_or_else(|| {
        setup_error(&format!(
            "no primitive transform is registered for {from:?} -> {to:?}"
        ))
    })
}

/// A `(Stage, write_channels)` pair not yet wired to concrete `Slot`s.
type RawStage = (Stage, usize);

/// Builds the chain of stages carrying `space`'s values down to CIE XYZ
/// under `space`'s own reference white point (spec §4.1 primitive library,
/// §4.5 "route via XYZ").
fn chain_to_xyz(space: &ColorSpace) -> Result<Vec<RawStage>, ConversionError> {
    use ColorSpace::*;
    match space {
        Xyz { .. } => Ok(Vec::new()),
        Rgb(_) => Ok(vec![
            (
                Stage::Primitive(PrimitiveId::CompandDecode, space.clone()),
                3,
            ),
            (
                Stage::Primitive(PrimitiveId::LinearRgbToXyz, space.clone()),
                3,
            ),
        ]),
        Lab { .. } => {
            let id = lookup(ColorKind::Lab, ColorKind::Xyz)?;
            Ok(vec![(Stage::Primitive(id, space.clone()), 3)])
        }
        Lch { white_point } => {
            let id = lookup(ColorKind::Lch, ColorKind::Lab)?;
            let mut steps = vec![(Stage::Primitive(id, space.clone()), 3)];
            steps.extend(chain_to_xyz(&ColorSpace::Lab {
                white_point: *white_point,
            })?);
            Ok(steps)
        }
        Luv { .. } => {
            let id = lookup(ColorKind::Luv, ColorKind::Xyz)?;
            Ok(vec![(Stage::Primitive(id, space.clone()), 3)])
        }
        LchUv { white_point } => {
            let id = lookup(ColorKind::LchUv, ColorKind::Luv)?;
            let mut steps = vec![(Stage::Primitive(id, space.clone()), 3)];
            steps.extend(chain_to_xyz(&ColorSpace::Luv {
                white_point: *white_point,
            })?);
            Ok(steps)
        }
        XyY { .. } => {
            let id = lookup(ColorKind::XyY, ColorKind::Xyz)?;
            Ok(vec![(Stage::Primitive(id, space.clone()), 3)])
        }
        Gray { .. } => {
            let id = lookup(ColorKind::Gray, ColorKind::Xyz)?;
            Ok(vec![(Stage::Primitive(id, space.clone()), 3)])
        }
        Hsv { reference } => {
            // HsvToRgb yields linear RGB directly (transform::hsv_to_rgb),
            // so the reference space's own companding is skipped here.
            let id = lookup(ColorKind::Hsv, ColorKind::Rgb)?;
            Ok(vec![
                (Stage::Primitive(id, space.clone()), 3),
                (
                    Stage::Primitive(PrimitiveId::LinearRgbToXyz, reference.as_ref().clone()),
                    3,
                ),
            ])
        }
        Hsl { reference } => {
            let id = lookup(ColorKind::Hsl, ColorKind::Rgb)?;
            Ok(vec![
                (Stage::Primitive(id, space.clone()), 3),
                (
                    Stage::Primitive(PrimitiveId::LinearRgbToXyz, reference.as_ref().clone()),
                    3,
                ),
            ])
        }
        YCbCr { reference, .. } => {
            let id = lookup(ColorKind::YCbCr, ColorKind::Rgb)?;
            let mut steps = vec![(Stage::Primitive(id, space.clone()), 3)];
            steps.extend(chain_to_xyz(reference)?);
            Ok(steps)
        }
        Cmyk { reference } => {
            let id = lookup(ColorKind::Cmyk, ColorKind::Rgb)?;
            let mut steps = vec![(Stage::Primitive(id, space.clone()), 3)];
            steps.extend(chain_to_xyz(reference)?);
            Ok(steps)
        }
        Icc(..) => Err(setup_error(
            "an ICC-backed color space routes through IccForward/IccBackward stages, not the primitive chain",
        )),
    }
}

/// Builds the chain of stages carrying a CIE XYZ value (under `space`'s own
/// reference white point) up to `space`'s values — the mirror of
/// [`chain_to_xyz`].
fn chain_from_xyz(space: &ColorSpace) -> Result<Vec<RawStage>, ConversionError> {
    use ColorSpace::*;
    match space {
        Xyz { .. } => Ok(Vec::new()),
        Rgb(_) => Ok(vec![
            (
                Stage::Primitive(PrimitiveId::XyzToLinearRgb, space.clone()),
                3,
            ),
            (
                Stage::Primitive(PrimitiveId::CompandEncode, space.clone()),
                3,
            ),
        ]),
        Lab { .. } => {
            let id = lookup(ColorKind::Xyz, ColorKind::Lab)?;
            Ok(vec![(Stage::Primitive(id, space.clone()), 3)])
        }
        Lch { white_point } => {
            let mut steps = chain_from_xyz(&ColorSpace::Lab {
                white_point: *white_point,
            })?;
            let id = lookup(ColorKind::Lab, ColorKind::Lch)?;
            steps.push((Stage::Primitive(id, space.clone()), 3));
            Ok(steps)
        }
        Luv { .. } => {
            let id = lookup(ColorKind::Xyz, ColorKind::Luv)?;
            Ok(vec![(Stage::Primitive(id, space.clone()), 3)])
        }
        LchUv { white_point } => {
            let mut steps = chain_from_xyz(&ColorSpace::Luv {
                white_point: *white_point,
            })?;
            let id = lookup(ColorKind::Luv, ColorKind::LchUv)?;
            steps.push((Stage::Primitive(id, space.clone()), 3));
            Ok(steps)
        }
        XyY { .. } => {
            let id = lookup(ColorKind::Xyz, ColorKind::XyY)?;
            Ok(vec![(Stage::Primitive(id, space.clone()), 3)])
        }
        Gray { .. } => {
            let id = lookup(ColorKind::Xyz, ColorKind::Gray)?;
            Ok(vec![(Stage::Primitive(id, space.clone()), 1)])
        }
        Hsv { reference } => {
            // XyzToLinearRgb feeds RgbToHsv linear RGB directly (transform::
            // rgb_to_hsv), skipping the reference space's own companding.
            let id = lookup(ColorKind::Rgb, ColorKind::Hsv)?;
            Ok(vec![
                (
                    Stage::Primitive(PrimitiveId::XyzToLinearRgb, reference.as_ref().clone()),
                    3,
                ),
                (Stage::Primitive(id, space.clone()), 3),
            ])
        }
        Hsl { reference } => {
            let id = lookup(ColorKind::Rgb, ColorKind::Hsl)?;
            Ok(vec![
                (
                    Stage::Primitive(PrimitiveId::XyzToLinearRgb, reference.as_ref().clone()),
                    3,
                ),
                (Stage::Primitive(id, space.clone()), 3),
            ])
        }
        YCbCr { reference, .. } => {
            let mut steps = chain_from_xyz(reference)?;
            let id = lookup(ColorKind::Rgb, ColorKind::YCbCr)?;
            steps.push((Stage::Primitive(id, space.clone()), 3));
            Ok(steps)
        }
        Cmyk { reference } => {
            let mut steps = chain_from_xyz(reference)?;
            let id = lookup(ColorKind::Rgb, ColorKind::Cmyk)?;
            steps.push((Stage::Primitive(id, space.clone()), 4));
            Ok(steps)
        }
        Icc(..) => Err(setup_error(
            "an ICC-backed color space routes through IccForward/IccBackward stages, not the primitive chain",
        )),
    }
}

/// The full `from -> XYZ -> (CAT) -> XYZ -> to` stage list, inserting CAT
/// only when the two sides' reference white points differ (spec §4.5) *and*
/// the process-wide default rendering intent (spec §6) calls for it:
/// AbsoluteColorimetric preserves the two media's white-point mismatch as a
/// measured color cast rather than adapting it away, so it skips the CAT
/// stage entirely; every other intent adapts.
fn stage_list_via_xyz(from: &ColorSpace, to: &ColorSpace) -> Result<Vec<RawStage>, ConversionError> {
    let mut stages = chain_to_xyz(from)?;
    if let (Some(w1), Some(w2)) = (from.white_point(), to.white_point()) {
        if w1 != w2 && default_rendering_intent() != RenderingIntent::AbsoluteColorimetric {
            stages.push((
                Stage::Cat {
                    from: w1,
                    to: w2,
                    method: default_chromatic_adaptation(),
                },
                3,
            ));
        }
    }
    stages.extend(chain_from_xyz(to)?);
    Ok(stages)
}

/// Wires a flat `(Stage, write_channels)` list into a [`Plan`], ping-ponging
/// intermediate values through the two temp slots (spec §4.6: at most two
/// temporaries are ever needed, since each stage only depends on the one
/// immediately before it).
fn wire(stages: Vec<RawStage>, in_channels: usize, out_channels: usize) -> Plan {
    if stages.is_empty() {
        return Plan::new(vec![PlanStep {
            read: Slot::In,
            read_channels: in_channels,
            stage: Stage::Assign,
            write: Slot::Out,
            write_channels: out_channels,
        }]);
    }
    let n = stages.len();
    let mut steps = Vec::with_capacity(n);
    let mut read = Slot::In;
    let mut read_channels = in_channels;
    for (i, (stage, write_channels)) in stages.into_iter().enumerate() {
        let write = if i + 1 == n {
            Slot::Out
        } else if i % 2 == 0 {
            Slot::Temp(0)
        } else {
            Slot::Temp(1)
        };
        steps.push(PlanStep {
            read,
            read_channels,
            stage,
            write,
            write_channels,
        });
        read = write;
        read_channels = write_channels;
    }
    Plan::new(steps)
}

/// A synthetic, un-wrapped [`ColorSpace`] standing in for one side of an
/// ICC profile (its PCS) so the primitive chain builders above can route to
/// or from it exactly as they would a plain color space.
fn pcs_colorspace(profile: &IccProfile) -> ColorSpace {
    match profile.pcs {
        crate::details::icc::Pcs::Xyz => ColorSpace::Xyz {
            white_point: profile.pcs_white_point,
        },
        crate::details::icc::Pcs::Lab => ColorSpace::Lab {
            white_point: profile.pcs_white_point,
        },
    }
}

/// Builds a synthetic non-ICC [`ColorSpace`] for `kind`, when that's
/// possible without data this core doesn't have (spec §1: device colorant
/// primaries are out of scope for the data contract this crate consumes).
fn synthetic_space_for(kind: ColorKind, profile: &IccProfile) -> Result<ColorSpace, ConversionError> {
    match kind {
        ColorKind::Xyz => Ok(ColorSpace::Xyz {
            white_point: profile.pcs_white_point,
        }),
        ColorKind::Lab => Ok(ColorSpace::Lab {
            white_point: profile.pcs_white_point,
        }),
        other => Err(setup_error(&format!(
            "bridging a non-ICC color space to an ICC profile's device colorspace ({other:?}) requires device primaries this profile does not carry"
        ))),
    }
}

/// Neither `in_space` nor `out_space` is ICC-backed (spec §4.5 "Neither
/// side is ICC").
fn plan_neither_icc(in_space: &ColorSpace, out_space: &ColorSpace) -> Result<Plan, ConversionError> {
    if in_space == out_space {
        let ch = in_space.kind().channels();
        return Ok(Plan::new(vec![PlanStep {
            read: Slot::In,
            read_channels: ch,
            stage: Stage::Assign,
            write: Slot::Out,
            write_channels: ch,
        }]));
    }
    let stages = stage_list_via_xyz(in_space, out_space)?;
    Ok(wire(
        stages,
        in_space.kind().channels(),
        out_space.kind().channels(),
    ))
}

enum IccDirection {
    Forward,
    Backward,
}

/// Exactly one of `in_space`/`out_space` is ICC-backed (spec §4.5 "One side
/// is ICC").
fn plan_one_icc(in_space: &ColorSpace, out_space: &ColorSpace) -> Result<Plan, ConversionError> {
    let (profile, side, icc_is_input): (Arc<IccProfile>, IccSide, bool) = match (in_space, out_space)
    {
        (ColorSpace::Icc(p, s), _) => (p.clone(), *s, true),
        (_, ColorSpace::Icc(p, s)) => (p.clone(), *s, false),
        _ => unreachable!("plan_one_icc requires exactly one ICC-backed side"),
    };

    match profile.class {
        ProfileClass::Abstract => {
            let other = if icc_is_input { out_space } else { in_space };
            if other.kind() != profile.pcs_type() {
                return Err(setup_error(
                    "an Abstract profile requires the non-ICC side to be its PCS type",
                ));
            }
            let ch = other.kind().channels();
            Ok(Plan::new(vec![PlanStep {
                read: Slot::In,
                read_channels: in_space.kind().channels(),
                stage: Stage::IccForward(profile),
                write: Slot::Out,
                write_channels: ch,
            }]))
        }
        ProfileClass::Link => {
            if in_space.kind() == profile.data_colorspace_type && out_space.kind() == profile.pcs_type()
            {
                let ch = out_space.kind().channels();
                Ok(Plan::new(vec![PlanStep {
                    read: Slot::In,
                    read_channels: in_space.kind().channels(),
                    stage: Stage::IccForward(profile),
                    write: Slot::Out,
                    write_channels: ch,
                }]))
            } else {
                Err(setup_error(
                    "a DeviceLink profile fixes its input to its data colorspace and its output to its PCS",
                ))
            }
        }
        _ => {
            let (direction, required_other_kind, other_is_output) = match (side, icc_is_input) {
                (IccSide::Device, true) => (IccDirection::Forward, profile.pcs_type(), true),
                (IccSide::Device, false) => (IccDirection::Backward, profile.pcs_type(), false),
                (IccSide::Pcs, true) => (IccDirection::Backward, profile.data_colorspace_type, true),
                (IccSide::Pcs, false) => (IccDirection::Forward, profile.data_colorspace_type, false),
            };
            let icc_stage = match direction {
                IccDirection::Forward => Stage::IccForward(profile.clone()),
                IccDirection::Backward => Stage::IccBackward(profile.clone()),
            };
            let other_space = if other_is_output { out_space } else { in_space };

            if other_space.kind() == required_other_kind {
                let ch = out_space.kind().channels();
                return Ok(Plan::new(vec![PlanStep {
                    read: Slot::In,
                    read_channels: in_space.kind().channels(),
                    stage: icc_stage,
                    write: Slot::Out,
                    write_channels: ch,
                }]));
            }

            let synthetic = synthetic_space_for(required_other_kind, &profile)?;
            let stages = if other_is_output {
                let mut stages = vec![(icc_stage, required_other_kind.channels())];
                stages.extend(stage_list_via_xyz(&synthetic, out_space)?);
                stages
            } else {
                let mut stages = stage_list_via_xyz(in_space, &synthetic)?;
                stages.push((icc_stage, out_space.kind().channels()));
                stages
            };
            Ok(wire(
                stages,
                in_space.kind().channels(),
                out_space.kind().channels(),
            ))
        }
    }
}

/// Both `in_space` and `out_space` are ICC-backed (spec §4.5 "Both sides
/// are ICC").
fn plan_both_icc(in_space: &ColorSpace, out_space: &ColorSpace) -> Result<Plan, ConversionError> {
    let (p1, _s1) = match in_space {
        ColorSpace::Icc(p, s) => (p.clone(), *s),
        _ => unreachable!(),
    };
    let (p2, _s2) = match out_space {
        ColorSpace::Icc(p, s) => (p.clone(), *s),
        _ => unreachable!(),
    };
    let in_type = in_space.kind();
    let out_type = out_space.kind();
    let in_ch = in_type.channels();
    let out_ch = out_type.channels();

    if p1.class == ProfileClass::Abstract || p2.class == ProfileClass::Abstract {
        if p1.class == ProfileClass::Abstract
            && p2.class == ProfileClass::Abstract
            && p1.pcs == p2.pcs
            && in_type == p1.pcs_type()
            && out_type == in_type
        {
            let stages = vec![
                (Stage::IccForward(p1), in_type.channels()),
                (Stage::IccForward(p2), out_ch),
            ];
            return Ok(wire(stages, in_ch, out_ch));
        }
        return Err(setup_error(
            "chaining two ICC profiles where either is Abstract requires both to be Abstract with matching PCS",
        ));
    }

    if p1.class == ProfileClass::Link || p2.class == ProfileClass::Link {
        if p1.class == ProfileClass::Link
            && p2.class == ProfileClass::Link
            && p1.pcs == p2.pcs
            && p1.data_colorspace_type == p2.data_colorspace_type
            && in_type == p1.data_colorspace_type
            && out_type == p1.pcs_type()
        {
            return Ok(Plan::new(vec![PlanStep {
                read: Slot::In,
                read_channels: in_ch,
                stage: Stage::IccForward(p1),
                write: Slot::Out,
                write_channels: out_ch,
            }]));
        }
        return Err(setup_error(
            "chaining two ICC profiles where either is a DeviceLink requires both to be DeviceLink with matching PCS and data colorspace",
        ));
    }

    let in_is_data = in_type == p1.data_colorspace_type;
    let in_is_pcs = in_type == p1.pcs_type();
    let out_is_data = out_type == p2.data_colorspace_type;
    let out_is_pcs = out_type == p2.pcs_type();

    match (in_is_data, out_is_data, in_is_pcs, out_is_pcs) {
        (true, true, _, _) => {
            // Data -> Data
            if p1.pcs == p2.pcs {
                let stages = vec![
                    (Stage::IccForward(p1.clone()), p1.pcs_type().channels()),
                    (Stage::IccBackward(p2), out_ch),
                ];
                Ok(wire(stages, in_ch, out_ch))
            } else {
                let pcs1 = pcs_colorspace(&p1);
                let pcs2 = pcs_colorspace(&p2);
                let mut stages = vec![(Stage::IccForward(p1), pcs1.kind().channels())];
                stages.extend(stage_list_via_xyz(&pcs1, &pcs2)?);
                stages.push((Stage::IccBackward(p2), out_ch));
                Ok(wire(stages, in_ch, out_ch))
            }
        }
        (true, false, _, true) => {
            // Data -> PCS
            if p1.pcs == p2.pcs {
                Ok(Plan::new(vec![PlanStep {
                    read: Slot::In,
                    read_channels: in_ch,
                    stage: Stage::IccForward(p1),
                    write: Slot::Out,
                    write_channels: out_ch,
                }]))
            } else {
                let pcs1 = pcs_colorspace(&p1);
                let mut stages = vec![(Stage::IccForward(p1), pcs1.kind().channels())];
                stages.extend(stage_list_via_xyz(&pcs1, out_space)?);
                Ok(wire(stages, in_ch, out_ch))
            }
        }
        (false, true, true, _) => {
            // PCS -> Data
            if p1.pcs == p2.pcs {
                Ok(Plan::new(vec![PlanStep {
                    read: Slot::In,
                    read_channels: in_ch,
                    stage: Stage::IccBackward(p2),
                    write: Slot::Out,
                    write_channels: out_ch,
                }]))
            } else {
                let pcs2 = pcs_colorspace(&p2);
                let mut stages = stage_list_via_xyz(in_space, &pcs2)?;
                stages.push((Stage::IccBackward(p2), out_ch));
                Ok(wire(stages, in_ch, out_ch))
            }
        }
        (false, false, true, true) => {
            // PCS -> PCS
            if in_space == out_space {
                Ok(Plan::new(vec![PlanStep {
                    read: Slot::In,
                    read_channels: in_ch,
                    stage: Stage::Assign,
                    write: Slot::Out,
                    write_channels: out_ch,
                }]))
            } else {
                let pcs1 = pcs_colorspace(&p1);
                let pcs2 = pcs_colorspace(&p2);
                let stages = stage_list_via_xyz(&pcs1, &pcs2)?;
                Ok(wire(stages, in_ch, out_ch))
            }
        }
        _ => Err(setup_error(
            "neither color's type matches its own profile's data colorspace or PCS",
        )),
    }
}

/// Decides the ordered sequence of stages bridging `in_space` to
/// `out_space` (spec §4.5). Fails with [`ConversionError::ConversionSetup`]
/// when no valid chain exists.
pub fn plan(in_space: &ColorSpace, out_space: &ColorSpace) -> Result<Plan, ConversionError> {
    log::debug!(
        "planning conversion: {:?} -> {:?}",
        in_space.kind(),
        out_space.kind()
    );
    match (in_space, out_space) {
        (ColorSpace::Icc(..), ColorSpace::Icc(..)) => plan_both_icc(in_space, out_space),
        (ColorSpace::Icc(..), _) | (_, ColorSpace::Icc(..)) => plan_one_icc(in_space, out_space),
        _ => plan_neither_icc(in_space, out_space),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::color::color_spaces;

    #[test]
    fn identical_spaces_plan_to_a_single_assign() {
        let plan = plan(&color_spaces::SRGB, &color_spaces::SRGB).unwrap();
        assert_eq!(plan.steps.len(), 1);
        assert!(matches!(plan.steps[0].stage, Stage::Assign));
    }

    #[test]
    fn rgb_to_rgb_same_white_has_no_cat_stage() {
        // sRGB and BT.2020 share a D65 white point (spec S4).
        let plan = plan(&color_spaces::SRGB, &color_spaces::BT2020).unwrap();
        assert!(!plan.steps.iter().any(|s| matches!(s.stage, Stage::Cat { .. })));
    }

    #[test]
    fn rgb_to_rgb_different_white_inserts_cat() {
        // sRGB (D65) to ProPhoto (D50) must adapt (spec S1-style crossing).
        let plan = plan(&color_spaces::SRGB, &color_spaces::PRO_PHOTO).unwrap();
        assert!(plan.steps.iter().any(|s| matches!(s.stage, Stage::Cat { .. })));
    }

    #[test]
    fn planner_is_deterministic() {
        let p1 = plan(&color_spaces::ADOBE_RGB, &color_spaces::CIE_XYZ_D50).unwrap();
        let p2 = plan(&color_spaces::ADOBE_RGB, &color_spaces::CIE_XYZ_D50).unwrap();
        assert_eq!(p1.steps.len(), p2.steps.len());
    }

    #[test]
    fn lab_to_lch_is_a_single_primitive_step() {
        let plan = plan(&color_spaces::CIE_LAB_D50, &color_spaces::CIE_XYZ_D50).unwrap();
        assert_eq!(plan.steps.len(), 1);
    }

    #[test]
    fn absolute_colorimetric_skips_cat_stage() {
        use crate::details::config::set_default_rendering_intent;

        let previous = default_rendering_intent();
        set_default_rendering_intent(RenderingIntent::AbsoluteColorimetric);
        let plan = plan(&color_spaces::SRGB, &color_spaces::PRO_PHOTO);
        set_default_rendering_intent(previous);

        assert!(!plan
            .unwrap()
            .steps
            .iter()
            .any(|s| matches!(s.stage, Stage::Cat { .. })));
    }
}

//! Pipeline Assembler (spec §4.6): turns a symbolic [`Plan`] into a
//! [`Pipeline`] whose stages carry pre-resolved numeric parameters
//! (matrices, white points, transfer functions), so that running it does
//! no planning, no registry lookups and no per-call allocation for the
//! primitive-transform stages.

use crate::details::cat::ChromaticAdaptationMethod;
use crate::details::color::{ColorSpace, WhitePoint};
use crate::details::error::ConversionError;
use crate::details::icc::IccProfile;
use crate::details::plan::{Plan, Slot, Stage};
use crate::details::registry::PrimitiveId;
use crate::details::transform;
use crate::details::color::{TransferFunction, YCbCrStandard};
use crate::{Float, Mat3};
use alloc::sync::Arc;
use alloc::vec::Vec;

fn setup_error(reason: &str) -> ConversionError {
    ConversionError::ConversionSetup {
        reason: reason.into(),
    }
}

/// A [`PrimitiveId`] with its numeric parameters baked in, resolved once at
/// assembly time from the [`ColorSpace`] the Planner attached to its
/// [`Stage::Primitive`] (spec §4.6).
#[derive(Debug, Clone)]
enum ResolvedPrimitive {
    XyzToLab { white: [Float; 3] },
    LabToXyz { white: [Float; 3] },
    LabToLch,
    LchToLab,
    XyzToLuv { white: [Float; 3] },
    LuvToXyz { white: [Float; 3] },
    LuvToLchuv,
    LchuvToLuv,
    XyzToXyy { white: [Float; 3] },
    XyyToXyz,
    LinearRgbToXyz { matrix: Mat3 },
    XyzToLinearRgb { matrix: Mat3 },
    CompandDecode { transfer: TransferFunction },
    CompandEncode { transfer: TransferFunction },
    RgbToHsv,
    HsvToRgb,
    RgbToHsl,
    HslToRgb,
    RgbToYCbCr { standard: YCbCrStandard },
    YCbCrToRgb { standard: YCbCrStandard },
    CmykToRgb,
    RgbToCmyk,
    GrayToXyz { white: [Float; 3] },
    XyzToGray { white: [Float; 3] },
}

impl ResolvedPrimitive {
    /// Applies this primitive to `input`, writing its result into the low
    /// channels of a fixed 4-wide scratch array (the core's widest color is
    /// CMYK). No heap allocation: every primitive in
    /// [`crate::details::transform`] operates on fixed-size arrays.
    fn apply(&self, input: &[Float]) -> [Float; 4] {
        let mut out = [0.0 as Float; 4];
        match self {
            ResolvedPrimitive::XyzToLab { white } => {
                out[..3].copy_from_slice(&transform::xyz_to_lab(xyz3(input), *white));
            }
            ResolvedPrimitive::LabToXyz { white } => {
                out[..3].copy_from_slice(&transform::lab_to_xyz(xyz3(input), *white));
            }
            ResolvedPrimitive::LabToLch => {
                out[..3].copy_from_slice(&transform::lab_to_lch(xyz3(input)));
            }
            ResolvedPrimitive::LchToLab => {
                out[..3].copy_from_slice(&transform::lch_to_lab(xyz3(input)));
            }
            ResolvedPrimitive::XyzToLuv { white } => {
                out[..3].copy_from_slice(&transform::xyz_to_luv(xyz3(input), *white));
            }
            ResolvedPrimitive::LuvToXyz { white } => {
                out[..3].copy_from_slice(&transform::luv_to_xyz(xyz3(input), *white));
            }
            ResolvedPrimitive::LuvToLchuv => {
                out[..3].copy_from_slice(&transform::luv_to_lchuv(xyz3(input)));
            }
            ResolvedPrimitive::LchuvToLuv => {
                out[..3].copy_from_slice(&transform::lchuv_to_luv(xyz3(input)));
            }
            ResolvedPrimitive::XyzToXyy { white } => {
                out[..3].copy_from_slice(&transform::xyz_to_xyy(xyz3(input), *white));
            }
            ResolvedPrimitive::XyyToXyz => {
                out[..3].copy_from_slice(&transform::xyy_to_xyz(xyz3(input)));
            }
            ResolvedPrimitive::LinearRgbToXyz { matrix } => {
                let v = matrix.mul_vec3(crate::Vec3::from_array(xyz3(input)));
                out[..3].copy_from_slice(&[v.x, v.y, v.z]);
            }
            ResolvedPrimitive::XyzToLinearRgb { matrix } => {
                let v = matrix.mul_vec3(crate::Vec3::from_array(xyz3(input)));
                out[..3].copy_from_slice(&[v.x, v.y, v.z]);
            }
            ResolvedPrimitive::CompandDecode { transfer } => {
                for i in 0..3 {
                    out[i] = transfer.decode(input[i]);
                }
            }
            ResolvedPrimitive::CompandEncode { transfer } => {
                for i in 0..3 {
                    out[i] = transfer.encode(input[i]);
                }
            }
            ResolvedPrimitive::RgbToHsv => out[..3].copy_from_slice(&transform::rgb_to_hsv(xyz3(input))),
            ResolvedPrimitive::HsvToRgb => out[..3].copy_from_slice(&transform::hsv_to_rgb(xyz3(input))),
            ResolvedPrimitive::RgbToHsl => out[..3].copy_from_slice(&transform::rgb_to_hsl(xyz3(input))),
            ResolvedPrimitive::HslToRgb => out[..3].copy_from_slice(&transform::hsl_to_rgb(xyz3(input))),
            ResolvedPrimitive::RgbToYCbCr { standard } => {
                out[..3].copy_from_slice(&transform::rgb_to_ycbcr(xyz3(input), *standard));
            }
            ResolvedPrimitive::YCbCrToRgb { standard } => {
                out[..3].copy_from_slice(&transform::ycbcr_to_rgb(xyz3(input), *standard));
            }
            ResolvedPrimitive::CmykToRgb => {
                out[..3].copy_from_slice(&transform::cmyk_to_rgb([
                    input[0], input[1], input[2], input[3],
                ]));
            }
            ResolvedPrimitive::RgbToCmyk => {
                out[..4].copy_from_slice(&transform::rgb_to_cmyk(xyz3(input)));
            }
            ResolvedPrimitive::GrayToXyz { white } => {
                out[..3].copy_from_slice(&transform::gray_to_xyz([input[0]], *white));
            }
            ResolvedPrimitive::XyzToGray { white } => {
                out[0] = transform::xyz_to_gray(xyz3(input), *white)[0];
            }
        }
        out
    }
}

fn xyz3(v: &[Float]) -> [Float; 3] {
    [v[0], v[1], v[2]]
}

/// One stage of an assembled [`Pipeline`]: a [`Slot`]-to-[`Slot`] wire plus
/// its fully resolved operation.
#[derive(Debug, Clone)]
enum ResolvedOp {
    Primitive(ResolvedPrimitive),
    IccForward(Arc<IccProfile>),
    IccBackward(Arc<IccProfile>),
    Cat(Mat3),
    Assign,
}

#[derive(Debug, Clone)]
struct ResolvedStage {
    read: Slot,
    read_channels: usize,
    op: ResolvedOp,
    write: Slot,
    write_channels: usize,
}

/// Reusable scratch buffers for a [`Pipeline`] run (spec §4.6 "a temp
/// buffer"): two 4-wide slots, enough for the widest color this core knows
/// (CMYK), reused across every `convert()` call with no reallocation.
#[derive(Debug, Clone)]
pub struct ConversionData {
    temp0: [Float; 4],
    temp1: [Float; 4],
}

impl ConversionData {
    pub fn new() -> Self {
        Self {
            temp0: [0.0; 4],
            temp1: [0.0; 4],
        }
    }

    /// Zeroes the scratch buffers. Cheap and not required for correctness
    /// (every stage fully overwrites the channels it uses before the next
    /// stage reads them), but keeps stale values from lingering for
    /// inspection after `dispose()`.
    pub fn release(&mut self) {
        self.temp0 = [0.0; 4];
        self.temp1 = [0.0; 4];
    }
}

impl Default for ConversionData {
    fn default() -> Self {
        Self::new()
    }
}

/// An assembled, resolved chain of stages bridging one input color space to
/// one output color space (spec §4.6). Running it performs no planning, no
/// registry lookups, and allocates only if one of its stages is an ICC tag
/// chain evaluating a CLUT (spec §4.4's `TagChain::apply` builds an
/// intermediate `Vec` per stage); pipelines built entirely from the
/// primitive transform library allocate nothing.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<ResolvedStage>,
}

impl Pipeline {
    /// Runs this pipeline: `input` (and `output`) must each have at least as
    /// many valid `Float`s as this pipeline's first (last) stage's
    /// `read_channels` (`write_channels`).
    ///
    /// # Safety
    /// `input` must be valid to read `input_channels` `Float`s from, and
    /// `output` must be valid to write `output_channels` `Float`s to, for
    /// the duration of this call. This is the raw-pointer half of the
    /// `Converter`'s pinned-buffer contract (spec §4.7): the two pointers
    /// may come from `Color`s the caller is otherwise free to mutate
    /// between calls, which is exactly why they arrive here as pointers
    /// rather than borrows.
    pub unsafe fn run(
        &self,
        input: *const Float,
        output: *mut Float,
        scratch: &mut ConversionData,
    ) -> Result<(), ConversionError> {
        for stage in &self.stages {
            let in_values = self.read_slot(stage.read, stage.read_channels, input, scratch);
            let out_values = match &stage.op {
                ResolvedOp::Primitive(p) => p.apply(&in_values[..stage.read_channels]),
                ResolvedOp::IccForward(profile) => {
                    let v = profile.apply_forward(&in_values[..stage.read_channels])?;
                    array_from_vec(&v)
                }
                ResolvedOp::IccBackward(profile) => {
                    let v = profile.apply_backward(&in_values[..stage.read_channels])?;
                    array_from_vec(&v)
                }
                ResolvedOp::Cat(matrix) => {
                    let v = matrix.mul_vec3(crate::Vec3::from_array(xyz3(&in_values)));
                    let mut arr = [0.0 as Float; 4];
                    arr[..3].copy_from_slice(&[v.x, v.y, v.z]);
                    arr
                }
                ResolvedOp::Assign => in_values,
            };
            self.write_slot(
                stage.write,
                stage.write_channels,
                output,
                scratch,
                &out_values[..stage.write_channels],
            );
        }
        Ok(())
    }

    fn read_slot(
        &self,
        slot: Slot,
        channels: usize,
        input: *const Float,
        scratch: &ConversionData,
    ) -> [Float; 4] {
        let mut buf = [0.0 as Float; 4];
        match slot {
            // SAFETY: caller of `run` guarantees `input` is valid for
            // `channels` reads when the Plan's first step reads `Slot::In`.
            Slot::In => unsafe {
                for i in 0..channels {
                    buf[i] = *input.add(i);
                }
            },
            Slot::Temp(0) => buf[..channels].copy_from_slice(&scratch.temp0[..channels]),
            Slot::Temp(1) => buf[..channels].copy_from_slice(&scratch.temp1[..channels]),
            Slot::Temp(_) => unreachable!("Plan::temp_buffer_count is 2"),
            Slot::Out => unreachable!("a Plan step never reads Slot::Out"),
        }
        buf
    }

    fn write_slot(
        &self,
        slot: Slot,
        channels: usize,
        output: *mut Float,
        scratch: &mut ConversionData,
        values: &[Float],
    ) {
        match slot {
            // SAFETY: caller of `run` guarantees `output` is valid for
            // `channels` writes when the Plan's last step writes `Slot::Out`.
            Slot::Out => unsafe {
                for i in 0..channels {
                    *output.add(i) = values[i];
                }
            },
            Slot::Temp(0) => scratch.temp0[..channels].copy_from_slice(values),
            Slot::Temp(1) => scratch.temp1[..channels].copy_from_slice(values),
            Slot::Temp(_) => unreachable!("Plan::temp_buffer_count is 2"),
            Slot::In => unreachable!("a Plan step never writes Slot::In"),
        }
    }
}

fn array_from_vec(v: &[Float]) -> [Float; 4] {
    let mut arr = [0.0 as Float; 4];
    let n = v.len().min(4);
    arr[..n].copy_from_slice(&v[..n]);
    arr
}

fn resolve_primitive(id: PrimitiveId, space: &ColorSpace) -> Result<ResolvedPrimitive, ConversionError> {
    use PrimitiveId::*;
    let white = |space: &ColorSpace| -> Result<[Float; 3], ConversionError> {
        space
            .white_point()
            .map(|w| w.xyz())
            .ok_or_else(|| setup_error("primitive requires a color space with a reference white point"))
    };
    let rgb = |space: &ColorSpace| {
        space
            .rgb_reference()
            .cloned()
            .ok_or_else(|| setup_error("primitive requires a color space with an RGB reference"))
    };
    match id {
        XyzToLab => Ok(ResolvedPrimitive::XyzToLab { white: white(space)? }),
        LabToXyz => Ok(ResolvedPrimitive::LabToXyz { white: white(space)? }),
        LabToLch => Ok(ResolvedPrimitive::LabToLch),
        LchToLab => Ok(ResolvedPrimitive::LchToLab),
        XyzToLuv => Ok(ResolvedPrimitive::XyzToLuv { white: white(space)? }),
        LuvToXyz => Ok(ResolvedPrimitive::LuvToXyz { white: white(space)? }),
        LuvToLchuv => Ok(ResolvedPrimitive::LuvToLchuv),
        LchuvToLuv => Ok(ResolvedPrimitive::LchuvToLuv),
        XyzToXyy => Ok(ResolvedPrimitive::XyzToXyy { white: white(space)? }),
        XyyToXyz => Ok(ResolvedPrimitive::XyyToXyz),
        LinearRgbToXyz => Ok(ResolvedPrimitive::LinearRgbToXyz {
            matrix: rgb(space)?.rgb_to_xyz(),
        }),
        XyzToLinearRgb => Ok(ResolvedPrimitive::XyzToLinearRgb {
            matrix: rgb(space)?.rgb_to_xyz().inverse(),
        }),
        CompandDecode => Ok(ResolvedPrimitive::CompandDecode {
            transfer: rgb(space)?.transfer,
        }),
        CompandEncode => Ok(ResolvedPrimitive::CompandEncode {
            transfer: rgb(space)?.transfer,
        }),
        RgbToHsv => Ok(ResolvedPrimitive::RgbToHsv),
        HsvToRgb => Ok(ResolvedPrimitive::HsvToRgb),
        RgbToHsl => Ok(ResolvedPrimitive::RgbToHsl),
        HslToRgb => Ok(ResolvedPrimitive::HslToRgb),
        RgbToYCbCr => Ok(ResolvedPrimitive::RgbToYCbCr {
            standard: ycbcr_standard(space)?,
        }),
        YCbCrToRgb => Ok(ResolvedPrimitive::YCbCrToRgb {
            standard: ycbcr_standard(space)?,
        }),
        CmykToRgb => Ok(ResolvedPrimitive::CmykToRgb),
        RgbToCmyk => Ok(ResolvedPrimitive::RgbToCmyk),
        GrayToXyz => Ok(ResolvedPrimitive::GrayToXyz { white: white(space)? }),
        XyzToGray => Ok(ResolvedPrimitive::XyzToGray { white: white(space)? }),
    }
}

fn ycbcr_standard(space: &ColorSpace) -> Result<YCbCrStandard, ConversionError> {
    match space {
        ColorSpace::YCbCr { standard, .. } => Ok(*standard),
        _ => Err(setup_error(
            "a YCbCr primitive requires a YCbCr color space context",
        )),
    }
}

fn resolve_cat(method: ChromaticAdaptationMethod, from: WhitePoint, to: WhitePoint) -> Mat3 {
    #[cfg(feature = "std")]
    {
        crate::details::cat::registry().get_or_compute(method, from, to)
    }
    #[cfg(not(feature = "std"))]
    {
        method.adaptation_matrix(from, to)
    }
}

/// Resolves `plan`'s symbolic stages into a [`Pipeline`] (spec §4.6).
pub fn assemble(plan: &Plan) -> Result<Pipeline, ConversionError> {
    let mut stages = Vec::with_capacity(plan.steps.len());
    for step in &plan.steps {
        let op = match &step.stage {
            Stage::Primitive(id, space) => ResolvedOp::Primitive(resolve_primitive(*id, space)?),
            Stage::IccForward(profile) => ResolvedOp::IccForward(profile.clone()),
            Stage::IccBackward(profile) => ResolvedOp::IccBackward(profile.clone()),
            Stage::Cat { from, to, method } => ResolvedOp::Cat(resolve_cat(*method, *from, *to)),
            Stage::Assign => ResolvedOp::Assign,
        };
        stages.push(ResolvedStage {
            read: step.read,
            read_channels: step.read_channels,
            op,
            write: step.write,
            write_channels: step.write_channels,
        });
    }
    Ok(Pipeline { stages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::color::color_spaces;
    use crate::details::planner;

    #[test]
    fn identity_plan_assembles_and_runs() {
        let plan = planner::plan(&color_spaces::SRGB, &color_spaces::SRGB).unwrap();
        let pipeline = assemble(&plan).unwrap();
        let input = [0.2 as Float, 0.4, 0.6];
        let mut output = [0.0 as Float; 3];
        let mut scratch = ConversionData::new();
        unsafe {
            pipeline
                .run(input.as_ptr(), output.as_mut_ptr(), &mut scratch)
                .unwrap();
        }
        assert_eq!(input, output);
    }

    #[test]
    fn srgb_to_xyz_runs_without_error() {
        let plan = planner::plan(&color_spaces::SRGB, &color_spaces::CIE_XYZ_D65).unwrap();
        let pipeline = assemble(&plan).unwrap();
        let input = [0.5 as Float, 0.5, 0.5];
        let mut output = [0.0 as Float; 3];
        let mut scratch = ConversionData::new();
        unsafe {
            pipeline
                .run(input.as_ptr(), output.as_mut_ptr(), &mut scratch)
                .unwrap();
        }
        assert!(output[1] > 0.0 && output[1] < 1.0);
    }

    #[test]
    fn xyz_to_lab_to_xyz_round_trips() {
        let plan_fwd = planner::plan(&color_spaces::CIE_XYZ_D50, &color_spaces::CIE_LAB_D50).unwrap();
        let plan_bwd = planner::plan(&color_spaces::CIE_LAB_D50, &color_spaces::CIE_XYZ_D50).unwrap();
        let fwd = assemble(&plan_fwd).unwrap();
        let bwd = assemble(&plan_bwd).unwrap();
        let input = [0.3 as Float, 0.4, 0.2];
        let mut lab = [0.0 as Float; 3];
        let mut back = [0.0 as Float; 3];
        let mut scratch = ConversionData::new();
        unsafe {
            fwd.run(input.as_ptr(), lab.as_mut_ptr(), &mut scratch).unwrap();
            bwd.run(lab.as_ptr(), back.as_mut_ptr(), &mut scratch).unwrap();
        }
        for (a, b) in input.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}

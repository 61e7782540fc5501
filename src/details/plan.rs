//! Plan / Stage (spec §3, §4.5): the Planner's output, a non-empty ordered
//! list of stages the Pipeline Assembler turns into one callable.

use crate::details::cat::ChromaticAdaptationMethod;
use crate::details::color::{ColorSpace, WhitePoint};
use crate::details::icc::IccProfile;
use crate::details::registry::PrimitiveId;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Which buffer a stage reads from or writes to. The Pipeline Assembler
/// allocates exactly as many `Temp` buffers as the longest chain needs
/// (spec §3: "a temp buffer"); every plan in this core ping-pongs between
/// two temporaries regardless of chain length, since each stage only ever
/// needs the immediately preceding value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    In,
    Out,
    Temp(u8),
}

/// One step of a [`Plan`] (spec §3). `Primitive` carries the [`ColorSpace`]
/// supplying the numeric parameters (white point, primaries matrix,
/// transfer function, YCbCr standard) the Assembler needs to resolve it —
/// this keeps the Planner's registry-driven choice of [`PrimitiveId`]
/// separate from the Assembler's job of materializing concrete numbers.
#[derive(Debug, Clone)]
pub enum Stage {
    /// A registered primitive transform, e.g. XYZ -> Lab, parameterized by
    /// the color space that supplies its constants.
    Primitive(PrimitiveId, ColorSpace),
    /// One profile's Device -> PCS tag chain.
    IccForward(Arc<IccProfile>),
    /// One profile's PCS -> Device tag chain.
    IccBackward(Arc<IccProfile>),
    /// Chromatic adaptation between two XYZ-referred white points.
    Cat {
        from: WhitePoint,
        to: WhitePoint,
        method: ChromaticAdaptationMethod,
    },
    /// A pass-through copy (used when both sides are identical, or when
    /// both sides reduce to the same PCS kind with no numeric work needed).
    Assign,
}

/// One wired step: a [`Stage`] plus the [`Slot`]s it reads from and writes
/// to, and the channel counts at each end (spec §3: "The Plan names which
/// buffer each stage reads from and writes to").
#[derive(Debug, Clone)]
pub struct PlanStep {
    pub read: Slot,
    pub read_channels: usize,
    pub stage: Stage,
    pub write: Slot,
    pub write_channels: usize,
}

/// An ordered, non-empty chain of [`PlanStep`]s bridging an input and
/// output color space (spec §3, §4.5).
#[derive(Debug, Clone)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(steps: Vec<PlanStep>) -> Self {
        debug_assert!(!steps.is_empty(), "a Plan must have at least one step");
        Self { steps }
    }

    /// How many intermediate buffers this plan's longest dependency chain
    /// needs. Every plan in this core uses at most two temporaries (spec
    /// §4.5 "Data -> Data" cross-PCS case), so the Assembler just
    /// allocates two reusable scratch buffers up front.
    pub fn temp_buffer_count(&self) -> usize {
        2
    }
}

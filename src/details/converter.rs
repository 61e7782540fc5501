//! ColorConverter Facade (spec §4.7): plans and assembles once at
//! construction, then runs the resolved [`Pipeline`] cheaply on repeated
//! `convert()` calls.

use crate::details::assembler::{self, ConversionData, Pipeline};
use crate::details::color::Color;
use crate::details::error::ConversionError;
use crate::details::planner;
use crate::Float;

/// Converts repeatedly between one input [`Color`]'s space and one output
/// [`Color`]'s space.
///
/// Construction is the expensive step (spec §4.5/§4.6: planning and
/// assembly); `convert()` is cheap, reading `input`'s current values and
/// writing `output`'s (spec §8 "Cheap Convert": a million calls, zero
/// allocations, once neither side is ICC-backed with a CLUT).
///
/// `Converter` holds raw pointers into `input` and `output`'s value
/// buffers rather than borrowing them, so the caller is free to keep
/// writing new values into `input` between `convert()` calls without
/// going back through `Converter`. This is the one unsafe corner of the
/// facade: see the safety note on [`Converter::new`].
pub struct Converter {
    pipeline: Pipeline,
    scratch: ConversionData,
    input_ptr: *const Float,
    input_channels: usize,
    output_ptr: *mut Float,
    output_channels: usize,
    disposed: bool,
}

// SAFETY: `Converter` owns no non-`Send`/`Sync` state beyond raw pointers
// into caller-owned buffers; it imposes no additional thread-affinity.
unsafe impl Send for Converter {}

impl Converter {
    /// Plans and assembles a pipeline from `input`'s space to `output`'s
    /// space, then pins their value buffers for the converter's lifetime.
    ///
    /// # Safety contract (not compiler-enforced)
    /// `input` and `output` must remain alive, and their value buffers
    /// must keep the same length, for as long as this `Converter` is used.
    /// [`Color`] never reallocates or moves its buffer after construction
    /// (spec §3), so this holds as long as the caller doesn't drop the
    /// `Color` itself. The caller MAY freely read and overwrite `input`'s
    /// values between `convert()` calls (spec §4.7) — only dropping or
    /// replacing the `Color` breaks the contract.
    pub fn try_new(input: &mut Color, output: &mut Color) -> Result<Self, ConversionError> {
        let plan = planner::plan(input.space(), output.space())?;
        let pipeline = assembler::assemble(&plan)?;

        let input_channels = input.kind().channels();
        let output_channels = output.kind().channels();
        if input.values().len() != input_channels {
            return Err(ConversionError::ConversionSetup {
                reason: "input color's buffer length does not match its color space".into(),
            });
        }
        if output.values().len() != output_channels {
            return Err(ConversionError::ConversionSetup {
                reason: "output color's buffer length does not match its color space".into(),
            });
        }

        Ok(Self {
            pipeline,
            scratch: ConversionData::new(),
            input_ptr: input.as_ptr(),
            input_channels,
            output_ptr: output.as_mut_ptr(),
            output_channels,
            disposed: false,
        })
    }

    /// Like [`Self::try_new`], but panics instead of returning a
    /// [`ConversionError`]. `input`/`output` are never null references in
    /// safe Rust, so this only ever panics when no conversion path exists
    /// between the two color spaces (spec §7's `ArgumentNull` is unreachable
    /// from this constructor; it exists for bindings that hand the core a
    /// nullable profile or color pointer, see `Converter::try_new`'s
    /// signature for the Rust-native, non-nullable equivalent).
    pub fn new(input: &mut Color, output: &mut Color) -> Self {
        Self::try_new(input, output).expect("Converter::new: conversion setup failed")
    }

    /// Runs the assembled pipeline once: reads `input`'s current values,
    /// writes `output`'s. Returns [`ConversionError::Disposed`] if
    /// [`Self::dispose`] was already called.
    pub fn convert(&mut self) -> Result<(), ConversionError> {
        if self.disposed {
            return Err(ConversionError::Disposed);
        }
        // SAFETY: the pinned-buffer contract documented on `Self::try_new`
        // guarantees these pointers are still valid for `input_channels`/
        // `output_channels` `Float`s.
        unsafe { self.pipeline.run(self.input_ptr, self.output_ptr, &mut self.scratch) }
    }

    /// Releases this converter's scratch state. Idempotent (spec §7):
    /// calling `dispose()` more than once, or letting `Drop` call it again,
    /// is a no-op after the first call.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.scratch.release();
            self.disposed = true;
        }
    }

    /// Whether [`Self::dispose`] has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The channel count of the input color space this converter was built
    /// for.
    pub fn input_channels(&self) -> usize {
        self.input_channels
    }

    /// The channel count of the output color space this converter was built
    /// for.
    pub fn output_channels(&self) -> usize {
        self.output_channels
    }
}

impl Drop for Converter {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::color::color_spaces;

    #[test]
    fn convert_writes_output_from_input() {
        let mut input = Color::new(&[0.5, 0.25, 0.75], color_spaces::SRGB);
        let mut output = Color::zeroed(3, color_spaces::CIE_XYZ_D65);
        let mut converter = Converter::new(&mut input, &mut output);
        converter.convert().unwrap();
        assert!(output.values()[1] > 0.0);
    }

    #[test]
    fn mutating_input_between_calls_changes_output() {
        let mut input = Color::new(&[0.2, 0.2, 0.2], color_spaces::SRGB);
        let mut output = Color::zeroed(3, color_spaces::CIE_XYZ_D65);
        let mut converter = Converter::new(&mut input, &mut output);
        converter.convert().unwrap();
        let first = output.values()[1];
        input.values_mut().copy_from_slice(&[0.8, 0.8, 0.8]);
        converter.convert().unwrap();
        let second = output.values()[1];
        assert!(second > first);
    }

    #[test]
    fn dispose_is_idempotent_and_blocks_convert() {
        let mut input = Color::new(&[0.5, 0.25, 0.75], color_spaces::SRGB);
        let mut output = Color::zeroed(3, color_spaces::CIE_XYZ_D65);
        let mut converter = Converter::new(&mut input, &mut output);
        converter.dispose();
        converter.dispose();
        assert!(matches!(converter.convert(), Err(ConversionError::Disposed)));
    }

    #[test]
    fn identity_conversion_is_exact() {
        let mut input = Color::new(&[0.1, 0.2, 0.3], color_spaces::CIE_XYZ_D50);
        let mut output = Color::zeroed(3, color_spaces::CIE_XYZ_D50);
        let mut converter = Converter::new(&mut input, &mut output);
        converter.convert().unwrap();
        assert_eq!(input.values(), output.values());
    }
}

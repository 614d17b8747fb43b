//! Public facade (C6): the one type most callers need.
//!
//! Mirrors the surface `sonido-core`'s effect wrappers expose — construct
//! once with the desired conversion, then call `process_block` every
//! audio callback. All contract checking (ratio is a supported
//! power-of-two, ratio 16 is FIR-only, block size fits `MAX_BLOCK`) is
//! `assert!`/`debug_assert!` at the boundary, not a recoverable error: a
//! caller that got these wrong has a bug, not a runtime condition.

extern crate alloc;

use alloc::vec::Vec;

use crate::cascade::{Cascade, MAX_BLOCK};
use crate::precision::Precision;
use crate::simd::sse_available;
use crate::stage::FilterKind;
use crate::tables;

/// Which way an [`Engine`] converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Low rate in, high rate out.
    Upsample,
    /// High rate in, low rate out.
    Downsample,
}

/// Hint for which [`FilterKind`] to prefer when more than one would
/// satisfy the requested ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdHint {
    /// Use the 4-wide SIMD layout when the target looks like it has a wide
    /// vector unit, scalar otherwise.
    Auto,
    /// Force the scalar IIR implementation.
    ForceScalar,
    /// Force the SIMD-laid-out IIR implementation.
    ForceSimd,
}

/// A configured real-time resampling engine for one fixed power-of-two
/// ratio, direction and precision.
#[derive(Debug, Clone)]
pub struct Engine {
    direction: Direction,
    ratio: usize,
    precision: Precision,
    kind: FilterKind,
    /// `None` only at `ratio == 1`: the identity conversion has no stages
    /// to run, so `process_block` degenerates to a straight copy.
    cascade: Option<Cascade>,
}

impl Engine {
    /// Upper bound on any `process_block` call's larger-rate buffer
    /// length, re-exported from [`crate::cascade::MAX_BLOCK`].
    pub const MAX_BLOCK: usize = MAX_BLOCK;

    /// Builds an engine for `ratio` (one of 1, 2, 4, 8, 16), `direction`,
    /// and `precision`. Ratio 1 is the identity conversion.
    ///
    /// Ratio 16 only has a FIR implementation (`kind` is ignored and
    /// forced to [`FilterKind::Fir`] in that case); requesting
    /// [`FilterKind::IirScalar`] or [`FilterKind::IirSimd`] at ratio 16 is
    /// a contract violation.
    pub fn new(direction: Direction, ratio: usize, precision: Precision, kind: FilterKind) -> Self {
        Self::new_with_simd_hint(direction, ratio, precision, kind, SimdHint::Auto)
    }

    /// Like [`Self::new`], but lets the caller steer SIMD-vs-scalar
    /// selection for an IIR engine via `hint`. Ignored for
    /// [`FilterKind::Fir`] and at ratio 1.
    pub fn new_with_simd_hint(
        direction: Direction,
        ratio: usize,
        precision: Precision,
        kind: FilterKind,
        hint: SimdHint,
    ) -> Self {
        assert!(
            matches!(ratio, 1 | 2 | 4 | 8 | 16),
            "ratio must be 1, 2, 4, 8 or 16, got {ratio}"
        );
        assert!(
            ratio != 16 || kind == FilterKind::Fir,
            "ratio 16 is FIR-only; {kind:?} is not supported at that ratio"
        );

        if ratio == 1 {
            return Self {
                direction,
                ratio,
                precision,
                kind,
                cascade: None,
            };
        }

        let resolved_kind = match kind {
            FilterKind::Fir => FilterKind::Fir,
            FilterKind::IirScalar | FilterKind::IirSimd => match hint {
                SimdHint::ForceScalar => FilterKind::IirScalar,
                SimdHint::ForceSimd => FilterKind::IirSimd,
                SimdHint::Auto => {
                    if sse_available() {
                        FilterKind::IirSimd
                    } else {
                        FilterKind::IirScalar
                    }
                }
            },
        };

        let num_stages = ratio.trailing_zeros() as usize;
        let stages = (0..num_stages)
            .map(|_| tables::build_stage(resolved_kind, precision, ratio))
            .collect::<Vec<_>>();

        Self {
            direction,
            ratio,
            precision,
            kind: resolved_kind,
            cascade: Some(Cascade::new(stages)),
        }
    }

    /// Chooses the lightest precision that comfortably covers `bits`, and
    /// builds an engine with it. See [`Precision::for_bit_depth`].
    pub fn find_precision_for_bits(
        direction: Direction,
        ratio: usize,
        bits: u32,
        kind: FilterKind,
    ) -> Self {
        Self::new(direction, ratio, Precision::for_bit_depth(bits), kind)
    }

    /// The conversion direction this engine was built for.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The rate-change ratio.
    pub fn ratio(&self) -> usize {
        self.ratio
    }

    /// The stopband precision this engine was designed to.
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Which filter implementation is actually in use (after SIMD/scalar
    /// resolution).
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Whether this process actually emitted SIMD-laid-out code for this
    /// engine's stages.
    pub fn sse_enabled(&self) -> bool {
        self.kind == FilterKind::IirSimd
    }

    /// Total filter order, summed across every stage in the cascade. Zero
    /// at ratio 1.
    pub fn order(&self) -> usize {
        self.cascade.as_ref().map_or(0, Cascade::order)
    }

    /// Relative frequency, near DC, `delay()` measures group delay at.
    /// Well inside the passband, where a well-designed half-band filter's
    /// delay is close to its DC value.
    const DELAY_F_REL: f64 = 0.0;

    /// Algorithmic group delay, in output samples, this engine's cascade
    /// introduces. Measured at a frequency near DC (see
    /// [`Self::DELAY_F_REL`]); precise group delay is frequency-dependent
    /// for the IIR implementations (see [`crate::designer::group_delay_cell`])
    /// but flat for the FIR one. Zero at ratio 1.
    pub fn delay(&self) -> f64 {
        match &self.cascade {
            None => 0.0,
            Some(cascade) => match self.direction {
                Direction::Upsample => cascade.delay_up(Self::DELAY_F_REL),
                Direction::Downsample => cascade.delay_down(Self::DELAY_F_REL),
            },
        }
    }

    /// Converts one block. For [`Direction::Upsample`], `output.len()`
    /// must equal `input.len() * ratio()`; for [`Direction::Downsample`],
    /// `input.len()` must equal `output.len() * ratio()`. Either way the
    /// high-rate length must not exceed [`Self::MAX_BLOCK`]. At ratio 1
    /// this is a bit-exact copy regardless of direction.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        match &mut self.cascade {
            None => {
                debug_assert_eq!(input.len(), output.len());
                output.copy_from_slice(input);
            }
            Some(cascade) => match self.direction {
                Direction::Upsample => cascade.process_up(input, output),
                Direction::Downsample => cascade.process_down(input, output),
            },
        }
    }

    /// Clears all internal filter state. A no-op at ratio 1.
    pub fn reset(&mut self) {
        if let Some(cascade) = &mut self.cascade {
            cascade.reset();
        }
    }
}

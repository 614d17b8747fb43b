//! Unifies the three half-band stage implementations behind one surface so
//! [`crate::cascade::Cascade`] doesn't need to know which kind it's
//! chaining.

use crate::fir::HalfbandFir;
use crate::iir::HalfbandIirScalar;
use crate::simd::HalfbandIirSimd;

/// Which half-band implementation a [`Stage`] wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Symmetric linear-phase FIR (C2).
    Fir,
    /// Polyphase all-pass IIR, scalar (C3).
    IirScalar,
    /// Polyphase all-pass IIR, 4-wide SIMD layout (C4).
    IirSimd,
}

/// One 2x half-band conversion stage, in whichever implementation was
/// selected for it.
#[derive(Debug, Clone)]
pub enum Stage {
    /// See [`HalfbandFir`].
    Fir(HalfbandFir),
    /// See [`HalfbandIirScalar`].
    IirScalar(HalfbandIirScalar),
    /// See [`HalfbandIirSimd`].
    IirSimd(HalfbandIirSimd),
}

impl Stage {
    /// Which kind this stage is.
    pub fn kind(&self) -> FilterKind {
        match self {
            Stage::Fir(_) => FilterKind::Fir,
            Stage::IirScalar(_) => FilterKind::IirScalar,
            Stage::IirSimd(_) => FilterKind::IirSimd,
        }
    }

    /// Filter order (number of taps for FIR, number of all-pass cells for
    /// IIR).
    pub fn order(&self) -> usize {
        match self {
            Stage::Fir(s) => s.order(),
            Stage::IirScalar(s) => s.order(),
            Stage::IirSimd(s) => s.order(),
        }
    }

    /// Group delay, in this stage's own output samples, when it upsamples.
    /// `f_rel` is only meaningful for the IIR implementations, whose delay
    /// varies with frequency; the FIR implementation ignores it.
    pub fn group_delay_up(&self, f_rel: f64) -> f64 {
        match self {
            Stage::Fir(s) => s.group_delay_up(),
            Stage::IirScalar(s) => s.group_delay(f_rel),
            Stage::IirSimd(s) => s.group_delay(f_rel),
        }
    }

    /// Group delay, in this stage's own output samples, when it
    /// downsamples.
    pub fn group_delay_down(&self, f_rel: f64) -> f64 {
        match self {
            Stage::Fir(s) => s.group_delay_down(),
            Stage::IirScalar(s) => s.group_delay(f_rel),
            Stage::IirSimd(s) => s.group_delay(f_rel),
        }
    }

    /// Upsamples a block: `output.len() == input.len() * 2`.
    pub fn process_up(&mut self, input: &[f32], output: &mut [f32]) {
        match self {
            Stage::Fir(s) => s.process_up(input, output),
            Stage::IirScalar(s) => s.process_up(input, output),
            Stage::IirSimd(s) => s.process_up(input, output),
        }
    }

    /// Downsamples a block: `input.len()` must be even, `output.len() ==
    /// input.len() / 2`.
    pub fn process_down(&mut self, input: &[f32], output: &mut [f32]) {
        match self {
            Stage::Fir(s) => s.process_down(input, output),
            Stage::IirScalar(s) => s.process_down(input, output),
            Stage::IirSimd(s) => s.process_down(input, output),
        }
    }

    /// Clears internal state, as if the stage had processed silence
    /// forever.
    pub fn reset(&mut self) {
        match self {
            Stage::Fir(s) => s.reset(),
            Stage::IirScalar(s) => s.reset(),
            Stage::IirSimd(s) => s.reset(),
        }
    }
}

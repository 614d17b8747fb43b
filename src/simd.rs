//! 4-wide portable SIMD layout of the polyphase IIR stage (C4).
//!
//! No architecture intrinsics: `unsafe_code` is denied crate-wide, and
//! nothing in the source corpus this crate is grounded on reaches for
//! `std::arch`. [`F32x4`] is a plain `[f32; 4]` newtype whose elementwise
//! arithmetic the optimizer is free to lower to a single vector
//! instruction; [`sse_available`] probes `target_feature` at compile time
//! purely to decide whether offering this path is worthwhile, never to
//! gate correctness.
//!
//! Only two of the four lanes carry meaningful data per cell — lanes 0/1
//! hold branch0/branch1 of one all-pass cell, lanes 2/3 are reserved and
//! zeroed. This keeps the SIMD stage numerically identical, cell for
//! cell, to [`crate::iir::HalfbandIirScalar`]; it is a data-layout choice
//! for the optimizer, not a distinct algorithm.

extern crate alloc;

use alloc::vec::Vec;

use crate::designer;
use crate::math::flush_denormal;

/// True when the target is likely to benefit from 4-wide auto-vectorized
/// float arithmetic. A compile-time approximation, not a CPUID probe: this
/// crate does not depend on `std::arch`/intrinsics, so there's nothing to
/// gate at runtime beyond "does this target even have a wide vector unit."
pub fn sse_available() -> bool {
    cfg!(any(
        target_feature = "sse2",
        target_feature = "neon",
        target_feature = "simd128"
    ))
}

/// A 4-lane `f32` vector, laid out for auto-vectorization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct F32x4(pub [f32; 4]);

impl F32x4 {
    #[inline]
    fn splat(v: f32) -> Self {
        F32x4([v; 4])
    }

    #[inline]
    fn add(self, rhs: Self) -> Self {
        F32x4([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
            self.0[3] + rhs.0[3],
        ])
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        F32x4([
            self.0[0] - rhs.0[0],
            self.0[1] - rhs.0[1],
            self.0[2] - rhs.0[2],
            self.0[3] - rhs.0[3],
        ])
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        F32x4([
            self.0[0] * rhs.0[0],
            self.0[1] * rhs.0[1],
            self.0[2] * rhs.0[2],
            self.0[3] * rhs.0[3],
        ])
    }
}

/// One all-pass cell per branch (lanes 0/1), packed side by side.
#[derive(Debug, Clone, Copy, Default)]
struct DualCell {
    a: F32x4,
    x: [F32x4; 2],
    y: [F32x4; 2],
    idx: usize,
}

impl DualCell {
    fn new(a0: f32, a1: f32) -> Self {
        Self {
            a: F32x4([a0, a1, 0.0, 0.0]),
            x: [F32x4::default(); 2],
            y: [F32x4::default(); 2],
            idx: 0,
        }
    }

    #[inline]
    fn process(&mut self, x0: f32, x1: f32) -> (f32, f32) {
        let x = F32x4([x0, x1, 0.0, 0.0]);
        let hist_x = self.x[self.idx];
        let hist_y = self.y[self.idx];

        let y = self.a.mul(x.sub(hist_y)).add(hist_x);
        let y = F32x4([
            flush_denormal(y.0[0]),
            flush_denormal(y.0[1]),
            0.0,
            0.0,
        ]);

        self.x[self.idx] = x;
        self.y[self.idx] = y;
        self.idx ^= 1;

        (y.0[0], y.0[1])
    }

    fn reset(&mut self) {
        self.x = [F32x4::default(); 2];
        self.y = [F32x4::default(); 2];
        self.idx = 0;
    }

    /// Lane 0's (branch0's) coefficient.
    fn coef0(&self) -> f32 {
        self.a.0[0]
    }
}

/// SIMD-laid-out half-band stage. Drop-in equivalent of
/// [`crate::iir::HalfbandIirScalar`] with a wider storage layout.
#[derive(Debug, Clone)]
pub struct HalfbandIirSimd {
    cells: Vec<DualCell>,
    /// `Some` when branch0 has one more coefficient than branch1 (odd
    /// total coefficient count); processed as a plain scalar tail cell
    /// after the paired cells.
    tail0: Option<crate::allpass::AllpassCell>,
}

impl HalfbandIirSimd {
    /// Builds a stage from the same flat coefficient layout
    /// [`crate::iir::HalfbandIirScalar::new`] takes.
    pub fn new(coefs: &[f64]) -> Self {
        debug_assert!(!coefs.is_empty());
        let branch0: Vec<f32> = coefs.iter().step_by(2).map(|&c| c as f32).collect();
        let branch1: Vec<f32> = coefs.iter().skip(1).step_by(2).map(|&c| c as f32).collect();

        let common = branch1.len();
        let cells = (0..common)
            .map(|i| DualCell::new(branch0[i], branch1[i]))
            .collect();

        let tail0 = if branch0.len() > common {
            Some(crate::allpass::AllpassCell::new(branch0[common]))
        } else {
            None
        };

        Self { cells, tail0 }
    }

    /// Total number of all-pass cells across both branches.
    pub fn order(&self) -> usize {
        self.cells.len() * 2 + usize::from(self.tail0.is_some())
    }

    #[inline]
    fn run(&mut self, mut x0: f32, mut x1: f32) -> (f32, f32) {
        for cell in &mut self.cells {
            let (y0, y1) = cell.process(x0, x1);
            x0 = y0;
            x1 = y1;
        }
        if let Some(tail) = &mut self.tail0 {
            x0 = tail.process(x0);
        }
        (x0, x1)
    }

    /// Combines one pair of input samples into one low-rate output sample.
    #[inline]
    pub fn downsample(&mut self, even: f32, odd: f32) -> f32 {
        let (b0, b1) = self.run(even, odd);
        0.5 * (b0 + b1)
    }

    /// Like [`Self::downsample`], additionally emitting the high-band
    /// (difference) output.
    #[inline]
    pub fn downsample_split(&mut self, even: f32, odd: f32) -> (f32, f32) {
        let (b0, b1) = self.run(even, odd);
        (0.5 * (b0 + b1), 0.5 * (b0 - b1))
    }

    /// Expands one low-rate input sample into an (even, odd) output pair:
    /// the two branch outputs, taken directly with no combination.
    #[inline]
    pub fn upsample(&mut self, input: f32) -> (f32, f32) {
        self.run(input, input)
    }

    /// Group delay in samples, at relative frequency `f_rel`, of the
    /// branch this stage shares across both directions (lane 0 of each
    /// cell, plus the scalar tail cell if present).
    pub fn group_delay(&self, f_rel: f64) -> f64 {
        let mut total: f64 = self
            .cells
            .iter()
            .map(|cell| designer::group_delay_cell(f64::from(cell.coef0()), f_rel, false))
            .sum();
        if let Some(tail) = &self.tail0 {
            total += designer::group_delay_cell(f64::from(tail.coef()), f_rel, false);
        }
        total
    }

    /// Downsamples a block: `input.len()` must be even, `output.len() ==
    /// input.len() / 2`.
    pub fn process_down(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len() % 2, 0);
        debug_assert_eq!(output.len(), input.len() / 2);
        for (pair, out) in input.chunks_exact(2).zip(output.iter_mut()) {
            *out = self.downsample(pair[0], pair[1]);
        }
    }

    /// Upsamples a block: `output.len() == input.len() * 2`.
    pub fn process_up(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(output.len(), input.len() * 2);
        for (x, out) in input.iter().zip(output.chunks_exact_mut(2)) {
            let (even, odd) = self.upsample(*x);
            out[0] = even;
            out[1] = odd;
        }
    }

    /// Clears all cell history.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
        if let Some(tail) = &mut self.tail0 {
            tail.reset();
        }
    }
}

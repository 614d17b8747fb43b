//! Symmetric linear-phase half-band FIR stage (C2).
//!
//! A half-band lowpass kernel has the property that every other tap
//! (counting from the center) is exactly zero. Polyphase-decomposing it
//! for a 2x rate change therefore splits cleanly into two independent
//! branches: a pure one-sample-of-history delay (the "even" phase, which
//! lines up with the surviving center tap), and an ordinary windowed-sinc
//! lowpass FIR of half the length (the "odd" phase, carrying the actual
//! stopband rejection). Both phases already sum to unity DC gain, so no
//! additional scaling is needed on upsample; downsample averages them the
//! same way the IIR stage averages its two branches.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;
use libm::{cos, sin};

/// Designs the windowed-sinc "odd phase" branch of a half-band FIR of
/// `taps` coefficients. `taps` must be odd so the branch has an integer
/// group delay in low-rate samples.
///
/// Cutoff is fixed at a quarter of the branch's own sample rate, which is
/// the usual placement for a half-band pair's rejection band; windowed
/// with a Blackman window and renormalized to unity DC gain, the same
/// shape `sonido-analysis::resample::design_lowpass` uses.
pub fn design_branch(taps: usize) -> Vec<f32> {
    debug_assert!(taps % 2 == 1, "branch length must be odd");
    debug_assert!(taps >= 3);

    const CUTOFF: f64 = 0.25;
    let center = (taps as f64 - 1.0) / 2.0;
    let denom = (taps - 1) as f64;

    let mut coefs = Vec::with_capacity(taps);
    let mut sum = 0.0;
    for k in 0..taps {
        let n = k as f64 - center;
        let sinc = if n.abs() < 1e-9 {
            2.0 * CUTOFF
        } else {
            sin(2.0 * PI * CUTOFF * n) / (PI * n)
        };
        let window = 0.42 - 0.5 * cos(2.0 * PI * k as f64 / denom)
            + 0.08 * cos(4.0 * PI * k as f64 / denom);
        let c = sinc * window;
        coefs.push(c);
        sum += c;
    }
    for c in &mut coefs {
        *c /= sum;
    }
    coefs.into_iter().map(|c| c as f32).collect()
}

/// Half-band FIR stage built from the odd-phase branch.
#[derive(Debug, Clone)]
pub struct HalfbandFir {
    taps: Vec<f32>,
    history: Vec<f32>,
    delay_line: Vec<f32>,
    delay_pos: usize,
}

impl HalfbandFir {
    /// Builds a stage from a precomputed odd-phase tap set (see
    /// [`design_branch`]). `taps.len()` must be odd.
    pub fn new(taps: Vec<f32>) -> Self {
        debug_assert!(!taps.is_empty() && taps.len() % 2 == 1);
        let delay = (taps.len() - 1) / 2;
        let history = vec![0.0; taps.len()];
        let delay_line = vec![0.0; delay.max(1)];
        Self {
            taps,
            history,
            delay_line,
            delay_pos: 0,
        }
    }

    /// Number of taps in the odd-phase branch (the stage's filter order
    /// is roughly double this, counting the zeroed even taps).
    pub fn order(&self) -> usize {
        self.taps.len()
    }

    /// Group delay in (high-rate) output samples when this stage upsamples:
    /// a linear-phase FIR's delay is flat across frequency, so this is a
    /// constant, not a function of `f_rel` like the IIR stage's.
    pub fn group_delay_up(&self) -> f64 {
        (self.taps.len() - 1) as f64
    }

    /// Group delay in (low-rate) output samples when this stage
    /// downsamples: half the upsampling figure.
    pub fn group_delay_down(&self) -> f64 {
        (self.taps.len() - 1) as f64 / 2.0
    }

    #[inline]
    fn push_history(&mut self, x: f32) {
        for j in (1..self.history.len()).rev() {
            self.history[j] = self.history[j - 1];
        }
        self.history[0] = x;
    }

    #[inline]
    fn convolve(&self) -> f32 {
        self.taps
            .iter()
            .zip(self.history.iter())
            .map(|(&t, &h)| t * h)
            .sum()
    }

    #[inline]
    fn delay_read_write(&mut self, x: f32) -> f32 {
        if self.delay_line.is_empty() {
            return x;
        }
        let out = self.delay_line[self.delay_pos];
        self.delay_line[self.delay_pos] = x;
        self.delay_pos = (self.delay_pos + 1) % self.delay_line.len();
        out
    }

    /// Expands one low-rate input sample into an (even, odd) output pair.
    /// `even` is the delayed original sample; `odd` is the synthesized
    /// in-between sample.
    #[inline]
    pub fn upsample(&mut self, input: f32) -> (f32, f32) {
        let even = self.delay_read_write(input);
        self.push_history(input);
        let odd = self.convolve();
        (even, odd)
    }

    /// Combines one pair of input samples into one low-rate output sample.
    #[inline]
    pub fn downsample(&mut self, even: f32, odd: f32) -> f32 {
        let delayed_even = self.delay_read_write(even);
        self.push_history(odd);
        let filtered_odd = self.convolve();
        0.5 * (delayed_even + filtered_odd)
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

    /// Downsamples a block: `input.len()` must be even, `output.len() ==
    /// input.len() / 2`.
    pub fn process_down(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len() % 2, 0);
        debug_assert_eq!(output.len(), input.len() / 2);
        for (pair, out) in input.chunks_exact(2).zip(output.iter_mut()) {
            *out = self.downsample(pair[0], pair[1]);
        }
    }

    /// Clears tap and delay-line history.
    pub fn reset(&mut self) {
        self.history.iter_mut().for_each(|h| *h = 0.0);
        self.delay_line.iter_mut().for_each(|d| *d = 0.0);
        self.delay_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_stage() -> HalfbandFir {
        HalfbandFir::new(design_branch(15))
    }

    #[test]
    fn branch_taps_sum_to_unity() {
        let taps = design_branch(15);
        let sum: f32 = taps.iter().sum();
        assert!((sum - 1.0).abs() < 1e-4, "sum {sum}");
    }

    #[test]
    fn branch_taps_are_symmetric() {
        let taps = design_branch(15);
        for i in 0..taps.len() / 2 {
            assert!(
                (taps[i] - taps[taps.len() - 1 - i]).abs() < 1e-5,
                "asymmetry at {i}"
            );
        }
    }

    #[test]
    fn group_delay_down_is_half_of_up() {
        let stage = test_stage();
        assert!((stage.group_delay_up() - stage.group_delay_down() * 2.0).abs() < 1e-9);
    }

    #[test]
    fn upsample_dc_settles_to_unity_both_phases() {
        let mut stage = test_stage();
        let mut last = (0.0, 0.0);
        for _ in 0..100 {
            last = stage.upsample(1.0);
        }
        assert!((last.0 - 1.0).abs() < 1e-3, "even: {:?}", last);
        assert!((last.1 - 1.0).abs() < 1e-3, "odd: {:?}", last);
    }

    #[test]
    fn downsample_dc_settles_to_unity() {
        let mut stage = test_stage();
        let mut last = 0.0;
        for _ in 0..100 {
            last = stage.downsample(1.0, 1.0);
        }
        assert!((last - 1.0).abs() < 1e-3, "got {last}");
    }

    #[test]
    fn reset_matches_fresh_instance() {
        let mut stage = test_stage();
        for i in 0..50 {
            stage.upsample(i as f32 * 0.01);
        }
        stage.reset();

        let mut fresh = test_stage();
        let a = stage.upsample(0.3);
        let b = fresh.upsample(0.3);
        assert!((a.0 - b.0).abs() < 1e-6);
        assert!((a.1 - b.1).abs() < 1e-6);
    }
}

//! Chains half-band stages to cover ratios beyond 2 (C5).
//!
//! Every stage in a cascade shares the same normalized design (same
//! attenuation, same transition bandwidth relative to its own sample
//! rate) — the textbook reason half-band cascades are attractive: a
//! single filter design, reused unchanged at every octave, because the
//! normalized half-band spec is self-similar across rate doublings.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use crate::stage::Stage;

/// Upper bound on any single `process_up`/`process_down` call's larger
/// (high-rate) buffer length. Exceeding it is a contract violation, not a
/// dynamic resize: this crate never allocates on the processing path.
pub const MAX_BLOCK: usize = 4096;

/// A chain of `log2(ratio)` half-band stages converting by a power-of-two
/// factor.
#[derive(Debug, Clone)]
pub struct Cascade {
    stages: Vec<Stage>,
    scratch_a: Vec<f32>,
    scratch_b: Vec<f32>,
}

impl Cascade {
    /// Builds a cascade from an already-constructed stage chain. `stages`
    /// must be non-empty; `ratio()` is `2.pow(stages.len())`.
    pub fn new(stages: Vec<Stage>) -> Self {
        debug_assert!(!stages.is_empty());
        Self {
            stages,
            scratch_a: vec![0.0; MAX_BLOCK],
            scratch_b: vec![0.0; MAX_BLOCK],
        }
    }

    /// Overall rate-change ratio this cascade implements.
    pub fn ratio(&self) -> usize {
        1usize << self.stages.len()
    }

    /// Number of chained stages.
    pub fn num_stages(&self) -> usize {
        self.stages.len()
    }

    /// Sum of every stage's filter order.
    pub fn order(&self) -> usize {
        self.stages.iter().map(Stage::order).sum()
    }

    /// Total group delay, in final (high-rate) output samples, this
    /// cascade contributes when used to upsample, measured at relative
    /// frequency `f_rel`. A stage's own-rate delay is scaled by the
    /// product of the ratios of every stage still to come, since it's
    /// still expressed in that stage's own (lower) sample rate until the
    /// rest of the cascade has doubled it up to the final rate.
    pub fn delay_up(&self, f_rel: f64) -> f64 {
        let n = self.stages.len();
        self.stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                let remaining = n - 1 - i;
                stage.group_delay_up(f_rel) * (1u64 << remaining) as f64
            })
            .sum()
    }

    /// Total group delay, in final (low-rate) output samples, this
    /// cascade contributes when used to downsample. The mirror of
    /// [`Self::delay_up`]: each stage's own-rate delay is divided, rather
    /// than multiplied, by the product of the ratios of every stage still
    /// to come.
    pub fn delay_down(&self, f_rel: f64) -> f64 {
        let n = self.stages.len();
        self.stages
            .iter()
            .enumerate()
            .map(|(i, stage)| {
                let remaining = n - 1 - i;
                stage.group_delay_down(f_rel) / (1u64 << remaining) as f64
            })
            .sum()
    }

    /// Upsamples a block by `ratio()`. `output.len()` must equal
    /// `input.len() * ratio()`, and that product must not exceed
    /// [`MAX_BLOCK`].
    pub fn process_up(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(output.len(), input.len() * self.ratio());
        debug_assert!(output.len() <= MAX_BLOCK);

        let mut cur_len = input.len();
        self.scratch_a[..cur_len].copy_from_slice(input);

        let mut a_is_current = true;
        for stage in &mut self.stages {
            let next_len = cur_len * 2;
            if a_is_current {
                stage.process_up(&self.scratch_a[..cur_len], &mut self.scratch_b[..next_len]);
            } else {
                stage.process_up(&self.scratch_b[..cur_len], &mut self.scratch_a[..next_len]);
            }
            cur_len = next_len;
            a_is_current = !a_is_current;
        }

        let result = if a_is_current { &self.scratch_a } else { &self.scratch_b };
        output.copy_from_slice(&result[..cur_len]);
    }

    /// Downsamples a block by `ratio()`. `input.len()` must equal
    /// `output.len() * ratio()`, and that product must not exceed
    /// [`MAX_BLOCK`].
    pub fn process_down(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len() * self.ratio());
        debug_assert!(input.len() <= MAX_BLOCK);

        let mut cur_len = input.len();
        self.scratch_a[..cur_len].copy_from_slice(input);

        let mut a_is_current = true;
        for stage in &mut self.stages {
            let next_len = cur_len / 2;
            if a_is_current {
                stage.process_down(&self.scratch_a[..cur_len], &mut self.scratch_b[..next_len]);
            } else {
                stage.process_down(&self.scratch_b[..cur_len], &mut self.scratch_a[..next_len]);
            }
            cur_len = next_len;
            a_is_current = !a_is_current;
        }

        let result = if a_is_current { &self.scratch_a } else { &self.scratch_b };
        output.copy_from_slice(&result[..cur_len]);
    }

    /// Clears every stage's internal state.
    pub fn reset(&mut self) {
        for stage in &mut self.stages {
            stage.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designer::coefs_from_spec;
    use crate::iir::HalfbandIirScalar;

    fn make_cascade(num_stages: usize) -> Cascade {
        let coefs = coefs_from_spec(72.0, 0.1);
        let stages = (0..num_stages)
            .map(|_| Stage::IirScalar(HalfbandIirScalar::new(&coefs)))
            .collect();
        Cascade::new(stages)
    }

    #[test]
    fn ratio_matches_stage_count() {
        assert_eq!(make_cascade(1).ratio(), 2);
        assert_eq!(make_cascade(2).ratio(), 4);
        assert_eq!(make_cascade(3).ratio(), 8);
    }

    #[test]
    fn upsample_produces_expected_length() {
        let mut cascade = make_cascade(2);
        let input = [0.0f32; 16];
        let mut output = [0.0f32; 64];
        cascade.process_up(&input, &mut output);
    }

    #[test]
    fn dc_upsample_then_downsample_round_trips() {
        let mut up = make_cascade(1);
        let mut down = make_cascade(1);

        let input = [1.0f32; 8];
        let mut mid = [0.0f32; 16];
        up.process_up(&input, &mut mid);

        for _ in 0..20 {
            up.process_up(&input, &mut mid);
        }

        let mut out = [0.0f32; 8];
        for _ in 0..20 {
            down.process_down(&mid, &mut out);
        }
        for &s in &out {
            assert!((s - 1.0).abs() < 0.05, "got {s}");
        }
    }

    #[test]
    fn reset_restores_fresh_behaviour() {
        let mut cascade = make_cascade(1);
        let input = [0.3f32; 8];
        let mut output = [0.0f32; 16];
        cascade.process_up(&input, &mut output);
        cascade.reset();

        let mut fresh = make_cascade(1);
        let mut a = [0.0f32; 16];
        let mut b = [0.0f32; 16];
        cascade.process_up(&input, &mut a);
        fresh.process_up(&input, &mut b);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
    }
}

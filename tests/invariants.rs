//! Property-based invariants that must hold for any valid input, not just
//! the worked scenarios in `accuracy.rs`.

use proptest::prelude::*;

use halfband_resampler::designer::{atten_from_order_tbw, nbr_coefs_from_spec};
use halfband_resampler::fir::design_branch;
use halfband_resampler::{Direction, Engine, FilterKind, Precision};

proptest! {
    /// Processing `[a || b]` as one block must equal processing `a` then
    /// `b` on the same engine: a half-band stage is a pure automaton over
    /// its declared state, so block boundaries are never observable.
    #[test]
    fn block_partitioning_is_associative(
        a_len in 1usize..64,
        b_len in 1usize..64,
        seed in 0.0f32..1000.0,
    ) {
        let total_len = a_len + b_len;
        let samples: Vec<f32> = (0..total_len).map(|i| (seed + i as f32 * 0.017).sin()).collect();

        let mut whole_engine = Engine::new(Direction::Upsample, 2, Precision::Db72, FilterKind::IirScalar);
        let mut whole_out = vec![0.0f32; total_len * 2];
        whole_engine.process_block(&samples, &mut whole_out);

        let mut split_engine = Engine::new(Direction::Upsample, 2, Precision::Db72, FilterKind::IirScalar);
        let mut split_out = vec![0.0f32; total_len * 2];
        split_engine.process_block(&samples[..a_len], &mut split_out[..a_len * 2]);
        split_engine.process_block(&samples[a_len..], &mut split_out[a_len * 2..]);

        for (w, s) in whole_out.iter().zip(split_out.iter()) {
            prop_assert!((w - s).abs() < 1e-6, "diverged: {w} vs {s}");
        }
    }

    /// `reset` followed by any input sequence must match a fresh engine
    /// built with the same parameters processing the same sequence.
    #[test]
    fn reset_matches_fresh_construction(
        warmup_len in 1usize..128,
        probe_len in 1usize..64,
        seed in 0.0f32..1000.0,
    ) {
        let warmup: Vec<f32> = (0..warmup_len).map(|i| (seed + i as f32 * 0.031).sin()).collect();
        let probe: Vec<f32> = (0..probe_len).map(|i| (seed + i as f32 * 0.091).cos()).collect();

        let mut used = Engine::new(Direction::Downsample, 4, Precision::Db96, FilterKind::IirScalar);
        // Round block lengths down to a multiple of the ratio; the
        // downsample contract requires `input.len() == output.len() * ratio`.
        let warmup_trimmed_len = warmup_len - warmup_len % 4;
        let mut warmup_out = vec![0.0f32; warmup_trimmed_len / 4];
        used.process_block(&warmup[..warmup_trimmed_len], &mut warmup_out);
        used.reset();

        let mut fresh = Engine::new(Direction::Downsample, 4, Precision::Db96, FilterKind::IirScalar);

        let probe_trimmed_len = probe_len - probe_len % 4;
        prop_assume!(probe_trimmed_len > 0);
        let mut used_out = vec![0.0f32; probe_trimmed_len / 4];
        let mut fresh_out = vec![0.0f32; probe_trimmed_len / 4];
        used.process_block(&probe[..probe_trimmed_len], &mut used_out);
        fresh.process_block(&probe[..probe_trimmed_len], &mut fresh_out);

        for (u, f) in used_out.iter().zip(fresh_out.iter()) {
            prop_assert!((u - f).abs() < 1e-6, "diverged after reset: {u} vs {f}");
        }
    }

    /// `atten_from_order_tbw(nbr_coefs_from_spec(A, tbw), tbw) >= A` for
    /// any reasonable attenuation target and transition bandwidth.
    #[test]
    fn designer_round_trip_never_undershoots(
        attenuation in 20.0f64..150.0,
        transition in 0.01f64..0.2,
    ) {
        let n = nbr_coefs_from_spec(attenuation, transition);
        let achieved = atten_from_order_tbw(n, transition);
        prop_assert!(achieved >= attenuation - 1e-6, "requested {attenuation}, got {achieved}");
    }

    /// A half-band FIR branch's taps are symmetric about its center,
    /// regardless of length.
    #[test]
    fn fir_branch_taps_are_symmetric(taps_half in 1usize..64) {
        let taps = taps_half * 2 + 1;
        let coefs = design_branch(taps);
        for i in 0..coefs.len() / 2 {
            prop_assert!(
                (coefs[i] - coefs[coefs.len() - 1 - i]).abs() < 1e-5,
                "asymmetry at {i}"
            );
        }
    }
}

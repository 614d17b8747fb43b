//! End-to-end accuracy scenarios: a resampled tone should survive in the
//! passband and be suppressed in the stopband, to within the margin its
//! precision tag promises.

use core::f64::consts::PI;

use halfband_resampler::{Direction, Engine, FilterKind, Precision};

fn sine_wave(frequency: f32, sample_rate: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (2.0 * PI as f32 * frequency * i as f32 / sample_rate).sin())
        .collect()
}

fn rms(signal: &[f32]) -> f32 {
    (signal.iter().map(|&s| s * s).sum::<f32>() / signal.len() as f32).sqrt()
}

/// Largest absolute error, over `output[skip..]`, against
/// `sin((i - delay) * freq / out_rate * 2*pi)` — the literal delay law a
/// passband tone must satisfy.
fn max_phase_shifted_error(output: &[f32], skip: usize, freq: f64, out_rate: f64, delay: f64) -> f64 {
    output
        .iter()
        .enumerate()
        .skip(skip)
        .map(|(i, &y)| {
            let expected = (2.0 * PI * freq * (i as f64 - delay) / out_rate).sin();
            (y as f64 - expected).abs()
        })
        .fold(0.0, f64::max)
}

#[test]
fn accuracy_96db_upsample_2x_preserves_passband_tone() {
    let sr = 44100.0;
    let freq = 1000.0;
    let input = sine_wave(freq as f32, sr as f32, 1024);

    let mut engine = Engine::new(Direction::Upsample, 2, Precision::Db96, FilterKind::IirScalar);
    let mut output = vec![0.0f32; input.len() * 2];
    engine.process_block(&input, &mut output);

    // Skip the filter's startup transient; the delay law only holds once
    // the cascade's internal state has settled.
    let max_err = max_phase_shifted_error(&output, 200, freq, sr * 2.0, engine.delay());
    assert!(max_err < 3.2e-5, "max error {max_err} exceeds -89 dB tolerance");
}

#[test]
fn accuracy_144db_downsample_2x_preserves_passband_tone() {
    let sr = 88200.0;
    let freq = 500.0;
    let input = sine_wave(freq as f32, sr as f32, 2048);

    let mut engine = Engine::new(Direction::Downsample, 2, Precision::Db144, FilterKind::IirScalar);
    let mut output = vec![0.0f32; input.len() / 2];
    engine.process_block(&input, &mut output);

    let max_err = max_phase_shifted_error(&output, 100, freq, sr / 2.0, engine.delay());
    assert!(max_err < 3.2e-7, "max error {max_err} exceeds tolerance");
}

#[test]
fn aliasing_rejection_8x_downsample_stopband_tone() {
    let sr = 352800.0;
    let freq = 20_000.0;
    let input = sine_wave(freq, sr, 4096);
    let in_rms = rms(&input[500..]);

    let mut engine = Engine::new(Direction::Downsample, 8, Precision::Db96, FilterKind::IirScalar);
    let mut output = vec![0.0f32; input.len() / 8];
    engine.process_block(&input, &mut output);

    let out_rms = rms(&output[20..]);
    assert!(
        out_rms < in_rms * 0.1,
        "expected stopband tone to be rejected: in={in_rms} out={out_rms}"
    );
}

#[test]
fn designer_round_trip_meets_requested_attenuation() {
    let n = halfband_resampler::designer::nbr_coefs_from_spec(96.0, (44100.0 / 2.0 - 18000.0) / 44100.0);
    let achieved = halfband_resampler::designer::atten_from_order_tbw(n, (44100.0 / 2.0 - 18000.0) / 44100.0);
    assert!(achieved >= 96.0 - 1e-6, "got {achieved}");
}

#[test]
fn group_delay_matches_reference_8_coefficient_table() {
    // The 2x-stage reference coefficients and expected group delay from
    // `examples/original_source/filter-design/mkiir.cc`'s
    // `test_group_delay()` ("expect 4").
    let coeffs: [f64; 8] = [
        0.029771566661791642,
        0.11293802507590323,
        0.23389457050522444,
        0.37412196640361606,
        0.51845353417401152,
        0.65849242953158127,
        0.79323734846738669,
        0.92851085864352823,
    ];
    let gdly = halfband_resampler::designer::group_delay_total(&coeffs, 1000.0 / 88200.0, false);
    assert!((gdly - 4.0).abs() < 0.01, "expected 4.0, got {gdly}");
}

#[test]
fn identity_at_ratio_one_both_directions() {
    let input = sine_wave(997.0, 48000.0, 128);

    let mut up = Engine::new(Direction::Upsample, 1, Precision::Linear, FilterKind::Fir);
    let mut up_out = vec![0.0f32; input.len()];
    up.process_block(&input, &mut up_out);
    assert_eq!(input, up_out);

    let mut down = Engine::new(Direction::Downsample, 1, Precision::Linear, FilterKind::Fir);
    let mut down_out = vec![0.0f32; input.len()];
    down.process_block(&input, &mut down_out);
    assert_eq!(input, down_out);
}

#[test]
fn zero_input_settles_to_zero_output_past_delay() {
    let mut engine = Engine::new(Direction::Upsample, 4, Precision::Db96, FilterKind::IirScalar);
    let input = [0.0f32; 64];
    let mut output = [0.0f32; 256];
    // Run several blocks so any residual transient (there shouldn't be one,
    // starting from a freshly constructed all-zero state) has flushed.
    for _ in 0..4 {
        engine.process_block(&input, &mut output);
    }
    for &s in &output {
        assert_eq!(s, 0.0);
    }
}

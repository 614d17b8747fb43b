//! Coefficient tables (C7): maps a `(filter kind, ratio, precision)` triple
//! to a designed filter, computed once and cached behind a
//! [`std::sync::OnceLock`] when the `std` feature is enabled. Under
//! `no_std` there is nowhere to cache a static `Vec`, so every call
//! re-designs; callers on that path are expected to build their stages
//! once at startup and hold onto them.

extern crate alloc;

use alloc::vec::Vec;

use crate::designer;
use crate::fir::{self, HalfbandFir};
use crate::iir::HalfbandIirScalar;
use crate::precision::Precision;
use crate::simd::HalfbandIirSimd;
use crate::stage::{FilterKind, Stage};

/// Nominal passband edge, in Hz, every ratio's design targets. Fixed
/// regardless of ratio.
const PASSBAND_EDGE_HZ: f64 = 18000.0;

/// Reference sample rate the transition bandwidth below is scaled from.
const BASE_RATE_HZ: f64 = 44100.0;

/// `(attenuation_db, transition_bandwidth)` for the overall cascade
/// `ratio`'s design. Every stage inside one cascade shares this single
/// design — the normalized half-band spec is self-similar across octaves
/// — but the design itself depends on the *overall* ratio: scaling a
/// nominal rate by `ratio` while holding the passband edge fixed widens
/// the transition band (as a fraction of that nominal rate) for larger
/// ratios, so less filtering is needed per stage.
fn spec_for(precision: Precision, ratio: usize) -> (f64, f64) {
    let atten = precision.attenuation_db().unwrap_or(30.0);
    let rate = BASE_RATE_HZ * ratio as f64 / 2.0;
    let tbw = (rate / 2.0 - PASSBAND_EDGE_HZ) / rate;
    (atten, tbw)
}

/// Branch length for the windowed-sinc FIR design at a given precision and
/// ratio. Sized from the same transition bandwidth `spec_for` computes for
/// the IIR design, via the classic windowed-FIR length estimate (Harris,
/// *Multirate Signal Processing*, the `(A - 8) / (2.285 * 2*pi*df)` rule);
/// a FIR needs far more taps than an IIR stage to hit the same stopband.
fn fir_branch_len_for(precision: Precision, ratio: usize) -> usize {
    let (atten, tbw) = spec_for(precision, ratio);
    let full_len = (atten - 8.0) / (2.285 * 2.0 * core::f64::consts::PI * tbw) + 1.0;
    let mut branch_len = (full_len / 2.0).round() as usize;
    branch_len |= 1; // force odd
    branch_len.max(3)
}

/// All six precision tags, `Linear` included, in table order. Distinct from
/// [`Precision::ALL`], which excludes `Linear` because that tag has no
/// numeric attenuation target — but it still needs a table slot here.
const ALL_PRECISIONS: [Precision; 6] = [
    Precision::Linear,
    Precision::Db48,
    Precision::Db72,
    Precision::Db96,
    Precision::Db120,
    Precision::Db144,
];

/// Ratios the IIR design table covers. Ratio 16 has no IIR entry: it's
/// FIR-only (see [`crate::engine::Engine`]'s contract).
const IIR_RATIOS: [usize; 3] = [2, 4, 8];

/// Ratios the FIR design table covers.
const FIR_RATIOS: [usize; 4] = [2, 4, 8, 16];

fn precision_index(precision: Precision) -> usize {
    ALL_PRECISIONS
        .iter()
        .position(|&p| p == precision)
        .expect("ALL_PRECISIONS is exhaustive")
}

fn iir_ratio_index(ratio: usize) -> usize {
    IIR_RATIOS
        .iter()
        .position(|&r| r == ratio)
        .unwrap_or_else(|| panic!("ratio {ratio} has no IIR design; must be 2, 4 or 8"))
}

fn fir_ratio_index(ratio: usize) -> usize {
    FIR_RATIOS
        .iter()
        .position(|&r| r == ratio)
        .unwrap_or_else(|| panic!("ratio {ratio} has no FIR design; must be 2, 4, 8 or 16"))
}

fn build_iir_coefs(precision: Precision, ratio: usize) -> Vec<f64> {
    let (atten, trans) = spec_for(precision, ratio);
    designer::coefs_from_spec(atten, trans)
}

fn build_fir_taps(precision: Precision, ratio: usize) -> Vec<f32> {
    fir::design_branch(fir_branch_len_for(precision, ratio))
}

#[cfg(feature = "std")]
fn iir_table() -> &'static [[Vec<f64>; 3]; 6] {
    static TABLE: std::sync::OnceLock<[[Vec<f64>; 3]; 6]> = std::sync::OnceLock::new();
    TABLE.get_or_init(|| {
        core::array::from_fn(|pi| core::array::from_fn(|ri| build_iir_coefs(ALL_PRECISIONS[pi], IIR_RATIOS[ri])))
    })
}

#[cfg(feature = "std")]
fn fir_table() -> &'static [[Vec<f32>; 4]; 6] {
    static TABLE: std::sync::OnceLock<[[Vec<f32>; 4]; 6]> = std::sync::OnceLock::new();
    TABLE.get_or_init(|| {
        core::array::from_fn(|pi| core::array::from_fn(|ri| build_fir_taps(ALL_PRECISIONS[pi], FIR_RATIOS[ri])))
    })
}

/// Elliptic IIR coefficients (flat, branch-interleaved) for `precision` at
/// overall cascade `ratio` (2, 4 or 8).
pub fn iir_coefs(precision: Precision, ratio: usize) -> Vec<f64> {
    #[cfg(feature = "std")]
    {
        iir_table()[precision_index(precision)][iir_ratio_index(ratio)].clone()
    }
    #[cfg(not(feature = "std"))]
    {
        build_iir_coefs(precision, ratio)
    }
}

/// Windowed-sinc odd-phase branch taps for `precision` at overall cascade
/// `ratio` (2, 4, 8 or 16).
pub fn fir_taps(precision: Precision, ratio: usize) -> Vec<f32> {
    #[cfg(feature = "std")]
    {
        fir_table()[precision_index(precision)][fir_ratio_index(ratio)].clone()
    }
    #[cfg(not(feature = "std"))]
    {
        build_fir_taps(precision, ratio)
    }
}

/// Builds one freshly-stated [`Stage`] of the requested kind, precision and
/// overall cascade ratio. Every stage in a [`crate::cascade::Cascade`] is
/// built this way, once per octave, all sharing the one design for that
/// cascade's overall ratio.
pub fn build_stage(kind: FilterKind, precision: Precision, ratio: usize) -> Stage {
    match kind {
        FilterKind::Fir => Stage::Fir(HalfbandFir::new(fir_taps(precision, ratio))),
        FilterKind::IirScalar => Stage::IirScalar(HalfbandIirScalar::new(&iir_coefs(precision, ratio))),
        FilterKind::IirSimd => Stage::IirSimd(HalfbandIirSimd::new(&iir_coefs(precision, ratio))),
    }
}

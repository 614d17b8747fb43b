//! Half-band polyphase IIR coefficient designer (C1).
//!
//! Computes all-pass cell coefficients for a half-band filter from either
//! a (stopband attenuation, transition bandwidth) pair or a (group delay,
//! measurement frequency) pair, the latter via bisection over the
//! transition bandwidth. Ported from the reference elliptic-filter design
//! routine; see [`crate::elliptic`] for the underlying series.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::PI;
use libm::{atan2, cos, fabs, sin};

use crate::elliptic::{atten_for_order, coef_for_index, order_for_atten, transition_param};
use crate::error::{DesignError, DesignResult};

/// Maximum number of all-pass coefficients this designer will produce.
/// Mirrors the reference implementation's fixed-capacity coefficient
/// buffer; no cascade in this crate needs anywhere near this many stages.
pub const MAX_COEFS: usize = 48;

/// Minimum number of coefficients required for a given stopband
/// attenuation and transition bandwidth.
///
/// `attenuation` in dB, `> 0`. `transition` normalized to the sample rate,
/// in `(0, 0.5)`.
pub fn nbr_coefs_from_spec(attenuation: f64, transition: f64) -> usize {
    debug_assert!(attenuation > 0.0);
    debug_assert!(transition > 0.0 && transition < 0.5);

    let (_, q) = transition_param(transition);
    let order = order_for_atten(attenuation, q);
    ((order - 1) / 2) as usize
}

/// Stopband attenuation reached by `nbr_coefs` coefficients at the given
/// transition bandwidth.
pub fn atten_from_order_tbw(nbr_coefs: usize, transition: f64) -> f64 {
    debug_assert!(nbr_coefs > 0);
    debug_assert!(transition > 0.0 && transition < 0.5);

    let (_, q) = transition_param(transition);
    let order = (nbr_coefs * 2 + 1) as i32;
    atten_for_order(q, order)
}

/// Designs a half-band filter meeting `attenuation` dB of stopband
/// rejection with the given transition bandwidth, choosing the minimum
/// order automatically.
pub fn coefs_from_spec(attenuation: f64, transition: f64) -> Vec<f64> {
    debug_assert!(attenuation > 0.0);
    debug_assert!(transition > 0.0 && transition < 0.5);

    let (k, q) = transition_param(transition);
    let order = order_for_atten(attenuation, q);
    let nbr_coefs = ((order - 1) / 2) as usize;

    (0..nbr_coefs)
        .map(|index| coef_for_index(index as i32, k, q, order))
        .collect()
}

/// Designs a half-band filter of exactly `nbr_coefs` coefficients at the
/// given transition bandwidth, reaching the maximum attenuation possible
/// for that order.
pub fn coefs_spec_order_tbw(nbr_coefs: usize, transition: f64) -> Vec<f64> {
    debug_assert!(nbr_coefs > 0);
    debug_assert!(transition > 0.0 && transition < 0.5);

    let (k, q) = transition_param(transition);
    let order = (nbr_coefs * 2 + 1) as i32;

    (0..nbr_coefs)
        .map(|index| coef_for_index(index as i32, k, q, order))
        .collect()
}

/// Result of a successful group-delay-constrained design.
pub struct GroupDelayDesign {
    /// Designed all-pass coefficients.
    pub coefs: Vec<f64>,
    /// Attenuation achieved, in dB.
    pub attenuation: f64,
    /// Transition bandwidth the bisection converged on.
    pub transition: f64,
}

/// Designs a half-band filter of exactly `nbr_coefs` coefficients whose
/// group delay, measured at `f_rel`, matches `group_delay` within `prec`
/// samples, searching the transition bandwidth between `trans_lb` and
/// `trans_ub` by bisection, and rejecting the result if the achieved
/// attenuation falls outside `[atten_lb, atten_ub]`.
#[allow(clippy::too_many_arguments)]
pub fn coefs_spec_order_gdly(
    nbr_coefs: usize,
    group_delay: f64,
    f_rel: f64,
    prec: f64,
    atten_lb: f64,
    atten_ub: f64,
    trans_lb: f64,
    trans_ub: f64,
) -> DesignResult<GroupDelayDesign> {
    debug_assert!(nbr_coefs > 0 && nbr_coefs <= MAX_COEFS);
    debug_assert!(group_delay > 0.0);
    debug_assert!((0.0..1.0).contains(&f_rel));
    debug_assert!(prec > 0.0);
    debug_assert!(atten_lb > 0.0 && atten_lb < atten_ub);
    debug_assert!(trans_lb > 0.0 && trans_lb < trans_ub && trans_ub < 0.5);

    let mut lb_tbw = trans_lb;
    let mut ub_tbw = trans_ub;

    let ub_coefs = coefs_spec_order_tbw(nbr_coefs, ub_tbw);
    let lb_coefs = coefs_spec_order_tbw(nbr_coefs, lb_tbw);

    let ub_gdly = group_delay_total(&ub_coefs, f_rel, false);
    let mut lb_gdly = group_delay_total(&lb_coefs, f_rel, false);

    if (ub_gdly - group_delay) * (group_delay - lb_gdly) > 0.0 {
        return Err(DesignError::GroupDelayUnreachable {
            requested: group_delay,
            lower_bound: lb_gdly,
            upper_bound: ub_gdly,
        });
    }

    const MAX_IT: u32 = 1000;
    let mut nbr_it = 0u32;
    let mut rs_tbw = lb_tbw;
    let mut rs_attn = 0.0;
    let mut coef_arr = vec![0.0; nbr_coefs];
    let mut converged = false;

    while nbr_it < MAX_IT {
        rs_tbw = (ub_tbw + lb_tbw) * 0.5;
        rs_attn = atten_from_order_tbw(nbr_coefs, rs_tbw);
        coef_arr = coefs_spec_order_tbw(nbr_coefs, rs_tbw);
        let rs_gdly = group_delay_total(&coef_arr, f_rel, false);

        if (group_delay - lb_gdly) * (group_delay - rs_gdly) < 0.0 {
            ub_tbw = rs_tbw;
        } else {
            lb_tbw = rs_tbw;
            lb_gdly = rs_gdly;
        }

        nbr_it += 1;
        if fabs(rs_gdly - group_delay) <= prec {
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(DesignError::NotConverged { iterations: nbr_it });
    }
    if rs_attn < atten_lb || rs_attn > atten_ub {
        return Err(DesignError::AttenuationOutOfRange {
            attenuation: rs_attn,
            lower_bound: atten_lb,
            upper_bound: atten_ub,
        });
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(order = nbr_coefs * 2 + 1, tbw = rs_tbw, iterations = nbr_it, "designed half-band IIR filter");

    Ok(GroupDelayDesign {
        coefs: coef_arr,
        attenuation: rs_attn,
        transition: rs_tbw,
    })
}

/// Phase delay, in samples, of a single all-pass cell with coefficient `a`
/// at relative frequency `f_fs` in `[0, 0.5)`.
pub fn phase_delay(a: f64, f_fs: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&a));
    debug_assert!(f_fs >= 0.0 && f_fs < 0.5);

    let w = 2.0 * PI * f_fs;
    let c = cos(w);
    let s = sin(w);
    let x = a + c + a * (c * (a + c) + s * s);
    let y = a * a * s - s;
    let mut ph = atan2(y, x);
    if ph < 0.0 {
        ph += 2.0 * PI;
    }
    ph / w
}

/// Group delay, in samples, of a single all-pass cell with coefficient `a`
/// at relative frequency `f_fs`. `ph_flag` selects the pi/2-phaser form
/// `(a - z^-2) / (1 - a z^-2)` instead of the plain half-band form.
pub fn group_delay_cell(a: f64, f_fs: f64, ph_flag: bool) -> f64 {
    debug_assert!((0.0..=1.0).contains(&a));
    debug_assert!(f_fs >= 0.0 && f_fs < 0.5);

    let w = 2.0 * PI * f_fs;
    let a2 = a * a;
    let sig = if ph_flag { -2.0 } else { 2.0 };
    2.0 * (1.0 - a2) / (a2 + sig * a * cos(2.0 * w) + 1.0)
}

/// Group delay, in samples, of a whole branch: the sum of every other
/// cell's coefficient (cells at even index belong to one branch of the
/// two-branch polyphase pair).
pub fn group_delay_total(coefs: &[f64], f_fs: f64, ph_flag: bool) -> f64 {
    debug_assert!(!coefs.is_empty());
    debug_assert!(f_fs >= 0.0 && f_fs < 0.5);

    coefs
        .iter()
        .step_by(2)
        .map(|&a| group_delay_cell(a, f_fs, ph_flag))
        .sum()
}

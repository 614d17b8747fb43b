//! Designer failure modes.
//!
//! `ContractViolation` (malformed ratio, unsupported precision/kind
//! combination, oversized block) is not a variant here: those are
//! programming errors caught with `assert!`/`debug_assert!` at the call
//! site, never recovered from. Only the Designer's own numerical search can
//! fail in a way a caller might reasonably want to catch and report.

#[cfg(feature = "std")]
use thiserror::Error;

/// Errors produced by [`crate::designer`] when a requested filter
/// specification cannot be met.
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DesignError {
    /// The requested group delay falls outside what's reachable by sweeping
    /// the transition bandwidth between `trans_lb` and `trans_ub`.
    #[cfg_attr(
        feature = "std",
        error(
            "group delay {requested} unreachable: bracket [{lower_bound}, {upper_bound}] \
             does not straddle it"
        )
    )]
    GroupDelayUnreachable {
        /// The group delay that was requested, in samples.
        requested: f64,
        /// Group delay at the lower transition-bandwidth bound.
        lower_bound: f64,
        /// Group delay at the upper transition-bandwidth bound.
        upper_bound: f64,
    },

    /// The bisection search did not converge to within `prec` samples
    /// within the iteration budget.
    #[cfg_attr(
        feature = "std",
        error("group delay bisection failed to converge after {iterations} iterations")
    )]
    NotConverged {
        /// Number of bisection iterations attempted before giving up.
        iterations: u32,
    },

    /// The bisection converged, but the resulting stopband attenuation
    /// falls outside the caller's requested bounds.
    #[cfg_attr(
        feature = "std",
        error(
            "converged attenuation {attenuation}dB outside requested bounds \
             [{lower_bound}, {upper_bound}]"
        )
    )]
    AttenuationOutOfRange {
        /// The attenuation the bisection actually converged to, in dB.
        attenuation: f64,
        /// Lower bound requested by the caller, in dB.
        lower_bound: f64,
        /// Upper bound requested by the caller, in dB.
        upper_bound: f64,
    },
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for DesignError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DesignError::GroupDelayUnreachable { requested, .. } => {
                write!(f, "group delay {requested} unreachable")
            }
            DesignError::NotConverged { iterations } => {
                write!(f, "bisection failed to converge after {iterations} iterations")
            }
            DesignError::AttenuationOutOfRange { attenuation, .. } => {
                write!(f, "converged attenuation {attenuation}dB out of range")
            }
        }
    }
}

/// Result alias for fallible Designer operations.
pub type DesignResult<T> = Result<T, DesignError>;

//! Real-time mono power-of-two resampling engine.
//!
//! Converts a mono audio stream by a factor of 2, 4, 8 or 16, in either
//! direction, using a cascade of half-band filters — one per octave.
//! Three interchangeable implementations are available per stage:
//!
//! - [`fir::HalfbandFir`] — symmetric linear-phase FIR, polyphase
//!   delay/filter decomposition.
//! - [`iir::HalfbandIirScalar`] — polyphase all-pass IIR, cheaper per
//!   sample but not linear-phase.
//! - [`simd::HalfbandIirSimd`] — the same IIR recursion, 4-wide
//!   portable-SIMD data layout.
//!
//! [`engine::Engine`] is the entry point most callers want: pick a ratio,
//! a direction, a [`precision::Precision`] target, and a [`stage::FilterKind`],
//! and call [`engine::Engine::process_block`] every audio callback.
//!
//! # `no_std`
//!
//! Default features pull in `std` (for [`thiserror`] error messages and
//! [`std::sync::OnceLock`]-memoized coefficient tables). Disable them for
//! embedded targets:
//!
//! ```toml
//! [dependencies]
//! halfband-resampler = { version = "0.1", default-features = false }
//! ```
//!
//! Coefficient tables are simply redesigned on every lookup without
//! `std` — build your [`engine::Engine`] once at startup and hold onto it.
//!
//! # Example
//!
//! ```
//! use halfband_resampler::{Direction, Engine, FilterKind, Precision};
//!
//! let mut up = Engine::new(Direction::Upsample, 4, Precision::Db96, FilterKind::IirScalar);
//! let input = [0.0f32; 32];
//! let mut output = [0.0f32; 128];
//! up.process_block(&input, &mut output);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod allpass;
pub mod cascade;
pub mod designer;
pub mod engine;
pub mod error;
pub mod fir;
pub mod iir;
pub mod math;
pub mod precision;
pub mod simd;
pub mod stage;
pub mod tables;

mod elliptic;

pub use cascade::{Cascade, MAX_BLOCK};
pub use engine::{Direction, Engine, SimdHint};
pub use error::{DesignError, DesignResult};
pub use fir::HalfbandFir;
pub use iir::HalfbandIirScalar;
pub use precision::Precision;
pub use simd::{HalfbandIirSimd, sse_available};
pub use stage::{FilterKind, Stage};

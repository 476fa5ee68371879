//! CPU capability detection for the Adler-32 workspace.
//!
//! This crate is the **single source of truth** for "which SIMD kernels may run
//! on this machine". Algorithm crates query [`caps()`] instead of doing ad-hoc
//! detection.
//!
//! # Main Entry Point
//!
//! ```ignore
//! use platform::caps::x86;
//!
//! let caps = platform::caps();
//! if caps.has(x86::AVX512_VNNI_READY) {
//!     // 64-byte VNNI kernel
//! }
//! ```
//!
//! # Properties
//!
//! 1. **Zero-cost when possible**: compile-time features are folded in via `cfg!`.
//! 2. **Cached otherwise**: runtime detection is cached in `OnceLock` (std) or atomics (no_std).
//! 3. **Overridable**: bare-metal targets and tests can install caps before first use.
//! 4. **Miri-safe**: under Miri, always returns portable-only caps.

#![no_std]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing))]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::{Arch, Caps, CpuCaps};
pub use detect::{
  Description, OverrideError, caps_static, clear_override, detect_uncached, has_override, set_override,
  try_set_override,
};

/// Get detected CPU capabilities.
///
/// # Caching
///
/// - With `std`: results are cached in a `OnceLock` (one-time detection).
/// - Without `std`: cached in atomics where 64-bit atomics exist, otherwise
///   compile-time detection runs on each call.
#[inline]
#[must_use]
pub fn caps() -> CpuCaps {
  detect::get()
}

/// Alias for [`caps()`].
#[inline]
#[must_use]
pub fn get() -> CpuCaps {
  detect::get()
}

/// Describe the detected platform.
#[inline]
#[must_use]
pub fn describe() -> Description {
  Description::new(caps())
}
